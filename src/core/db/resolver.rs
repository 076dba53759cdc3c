//! Connection Resolver Module
//!
//! Turns a connection name into a fully validated record: the name must be
//! a key of the loaded file, the five required attributes must be present
//! and non-empty, and the declared `type` must be a known dialect.

use crate::config::{ConnectionConfig, ConnectionRecord};
use crate::core::db::dialect::Dialect;
use crate::core::{DbConnError, Result};
use tracing::debug;

/// Attributes every connection must declare, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 5] = ["type", "user", "pwd", "host", "database"];

/// A connection record that passed validation.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConnection {
    /// Name of the entry in the connection file
    pub name: String,
    pub dialect: Dialect,
    /// The `type` tag exactly as declared; used as the URI scheme
    pub dialect_tag: String,
    pub user: String,
    pub pwd: String,
    pub host: String,
    pub port: Option<String>,
    pub database: String,
}

impl ResolvedConnection {
    /// Driver tag for this connection's dialect.
    pub fn driver(&self) -> &'static str {
        self.dialect.driver()
    }

    /// Validates a single record.
    pub fn from_record(name: &str, record: &ConnectionRecord) -> Result<Self> {
        let dialect_tag = required(name, "type", &record.dialect)?;
        let user = required(name, "user", &record.user)?;
        let pwd = required(name, "pwd", &record.pwd)?;
        let host = required(name, "host", &record.host)?;
        let database = required(name, "database", &record.database)?;
        let dialect = Dialect::from_tag(dialect_tag)?;

        Ok(ResolvedConnection {
            name: name.to_string(),
            dialect,
            dialect_tag: dialect_tag.to_string(),
            user: user.to_string(),
            pwd: pwd.to_string(),
            host: host.to_string(),
            port: record.port.clone(),
            database: database.to_string(),
        })
    }
}

/// Masks `pwd`.
impl std::fmt::Debug for ResolvedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConnection")
            .field("name", &self.name)
            .field("dialect", &self.dialect)
            .field("dialect_tag", &self.dialect_tag)
            .field("user", &self.user)
            .field("pwd", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

fn required<'a>(connection: &str, field: &'static str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DbConnError::MissingField {
            field,
            connection: connection.to_string(),
        }),
    }
}

/// Looks up `name` in `configs` and validates it.
pub fn resolve(name: &str, configs: &ConnectionConfig) -> Result<ResolvedConnection> {
    let record = configs
        .get(name)
        .ok_or_else(|| DbConnError::UnknownConnection {
            name: name.to_string(),
            path: configs.path().to_path_buf(),
        })?;

    let resolved = ResolvedConnection::from_record(name, record)?;
    debug!(
        "Resolved connection {} as {} via {}",
        name,
        resolved.dialect,
        resolved.driver()
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn full_record() -> ConnectionRecord {
        ConnectionRecord {
            dialect: Some("postgres".to_string()),
            user: Some("u".to_string()),
            pwd: Some("p".to_string()),
            host: Some("h".to_string()),
            port: None,
            database: Some("d".to_string()),
        }
    }

    fn config_with(name: &str, record: ConnectionRecord) -> ConnectionConfig {
        let mut connections = IndexMap::new();
        connections.insert(name.to_string(), record);
        ConnectionConfig::new("/tmp/test.json", connections)
    }

    #[test]
    fn test_resolve_valid_record() {
        let config = config_with("db1", full_record());
        let resolved = resolve("db1", &config).unwrap();
        assert_eq!(resolved.name, "db1");
        assert_eq!(resolved.dialect, Dialect::Postgres);
        assert_eq!(resolved.dialect_tag, "postgres");
        assert_eq!(resolved.driver(), "psycopg2");
        assert_eq!(resolved.port, None);
    }

    #[test]
    fn test_unknown_connection() {
        let config = config_with("db1", full_record());
        match resolve("db2", &config) {
            Err(DbConnError::UnknownConnection { name, path }) => {
                assert_eq!(name, "db2");
                assert_eq!(path.to_str(), Some("/tmp/test.json"));
            }
            other => panic!("Expected UnknownConnection, got {:?}", other),
        }
    }

    #[test]
    fn test_each_missing_field_is_named() {
        let clear: [fn(&mut ConnectionRecord); 5] = [
            |r| r.dialect = None,
            |r| r.user = None,
            |r| r.pwd = None,
            |r| r.host = None,
            |r| r.database = None,
        ];
        for (field, clear_field) in REQUIRED_FIELDS.iter().zip(clear) {
            let mut record = full_record();
            clear_field(&mut record);
            match resolve("db1", &config_with("db1", record)) {
                Err(DbConnError::MissingField { field: f, connection }) => {
                    assert_eq!(f, *field);
                    assert_eq!(connection, "db1");
                }
                other => panic!("Expected MissingField({}), got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_empty_field_counts_as_missing() {
        let mut record = full_record();
        record.host = Some(String::new());
        assert!(matches!(
            resolve("db1", &config_with("db1", record)),
            Err(DbConnError::MissingField { field: "host", .. })
        ));
    }

    #[test]
    fn test_missing_field_reported_before_dialect() {
        let mut record = full_record();
        record.dialect = Some("oracle".to_string());
        record.pwd = None;
        assert!(matches!(
            resolve("db1", &config_with("db1", record)),
            Err(DbConnError::MissingField { field: "pwd", .. })
        ));
    }

    #[test]
    fn test_unsupported_dialect() {
        let mut record = full_record();
        record.dialect = Some("mysql".to_string());
        match resolve("db1", &config_with("db1", record)) {
            Err(DbConnError::UnsupportedDialect(tag)) => assert_eq!(tag, "mysql"),
            other => panic!("Expected UnsupportedDialect, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_hides_password() {
        let mut record = full_record();
        record.pwd = Some("hunter2".to_string());
        let resolved = resolve("db1", &config_with("db1", record)).unwrap();
        let rendered = format!("{:?}", resolved);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }
}
