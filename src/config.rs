use crate::core::{DbConnError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the home directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".dbconnections.json";

/// Environment variable that overrides the default path.
pub const CONFIG_ENV_VAR: &str = "DBCONN_CONFIG";

/// One named entry of the connection file.
///
/// Every field is optional at load time; required fields are checked when a
/// record is resolved, so one incomplete entry never hides the others.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectionRecord {
    #[serde(rename = "type", default, deserialize_with = "deserialize_text")]
    pub dialect: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub pwd: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub port: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub database: Option<String>,
}

impl ConnectionRecord {
    /// Reads one entry of the file. An entry that is not an object yields an
    /// empty record, which fails at resolution like any incomplete one.
    pub fn from_value(value: Value) -> Self {
        ConnectionRecord::deserialize(value).unwrap_or_default()
    }
}

/// Masks `pwd`.
impl std::fmt::Debug for ConnectionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRecord")
            .field("type", &self.dialect)
            .field("user", &self.user)
            .field("pwd", &self.pwd.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

/// The parsed connection file: names in file order, plus where it came from.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    path: PathBuf,
    connections: IndexMap<String, ConnectionRecord>,
}

impl ConnectionConfig {
    /// Builds a config from already-parsed records.
    pub fn new(path: impl Into<PathBuf>, connections: IndexMap<String, ConnectionRecord>) -> Self {
        Self {
            path: path.into(),
            connections,
        }
    }

    /// Parses JSON text; `path` is only used in error messages.
    pub fn from_json_str(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let raw: IndexMap<String, Value> = match serde_json::from_str(content) {
            Ok(raw) => raw,
            Err(source) => return Err(DbConnError::ConfigParse { path, source }),
        };
        let connections = raw
            .into_iter()
            .map(|(name, value)| (name, ConnectionRecord::from_value(value)))
            .collect();
        Ok(Self { path, connections })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&ConnectionRecord> {
        self.connections.get(name)
    }

    /// Connection names in the order they appear in the file.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.connections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

/// Resolves the connection file location from the environment.
///
/// `$DBCONN_CONFIG` wins when set and non-empty, otherwise
/// `<home>/.dbconnections.json`.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_CONFIG_FILE))
        .ok_or(DbConnError::HomeDirUnavailable)
}

/// Loads the connection file, falling back to [`default_config_path`].
///
/// Nothing is cached: every call re-reads and re-parses the file.
pub fn load_config(path: Option<&Path>) -> Result<ConnectionConfig> {
    match path {
        Some(path) => load_config_from(path),
        None => load_config_from(default_config_path()?),
    }
}

/// Loads the connection file at an explicit path.
///
/// # Example
///
/// ```no_run
/// let config = dbconn::config::load_config_from("conns.json")?;
/// for name in config.names() {
///     println!("{}", name);
/// }
/// # Ok::<(), dbconn::core::DbConnError>(())
/// ```
pub fn load_config_from<P: AsRef<Path>>(path: P) -> Result<ConnectionConfig> {
    let path = path.as_ref();
    debug!("Loading connection file {:?}", path);
    let content = fs::read_to_string(path).map_err(|source| DbConnError::ConfigNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ConnectionConfig::from_json_str(path, &content)?;
    debug!("Loaded {} connection(s) from {:?}", config.len(), path);
    Ok(config)
}

/// Field values are text; numbers and booleans are taken as their JSON
/// rendering, anything else counts as absent.
fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIG: &str = r#"
{
    "warehouse": {
        "type": "postgres",
        "user": "etl",
        "pwd": "secret",
        "host": "pg.internal",
        "port": "5433",
        "database": "dw"
    },
    "legacy": {
        "type": "mssql",
        "user": "sa",
        "pwd": "pw",
        "host": "sql01",
        "database": "erp",
        "comment": "ignored"
    },
    "numeric_port": {
        "type": "postgresql",
        "host": "h",
        "port": 6543
    }
}
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = ConnectionConfig::from_json_str("sample.json", SAMPLE_CONFIG)
            .expect("Failed to parse sample config");
        assert_eq!(config.len(), 3);

        let warehouse = config.get("warehouse").unwrap();
        assert_eq!(warehouse.dialect.as_deref(), Some("postgres"));
        assert_eq!(warehouse.port.as_deref(), Some("5433"));

        let legacy = config.get("legacy").unwrap();
        assert_eq!(legacy.port, None);
        assert_eq!(legacy.database.as_deref(), Some("erp"));

        let numeric = config.get("numeric_port").unwrap();
        assert_eq!(numeric.port.as_deref(), Some("6543"));
        assert_eq!(numeric.user, None);
    }

    #[test]
    fn test_names_keep_file_order() {
        let config = ConnectionConfig::from_json_str("sample.json", SAMPLE_CONFIG).unwrap();
        let names: Vec<_> = config.names().collect();
        assert_eq!(names, vec!["warehouse", "legacy", "numeric_port"]);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = ConnectionConfig::from_json_str("bad.json", "{ invalid json }");
        match result {
            Err(DbConnError::ConfigParse { path, .. }) => assert_eq!(path, PathBuf::from("bad.json")),
            other => panic!("Expected ConfigParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_top_level_is_parse_error() {
        let result = ConnectionConfig::from_json_str("list.json", r#"["db1"]"#);
        assert!(matches!(result, Err(DbConnError::ConfigParse { .. })));
    }

    #[test]
    fn test_odd_shaped_entry_does_not_fail_the_load() {
        let content = r#"{
            "good": {"type": "postgres", "user": "u", "pwd": "p", "host": "h", "database": "d"},
            "numeric": {"type": "mssql", "user": "sa", "pwd": 1234, "host": "h", "database": 7},
            "nested": {"type": "postgres", "user": ["u"], "pwd": null, "host": "h", "database": "d"},
            "scalar": 42
        }"#;
        let config = ConnectionConfig::from_json_str("mixed.json", content).unwrap();
        let names: Vec<_> = config.names().collect();
        assert_eq!(names, vec!["good", "numeric", "nested", "scalar"]);

        let numeric = config.get("numeric").unwrap();
        assert_eq!(numeric.pwd.as_deref(), Some("1234"));
        assert_eq!(numeric.database.as_deref(), Some("7"));

        let nested = config.get("nested").unwrap();
        assert_eq!(nested.user, None);
        assert_eq!(nested.pwd, None);

        assert_eq!(config.get("scalar").unwrap(), &ConnectionRecord::default());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        match load_config_from(&path) {
            Err(DbConnError::ConfigNotFound { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conns.json");
        fs::write(&path, SAMPLE_CONFIG).unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.path(), path.as_path());
        assert!(config.get("legacy").is_some());
    }
}
