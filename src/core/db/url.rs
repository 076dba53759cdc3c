//! Connection String Builder Module
//!
//! Formats `{dialect}+{driver}://{user}:{pwd}@{host}[:{port}]/{database}`.
//! User and password are inserted verbatim; no percent-encoding is applied.

use crate::core::db::resolver::ResolvedConnection;
use std::fmt;

/// A connection URI ready to hand to an engine factory.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionUrl {
    url: String,
    // Byte range of the password inside `url`
    pwd_span: (usize, usize),
}

impl ConnectionUrl {
    /// The exact URI.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn into_string(self) -> String {
        self.url
    }

    /// The URI with the password replaced by `***`, for logs and display.
    pub fn redacted(&self) -> String {
        let (start, end) = self.pwd_span;
        format!("{}***{}", &self.url[..start], &self.url[end..])
    }
}

impl AsRef<str> for ConnectionUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for ConnectionUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionUrl").field(&self.redacted()).finish()
    }
}

/// Builds the URI for a resolved connection.
///
/// The scheme is the `type` tag as declared, so `sql-server` yields
/// `sql-server+pymssql://...`. [`Dialect::canonical_tag`] gives the scheme
/// client libraries accept (`mssql`, `postgresql`).
///
/// [`Dialect::canonical_tag`]: crate::core::db::Dialect::canonical_tag
pub fn build(connection: &ResolvedConnection) -> ConnectionUrl {
    let hostname = match &connection.port {
        Some(port) => format!("{}:{}", connection.host, port),
        None => connection.host.clone(),
    };

    let prefix = format!(
        "{}+{}://{}:",
        connection.dialect_tag,
        connection.driver(),
        connection.user
    );
    let pwd_span = (prefix.len(), prefix.len() + connection.pwd.len());
    let url = format!(
        "{}{}@{}/{}",
        prefix, connection.pwd, hostname, connection.database
    );

    ConnectionUrl { url, pwd_span }
}
