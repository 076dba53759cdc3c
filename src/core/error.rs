//! dbconn Error Module
//!
//! This module defines the error taxonomy for loading connection files,
//! resolving named connections and handing them to an engine factory.
//! Every failure aborts the call that produced it; nothing is retried.
use std::path::PathBuf;
use thiserror::Error;

/// Error type for every dbconn operation.
///
/// Covers the whole request path:
/// - Locating and reading the connection file
/// - Parsing its JSON content
/// - Looking up a connection by name and validating its record
/// - Mapping the declared dialect to a driver
/// - Failures reported by the injected engine factory
#[derive(Error, Debug)]
pub enum DbConnError {
    /// The connection file does not exist or cannot be read
    #[error("Configuration file {} not found or unreadable: {source}", .path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No default path could be derived from the environment
    #[error("Configuration file not found: no home directory and DBCONN_CONFIG is unset")]
    HomeDirUnavailable,

    /// The connection file is not valid JSON (or not the expected shape)
    #[error("Configuration file {} could not be parsed: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The requested name is not a key of the loaded file
    #[error("Connection {name} doesn't exist in {}", .path.display())]
    UnknownConnection { name: String, path: PathBuf },

    /// A required attribute is absent or empty
    #[error("Required attribute {field} not declared in configuration file for connection {connection}")]
    MissingField {
        field: &'static str,
        connection: String,
    },

    /// The `type` value is not a recognized dialect
    #[error("Database vendor {0} not supported")]
    UnsupportedDialect(String),

    /// The engine factory refused to build a handle
    #[error("Engine error: {0}")]
    Engine(String),
}

impl DbConnError {
    /// True for both flavors of "there is no configuration file to read".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbConnError::ConfigNotFound { .. } | DbConnError::HomeDirUnavailable
        )
    }
}

/// Type alias for Result to use DbConnError as the error type.
pub type Result<T> = std::result::Result<T, DbConnError>;
