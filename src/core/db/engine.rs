//! Engine Module
//!
//! The seam between connection resolution and the client library that
//! actually talks to the database. Callers plug in an [`EngineFactory`];
//! the default [`LazyEngineFactory`] performs no I/O and returns an
//! [`Engine`] describing what would be opened.

use crate::core::db::dialect::Dialect;
use crate::core::db::resolver::ResolvedConnection;
use crate::core::db::url::ConnectionUrl;
use crate::core::Result;
use std::collections::BTreeMap;
use std::time::Duration;

/// Settings passed through untouched to the engine factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Upper bound for establishing a connection, if the driver supports one
    pub connect_timeout: Option<Duration>,
    /// Ask the driver to log every statement it issues
    pub echo: bool,
    /// Driver-specific settings
    pub extra: BTreeMap<String, String>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Opens a handle for a connection URI.
///
/// The handle's lifecycle belongs to the caller.
pub trait EngineFactory {
    type Handle;

    fn open(
        &self,
        connection: &ResolvedConnection,
        url: &ConnectionUrl,
        options: &EngineOptions,
    ) -> Result<Self::Handle>;
}

/// A lazily-connecting engine: everything needed to connect, nothing connected yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    name: String,
    dialect: Dialect,
    url: ConnectionUrl,
    options: EngineOptions,
}

impl Engine {
    /// Name of the connection this engine was built for
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn driver(&self) -> &'static str {
        self.dialect.driver()
    }

    pub fn url(&self) -> &ConnectionUrl {
        &self.url
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}

/// Default factory producing [`Engine`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyEngineFactory;

impl EngineFactory for LazyEngineFactory {
    type Handle = Engine;

    fn open(
        &self,
        connection: &ResolvedConnection,
        url: &ConnectionUrl,
        options: &EngineOptions,
    ) -> Result<Engine> {
        Ok(Engine {
            name: connection.name.clone(),
            dialect: connection.dialect,
            url: url.clone(),
            options: options.clone(),
        })
    }
}
