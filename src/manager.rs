//! Connection manager and the stateless entry points.
//!
//! [`ConnectionManager`] reads the connection file once and serves any number
//! of lookups from it; it is never mutated after construction, so a shared
//! reference can be used from several threads. The free functions reload the
//! file on every call.

use crate::config::{load_config, ConnectionConfig};
use crate::core::db::{
    build, resolve, ConnectionUrl, Engine, EngineFactory, EngineOptions, LazyEngineFactory,
    ResolvedConnection,
};
use crate::core::Result;
use std::path::Path;
use tracing::info;

/// Reads a connection file and hands out connections declared in it.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    configs: ConnectionConfig,
}

impl ConnectionManager {
    /// Loads `config_file`, or the default location when `None`.
    pub fn new(config_file: Option<&Path>) -> Result<Self> {
        Ok(Self::from_config(load_config(config_file)?))
    }

    /// Wraps an already-loaded config.
    pub fn from_config(configs: ConnectionConfig) -> Self {
        Self { configs }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.configs
    }

    /// Names of the configured connections, in file order.
    pub fn connection_names(&self) -> Vec<String> {
        self.configs.names().map(str::to_string).collect()
    }

    pub fn resolve(&self, name: &str) -> Result<ResolvedConnection> {
        resolve(name, &self.configs)
    }

    /// The URI for `name` without opening anything.
    pub fn connection_url(&self, name: &str) -> Result<ConnectionUrl> {
        Ok(build(&self.resolve(name)?))
    }

    /// Builds a lazily-connecting [`Engine`] for `name`.
    pub fn get_connection(&self, name: &str, options: &EngineOptions) -> Result<Engine> {
        self.get_connection_with(&LazyEngineFactory, name, options)
    }

    /// Resolves `name` and hands its URI to `factory`.
    pub fn get_connection_with<F: EngineFactory>(
        &self,
        factory: &F,
        name: &str,
        options: &EngineOptions,
    ) -> Result<F::Handle> {
        let connection = self.resolve(name)?;
        let url = build(&connection);
        info!("Creating engine for {} at {}", name, url.redacted());
        factory.open(&connection, &url, options)
    }
}

/// Names in the connection file at `config_file` (or the default location).
pub fn list_connection_names(config_file: Option<&Path>) -> Result<Vec<String>> {
    Ok(ConnectionManager::new(config_file)?.connection_names())
}

/// Loads the connection file and builds an [`Engine`] for `name`.
///
/// # Example
///
/// ```no_run
/// use dbconn::get_connection;
/// use std::path::Path;
///
/// let engine = get_connection("warehouse", Some(Path::new("conns.json")), None)?;
/// println!("{}", engine.url().redacted());
/// # Ok::<(), dbconn::DbConnError>(())
/// ```
pub fn get_connection(
    name: &str,
    config_file: Option<&Path>,
    options: Option<&EngineOptions>,
) -> Result<Engine> {
    get_connection_with(&LazyEngineFactory, name, config_file, options)
}

/// Like [`get_connection`], with a caller-supplied factory.
pub fn get_connection_with<F: EngineFactory>(
    factory: &F,
    name: &str,
    config_file: Option<&Path>,
    options: Option<&EngineOptions>,
) -> Result<F::Handle> {
    let default_options = EngineOptions::default();
    ConnectionManager::new(config_file)?.get_connection_with(
        factory,
        name,
        options.unwrap_or(&default_options),
    )
}
