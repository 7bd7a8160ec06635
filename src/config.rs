//! Configuration file parsing and validation.
//!
//! A config file lists the API connections the CLI can use. Each entry names
//! a host, an account, a vendor flavour and where to find the token.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;
use url::Url;

use crate::connection::{Connection, Vendor};
use crate::errors::ConfigError;

/// Configuration file structure containing connection definitions.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
    /// Single connection format (converted to the list during parsing).
    #[serde(default)]
    pub connection: Option<ConnectionConfig>,
}

/// One `[[connections]]` entry.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub name: String,
    pub entrypoint: String,
    pub user: String,
    #[serde(default)]
    pub vendor: Vendor,
    /// Inline token. Prefer `token_env`.
    #[serde(default)]
    pub token: Option<String>,
    /// Name of the environment variable holding the token.
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub skip_verify: bool,
}

impl ConnectionConfig {
    /// Build the runtime [`Connection`], reading the token if configured.
    ///
    /// A connection with neither `token` nor `token_env` is unauthenticated.
    pub fn resolve(&self) -> Result<Connection> {
        let token = match (&self.token, &self.token_env) {
            (Some(token), _) if !token.is_empty() => token.clone(),
            (_, Some(var)) => {
                env::var(var).map_err(|_| ConfigError::MissingTokenEnv(var.clone()))?
            }
            _ => String::new(),
        };

        let mut connection = Connection::new(self.entrypoint.trim(), self.user.trim(), self.vendor)
            .with_name(&self.name)
            .with_token(token)
            .with_skip_verify(self.skip_verify);
        if let Some(repo) = &self.repo {
            connection = connection.with_repo(repo.trim());
        }
        Ok(connection)
    }

    fn validate(&self) -> Result<()> {
        if self.entrypoint.trim().is_empty() {
            return Err(ConfigError::InvalidConnection("entrypoint is empty".to_string()).into());
        }
        Url::parse(self.entrypoint.trim()).map_err(|e| {
            ConfigError::InvalidConnection(format!("entrypoint '{}': {}", self.entrypoint, e))
        })?;
        crate::validation::validate_repo_owner(&self.user)?;
        if let Some(repo) = &self.repo {
            crate::validation::validate_repo_name(repo)?;
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file.
    /// Converts the single connection format to the connections list if needed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(connection) = config.connection.take() {
            if !config.connections.is_empty() {
                return Err(ConfigError::InvalidConnection(
                    "use either [connection] or [[connections]], not both".to_string(),
                )
                .into());
            }
            config.connections.push(connection);
        }

        if config.connections.is_empty() {
            return Err(ConfigError::NoConnections.into());
        }

        for (idx, connection) in config.connections.iter_mut().enumerate() {
            if connection.name.trim().is_empty() {
                connection.name = connection.vendor.to_string();
            }
            connection
                .validate()
                .with_context(|| format!("Invalid connection #{}", idx + 1))?;
        }

        let mut seen = HashSet::new();
        for connection in &config.connections {
            if !seen.insert(connection.name.as_str()) {
                return Err(ConfigError::DuplicateConnection(connection.name.clone()).into());
            }
        }

        Ok(config)
    }

    /// Connection called `name`, or the first one when `name` is `None`.
    pub fn connection(&self, name: Option<&str>) -> Result<&ConnectionConfig> {
        match name {
            Some(name) => self
                .connections
                .iter()
                .find(|c| c.name == name)
                .ok_or_else(|| ConfigError::UnknownConnection(name.to_string()).into()),
            None => self
                .connections
                .first()
                .ok_or_else(|| ConfigError::NoConnections.into()),
        }
    }

    pub fn get_connections(&self) -> &[ConnectionConfig] {
        &self.connections
    }
}
