use thiserror::Error;

/// Errors raised below the engine while building or sending a request.
///
/// A transport error is terminal for the call that produced it: no response
/// body is decoded afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Failed to serialize request body: {0}")]
    Serialize(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Errors from the sealed-box encryption step of the secret pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SealError {
    #[error("Invalid public key format: {0}")]
    InvalidPublicKey(String),
    #[error("Invalid public key length. Expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
    #[error("Failed to encrypt secret: {0}")]
    Encryption(String),
}

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config file: {0}")]
    ParseError(String),
    #[error("No connections found in config file")]
    NoConnections,
    #[error("Duplicate connection name: {0}")]
    DuplicateConnection(String),
    #[error("Connection not found: {0}")]
    UnknownConnection(String),
    #[error("Invalid connection configuration: {0}")]
    InvalidConnection(String),
    #[error("Environment variable {0} is not set")]
    MissingTokenEnv(String),
}

/// Errors that can occur during validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Secret name validation failed: {0}")]
    SecretName(String),
    #[error("Repository owner validation failed: {0}")]
    RepositoryOwner(String),
    #[error("Repository name validation failed: {0}")]
    RepositoryName(String),
    #[error("Topic validation failed: {0}")]
    Topic(String),
    #[error("Visibility validation failed: {0}")]
    Visibility(String),
    #[error("No repository selected for connection '{0}'")]
    MissingRepository(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            TransportError::Client(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}
