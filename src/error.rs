//! Error formatting utilities.
//!
//! This module provides helper functions for formatting error chains
//! into human-readable messages.

use anyhow::Error;

/// Format an error and its source chain into a detailed error message.
///
/// This function extracts the full error chain from an `anyhow::Error`,
/// joining all error messages with " → " to provide comprehensive error context.
///
/// # Example
///
/// ```
/// use gitapi::error::format_error_chain;
///
/// let err = anyhow::anyhow!("connection refused")
///     .context("Failed to fetch public key")
///     .context("Failed to set secret API_TOKEN");
/// let formatted = format_error_chain(&err);
/// assert_eq!(
///     formatted,
///     "Failed to set secret API_TOKEN → Failed to fetch public key → connection refused"
/// );
/// ```
pub fn format_error_chain(error: &Error) -> String {
    error
        .chain()
        .map(|err| err.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;
    use anyhow::Context;

    #[test]
    fn test_single_error_has_no_separator() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(format_error_chain(&err), "boom");
    }

    #[test]
    fn test_typed_source_is_included() {
        let result: Result<(), ConfigError> = Err(ConfigError::NoConnections);
        let err = result.context("Failed to load config").unwrap_err();
        assert_eq!(
            format_error_chain(&err),
            "Failed to load config → No connections found in config file"
        );
    }
}
