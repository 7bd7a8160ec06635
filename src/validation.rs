//! Input validation utilities.
//!
//! This module provides validation functions for secret names, repository
//! names, repository owners, topics, and visibility values so that malformed
//! input is rejected before any request is sent.

use regex::Regex;

use crate::constants;
use crate::errors::ValidationError;

/// Validate a secret name according to GitHub API requirements.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty or exceeds the maximum length
/// - The name contains characters other than letters, digits and underscores
/// - The name starts with a digit or with the reserved `GITHUB_` prefix
pub fn validate_secret_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::SecretName(
            "Secret name cannot be empty".to_string(),
        ));
    }

    if trimmed.len() > constants::validation::MAX_SECRET_NAME_LENGTH {
        return Err(ValidationError::SecretName(format!(
            "Secret name cannot exceed {} characters (got {})",
            constants::validation::MAX_SECRET_NAME_LENGTH,
            trimmed.len()
        )));
    }

    if !matches_pattern(constants::validation::VALID_SECRET_NAME_PATTERN, trimmed) {
        return Err(ValidationError::SecretName(format!(
            "Secret name can only contain letters, numbers, and underscores. Got: '{}'",
            trimmed
        )));
    }

    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ValidationError::SecretName(format!(
            "Secret name cannot start with a number. Got: '{}'",
            trimmed
        )));
    }

    if trimmed
        .to_ascii_uppercase()
        .starts_with(constants::validation::RESERVED_SECRET_PREFIX)
    {
        return Err(ValidationError::SecretName(format!(
            "Secret name cannot start with the reserved prefix '{}'",
            constants::validation::RESERVED_SECRET_PREFIX
        )));
    }

    Ok(())
}

/// Validate a repository owner name.
pub fn validate_repo_owner(owner: &str) -> Result<(), ValidationError> {
    let trimmed = owner.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RepositoryOwner(
            "Repository owner cannot be empty".to_string(),
        ));
    }

    if trimmed.len() > constants::repo::MAX_OWNER_LENGTH {
        return Err(ValidationError::RepositoryOwner(format!(
            "Repository owner cannot exceed {} characters (got {})",
            constants::repo::MAX_OWNER_LENGTH,
            trimmed.len()
        )));
    }

    if trimmed.contains('/') {
        return Err(ValidationError::RepositoryOwner(format!(
            "Repository owner cannot contain '/'. Got: '{}'",
            trimmed
        )));
    }

    Ok(())
}

/// Validate a repository name.
pub fn validate_repo_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RepositoryName(
            "Repository name cannot be empty".to_string(),
        ));
    }

    if trimmed.len() > constants::repo::MAX_REPO_NAME_LENGTH {
        return Err(ValidationError::RepositoryName(format!(
            "Repository name cannot exceed {} characters (got {})",
            constants::repo::MAX_REPO_NAME_LENGTH,
            trimmed.len()
        )));
    }

    if trimmed == "." || trimmed == ".." {
        return Err(ValidationError::RepositoryName(format!(
            "Repository name cannot be '{}'",
            trimmed
        )));
    }

    if !matches_pattern(constants::repo::VALID_REPO_NAME_PATTERN, trimmed) {
        return Err(ValidationError::RepositoryName(format!(
            "Repository name can only contain letters, numbers, '.', '_' and '-'. Got: '{}'",
            trimmed
        )));
    }

    Ok(())
}

/// Validate a single repository topic.
pub fn validate_topic(topic: &str) -> Result<(), ValidationError> {
    if topic.is_empty() {
        return Err(ValidationError::Topic("Topic cannot be empty".to_string()));
    }

    if topic.len() > constants::validation::MAX_TOPIC_LENGTH {
        return Err(ValidationError::Topic(format!(
            "Topic cannot exceed {} characters (got {})",
            constants::validation::MAX_TOPIC_LENGTH,
            topic.len()
        )));
    }

    if !matches_pattern(constants::validation::VALID_TOPIC_PATTERN, topic) {
        return Err(ValidationError::Topic(format!(
            "Topics must be lowercase letters, numbers, and hyphens, starting with a letter or number. Got: '{}'",
            topic
        )));
    }

    Ok(())
}

/// Validate a repository visibility value.
pub fn validate_visibility(visibility: &str) -> Result<(), ValidationError> {
    if constants::validation::VISIBILITIES.contains(&visibility) {
        Ok(())
    } else {
        Err(ValidationError::Visibility(format!(
            "Expected one of {}. Got: '{}'",
            constants::validation::VISIBILITIES.join(", "),
            visibility
        )))
    }
}

fn matches_pattern(pattern: &str, value: &str) -> bool {
    // Patterns are compile-time constants; a failed compile is treated as no match.
    Regex::new(pattern).is_ok_and(|re| re.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_name_valid() {
        assert!(validate_secret_name("MY_SECRET").is_ok());
        assert!(validate_secret_name("my_secret_123").is_ok());
        assert!(validate_secret_name("_LEADING_UNDERSCORE").is_ok());
    }

    #[test]
    fn test_validate_secret_name_invalid() {
        assert!(validate_secret_name("").is_err());
        assert!(validate_secret_name(" ").is_err());
        assert!(validate_secret_name("secret with spaces").is_err());
        assert!(validate_secret_name("my-secret").is_err());
        assert!(validate_secret_name("1SECRET").is_err());
        assert!(validate_secret_name("GITHUB_TOKEN").is_err());
        assert!(validate_secret_name("github_token").is_err());
        assert!(validate_secret_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_repo_owner() {
        assert!(validate_repo_owner("octocat").is_ok());
        assert!(validate_repo_owner("").is_err());
        assert!(validate_repo_owner("a/b").is_err());
        assert!(validate_repo_owner(&"a".repeat(40)).is_err());
    }

    #[test]
    fn test_validate_repo_name() {
        assert!(validate_repo_name("hello-world").is_ok());
        assert!(validate_repo_name("dotted.name_1").is_ok());
        assert!(validate_repo_name("").is_err());
        assert!(validate_repo_name(".").is_err());
        assert!(validate_repo_name("a/b").is_err());
        assert!(validate_repo_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_topic() {
        assert!(validate_topic("rust").is_ok());
        assert!(validate_topic("rest-api").is_ok());
        assert!(validate_topic("Rust").is_err());
        assert!(validate_topic("-leading").is_err());
        assert!(validate_topic(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_visibility() {
        assert!(validate_visibility("public").is_ok());
        assert!(validate_visibility("internal").is_ok());
        let err = validate_visibility("secret").unwrap_err();
        assert!(err.to_string().contains("public, private, internal"));
    }
}
