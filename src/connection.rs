//! Long-lived connection settings and repository references.
//!
//! A [`Connection`] is created once and shared across calls. It never carries
//! per-request state; every call builds its own request and response values.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::ValidationError;
use crate::validation;

/// API flavour of the remote host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    #[default]
    Github,
    Gitea,
}

impl Vendor {
    /// `Accept` media type for this vendor.
    pub fn media_type(self) -> &'static str {
        match self {
            Vendor::Github => constants::headers::GITHUB_MEDIA_TYPE,
            Vendor::Gitea => constants::headers::GITEA_MEDIA_TYPE,
        }
    }

    /// Query parameter carrying the page size.
    pub fn page_size_param(self) -> &'static str {
        match self {
            Vendor::Github => constants::paging::GITHUB_PAGE_SIZE_PARAM,
            Vendor::Gitea => constants::paging::GITEA_PAGE_SIZE_PARAM,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Github => "github",
            Vendor::Gitea => "gitea",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-held configuration for one API host and account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Label used in config files and CLI output.
    pub name: String,
    /// Base URL, e.g. `https://api.github.com` or `https://gitea.example.com/api/v1`.
    pub entrypoint: String,
    /// Account that owns the repositories addressed through this connection.
    pub user: String,
    /// Default repository, if any.
    pub repo: Option<String>,
    /// API token. Empty means unauthenticated.
    pub token: String,
    pub vendor: Vendor,
    /// Accept invalid TLS certificates (self-signed hosts).
    pub skip_verify: bool,
}

impl Connection {
    pub fn new(entrypoint: impl Into<String>, user: impl Into<String>, vendor: Vendor) -> Self {
        Self {
            name: String::new(),
            entrypoint: entrypoint.into(),
            user: user.into(),
            repo: None,
            token: String::new(),
            vendor,
            skip_verify: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn with_skip_verify(mut self, skip_verify: bool) -> Self {
        self.skip_verify = skip_verify;
        self
    }

    /// Whether requests made through this connection carry an `Authorization` header.
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Reference to the connection's default repository.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingRepository`] when no repository is
    /// configured, or a validation error when owner or name are malformed.
    pub fn repo_ref(&self) -> Result<RepoRef, ValidationError> {
        match self.repo.as_deref() {
            Some(repo) if !repo.trim().is_empty() => RepoRef::new(&self.user, repo),
            _ => Err(ValidationError::MissingRepository(self.name.clone())),
        }
    }

    /// Reference to `name` owned by this connection's user.
    pub fn repo_named(&self, name: &str) -> Result<RepoRef, ValidationError> {
        RepoRef::new(&self.user, name)
    }
}

/// A validated `owner/name` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    pub fn new(owner: &str, name: &str) -> Result<Self, ValidationError> {
        validation::validate_repo_owner(owner)?;
        validation::validate_repo_name(name)?;
        Ok(Self {
            owner: owner.trim().to_string(),
            name: name.trim().to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository name implied by a working directory: its final path component.
///
/// Only called when the user explicitly asks for it (`--repo .` on the CLI).
pub fn repo_name_from_dir(dir: &Path) -> Option<String> {
    dir.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
