//! Application constants for API headers, endpoints, paging, and validation rules.
//!
//! This module contains all constant values used throughout the crate,
//! including vendor media types, REST path segments, listing defaults, and
//! validation constraints.

/// HTTP header names and values sent to the API.
pub mod headers {
    /// `Accept` media type for GitHub's REST API.
    pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

    /// `Accept` media type for Gitea's REST API.
    pub const GITEA_MEDIA_TYPE: &str = "application/json";

    /// Request body content type for every vendor.
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// GitHub REST API version header name.
    pub const GITHUB_API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

    /// GitHub REST API version pinned by this client.
    pub const GITHUB_API_VERSION: &str = "2022-11-28";

    /// Prefix of the `Authorization` header value.
    pub const TOKEN_PREFIX: &str = "token ";

    /// `User-Agent` sent with every request (GitHub rejects requests without one).
    pub const USER_AGENT: &str = concat!("gitapi/", env!("CARGO_PKG_VERSION"));
}

/// REST path segments.
pub mod api {
    pub const USER: &str = "user";
    pub const REPOS: &str = "repos";
    pub const TOPICS: &str = "topics";
    pub const ACTIONS: &str = "actions";
    pub const SECRETS: &str = "secrets";
    pub const PUBLIC_KEY: &str = "public-key";
    pub const PERMISSIONS: &str = "permissions";
}

/// Listing query parameters.
pub mod paging {
    /// Page-size parameter understood by GitHub.
    pub const GITHUB_PAGE_SIZE_PARAM: &str = "per_page";

    /// Page-size parameter understood by Gitea.
    pub const GITEA_PAGE_SIZE_PARAM: &str = "limit";

    /// Page index parameter (1-based) for both vendors.
    pub const PAGE_PARAM: &str = "page";

    /// Default number of items per page.
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    /// Maximum page size accepted by GitHub.
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Secret validation constants.
pub mod validation {
    /// Maximum length for a secret name (GitHub API limit).
    pub const MAX_SECRET_NAME_LENGTH: usize = 100;

    /// Valid characters for secret names: letters, numbers and underscores.
    pub const VALID_SECRET_NAME_PATTERN: &str = r"^[A-Za-z0-9_]+$";

    /// Secret names may not start with this prefix (case-insensitive).
    pub const RESERVED_SECRET_PREFIX: &str = "GITHUB_";

    /// Maximum length for a single topic.
    pub const MAX_TOPIC_LENGTH: usize = 50;

    /// Topics are lowercase, start with a letter or digit, and may contain hyphens.
    pub const VALID_TOPIC_PATTERN: &str = r"^[a-z0-9][a-z0-9-]*$";

    /// Accepted repository visibility values.
    pub const VISIBILITIES: [&str; 3] = ["public", "private", "internal"];
}

/// Repository validation constants.
pub mod repo {
    /// Maximum length for repository owner name.
    pub const MAX_OWNER_LENGTH: usize = 39; // GitHub username limit

    /// Maximum length for repository name.
    pub const MAX_REPO_NAME_LENGTH: usize = 100;

    /// Valid characters for repository names.
    pub const VALID_REPO_NAME_PATTERN: &str = r"^[A-Za-z0-9._-]+$";
}

/// Configuration file locations and environment variables.
pub mod config {
    /// Environment variable that overrides config file discovery.
    pub const CONFIG_PATH_ENV: &str = "GITAPI_CONFIG";

    /// Directory name under the XDG config home.
    pub const APP_DIR: &str = "gitapi";

    /// Config file name inside [`APP_DIR`].
    pub const CONFIG_FILE: &str = "config.toml";

    /// Config file name looked up in the current directory.
    pub const LOCAL_CONFIG_FILE: &str = "gitapi.toml";

    /// Environment variable holding a secret value for `secret set`.
    pub const SECRET_VALUE_ENV: &str = "GITAPI_SECRET_VALUE";
}
