//! REST endpoint paths.
//!
//! Paths are assembled from segments with [`join_path`], never by string
//! concatenation, so stray or doubled slashes in inputs do not reach the wire.

use crate::connection::RepoRef;
use crate::constants::api;

/// A resource addressed by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/user/repos`
    UserRepos,
    /// `/repos/{owner}/{name}`
    Repository(RepoRef),
    /// `/repos/{owner}/{name}/topics`
    Topics(RepoRef),
    /// `/repos/{owner}/{name}/actions/secrets`
    Secrets(RepoRef),
    /// `/repos/{owner}/{name}/actions/secrets/{secret}`
    Secret(RepoRef, String),
    /// `/repos/{owner}/{name}/actions/secrets/public-key`
    SecretsPublicKey(RepoRef),
    /// `/repos/{owner}/{name}/actions/permissions`
    ActionsPermissions(RepoRef),
}

impl Endpoint {
    /// Absolute path of this endpoint, relative to the connection entrypoint.
    pub fn path(&self) -> String {
        match self {
            Endpoint::UserRepos => join_path(&[api::USER, api::REPOS]),
            Endpoint::Repository(repo) => repository_path(repo),
            Endpoint::Topics(repo) => {
                join_path(&[repository_path(repo).as_str(), api::TOPICS])
            }
            Endpoint::Secrets(repo) => secrets_path(repo),
            Endpoint::Secret(repo, secret) => {
                join_path(&[secrets_path(repo).as_str(), secret.as_str()])
            }
            Endpoint::SecretsPublicKey(repo) => {
                join_path(&[secrets_path(repo).as_str(), api::PUBLIC_KEY])
            }
            Endpoint::ActionsPermissions(repo) => {
                join_path(&[
                    repository_path(repo).as_str(),
                    api::ACTIONS,
                    api::PERMISSIONS,
                ])
            }
        }
    }
}

fn repository_path(repo: &RepoRef) -> String {
    join_path(&[api::REPOS, repo.owner(), repo.name()])
}

fn secrets_path(repo: &RepoRef) -> String {
    join_path(&[repository_path(repo).as_str(), api::ACTIONS, api::SECRETS])
}

/// Join path segments with single slashes.
///
/// Empty components are dropped, so leading, trailing and repeated slashes in
/// any segment collapse. The result always starts with `/` and never ends with
/// one (except for the root path itself).
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .flat_map(|segment| segment.as_ref().split('/'))
        .filter(|part| !part.is_empty())
        .collect();
    format!("/{}", parts.join("/"))
}
