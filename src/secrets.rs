//! Create or update a repository Actions secret.
//!
//! Two dependent calls: fetch the repository public key, then seal the value
//! with it and PUT the ciphertext. The key is fetched fresh on every run.

use std::fmt;

use tracing::{debug, info, warn};

use crate::connection::{Connection, RepoRef};
use crate::crypto::Sealer;
use crate::endpoint::Endpoint;
use crate::engine::{Engine, Response};
use crate::errors::{SealError, ValidationError};
use crate::http::Method;
use crate::payload::{EncryptedSecretPair, Payload, PublicKey};
use crate::validation;

/// Pipeline states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    FetchingKey,
    Submitting,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::FetchingKey => "fetching-key",
            PipelineState::Submitting => "submitting",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum SecretOutcome {
    /// The encrypted value was submitted; carries the PUT response, which the
    /// caller still has to check with [`Response::is_success`].
    Submitted(Response),
    /// The public key could not be fetched; carries that response unchanged.
    KeyFetchFailed(Response),
    /// Sealing failed; nothing was submitted.
    EncryptionFailed(SealError),
    /// The secret name was rejected; no request was made.
    InvalidName(ValidationError),
}

impl SecretOutcome {
    /// Terminal state of the run.
    pub fn state(&self) -> PipelineState {
        match self {
            SecretOutcome::Submitted(_) => PipelineState::Done,
            SecretOutcome::KeyFetchFailed(_)
            | SecretOutcome::EncryptionFailed(_)
            | SecretOutcome::InvalidName(_) => PipelineState::Failed,
        }
    }

    /// True when the secret was stored.
    pub fn is_success(&self) -> bool {
        matches!(self, SecretOutcome::Submitted(response) if response.is_success())
    }

    /// Response of the last network call made, if any.
    pub fn response(&self) -> Option<&Response> {
        match self {
            SecretOutcome::Submitted(response) | SecretOutcome::KeyFetchFailed(response) => {
                Some(response)
            }
            SecretOutcome::EncryptionFailed(_) | SecretOutcome::InvalidName(_) => None,
        }
    }

    /// Human-readable summary.
    pub fn output(&self) -> String {
        match self {
            SecretOutcome::Submitted(response) | SecretOutcome::KeyFetchFailed(response) => {
                response.output.clone()
            }
            SecretOutcome::EncryptionFailed(err) => err.to_string(),
            SecretOutcome::InvalidName(err) => err.to_string(),
        }
    }
}

/// Composes the key fetch and the encrypted submission.
pub struct SecretPipeline<'a> {
    engine: &'a Engine,
    sealer: &'a dyn Sealer,
}

impl<'a> SecretPipeline<'a> {
    pub fn new(engine: &'a Engine, sealer: &'a dyn Sealer) -> Self {
        Self { engine, sealer }
    }

    /// Store `value` as secret `name` in `repo`.
    pub async fn run(
        &self,
        connection: &Connection,
        repo: &RepoRef,
        name: &str,
        value: &str,
    ) -> SecretOutcome {
        // The name becomes a path segment.
        if let Err(err) = validation::validate_secret_name(name) {
            warn!(repo = %repo, error = %err, "Rejected secret name");
            return SecretOutcome::InvalidName(err);
        }
        let name = name.trim();

        debug!(
            repo = %repo,
            secret = name,
            state = %PipelineState::FetchingKey,
            "Secret pipeline"
        );

        let key_response = self.fetch_public_key(connection, repo).await;
        let fetched = match &key_response.decoded {
            Some(Payload::PublicKey(key)) if key_response.is_success() => Some(key.clone()),
            _ => None,
        };
        let Some(public_key) = fetched else {
            warn!(
                repo = %repo,
                secret = name,
                status = key_response.status,
                state = %PipelineState::Failed,
                "Could not fetch repository public key"
            );
            return SecretOutcome::KeyFetchFailed(key_response);
        };

        debug!(
            repo = %repo,
            secret = name,
            key_id = %public_key.key_id,
            state = %PipelineState::Submitting,
            "Secret pipeline"
        );

        let encrypted_value = match self.sealer.seal(value, &public_key.key) {
            Ok(ciphertext) => ciphertext,
            Err(err) => {
                warn!(
                    repo = %repo,
                    secret = name,
                    error = %err,
                    state = %PipelineState::Failed,
                    "Failed to encrypt secret"
                );
                return SecretOutcome::EncryptionFailed(err);
            }
        };

        let pair = EncryptedSecretPair {
            encrypted_value,
            key_id: public_key.key_id,
        };
        let endpoint = Endpoint::Secret(repo.clone(), name.to_string());
        let response = self
            .engine
            .execute(
                connection,
                Method::Put,
                &endpoint.path(),
                &[],
                &Payload::EncryptedSecret(pair),
            )
            .await;

        info!(
            repo = %repo,
            secret = name,
            status = response.status,
            state = %PipelineState::Done,
            "Secret submitted"
        );
        SecretOutcome::Submitted(response)
    }

    async fn fetch_public_key(&self, connection: &Connection, repo: &RepoRef) -> Response {
        let expect = Payload::PublicKey(PublicKey {
            key_id: String::new(),
            key: String::new(),
        });
        self.engine
            .execute(
                connection,
                Method::Get,
                &Endpoint::SecretsPublicKey(repo.clone()).path(),
                &[],
                &expect,
            )
            .await
    }
}
