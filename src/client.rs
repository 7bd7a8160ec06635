//! Typed repository, topic and secret operations.
//!
//! [`GitClient`] pairs an [`Engine`] with a [`Connection`] and a [`Sealer`].
//! Each method selects an endpoint and payload and performs one engine call
//! (two for [`GitClient::set_secret`]). Results are returned as engine
//! [`Response`] values; `Err` is reserved for invalid caller input.

use std::sync::Arc;

use crate::connection::{Connection, RepoRef};
use crate::crypto::{Sealer, SodiumSealer};
use crate::endpoint::Endpoint;
use crate::engine::{Engine, ListOptions, Response};
use crate::errors::{TransportError, ValidationError};
use crate::http::Method;
use crate::payload::{
    ActionsPermissions, DescriptionFlag, Payload, PrivateFlag, RepositoryDescriptor, SecretList,
    TopicList, VisibilityFlag,
};
use crate::secrets::{SecretOutcome, SecretPipeline};
use crate::validation;

pub struct GitClient {
    engine: Engine,
    connection: Connection,
    sealer: Arc<dyn Sealer>,
}

impl GitClient {
    /// Client using the reqwest transport and the libsodium sealer.
    pub fn new(connection: Connection) -> Result<Self, TransportError> {
        Ok(Self::with_parts(
            Engine::with_reqwest()?,
            connection,
            Arc::new(SodiumSealer),
        ))
    }

    pub fn with_parts(engine: Engine, connection: Connection, sealer: Arc<dyn Sealer>) -> Self {
        Self {
            engine,
            connection,
            sealer,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Repositories of the authenticated user, one page at a time.
    pub async fn list_repos(&self, options: ListOptions) -> Response {
        let query = options.query(self.connection.vendor);
        self.call(
            Method::Get,
            &Endpoint::UserRepos,
            &query,
            &Payload::RepositoryList(Vec::new()),
        )
        .await
    }

    pub async fn create_repo(&self, name: &str, private: bool) -> Result<Response, ValidationError> {
        validation::validate_repo_name(name)?;
        let payload = Payload::Repository(RepositoryDescriptor {
            name: name.trim().to_string(),
            private,
        });
        Ok(self
            .call(Method::Post, &Endpoint::UserRepos, &[], &payload)
            .await)
    }

    pub async fn get_repo(&self, repo: &RepoRef) -> Response {
        let expect = Payload::Repository(RepositoryDescriptor {
            name: String::new(),
            private: false,
        });
        self.call(Method::Get, &Endpoint::Repository(repo.clone()), &[], &expect)
            .await
    }

    pub async fn delete_repo(&self, repo: &RepoRef) -> Response {
        self.call(
            Method::Delete,
            &Endpoint::Repository(repo.clone()),
            &[],
            &Payload::None,
        )
        .await
    }

    pub async fn get_topics(&self, repo: &RepoRef) -> Response {
        self.call(
            Method::Get,
            &Endpoint::Topics(repo.clone()),
            &[],
            &Payload::Topics(TopicList::default()),
        )
        .await
    }

    /// Replace all topics of `repo`.
    pub async fn set_topics(
        &self,
        repo: &RepoRef,
        topics: &[String],
    ) -> Result<Response, ValidationError> {
        for topic in topics {
            validation::validate_topic(topic)?;
        }
        let payload = Payload::Topics(TopicList::for_vendor(
            self.connection.vendor,
            topics.to_vec(),
        ));
        Ok(self
            .call(Method::Put, &Endpoint::Topics(repo.clone()), &[], &payload)
            .await)
    }

    pub async fn get_description(&self, repo: &RepoRef) -> Response {
        let expect = Payload::Description(DescriptionFlag {
            description: String::new(),
        });
        self.call(Method::Get, &Endpoint::Repository(repo.clone()), &[], &expect)
            .await
    }

    pub async fn set_description(&self, repo: &RepoRef, description: &str) -> Response {
        let payload = Payload::Description(DescriptionFlag {
            description: description.to_string(),
        });
        self.call(
            Method::Patch,
            &Endpoint::Repository(repo.clone()),
            &[],
            &payload,
        )
        .await
    }

    pub async fn get_visibility(&self, repo: &RepoRef) -> Response {
        let expect = Payload::Visibility(VisibilityFlag {
            visibility: String::new(),
        });
        self.call(Method::Get, &Endpoint::Repository(repo.clone()), &[], &expect)
            .await
    }

    pub async fn set_visibility(
        &self,
        repo: &RepoRef,
        visibility: &str,
    ) -> Result<Response, ValidationError> {
        validation::validate_visibility(visibility)?;
        let payload = Payload::Visibility(VisibilityFlag {
            visibility: visibility.to_string(),
        });
        Ok(self
            .call(
                Method::Patch,
                &Endpoint::Repository(repo.clone()),
                &[],
                &payload,
            )
            .await)
    }

    pub async fn get_private(&self, repo: &RepoRef) -> Response {
        let expect = Payload::Private(PrivateFlag { private: false });
        self.call(Method::Get, &Endpoint::Repository(repo.clone()), &[], &expect)
            .await
    }

    pub async fn set_private(&self, repo: &RepoRef, private: bool) -> Response {
        self.call(
            Method::Patch,
            &Endpoint::Repository(repo.clone()),
            &[],
            &Payload::Private(PrivateFlag { private }),
        )
        .await
    }

    /// Names and timestamps of the repository's Actions secrets.
    pub async fn list_secrets(&self, repo: &RepoRef) -> Response {
        let expect = Payload::SecretList(SecretList {
            total_count: 0,
            secrets: Vec::new(),
        });
        self.call(Method::Get, &Endpoint::Secrets(repo.clone()), &[], &expect)
            .await
    }

    /// Create or update an Actions secret through the [`SecretPipeline`].
    pub async fn set_secret(
        &self,
        repo: &RepoRef,
        name: &str,
        value: &str,
    ) -> Result<SecretOutcome, ValidationError> {
        validation::validate_secret_name(name)?;
        Ok(SecretPipeline::new(&self.engine, self.sealer.as_ref())
            .run(&self.connection, repo, name.trim(), value)
            .await)
    }

    pub async fn delete_secret(
        &self,
        repo: &RepoRef,
        name: &str,
    ) -> Result<Response, ValidationError> {
        validation::validate_secret_name(name)?;
        Ok(self
            .call(
                Method::Delete,
                &Endpoint::Secret(repo.clone(), name.trim().to_string()),
                &[],
                &Payload::None,
            )
            .await)
    }

    pub async fn get_actions_permissions(&self, repo: &RepoRef) -> Response {
        let expect = Payload::ActionsPermissions(ActionsPermissions {
            enabled: false,
            allowed_actions: None,
        });
        self.call(
            Method::Get,
            &Endpoint::ActionsPermissions(repo.clone()),
            &[],
            &expect,
        )
        .await
    }

    /// Enable or disable Actions; `allowed_actions` is `all`, `local_only` or `selected`.
    pub async fn set_actions_permissions(
        &self,
        repo: &RepoRef,
        enabled: bool,
        allowed_actions: Option<&str>,
    ) -> Response {
        let payload = Payload::ActionsPermissions(ActionsPermissions {
            enabled,
            allowed_actions: allowed_actions.map(str::to_string),
        });
        self.call(
            Method::Put,
            &Endpoint::ActionsPermissions(repo.clone()),
            &[],
            &payload,
        )
        .await
    }

    async fn call(
        &self,
        method: Method,
        endpoint: &Endpoint,
        query: &[(String, String)],
        payload: &Payload,
    ) -> Response {
        self.engine
            .execute(&self.connection, method, &endpoint.path(), query, payload)
            .await
    }
}
