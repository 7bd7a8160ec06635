use anyhow::{Context, Result, bail};
use colored::*;
use std::env;
use std::io::{self, Read};

use crate::cli::{
    ActionsAction, Cli, Commands, DescriptionAction, PrivateAction, RepoAction, SecretAction,
    TopicsAction, VisibilityAction,
};
use crate::client::GitClient;
use crate::config::Config;
use crate::connection::{Connection, RepoRef, repo_name_from_dir};
use crate::constants::config::SECRET_VALUE_ENV;
use crate::engine::{ListOptions, Response};
use crate::paths;
use crate::secrets::SecretOutcome;

/// Printable result of one CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub text: String,
}

impl CommandOutput {
    pub fn print(&self) {
        if self.success {
            if !self.text.is_empty() {
                println!("{}", self.text);
            }
        } else {
            eprintln!("{}", self.text.red());
        }
    }
}

impl From<Response> for CommandOutput {
    fn from(response: Response) -> Self {
        let success = response.is_success();
        let text = if success {
            if response.output.trim().is_empty() {
                response.status_line.clone()
            } else {
                response.output.clone()
            }
        } else if response.status == 0 || response.output == response.status_line {
            response.output.clone()
        } else {
            format!("{}: {}", response.status_line, response.output)
        };
        Self { success, text }
    }
}

impl From<SecretOutcome> for CommandOutput {
    fn from(outcome: SecretOutcome) -> Self {
        match outcome {
            SecretOutcome::Submitted(response) => response.into(),
            SecretOutcome::KeyFetchFailed(response) => {
                let inner = CommandOutput::from(response);
                Self {
                    success: false,
                    text: format!("Could not fetch repository public key: {}", inner.text),
                }
            }
            SecretOutcome::EncryptionFailed(err) => Self {
                success: false,
                text: err.to_string(),
            },
            SecretOutcome::InvalidName(err) => Self {
                success: false,
                text: err.to_string(),
            },
        }
    }
}

pub struct App;

impl App {
    /// Load configuration, run the selected command and print its result.
    /// Returns whether the command succeeded.
    pub async fn run(cli: Cli) -> Result<bool> {
        paths::load_env_file(None);
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => paths::find_config_file()?,
        };
        paths::load_env_file(Some(&config_path));

        let config = Config::from_file(&config_path)?;
        let connection = config
            .connection(cli.connection.as_deref())?
            .resolve()
            .context("Failed to resolve connection")?;
        let client = GitClient::new(connection)?;

        let output = execute(&client, cli.repo.as_deref(), &cli.command).await?;
        output.print();
        Ok(output.success)
    }
}

/// Run `command` against `client`.
///
/// `Err` means the command was rejected before any request was made.
pub async fn execute(
    client: &GitClient,
    repo: Option<&str>,
    command: &Commands,
) -> Result<CommandOutput> {
    let output: CommandOutput = match command {
        Commands::Repos { page, per_page } => {
            let options = ListOptions {
                per_page: *per_page,
                page: *page,
            };
            client.list_repos(options).await.into()
        }
        Commands::Repo { action } => match action {
            RepoAction::Info => {
                let repo = resolve_repo(client.connection(), repo)?;
                client.get_repo(&repo).await.into()
            }
            RepoAction::Create { name, private } => {
                client.create_repo(name, *private).await?.into()
            }
            RepoAction::Delete => {
                let repo = resolve_repo(client.connection(), repo)?;
                client.delete_repo(&repo).await.into()
            }
        },
        Commands::Topics { action } => {
            let repo = resolve_repo(client.connection(), repo)?;
            match action {
                TopicsAction::Get => client.get_topics(&repo).await.into(),
                TopicsAction::Set { topics } => client.set_topics(&repo, topics).await?.into(),
            }
        }
        Commands::Description { action } => {
            let repo = resolve_repo(client.connection(), repo)?;
            match action {
                DescriptionAction::Get => client.get_description(&repo).await.into(),
                DescriptionAction::Set { text } => client.set_description(&repo, text).await.into(),
            }
        }
        Commands::Visibility { action } => {
            let repo = resolve_repo(client.connection(), repo)?;
            match action {
                VisibilityAction::Get => client.get_visibility(&repo).await.into(),
                VisibilityAction::Set { visibility } => {
                    client.set_visibility(&repo, visibility).await?.into()
                }
            }
        }
        Commands::Private { action } => {
            let repo = resolve_repo(client.connection(), repo)?;
            match action {
                PrivateAction::Get => client.get_private(&repo).await.into(),
                PrivateAction::Set { private } => client.set_private(&repo, *private).await.into(),
            }
        }
        Commands::Secret { action } => {
            let repo = resolve_repo(client.connection(), repo)?;
            match action {
                SecretAction::List => client.list_secrets(&repo).await.into(),
                SecretAction::Set { name, value } => {
                    let value = secret_value(value.as_deref())?;
                    client.set_secret(&repo, name, &value).await?.into()
                }
                SecretAction::Delete { name } => client.delete_secret(&repo, name).await?.into(),
            }
        }
        Commands::Actions { action } => {
            let repo = resolve_repo(client.connection(), repo)?;
            match action {
                ActionsAction::Get => client.get_actions_permissions(&repo).await.into(),
                ActionsAction::Set {
                    enabled,
                    allowed_actions,
                } => client
                    .set_actions_permissions(&repo, *enabled, allowed_actions.as_deref())
                    .await
                    .into(),
            }
        }
    };
    Ok(output)
}

/// Repository addressed by a command.
///
/// `repo` may be a bare name owned by the connection's user, `owner/name`,
/// or `.` for the current directory's name. Without it the connection's
/// configured repository is used.
pub fn resolve_repo(connection: &Connection, repo: Option<&str>) -> Result<RepoRef> {
    match repo.map(str::trim) {
        None | Some("") => Ok(connection.repo_ref()?),
        Some(".") => {
            let cwd = env::current_dir().context("Failed to read current directory")?;
            let Some(name) = repo_name_from_dir(&cwd) else {
                bail!("Cannot derive a repository name from {}", cwd.display());
            };
            Ok(connection.repo_named(&name)?)
        }
        Some(given) => match given.split_once('/') {
            Some((owner, name)) => Ok(RepoRef::new(owner, name)?),
            None => Ok(connection.repo_named(given)?),
        },
    }
}

fn secret_value(value: Option<&str>) -> Result<String> {
    if let Some(value) = value {
        return Ok(value.to_string());
    }
    if let Ok(value) = env::var(SECRET_VALUE_ENV) {
        return Ok(value);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read secret value from stdin")?;
    let value = buffer.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        bail!(
            "No secret value given. Use --value, set {}, or pipe it on stdin",
            SECRET_VALUE_ENV
        );
    }
    Ok(value)
}
