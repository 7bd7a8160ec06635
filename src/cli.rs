use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::paging::DEFAULT_PAGE_SIZE;

#[derive(Parser, Debug)]
#[command(name = "gitapi")]
#[command(about = "Manage GitHub and Gitea repositories, topics and Actions secrets")]
#[command(version)]
pub struct Cli {
    /// Path to the config file (defaults to discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Connection name from the config file (defaults to the first one)
    #[arg(short = 'c', long, global = true)]
    pub connection: Option<String>,

    /// Repository name, `owner/name`, or `.` for the current directory's name
    #[arg(short = 'r', long, global = true)]
    pub repo: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List repositories of the authenticated user
    Repos {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        per_page: u32,
    },
    /// Show, create or delete a repository
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },
    /// Read or replace repository topics
    Topics {
        #[command(subcommand)]
        action: TopicsAction,
    },
    /// Read or change the repository description
    Description {
        #[command(subcommand)]
        action: DescriptionAction,
    },
    /// Read or change the repository visibility
    Visibility {
        #[command(subcommand)]
        action: VisibilityAction,
    },
    /// Read or change the repository private flag
    Private {
        #[command(subcommand)]
        action: PrivateAction,
    },
    /// List, set or delete Actions secrets
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
    /// Read or change Actions permissions
    Actions {
        #[command(subcommand)]
        action: ActionsAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RepoAction {
    Info,
    Create {
        name: String,
        #[arg(long)]
        private: bool,
    },
    Delete,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TopicsAction {
    Get,
    /// Replace all topics (no arguments clears them)
    Set { topics: Vec<String> },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DescriptionAction {
    Get,
    Set { text: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum VisibilityAction {
    Get,
    /// One of public, private or internal
    Set { visibility: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PrivateAction {
    Get,
    Set {
        #[arg(action = ArgAction::Set)]
        private: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SecretAction {
    List,
    Set {
        name: String,
        /// Secret value; falls back to GITAPI_SECRET_VALUE, then stdin
        #[arg(long)]
        value: Option<String>,
    },
    Delete {
        name: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ActionsAction {
    Get,
    Set {
        #[arg(long, action = ArgAction::Set)]
        enabled: bool,
        /// all, local_only or selected
        #[arg(long)]
        allowed_actions: Option<String>,
    },
}
