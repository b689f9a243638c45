pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::cli::client::{ApiClient, ClientError};
use crate::cli::config::{ConfigStore, Session};

#[derive(Parser)]
#[command(name = "staffdir")]
#[command(about = "staffdir CLI - command-line client for the Staff Directory API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Select and check the API server")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Log in, log out and show the current session")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Manage the logged-in admin's profile")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },

    #[command(about = "Browse divisions")]
    Division {
        #[command(subcommand)]
        cmd: commands::division::DivisionCommands,
    },

    #[command(about = "List, create, update and delete employees")]
    Employee {
        #[command(subcommand)]
        cmd: commands::employee::EmployeeCommands,
    },
}

/// Returned by `run` once the failure has already been printed
#[derive(Debug, thiserror::Error)]
#[error("command failed")]
pub struct AlreadyReported;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: where config lives, how to print, and the
/// session loaded once at startup
pub struct CliContext {
    pub config: ConfigStore,
    pub output: OutputFormat,
    pub session: Option<Session>,
}

impl CliContext {
    pub fn load(config: ConfigStore, output: OutputFormat) -> anyhow::Result<Self> {
        let session = config.load_session()?;
        Ok(Self {
            config,
            output,
            session,
        })
    }

    /// Client for the configured server, without credentials
    pub fn guest_client(&self) -> anyhow::Result<ApiClient> {
        let server = self.config.load_server_config()?;
        Ok(ApiClient::new(&server.url)?)
    }

    /// Client for the server the session was opened against, carrying its token
    pub fn session_client(&self) -> Result<ApiClient, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotLoggedIn)?;
        Ok(ApiClient::new(&session.server)?.with_token(&session.token, self.config.clone()))
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = CliContext::load(ConfigStore::from_env()?, output_format)?;

    let result = match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, &ctx).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, &ctx).await,
        Commands::Division { cmd } => commands::division::handle(cmd, &ctx).await,
        Commands::Employee { cmd } => commands::employee::handle(cmd, &ctx).await,
    };

    // API errors are printed here so field-level messages reach the user
    match result {
        Err(e) => match e.downcast::<ClientError>() {
            Ok(client_err) => {
                utils::output_client_error(&ctx.output, &client_err)?;
                Err(AlreadyReported.into())
            }
            Err(other) => Err(other),
        },
        ok => ok,
    }
}
