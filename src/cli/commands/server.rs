use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::ServerConfig;
use crate::cli::utils::output_success;
use crate::cli::{CliContext, OutputFormat};

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at a server URL")]
    Set {
        #[arg(help = "Server URL, e.g. http://127.0.0.1:8000")]
        url: String,
    },

    #[command(about = "Show the configured server")]
    Current,

    #[command(about = "Check server health status from the /health endpoint")]
    Health,
}

pub async fn handle(cmd: ServerCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Set { url } => {
            // parse before saving so a typo never lands in server.json
            let client = ApiClient::new(&url)?;
            let url = client.base_url().as_str().trim_end_matches('/').to_string();
            ctx.config.save_server_config(&ServerConfig {
                url: url.clone(),
                updated_at: Utc::now(),
            })?;
            output_success(
                &ctx.output,
                &format!("Server set to {}", url),
                Some(json!({ "url": url })),
            )
        }
        ServerCommands::Current => {
            let server = ctx.config.load_server_config()?;
            match ctx.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&server)?),
                OutputFormat::Text => println!("Current server: {}", server.url),
            }
            Ok(())
        }
        ServerCommands::Health => {
            let client = ctx.guest_client()?;
            let body = client.get("/health", &[]).await?;
            output_success(
                &ctx.output,
                &format!("{} is healthy", client.base_url()),
                body.get("data").cloned(),
            )
        }
    }
}
