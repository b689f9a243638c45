use chrono::Utc;
use clap::Subcommand;
use reqwest::Method;
use serde_json::json;
use std::io::{self, BufRead, Write};

use crate::cli::config::Session;
use crate::cli::utils::output_success;
use crate::cli::{CliContext, OutputFormat};
use crate::database::models::AdminProfile;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout from server")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            let session = login(ctx, &username, &password).await?;
            output_success(
                &ctx.output,
                &format!("Logged in as {} on {}", session.admin.username, session.server),
                Some(json!({ "admin": session.admin })),
            )
        }
        AuthCommands::Logout => {
            if ctx.session.is_none() {
                return output_success(&ctx.output, "Not logged in", None);
            }

            let result = ctx
                .session_client()?
                .send_json(Method::POST, "/logout", &json!({}))
                .await;
            // the local session goes away even if the server call failed
            ctx.config.clear_session()?;
            result?;
            output_success(&ctx.output, "Logged out", None)
        }
        AuthCommands::Status => {
            match (&ctx.session, &ctx.output) {
                (Some(session), OutputFormat::Json) => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "logged_in": true,
                        "server": session.server,
                        "admin": session.admin,
                        "logged_in_at": session.logged_in_at,
                    }))?
                ),
                (Some(session), OutputFormat::Text) => {
                    println!("Logged in as {} ({})", session.admin.username, session.admin.name);
                    println!("Server: {}", session.server);
                    println!("Since: {}", session.logged_in_at.to_rfc3339());
                }
                (None, OutputFormat::Json) => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "logged_in": false }))?)
                }
                (None, OutputFormat::Text) => println!("Not logged in"),
            }
            Ok(())
        }
    }
}

/// POST /login against the configured server and persist the session
pub async fn login(ctx: &CliContext, username: &str, password: &str) -> anyhow::Result<Session> {
    // never send the stored token: /login rejects authenticated callers
    let client = ctx.guest_client()?;
    let body = client
        .send_json(
            Method::POST,
            "/login",
            &json!({ "username": username, "password": password }),
        )
        .await?;

    let token = body["data"]["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("login response did not include a token"))?
        .to_string();
    let admin: AdminProfile = serde_json::from_value(body["data"]["admin"].clone())?;

    let session = Session {
        server: client.base_url().as_str().trim_end_matches('/').to_string(),
        token,
        admin,
        logged_in_at: Utc::now(),
    };
    ctx.config.save_session(&session)?;
    Ok(session)
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
