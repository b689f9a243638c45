use clap::Subcommand;
use reqwest::Method;
use serde_json::{json, Map, Value};

use crate::cli::client::ClientError;
use crate::cli::utils::output_success;
use crate::cli::CliContext;
use crate::database::models::AdminProfile;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Update name, phone and email of the logged-in admin")]
    Update {
        #[arg(long, help = "New display name (defaults to the current one)")]
        name: Option<String>,
        #[arg(long, help = "New phone number (defaults to the current one)")]
        phone: Option<String>,
        #[arg(long, help = "New email address (defaults to the current one)")]
        email: Option<String>,
    },
}

pub async fn handle(cmd: ProfileCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        ProfileCommands::Update { name, phone, email } => {
            let session = ctx.session.as_ref().ok_or(ClientError::NotLoggedIn)?;
            let client = ctx.session_client()?;

            // the server replaces all three fields, so fill gaps from the session
            let body = profile_body(&session.admin, name, phone, email);
            let response = client.send_json(Method::PUT, "/profile", &body).await?;

            let user: AdminProfile = serde_json::from_value(response["data"]["user"].clone())?;
            let mut updated = session.clone();
            updated.admin = user.clone();
            ctx.config.save_session(&updated)?;

            output_success(
                &ctx.output,
                "Profile updated",
                Some(json!({ "user": user })),
            )
        }
    }
}

fn profile_body(
    current: &AdminProfile,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
) -> Value {
    let mut body = Map::new();
    body.insert("name".into(), Value::String(name.unwrap_or_else(|| current.name.clone())));
    body.insert("phone".into(), Value::String(phone.unwrap_or_else(|| current.phone.clone())));
    body.insert("email".into(), Value::String(email.unwrap_or_else(|| current.email.clone())));
    Value::Object(body)
}
