use clap::Subcommand;

use crate::cli::utils::output_list;
use crate::cli::CliContext;

#[derive(Subcommand)]
pub enum DivisionCommands {
    #[command(about = "List divisions, optionally filtered by name")]
    List {
        #[arg(long, help = "Case-insensitive substring of the division name")]
        name: Option<String>,
        #[arg(long, help = "Page number (1-based)")]
        page: Option<u64>,
    },
}

pub async fn handle(cmd: DivisionCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        DivisionCommands::List { name, page } => {
            let mut query = Vec::new();
            if let Some(name) = name {
                query.push(("name", name));
            }
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }

            let body = ctx.session_client()?.get("/divisions", &query).await?;
            output_list(&ctx.output, &body, "divisions", &[("ID", "id"), ("NAME", "name")])
        }
    }
}
