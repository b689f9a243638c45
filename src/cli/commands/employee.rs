use anyhow::Context;
use clap::Subcommand;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

use crate::cli::utils::{output_list, output_success};
use crate::cli::CliContext;

#[derive(Subcommand)]
pub enum EmployeeCommands {
    #[command(about = "List employees with optional name and division filters")]
    List {
        #[arg(long, help = "Case-insensitive substring of the employee name")]
        name: Option<String>,
        #[arg(long, help = "Division ID")]
        division: Option<String>,
        #[arg(long, help = "Page number (1-based)")]
        page: Option<u64>,
    },

    #[command(about = "Create an employee")]
    Create {
        #[arg(long, help = "Full name")]
        name: String,
        #[arg(long, help = "Phone number")]
        phone: String,
        #[arg(long, help = "Division ID")]
        division: String,
        #[arg(long, help = "Job position")]
        position: String,
        #[arg(long, help = "Path to a jpeg, png or gif photo")]
        image: Option<PathBuf>,
    },

    #[command(about = "Update selected fields of an employee")]
    Update {
        #[arg(help = "Employee ID")]
        id: String,
        #[arg(long, help = "Full name")]
        name: Option<String>,
        #[arg(long, help = "Phone number")]
        phone: Option<String>,
        #[arg(long, help = "Division ID")]
        division: Option<String>,
        #[arg(long, help = "Job position")]
        position: Option<String>,
        #[arg(long, help = "Path to a jpeg, png or gif photo")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete an employee")]
    Delete {
        #[arg(help = "Employee ID")]
        id: String,
    },
}

const COLUMNS: &[(&str, &str)] = &[
    ("ID", "id"),
    ("NAME", "name"),
    ("PHONE", "phone"),
    ("DIVISION", "division.name"),
    ("POSITION", "position"),
    ("IMAGE", "image"),
];

pub async fn handle(cmd: EmployeeCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        EmployeeCommands::List { name, division, page } => {
            let mut query = Vec::new();
            if let Some(name) = name {
                query.push(("name", name));
            }
            if let Some(division) = division {
                query.push(("division_id", division));
            }
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }

            let body = ctx.session_client()?.get("/employees", &query).await?;
            output_list(&ctx.output, &body, "employees", COLUMNS)
        }
        EmployeeCommands::Create {
            name,
            phone,
            division,
            position,
            image,
        } => {
            let client = ctx.session_client()?;
            let form = employee_form(
                vec![
                    ("name", name),
                    ("phone", phone),
                    ("division", division),
                    ("position", position),
                ],
                image.as_deref(),
            )
            .await?;

            client.send_multipart("/employees", form).await?;
            output_success(&ctx.output, "Employee created", None)
        }
        EmployeeCommands::Update {
            id,
            name,
            phone,
            division,
            position,
            image,
        } => {
            let client = ctx.session_client()?;

            // multipart bodies only travel on POST, so tunnel the PUT
            let mut fields = vec![("_method", "PUT".to_string())];
            fields.extend(
                [
                    ("name", name),
                    ("phone", phone),
                    ("division", division),
                    ("position", position),
                ]
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v))),
            );
            let form = employee_form(fields, image.as_deref()).await?;

            client
                .send_multipart(&format!("/employees/{}", id), form)
                .await?;
            output_success(&ctx.output, &format!("Employee {} updated", id), None)
        }
        EmployeeCommands::Delete { id } => {
            ctx.session_client()?
                .delete(&format!("/employees/{}", id))
                .await?;
            output_success(&ctx.output, &format!("Employee {} deleted", id), None)
        }
    }
}

async fn employee_form(
    fields: Vec<(&'static str, String)>,
    image: Option<&Path>,
) -> anyhow::Result<Form> {
    let mut form = Form::new();
    for (key, value) in fields {
        form = form.text(key, value);
    }

    if let Some(path) = image {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(path))?;
        form = form.part("image", part);
    }

    Ok(form)
}

/// Content type guessed from the extension; the server sniffs the bytes anyway
fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
