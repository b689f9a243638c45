use serde_json::{json, Value};

use crate::cli::client::ClientError;
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "status": "success",
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print an API response body as-is (JSON) or as a table of `columns` (text)
pub fn output_list(
    output_format: &OutputFormat,
    body: &Value,
    collection: &str,
    columns: &[(&str, &str)],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(body)?);
        }
        OutputFormat::Text => {
            let rows = body["data"][collection].as_array().cloned().unwrap_or_default();
            if rows.is_empty() {
                println!("No {} found", collection);
            } else {
                let table: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| columns.iter().map(|(_, path)| cell(row, path)).collect())
                    .collect();
                let headers: Vec<String> = columns.iter().map(|(h, _)| h.to_string()).collect();
                print!("{}", render_table(&headers, &table));
            }
            if let Some(line) = pagination_line(&body["pagination"]) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Print a client error, including per-field validation messages
pub fn output_client_error(output_format: &OutputFormat, err: &ClientError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "status": "error",
                "message": err.to_string()
            });
            if let ClientError::Api { errors: Some(errors), .. } = err {
                response["errors"] = errors.clone();
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", err);
            if let ClientError::Api { errors: Some(Value::Object(fields)), .. } = err {
                for (field, messages) in fields {
                    for message in messages.as_array().into_iter().flatten() {
                        eprintln!("  {}: {}", field, message.as_str().unwrap_or_default());
                    }
                }
            }
        }
    }
    Ok(())
}

/// Dotted path lookup (`division.name`) rendered as plain text
fn cell(row: &Value, path: &str) -> String {
    let value = path.split('.').fold(row, |v, key| &v[key]);
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) if s.starts_with("data:") => "(inline image)".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(value.chars().count());
            }
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format_row(headers);
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

pub fn pagination_line(pagination: &Value) -> Option<String> {
    let current = pagination.get("current_page")?.as_u64()?;
    let last = pagination.get("last_page")?.as_u64()?;
    let total = pagination.get("total")?.as_u64()?;
    Some(format!("Page {}/{} ({} total)", current, last, total))
}
