use anyhow::{anyhow, bail};
use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Split `key=value` arguments into query pairs
pub fn parse_filters(args: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("Filter '{}' must look like key=value", arg))?;
            let key = key.trim();
            if key.is_empty() {
                bail!("Filter '{}' has an empty key", arg);
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Pull the message out of an API error body, falling back to the raw text
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// `filename` from a `Content-Disposition: attachment; filename="..."` header
pub fn attachment_filename(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
}

/// Data rows in a CSV document with a header line. Newlines inside quoted cells do
/// not start a new record.
pub fn count_csv_records(csv: &str) -> usize {
    let mut in_quotes = false;
    let mut lines: usize = 0;
    let mut line_open = false;
    for c in csv.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\n' if !in_quotes => {
                lines += 1;
                line_open = false;
                continue;
            }
            _ => {}
        }
        line_open = true;
    }
    if line_open {
        lines += 1;
    }
    lines.saturating_sub(1)
}
