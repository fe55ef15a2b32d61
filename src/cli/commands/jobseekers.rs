use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use reqwest::header::CONTENT_DISPOSITION;
use serde_json::Value;

use crate::cli::utils::{attachment_filename, count_csv_records, error_message, output_success, parse_filters};
use crate::export::EXPORT_RECORDS_HEADER;
use crate::cli::{OutputFormat, Remote};

#[derive(Args)]
pub struct ListArgs {
    #[arg(help = "Filters as key=value (sex, employment_status, ofw, four_ps, city, province, search, ...)")]
    pub filters: Vec<String>,
    #[arg(long, help = "Page number, starting at 1")]
    pub page: Option<u32>,
    #[arg(long, help = "Records per page")]
    pub page_size: Option<u32>,
    #[arg(long, help = "Sort order, e.g. \"surname asc, id desc\"")]
    pub order: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(help = "Filters as key=value")]
    pub filters: Vec<String>,
    #[arg(short, long, help = "Output file (defaults to the server-suggested name; '-' for stdout)")]
    pub output: Option<PathBuf>,
}

fn client(remote: &Remote, path: &str) -> anyhow::Result<reqwest::RequestBuilder> {
    let Some(token) = remote.token.as_deref() else {
        bail!("No API token; pass --token or set JOBSEEKER_API_TOKEN (see `jobseekers auth token`)");
    };
    Ok(reqwest::Client::new()
        .get(format!("{}{}", remote.url, path))
        .bearer_auth(token))
}

async fn send(request: reqwest::RequestBuilder) -> anyhow::Result<reqwest::Response> {
    let response = request.send().await.context("request to jobseeker API failed")?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("{} ({})", error_message(&body), status)
}

pub async fn list(args: ListArgs, remote: &Remote, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut query = parse_filters(&args.filters)?;
    if let Some(page) = args.page {
        query.push(("page".to_string(), page.to_string()));
    }
    if let Some(page_size) = args.page_size {
        query.push(("page_size".to_string(), page_size.to_string()));
    }
    if let Some(order) = args.order {
        query.push(("order".to_string(), order));
    }

    let response = send(client(remote, "/api/jobseekers")?.query(&query)).await?;
    let body: Value = response.json().await.context("invalid listing response")?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
        OutputFormat::Text => {
            let data = &body["data"];
            let records = data["records"].as_array().map(Vec::as_slice).unwrap_or_default();
            if records.is_empty() {
                println!("No jobseekers found");
            }
            for record in records {
                println!(
                    "{:>8}  {:<24} {:<20} {:<10} {}",
                    record["id"],
                    record["surname"].as_str().unwrap_or("-"),
                    record["first_name"].as_str().unwrap_or("-"),
                    record["sex"].as_str().unwrap_or("-"),
                    record["city"].as_str().unwrap_or("-"),
                );
            }
            println!(
                "Page {} of {} ({} total)",
                data["page"], data["total_pages"], data["total"]
            );
        }
    }
    Ok(())
}

pub async fn export(args: ExportArgs, remote: &Remote, output_format: OutputFormat) -> anyhow::Result<()> {
    let query = parse_filters(&args.filters)?;
    let response = send(client(remote, "/api/jobseekers/export")?.query(&query)).await?;

    let suggested = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(attachment_filename)
        .unwrap_or_else(|| "jobseekers.csv".to_string());
    let reported = response
        .headers()
        .get(EXPORT_RECORDS_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    let csv = response.text().await.context("failed to read export body")?;

    let output = args.output.unwrap_or_else(|| PathBuf::from(&suggested));
    if output.as_os_str() == "-" {
        print!("{}", csv);
        return Ok(());
    }

    tokio::fs::write(&output, &csv)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    let records = reported.unwrap_or_else(|| count_csv_records(&csv));
    output_success(
        &output_format,
        &format!("Exported {} jobseekers to {}", records, output.display()),
        Some(serde_json::json!({ "file": output.display().to_string(), "records": records })),
    )
}
