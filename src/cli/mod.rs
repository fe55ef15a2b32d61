pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "jobseekers")]
#[command(about = "Jobseeker CLI - list and export jobseeker records through the API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "JOBSEEKER_API_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of the jobseeker API"
    )]
    pub url: String,

    #[arg(long, global = true, env = "JOBSEEKER_API_TOKEN", help = "Bearer token for protected endpoints")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List jobseekers matching filters (key=value)")]
    List(commands::jobseekers::ListArgs),

    #[command(about = "Export jobseekers matching filters (key=value) to CSV")]
    Export(commands::jobseekers::ExportArgs),
}

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

/// Where and how to reach the API
#[derive(Debug, Clone)]
pub struct Remote {
    pub url: String,
    pub token: Option<String>,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let remote = Remote {
        url: cli.url.trim_end_matches('/').to_string(),
        token: cli.token,
    };

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::List(args) => commands::jobseekers::list(args, &remote, output_format).await,
        Commands::Export(args) => commands::jobseekers::export(args, &remote, output_format).await,
    }
}
