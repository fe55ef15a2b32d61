use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, AccessLevel, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a bearer token signed with the configured JWT secret")]
    Token {
        #[arg(long, default_value = "local", help = "Tenant name")]
        tenant: String,
        #[arg(long, default_value = "developer", help = "Username")]
        user: String,
        #[arg(long, default_value = "read", help = "Access level: deny, read, edit, full, admin, root")]
        access: AccessLevel,
        #[arg(long, help = "User ID (random when omitted)")]
        user_id: Option<Uuid>,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token {
            tenant,
            user,
            access,
            user_id,
        } => {
            let claims = Claims::new(tenant, user, access, user_id.unwrap_or_else(Uuid::new_v4));
            let token = generate_jwt(&claims)?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token generated",
                    Some(json!({ "token": token, "access": claims.access, "expires_at": claims.exp })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
