/**
 * Chirpy Auth Admin Entry Point
 *
 * Operator commands for the auth backend:
 *
 * - `hash-password` reads a password from stdin and prints its bcrypt hash
 *   at the configured cost
 * - `migrate` connects to `DATABASE_URL` and applies the schema migrations
 */

use std::io::Read;
use std::process::ExitCode;

use chirpy_auth::backend::auth::PasswordHasher;
use chirpy_auth::backend::server::{load_database, AuthConfig};

const USAGE: &str = "usage: chirpy-auth <hash-password | migrate>";

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let config = match AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let command = std::env::args().nth(1);
    let result = match command.as_deref() {
        Some("hash-password") => hash_password(&config).await,
        Some("migrate") => migrate(&config).await,
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn hash_password(config: &AuthConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let password = input.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err("no password on stdin".into());
    }

    let hasher = PasswordHasher::new(config.bcrypt_cost)?;
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    println!("{}", hashed);
    Ok(())
}

async fn migrate(config: &AuthConfig) -> Result<(), Box<dyn std::error::Error>> {
    let url = config
        .database_url
        .as_deref()
        .ok_or("DATABASE_URL is not set")?;

    load_database(url).await?;
    tracing::info!("Schema is up to date");
    Ok(())
}
