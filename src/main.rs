// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

use acme_sa::acme::jose::Jwk;
use acme_sa::repository::operations::{ChallengesExt, RegistrationsExt};
use acme_sa::repository::postgres_repo::init;
use acme_sa::utils::configs::{Commands, DatabaseConfig, LogConfig};
use anyhow::Context;
use clap::Parser;
#[cfg(debug_assertions)]
use dotenv::dotenv;
use serde::Serialize;

/// Storage authority command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Logging configuration
    #[command(flatten)]
    log_config: LogConfig,

    /// Database configuration args
    #[command(flatten)]
    database_config: DatabaseConfig,

    #[command(subcommand)]
    commands: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_filters(&args.log_config.log_level)
        .init();

    // Initialize database connection pool
    let db_pool = init(args.database_config).await?;
    let pg_client = db_pool.get().await?;

    match args.commands {
        Commands::Registration { id } => print_json(&pg_client.get_registration(id).await?),
        Commands::RegistrationByKey { jwk } => {
            let raw = std::fs::read(&jwk).with_context(|| format!("reading {}", jwk.display()))?;
            let key: Jwk = serde_json::from_slice(&raw).context("parsing JWK")?;
            print_json(&pg_client.get_registration_by_key(&key).await?)
        }
        Commands::Challenges { authorization_id } => {
            let challenges = pg_client.get_challenges(&authorization_id).await?;
            log::info!("{} challenges for authorization {}", challenges.len(), authorization_id);
            print_json(&challenges)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
