//! vetsync CLI - terminal client for the clinic portal's live content lists.
//!
//! Lists answer from the authoritative snapshot (with an offline cache
//! fallback); `watch` keeps the list converged via the push channel.

mod cache;
mod cli;
mod commands;
mod error;
mod session;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::{auth_cmd, common, list, notifications, watch};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vetsync=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            kind,
            search,
            category,
            status,
            limit,
            json,
        } => {
            let config = common::resolve_config(cli.api_url.as_deref(), cli.push_url.as_deref())?;
            list::run_list(
                &kind,
                search.as_deref(),
                category.as_deref(),
                status.as_deref(),
                limit,
                json,
                &config,
            )
            .await
        }
        Commands::Watch {
            kind,
            search,
            category,
            status,
        } => {
            let config = common::resolve_config(cli.api_url.as_deref(), cli.push_url.as_deref())?;
            watch::run_watch(
                &kind,
                search.as_deref(),
                category.as_deref(),
                status.as_deref(),
                &config,
            )
            .await
        }
        Commands::Notifications { command } => {
            let config = common::resolve_config(cli.api_url.as_deref(), cli.push_url.as_deref())?;
            notifications::run_notifications(command, &config).await
        }
        Commands::Auth { command } => auth_cmd::run_auth(command),
    }
}
