use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod cli;
mod config;
mod error;
mod store;
mod web;

use cli::{Cli, Commands, UsersAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keydesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cli::commands::init().await,
        Commands::Serve { host, port } => cli::commands::serve(host, port).await,
        Commands::Users { action } => match action {
            UsersAction::List => cli::commands::users_list().await,
            UsersAction::Add {
                username,
                password,
                admin,
            } => cli::commands::users_add(&username, &password, admin).await,
            UsersAction::Deactivate { username } => {
                cli::commands::users_deactivate(&username).await
            }
        },
    }
}
