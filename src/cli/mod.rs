//! CLI interface for Keydesk

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "keydesk")]
#[command(version)]
#[command(about = "Internal license management", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new keydesk.toml configuration file
    Init,

    /// Start the web server
    Serve {
        /// Host to bind to, defaults to the configured server.host
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on, defaults to the configured server.port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List all user accounts
    List,

    /// Add a user account
    Add {
        username: String,

        password: String,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },

    /// Lock a user account so it can no longer log in
    Deactivate { username: String },
}
