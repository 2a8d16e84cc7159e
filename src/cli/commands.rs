//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::auth::{hash_password, UserRole};
use crate::cli::{error, info, print_users_table, success, warn};
use crate::config::{self, Config};
use crate::store::{NewUser, Store};
use crate::web;

/// Initialize a new keydesk.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("keydesk.toml");

    if config_path.exists() {
        warn("keydesk.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created keydesk.toml");
    info("Edit the configuration file and run 'keydesk serve' to start the server");

    Ok(())
}

/// Start the web server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    web::run_server(config, &host, port).await?;
    Ok(())
}

/// List all user accounts
pub async fn users_list() -> Result<()> {
    let store = open_store()?;
    print_users_table(&store.list_users().await);
    Ok(())
}

/// Add a user account
pub async fn users_add(username: &str, password: &str, admin: bool) -> Result<()> {
    let store = open_store()?;

    let role = if admin { UserRole::Admin } else { UserRole::User };
    match store
        .create_user(NewUser {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role,
            active: true,
        })
        .await
    {
        Ok(user) => {
            success(&format!("Created {} user: {}", user.role, user.username));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to create user: {}", e));
            Err(e.into())
        }
    }
}

/// Lock a user account
pub async fn users_deactivate(username: &str) -> Result<()> {
    let store = open_store()?;

    let Some(user) = store.user_by_username(username).await else {
        error(&format!("No such user: {}", username));
        return Err(crate::error::Error::Other(format!("no such user: {}", username)).into());
    };

    store
        .update_user(user.id, user.username.clone(), user.role, false)
        .await?;
    success(&format!("Deactivated user: {}", user.username));

    Ok(())
}

fn load_config() -> Result<Config> {
    Ok(config::load_config()?)
}

fn open_store() -> Result<Store> {
    let config = load_config()?;
    Ok(Store::open(&config.store.data_file)?)
}
