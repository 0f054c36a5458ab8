//! CLI command implementations

use anyhow::Result;
use std::fs;

use crate::cli::{info, success, warn};
use crate::config;

/// Initialize a new shopfront.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("shopfront.toml");

    if config_path.exists() {
        warn("shopfront.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created shopfront.toml");
    info("Edit the configuration file and run 'shopfront serve' to start the server");

    Ok(())
}

/// Run the HTTP server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = match config::load_config() {
        Ok(config) => config,
        Err(_) => {
            warn("No shopfront.toml found, using defaults");
            config::Config::default()
        }
    };

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    crate::api::run_server(config, &host, port).await?;

    Ok(())
}
