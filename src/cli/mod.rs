//! CLI interface for Shopfront

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(version = "0.1.0")]
#[command(about = "Session and token based authentication for the Shopfront storefront", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new shopfront.toml configuration file
    Init,

    /// Run the HTTP server
    Serve {
        /// Host to bind (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}
