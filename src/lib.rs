//! Shopfront - storefront authentication and authorization
//!
//! This is the library interface for the Shopfront auth subsystem:
//! session issuance and resolution, single-use verification tokens,
//! and declarative route guarding.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod mail;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
