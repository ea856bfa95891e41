//! # Preconf Registry Configuration
//!
//! This crate provides configuration parsing for the preconfirmation collateral registry.
//!
//! All registry settings live in one `preconf.toml` file. Every section is optional and
//! falls back to the defaults observed on the reference deployment (32 block activation
//! and exit delays, overwrite-on-repeat exits, appending delegations).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use preconf_config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("preconf.toml"))?;
//!
//! println!("Minimum collateral: {}", config.registry.minimum_collateral);
//! println!("Exit delay: {} blocks", config.registry.exit_delay);
//! ```
//!
//! ## Configuration Sections
//!
//! - `[registry]` - Collateral threshold, timelocks and the ledger policies
//! - `[penalty]` - Penalty hook switches and the accepted penalty authority
//! - `[storage]` - Location of the persisted registry state
//! - `[logging]` - Logging settings (level, format)

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

mod config;
mod error;

pub use config::*;
pub use error::*;

/// Re-export alloy primitives for convenience
pub use alloy_primitives::Address;
