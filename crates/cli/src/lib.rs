//! # Preconf CLI
//!
//! Operator tool for the preconfirmation collateral registry.
//!
//! Every invocation loads the persisted registry snapshot, applies exactly one
//! operation and writes the snapshot back on success. The block clock is moved
//! explicitly with `advance`; nothing else changes the height.
//!
//! ## Available Commands
//!
//! - `init` - Write a default configuration and an empty state file
//! - `advance` - Move the block clock forward
//! - `deposit` / `delegate` / `exit` / `withdraw` - Registrant operations
//! - `update-status` - Recompute eligibility for named proposers
//! - `slash` - Apply authority-signed penalty evidence
//! - `query` - Inspect registrants, proposers and totals
//! - `version` - Display version information
//!
//! ## Example Usage
//!
//! ```bash
//! preconf init
//! preconf deposit 2eth --from 0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb1
//! preconf delegate --from 0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb1 0x00000000000000000000000000000000000000aa
//! preconf advance 32
//! preconf update-status 0x00000000000000000000000000000000000000aa
//! preconf query status 0x00000000000000000000000000000000000000aa
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod commands;
pub mod utils;

// Re-export the main CLI types for convenience
pub use commands::{run_cli, Cli, Commands, Context};
pub use utils::{CliError, CliResult, OutputFormat};

/// Version information for the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI application name
pub const APP_NAME: &str = "preconf";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "preconf.toml";

/// Default data directory name
pub const DEFAULT_DATA_DIR: &str = ".preconf-registry";

/// Get the default data directory path
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(DEFAULT_DATA_DIR))
        .unwrap_or_else(|| std::path::PathBuf::from(DEFAULT_DATA_DIR))
}

/// Get the default configuration file path
pub fn default_config_path() -> std::path::PathBuf {
    default_data_dir().join(DEFAULT_CONFIG_FILE)
}
