//! Shared utilities for CLI commands.
//!
//! This module provides common functionality used across CLI commands:
//! - Error types and result handling
//! - Output formatting
//! - Amount and address parsing
//! - Display formatting helpers

use alloy_primitives::Address;
use clap::ValueEnum;
use preconf_config::ConfigError;
use preconf_registry::{RegistryError, StoreError};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The registry refused the operation
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Persisted state could not be read or written
    #[error("State error: {0}")]
    State(#[from] StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// User cancelled operation
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Dialoguer interaction error
    #[error("Input error: {0}")]
    DialoguerError(#[from] dialoguer::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::ConfigError(err.to_string())
    }
}

/// CLI result type alias
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Output Formatting
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Print an info message to stderr (so JSON output stays clean)
pub fn print_info(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[INFO]").cyan().bold(), msg);
}

/// Print a success message to stderr
pub fn print_success(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[OK]").green().bold(), msg);
}

/// Print a warning message to stderr
pub fn print_warning(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[WARN]").yellow().bold(), msg);
}

/// Print an error message to stderr
pub fn print_error(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[ERROR]").red().bold(), msg);
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Amount and Address Parsing
// ============================================================================

const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Parse an amount string with optional suffixes (k, m, b, t, eth).
/// Returns the amount in base units.
pub fn parse_amount(s: &str) -> CliResult<u128> {
    let s = s.trim().to_lowercase();
    let invalid = || CliError::InvalidArgument(format!("Invalid amount: {}", s));

    let (num_part, multiplier) = if let Some(n) = s.strip_suffix("eth") {
        (n.trim(), WEI_PER_ETH)
    } else if let Some(n) = s.strip_suffix('k') {
        (n, 1_000u128)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 1_000_000u128)
    } else if let Some(n) = s.strip_suffix('b') {
        (n, 1_000_000_000u128)
    } else if let Some(n) = s.strip_suffix('t') {
        (n, 1_000_000_000_000u128)
    } else {
        (s.as_str(), 1u128)
    };

    let value = match num_part.split_once('.') {
        Some((whole, decimals)) => {
            if decimals.is_empty() || decimals.contains('.') {
                return Err(invalid());
            }
            let whole: u128 = whole.parse().map_err(|_| invalid())?;
            let frac: u128 = decimals.parse().map_err(|_| invalid())?;
            let scale = 10u128
                .checked_pow(decimals.len() as u32)
                .filter(|scale| *scale <= multiplier)
                .ok_or_else(|| {
                    CliError::InvalidArgument(format!("Too many decimal places: {}", s))
                })?;
            whole
                .checked_mul(multiplier)
                .and_then(|w| w.checked_add(frac * (multiplier / scale)))
                .ok_or_else(invalid)?
        }
        None => num_part
            .parse::<u128>()
            .map_err(|_| invalid())?
            .checked_mul(multiplier)
            .ok_or_else(invalid)?,
    };

    if value == 0 {
        return Err(CliError::InvalidArgument("Amount must be positive".to_string()));
    }

    Ok(value)
}

/// Parse a hex account address
pub fn parse_address(s: &str) -> CliResult<Address> {
    s.trim()
        .parse::<Address>()
        .map_err(|_| CliError::InvalidArgument(format!("Invalid address: {}", s)))
}

/// Parse a list of hex account addresses
pub fn parse_addresses(values: &[String]) -> CliResult<Vec<Address>> {
    values.iter().map(|s| parse_address(s)).collect()
}

// ============================================================================
// Display Helpers
// ============================================================================

/// Format a base-unit amount as whole tokens with up to 6 decimals
pub fn format_amount(wei: u128) -> String {
    let whole = wei / WEI_PER_ETH;
    let frac = wei % WEI_PER_ETH;

    // Show at most 6 decimal places
    let frac_str = format!("{:018}", frac);
    let frac_display = frac_str[..6].trim_end_matches('0');
    if frac_display.is_empty() {
        format!("{} ETH", format_with_commas(whole))
    } else {
        format!("{}.{} ETH", format_with_commas(whole), frac_display)
    }
}

/// Format a number with thousand separators
pub fn format_with_commas(n: u128) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Ask for confirmation unless `skip` is set
pub fn confirm(prompt: &str, skip: bool) -> CliResult<()> {
    if skip {
        return Ok(());
    }

    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    if confirmed {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_decimal_eth() {
        assert_eq!(parse_amount("1.5eth").unwrap(), 1_500_000_000_000_000_000);
    }

    #[test]
    fn test_format_amount_fraction() {
        assert_eq!(format_amount(1_500_000_000_000_000_000), "1.5 ETH");
        assert_eq!(format_amount(0), "0 ETH");
    }
}
