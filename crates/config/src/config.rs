//! Main configuration module for the preconf registry
//!
//! All registry settings are defined in one `preconf.toml` file. Sections that are
//! omitted take their default values.

use crate::error::{ConfigError, ConfigResult};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Default activation delay in blocks
pub const DEFAULT_ACTIVATION_DELAY: u64 = 32;

/// Default exit delay in blocks
pub const DEFAULT_EXIT_DELAY: u64 = 32;

/// Largest delay accepted for either timelock (~1 year at 12s blocks)
pub const MAX_DELAY_BLOCKS: u64 = 2_628_000;

/// Main configuration struct containing all registry settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Collateral threshold, timelocks and ledger policies
    pub registry: RegistryConfig,

    /// Penalty hook settings
    pub penalty: PenaltyConfig,

    /// Persisted state location
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// The file is parsed and validated; a configuration that fails validation is
    /// never returned.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        info!("Loading configuration from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)?;

        debug!("Configuration parsed successfully, validating...");
        config.validate()?;

        info!(
            "Configuration loaded: minimum_collateral={}, activation_delay={}, exit_delay={}",
            config.registry.minimum_collateral,
            config.registry.activation_delay,
            config.registry.exit_delay
        );

        Ok(config)
    }

    /// Load configuration from a TOML string.
    ///
    /// Useful for testing or when configuration is provided as a string.
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> ConfigResult<()> {
        self.registry.validate()?;
        self.penalty.validate()?;
        self.logging.validate()?;

        debug!("Configuration validation passed");
        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}

// =============================================================================
// Registry Configuration
// =============================================================================

/// How collateral earmarked by a pending exit counts toward a proposer's
/// effective collateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExitingCollateralPolicy {
    /// The full balance counts until the withdrawal actually removes it
    #[default]
    CountFull,
    /// Only `balance - amount_exiting` counts
    ExcludeExiting,
    /// A registrant with any pending exit counts zero
    ExcludeRegistrant,
}

/// What `initiate_exit` does when an exit is already pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExitRequestPolicy {
    /// Replace the pending amount and restart the timelock
    #[default]
    Overwrite,
    /// Add to the pending amount and restart the timelock
    Accumulate,
    /// Refuse the new request
    Reject,
}

/// What `delegate` does when the registrant already backs a named proposer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateDelegationPolicy {
    /// Append the edge again on both sides
    #[default]
    Append,
    /// Skip proposers that are already backed
    Ignore,
    /// Fail the whole call
    Reject,
}

/// Registry parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Effective collateral needed for PRECONFER status (base units, as string)
    pub minimum_collateral: String,

    /// Blocks a first deposit waits before it counts toward eligibility
    pub activation_delay: u64,

    /// Blocks between exit initiation and withdrawal
    pub exit_delay: u64,

    /// Treatment of collateral with a pending exit
    pub exiting_collateral: ExitingCollateralPolicy,

    /// Treatment of repeated exit requests
    pub exit_requests: ExitRequestPolicy,

    /// Treatment of repeated delegations to the same proposer
    pub duplicate_delegations: DuplicateDelegationPolicy,
}

impl RegistryConfig {
    /// Check the collateral threshold and both delays.
    pub fn validate(&self) -> ConfigResult<()> {
        let minimum = self
            .minimum_collateral
            .parse::<u128>()
            .map_err(|_| ConfigError::InvalidBalance(self.minimum_collateral.clone()))?;
        if minimum == 0 {
            return Err(ConfigError::InvalidMinimumCollateral);
        }

        for (name, value) in [
            ("activation_delay", self.activation_delay),
            ("exit_delay", self.exit_delay),
        ] {
            if value > MAX_DELAY_BLOCKS {
                return Err(ConfigError::DelayOutOfRange {
                    name,
                    value,
                    max: MAX_DELAY_BLOCKS,
                });
            }
        }

        Ok(())
    }

    /// Get minimum collateral as u128.
    pub fn minimum_collateral_u128(&self) -> u128 {
        self.minimum_collateral.parse().unwrap_or(0)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            minimum_collateral: "1000000000000000000".to_string(), // 1 ETH
            activation_delay: DEFAULT_ACTIVATION_DELAY,
            exit_delay: DEFAULT_EXIT_DELAY,
            exiting_collateral: ExitingCollateralPolicy::default(),
            exit_requests: ExitRequestPolicy::default(),
            duplicate_delegations: DuplicateDelegationPolicy::default(),
        }
    }
}

// =============================================================================
// Penalty Configuration
// =============================================================================

/// Penalty hook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Whether penalty evidence is accepted at all
    pub enabled: bool,

    /// Account allowed to submit pre-verified slashing instructions
    pub authority: Option<String>,

    /// Force the penalised proposer to NOT_PRECONFER until its next recompute
    pub demote_on_penalty: bool,
}

impl PenaltyConfig {
    /// Check that the penalty authority, if set, is an address.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(authority) = &self.authority {
            parse_address(authority)?;
        }
        Ok(())
    }

    /// Parsed penalty authority, if one is configured.
    pub fn authority_address(&self) -> ConfigResult<Option<Address>> {
        self.authority.as_deref().map(parse_address).transpose()
    }
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            authority: None,
            demote_on_penalty: true,
        }
    }
}

fn parse_address(s: &str) -> ConfigResult<Address> {
    Address::from_str(s).map_err(|e| ConfigError::InvalidAddress(format!("{}: {}", s, e)))
}

// =============================================================================
// Storage Configuration
// =============================================================================

/// Persisted state location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the registry snapshot
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: "./preconf-state.json".to_string(),
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line human readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
    /// Single-line human readable output
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Compact => write!(f, "compact"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, json, compact)
    pub format: String,
}

impl LoggingConfig {
    /// Check the log level and format.
    pub fn validate(&self) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.level.clone()));
        }

        self.log_format()?;
        Ok(())
    }

    /// Parsed log format.
    pub fn log_format(&self) -> ConfigResult<LogFormat> {
        self.format.parse()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
