//! CLI command definitions and handlers.
//!
//! This module defines all available CLI commands using clap's derive macros.
//! Each group of subcommands has its own module with implementation details.

pub mod eligibility;
pub mod init;
pub mod query;
pub mod slash;
pub mod staking;

use clap::{Parser, Subcommand};
use preconf_config::{Config, LogFormat, LoggingConfig};
use preconf_registry::{
    InMemoryCustody, PreconfRegistry, RegistryEvent, RegistryParams, Snapshot, StateStore,
    SNAPSHOT_VERSION,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::{print_json, CliResult, OutputFormat};

/// Preconf - stake-backed preconfirmation eligibility registry
#[derive(Parser, Debug)]
#[command(name = "preconf")]
#[command(author = "Preconf Registry Team")]
#[command(version)]
#[command(about = "Operate the preconfirmation collateral registry", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults apply if it does not exist)
    #[arg(global = true, long)]
    pub config: Option<PathBuf>,

    /// State file, overriding `[storage] state_file`
    #[arg(global = true, long)]
    pub state: Option<PathBuf>,

    /// Global output format for command results
    #[arg(global = true, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(global = true, short, long)]
    pub quiet: bool,

    /// Log format (pretty, json, compact), overriding `[logging] format`
    #[arg(global = true, long, value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration and an empty state file
    Init(init::InitArgs),

    /// Move the block clock forward
    Advance(eligibility::AdvanceArgs),

    /// Lock collateral for a registrant
    Deposit(staking::DepositArgs),

    /// Delegate a registrant's collateral to proposers
    Delegate(staking::DelegateArgs),

    /// Recompute eligibility for the named proposers
    UpdateStatus(eligibility::UpdateStatusArgs),

    /// Earmark collateral for withdrawal
    Exit(staking::ExitArgs),

    /// Withdraw earmarked collateral after the exit delay
    Withdraw(staking::WithdrawArgs),

    /// Apply penalty evidence from the configured authority
    Slash(slash::SlashArgs),

    /// Query registry state
    #[command(subcommand)]
    Query(query::QueryCommands),

    /// Show version information
    Version,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse::<LogFormat>().map_err(|e| e.to_string())
}

/// Execute the CLI with parsed arguments
pub fn run_cli(cli: Cli) -> CliResult<()> {
    if let Commands::Version = cli.command {
        return execute_version(cli.output);
    }

    let config_path = cli.config.clone().unwrap_or_else(crate::default_config_path);
    let ctx = Context::new(config_path, cli.state.clone(), cli.output)?;
    init_tracing(&cli, &ctx.config.logging)?;

    match cli.command {
        Commands::Init(args) => init::execute(args, &ctx),
        Commands::Advance(args) => eligibility::execute_advance(args, &ctx),
        Commands::Deposit(args) => staking::execute_deposit(args, &ctx),
        Commands::Delegate(args) => staking::execute_delegate(args, &ctx),
        Commands::UpdateStatus(args) => eligibility::execute_update_status(args, &ctx),
        Commands::Exit(args) => staking::execute_exit(args, &ctx),
        Commands::Withdraw(args) => staking::execute_withdraw(args, &ctx),
        Commands::Slash(args) => slash::execute(args, &ctx),
        Commands::Query(cmd) => query::execute(cmd, &ctx),
        Commands::Version => execute_version(cli.output),
    }
}

/// Install the global subscriber. Later calls are ignored.
fn init_tracing(cli: &Cli, logging: &LoggingConfig) -> CliResult<()> {
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error".to_string(),
        (_, 0) => logging.level.to_lowercase(),
        (_, 1) => "info,preconf_registry=debug,preconf_cli=debug".to_string(),
        (_, _) => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let format = match cli.log_format {
        Some(format) => format,
        None => logging.log_format()?,
    };

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_target(cli.verbose >= 2).with_writer(std::io::stderr))
            .with(env_filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .with(env_filter)
            .try_init(),
    };

    if let Err(e) = result {
        debug!(error = %e, "tracing subscriber already installed");
    }

    Ok(())
}

// ============================================================================
// Command Context
// ============================================================================

/// Configuration and state location shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded (or default) configuration
    pub config: Config,
    /// Where the configuration lives
    pub config_path: PathBuf,
    /// Snapshot store
    pub store: StateStore,
    /// Output format for results
    pub output: OutputFormat,
}

impl Context {
    /// Load the configuration at `config_path`, falling back to defaults if the
    /// file does not exist.
    pub fn new(
        config_path: PathBuf,
        state_path: Option<PathBuf>,
        output: OutputFormat,
    ) -> CliResult<Self> {
        let config = if config_path.exists() {
            Config::load(&config_path)?
        } else {
            debug!(path = %config_path.display(), "config file not found, using defaults");
            Config::default()
        };

        let state_path = state_path.unwrap_or_else(|| PathBuf::from(&config.storage.state_file));

        Ok(Self {
            config,
            config_path,
            store: StateStore::new(state_path),
            output,
        })
    }

    /// Registry parameters derived from the configuration.
    pub fn params(&self) -> CliResult<RegistryParams> {
        Ok(RegistryParams::from_config(&self.config)?)
    }

    /// Load the persisted registry and custody.
    pub fn open(&self) -> CliResult<Session> {
        let snapshot = self.store.load()?;
        Ok(Session {
            registry: PreconfRegistry::from_state(self.params()?, snapshot.registry),
            custody: snapshot.custody,
        })
    }

    /// Persist the session and return the events it produced.
    pub fn commit(&self, mut session: Session) -> CliResult<Vec<RegistryEvent>> {
        let events = session.registry.take_events();
        for event in &events {
            debug!(event = %serde_json::to_string(event)?, "registry event");
        }

        self.store.save(&Snapshot {
            version: SNAPSHOT_VERSION,
            registry: session.registry.into_state(),
            custody: session.custody,
        })?;

        Ok(events)
    }
}

/// A registry opened for one command.
#[derive(Debug)]
pub struct Session {
    /// The registry state machine
    pub registry: PreconfRegistry,
    /// Value held on behalf of registrants
    pub custody: InMemoryCustody,
}

// ============================================================================
// Version
// ============================================================================

/// Execute the version command
fn execute_version(output_format: OutputFormat) -> CliResult<()> {
    let version_info = VersionInfo::new();

    match output_format {
        OutputFormat::Json => print_json(&version_info)?,
        OutputFormat::Text => {
            println!("Preconf Registry CLI");
            println!("  Version:     {}", version_info.version);
            println!("  Snapshot:    v{}", version_info.snapshot_version);
            println!("  Rust:        {}", version_info.rust_version);
            println!("  Target:      {}", version_info.target);
        }
    }

    Ok(())
}

/// Version information structure
#[derive(Debug, serde::Serialize)]
struct VersionInfo {
    version: String,
    snapshot_version: u32,
    rust_version: String,
    target: String,
}

impl VersionInfo {
    fn new() -> Self {
        Self {
            version: crate::VERSION.to_string(),
            snapshot_version: SNAPSHOT_VERSION,
            rust_version: option_env!("RUSTC_VERSION")
                .unwrap_or(env!("CARGO_PKG_RUST_VERSION"))
                .to_string(),
            target: std::env::consts::ARCH.to_string() + "-" + std::env::consts::OS,
        }
    }
}
