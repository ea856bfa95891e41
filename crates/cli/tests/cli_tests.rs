//! Tests for commands/mod.rs CLI parsing

use clap::{CommandFactory, Parser};
use preconf_cli::commands::{query::QueryCommands, Cli, Commands};
use preconf_cli::OutputFormat;
use preconf_config::LogFormat;
use std::path::PathBuf;

const A: &str = "0x0000000000000000000000000000000000000001";
const P1: &str = "0x00000000000000000000000000000000000000aa";
const P2: &str = "0x00000000000000000000000000000000000000bb";

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_init() {
    let cli = Cli::parse_from(["preconf", "init", "--force"]);
    assert!(matches!(cli.command, Commands::Init(args) if args.force));
}

#[test]
fn test_parse_advance() {
    let cli = Cli::parse_from(["preconf", "advance", "1200"]);
    assert!(matches!(cli.command, Commands::Advance(args) if args.height == 1200));
}

#[test]
fn test_parse_deposit() {
    let cli = Cli::parse_from(["preconf", "deposit", "2eth", "--from", A]);
    match cli.command {
        Commands::Deposit(args) => {
            assert_eq!(args.amount, "2eth");
            assert_eq!(args.from, A);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_delegate_keeps_order() {
    let cli = Cli::parse_from(["preconf", "delegate", "--from", A, P2, P1]);
    match cli.command {
        Commands::Delegate(args) => assert_eq!(args.proposers, vec![P2, P1]),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_delegate_requires_proposer() {
    assert!(Cli::try_parse_from(["preconf", "delegate", "--from", A]).is_err());
}

#[test]
fn test_parse_update_status() {
    let cli = Cli::parse_from(["preconf", "update-status", P1, P2]);
    assert!(matches!(cli.command, Commands::UpdateStatus(args) if args.proposers.len() == 2));
    assert!(Cli::try_parse_from(["preconf", "update-status"]).is_err());
}

#[test]
fn test_parse_exit_and_withdraw() {
    let cli = Cli::parse_from(["preconf", "exit", "1k", "--from", A]);
    assert!(matches!(cli.command, Commands::Exit(args) if args.amount == "1k"));

    let cli = Cli::parse_from(["preconf", "withdraw", "--from", A, "--to", P1, "--yes"]);
    assert!(matches!(cli.command, Commands::Withdraw(args) if args.yes && args.to == P1));
}

#[test]
fn test_parse_slash() {
    let cli = Cli::parse_from(["preconf", "slash", "--evidence", "ev.json"]);
    match cli.command {
        Commands::Slash(args) => {
            assert_eq!(args.evidence, PathBuf::from("ev.json"));
            assert!(!args.yes);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_query() {
    let cli = Cli::parse_from(["preconf", "query", "status", P1]);
    assert!(matches!(cli.command, Commands::Query(QueryCommands::Status { .. })));

    let cli = Cli::parse_from(["preconf", "query", "collateral", P1]);
    assert!(matches!(cli.command, Commands::Query(QueryCommands::Collateral { .. })));

    let cli = Cli::parse_from(["preconf", "query", "summary"]);
    assert!(matches!(cli.command, Commands::Query(QueryCommands::Summary)));
}

#[test]
fn test_global_flags() {
    let cli = Cli::parse_from([
        "preconf",
        "query",
        "summary",
        "--config",
        "/tmp/preconf.toml",
        "--state",
        "/tmp/state.json",
        "--output",
        "json",
        "-vv",
        "--log-format",
        "json",
    ]);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/preconf.toml")));
    assert_eq!(cli.state, Some(PathBuf::from("/tmp/state.json")));
    assert_eq!(cli.output, OutputFormat::Json);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.log_format, Some(LogFormat::Json));
}

#[test]
fn test_invalid_log_format() {
    assert!(Cli::try_parse_from(["preconf", "version", "--log-format", "xml"]).is_err());
}

#[test]
fn test_parse_version() {
    let cli = Cli::parse_from(["preconf", "version"]);
    assert!(matches!(cli.command, Commands::Version));
    assert!(!cli.quiet);
    assert_eq!(cli.output, OutputFormat::Text);
}
