//! Preconf CLI - Main entry point

use clap::Parser;
use preconf_cli::{commands::run_cli, commands::Cli, utils::print_error};
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        print_error(&e.to_string());
        process::exit(1);
    }
}
