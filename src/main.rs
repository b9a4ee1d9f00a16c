#![forbid(unsafe_code)]

//! asel — Asset Selector CLI entry point.

use asset_selector::cli_app;
use clap::Parser;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("asel: {e}");
        std::process::exit(e.exit_code());
    }
}
