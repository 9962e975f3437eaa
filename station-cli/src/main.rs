//! Binary crate for the `weather-station` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and setting up logging
//! - Terminal prompting
//! - Printing the banner and the final report

use clap::Parser;

mod cli;
mod terminal;

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.init_logging();
    cmd.run()
}
