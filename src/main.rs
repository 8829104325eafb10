//! Command-line editor for pressure vessel and gas installation inspection
//! reports.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
