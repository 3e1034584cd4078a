use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use gitstore::cli::{run_cli, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = run_cli(cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
    Ok(())
}
