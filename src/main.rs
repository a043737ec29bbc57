//! relsync CLI entry point.

use clap::Parser;
use colored::Colorize;
use relsync::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(error) = cli.execute().await {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
