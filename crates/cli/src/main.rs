//! listings CLI entry point.
//!
//! Logging goes to stderr so stdout carries only the command output.

use anyhow::Result;
use clap::Parser;
use listings_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod commands;

fn main() -> Result<()> {
    let cli = commands::Cli::parse();
    let config = AppConfig::load()?;
    init_logging(config.log_json);

    let output = commands::run(cli.command, &config)?;
    println!("{output}");

    Ok(())
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
