//! CLI commands implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use listings_core::{AppConfig, ListingRecord, Platform};
use listings_engine::{ExtractContext, LocationResolver, extract_listing, geocoder_for};

#[derive(Parser)]
#[command(name = "listings")]
#[command(about = "Extract normalized New England property listings from saved pages")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract one listing from an already-fetched HTML file
    Extract {
        /// Listing URL the page was fetched from
        #[arg(long)]
        url: String,
        /// Path to the saved HTML
        #[arg(long)]
        html: PathBuf,
        /// Date for relative phrases and the listing date fallback (default: today)
        #[arg(long, env = "LISTINGS_TODAY")]
        today: Option<NaiveDate>,
    },

    /// Print the JSON schema of the listing record
    Schema,

    /// List supported platforms and their domains
    Platforms,
}

/// Run a command, returning what goes to stdout.
pub fn run(command: Commands, config: &AppConfig) -> Result<String> {
    match command {
        Commands::Extract { url, html, today } => {
            let page = std::fs::read_to_string(&html).with_context(|| format!("reading {}", html.display()))?;
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            extract_json(config, &url, &page, today)
        }
        Commands::Schema => Ok(serde_json::to_string_pretty(&schemars::schema_for!(ListingRecord))?),
        Commands::Platforms => Ok(platforms()),
    }
}

/// Extract `html` and render the record as pretty JSON.
pub fn extract_json(config: &AppConfig, url: &str, html: &str, today: NaiveDate) -> Result<String> {
    let gazetteer = config.gazetteer()?;
    let reference = gazetteer.require_reference_point(&config.reference_point)?;
    let geocoder = geocoder_for(config, &gazetteer)?;
    let ctx = ExtractContext::new(LocationResolver::new(&gazetteer, geocoder.as_ref(), reference), today);

    let extraction = extract_listing(&ctx, url, html)?;
    Ok(serde_json::to_string_pretty(&extraction.record)?)
}

fn platforms() -> String {
    Platform::ALL.iter().map(|p| format!("{}\t{}", p.name(), p.domain())).collect::<Vec<_>>().join("\n")
}
