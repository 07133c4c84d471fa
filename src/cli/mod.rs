//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod reverse;
pub mod search;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::geo::GeocodingResult;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Forward and reverse geocoding against the Addok address API
#[derive(Parser)]
#[command(name = "addok-geocoder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Geocode an address
    Search(search::SearchArgs),

    /// Autocomplete a partial address
    Suggest(search::SearchArgs),

    /// Find the address at a location
    Reverse(reverse::ReverseArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// List available output formats
    Formats,
}

/// Flags shared by every request command
#[derive(Args)]
pub struct RequestArgs {
    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Extra query parameter sent to the service (repeatable)
    #[arg(long = "param", short = 'P', value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Addok service URL
    #[arg(long)]
    pub service_url: Option<String>,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

impl RequestArgs {
    /// Apply the per-call overrides that are not query parameters
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.service_url {
            config.geocoder.service_url = url.clone();
        }
        if let Some(provider) = &self.provider {
            config.url.default = provider.clone();
        }
    }

    /// Format the results and write them to stdout or the output file
    fn emit(&self, results: &[GeocodingResult], config: &Config) -> Result<()> {
        let format = self.format.as_deref().unwrap_or(&config.output.format);
        let formatter = get_formatter(format)
            .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
        let output = formatter.format(results, config)?;

        if let Some(path) = &self.output {
            std::fs::write(path, &output)?;
            eprintln!("Output written to {}", path);
        } else {
            println!("{}", output);
        }
        Ok(())
    }
}

/// Parse a `KEY=VALUE` pair
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Log to stderr, filtered by RUST_LOG (default: warn)
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Search(args) => search::run(args, search::Mode::Geocode).await,
        Commands::Suggest(args) => search::run(args, search::Mode::Suggest).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Formats => {
            list_formats();
            Ok(())
        }
    }
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
