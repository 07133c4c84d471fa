//! Search and suggest command handlers
//!
//! Forward geocoding of a free-text address.

use crate::cli::RequestArgs;
use crate::config::Config;
use crate::error::Result;
use crate::geo::{get_geocoder, Geocoder};
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Address to look up
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Maximum number of results
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub request: RequestArgs,
}

/// Which forward operation to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Geocode,
    Suggest,
}

/// Run the search or suggest command
pub async fn run(args: SearchArgs, mode: Mode) -> Result<()> {
    let mut config = Config::load()?;
    args.request.apply(&mut config);
    if let Some(limit) = args.limit {
        config.geocoder.limit = limit;
    }
    config
        .geocoder
        .geocoding_params
        .extend(args.request.params.iter().cloned());

    let geocoder = get_geocoder(&config)?;
    let query = args.query.join(" ");

    let results = match mode {
        Mode::Geocode => geocoder.geocode(&query).await?,
        Mode::Suggest => geocoder.suggest(&query).await?,
    };

    args.request.emit(&results, &config)
}
