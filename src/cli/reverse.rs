//! Reverse command handler
//!
//! Looks up the address nearest to a location.

use crate::cli::RequestArgs;
use crate::config::Config;
use crate::error::Result;
use crate::geo::{get_geocoder, Geocoder, LatLng};
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    #[command(flatten)]
    pub request: RequestArgs,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    let location = LatLng::new(args.lat, args.lng);
    location.validate()?;

    let mut config = Config::load()?;
    args.request.apply(&mut config);
    config
        .geocoder
        .reverse_params
        .extend(args.request.params.iter().cloned());

    let geocoder = get_geocoder(&config)?;
    // Addok does not take a map scale
    let results = geocoder.reverse(location, 0.0).await?;

    args.request.emit(&results, &config)
}
