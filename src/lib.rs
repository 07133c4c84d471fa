//! addok-geocoder: Addok geocoding adapter
//!
//! A library and CLI tool for forward and reverse geocoding against an
//! [Addok](https://github.com/addok/addok) instance, such as the French
//! national address API.
//!
//! ## Features
//!
//! - Forward geocoding, autocomplete and reverse geocoding
//! - Results normalized to center point, bounding box and rendered label
//! - Pluggable JSON transport (reqwest by default)
//! - CLI with JSON, text, HTML and map-URL output
//!
//! ## Quick Start
//!
//! ```no_run
//! use addok_geocoder::geo::addok::{AddokGeocoder, AddokOptions};
//! use addok_geocoder::geo::{Geocoder, LatLng};
//!
//! # async fn demo() -> addok_geocoder::Result<()> {
//! let geocoder = AddokGeocoder::new(AddokOptions::default())?;
//!
//! for result in geocoder.geocode("10 rue de la Paix Paris").await? {
//!     println!("{} at {:?}", result.name, result.center);
//! }
//!
//! let here = geocoder.reverse(LatLng::new(48.87, 2.33), 0.0).await?;
//! println!("{} candidates", here.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod label;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::addok::{AddokGeocoder, AddokOptions};
pub use geo::{Geocoder, GeocodingResult, LatLng, LatLngBounds};
pub use label::LabelRenderer;
