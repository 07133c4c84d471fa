//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::geo::GeocodingResult;

/// URL formatter - outputs a map URL for the best result
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL with optional provider override
    pub fn format_with_provider(
        &self,
        results: &[GeocodingResult],
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        let best = results
            .first()
            .ok_or_else(|| Error::Geocoding("No result to link to".to_string()))?;
        config.format_url(provider, best.center.lat, best.center.lng)
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the best result"
    }

    fn format(&self, results: &[GeocodingResult], config: &Config) -> Result<String> {
        self.format_with_provider(results, config, None)
    }
}
