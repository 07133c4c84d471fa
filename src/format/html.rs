//! Rendered label output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::GeocodingResult;

/// HTML formatter - outputs each result's rendered label, one per line
///
/// Results without a label fall back to their name.
pub struct HtmlFormatter;

impl OutputFormatter for HtmlFormatter {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Rendered result labels"
    }

    fn format(&self, results: &[GeocodingResult], _config: &Config) -> Result<String> {
        Ok(results
            .iter()
            .map(|r| r.html.as_deref().unwrap_or(&r.name))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
