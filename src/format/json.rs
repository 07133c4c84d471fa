//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::GeocodingResult;

/// JSON formatter - outputs the result list as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Result records as JSON"
    }

    fn format(&self, results: &[GeocodingResult], _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(results)?)
    }
}
