//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::geo::GeocodingResult;

/// Text formatter - outputs a numbered summary per result
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, results: &[GeocodingResult], _config: &Config) -> Result<String> {
        if results.is_empty() {
            return Ok("No results".to_string());
        }

        let mut output = String::new();
        for (i, result) in results.iter().enumerate() {
            output.push_str(&format!("{}. {}", i + 1, result.name));
            if let Some(kind) = result.kind() {
                output.push_str(&format!(" ({})", kind));
            }
            output.push('\n');

            output.push_str(&format!(
                "   Center: ({:.6}, {:.6})\n",
                result.center.lat, result.center.lng
            ));
            if !result.bbox.is_point() {
                output.push_str(&format!(
                    "   Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})\n",
                    result.bbox.south_west.lat,
                    result.bbox.south_west.lng,
                    result.bbox.north_east.lat,
                    result.bbox.north_east.lng
                ));
            }
        }

        Ok(output.trim_end().to_string())
    }
}
