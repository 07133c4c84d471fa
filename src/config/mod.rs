//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/addok-geocoder/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::geo::addok::AddokOptions;
use crate::label::{LabelRenderer, DEFAULT_HTML_TEMPLATE};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoder settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of the Addok service
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Maximum number of forward results
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Label template; empty disables labels
    #[serde(default = "default_label_template")]
    pub label_template: String,

    /// Extra query parameters for forward requests
    #[serde(default)]
    pub geocoding_params: BTreeMap<String, String>,

    /// Extra query parameters for reverse requests
    #[serde(default)]
    pub reverse_params: BTreeMap<String, String>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}
fn default_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_label_template() -> String {
    DEFAULT_HTML_TEMPLATE.to_string()
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},17z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "geoportail".to_string(),
        "https://www.geoportail.gouv.fr/carte?c={lng},{lat}&z=18".to_string(),
    );
    providers
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            limit: default_limit(),
            label_template: default_label_template(),
            geocoding_params: BTreeMap::new(),
            reverse_params: BTreeMap::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key", or "geocoder.geocoding_params.<name>"
    /// for extra query parameters
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "service_url"] => Some(self.geocoder.service_url.clone()),
            ["geocoder", "limit"] => Some(self.geocoder.limit.to_string()),
            ["geocoder", "label_template"] => Some(self.geocoder.label_template.clone()),
            ["geocoder", "geocoding_params", name] => {
                self.geocoder.geocoding_params.get(*name).cloned()
            }
            ["geocoder", "reverse_params", name] => {
                self.geocoder.reverse_params.get(*name).cloned()
            }

            ["output", "format"] => Some(self.output.format.clone()),

            ["url", "default"] => Some(self.url.default.clone()),
            ["url", "providers", name] => self.url.providers.get(*name).cloned(),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Setting an extra query parameter to "" removes it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "service_url"] => {
                self.geocoder.service_url = value.to_string();
            }
            ["geocoder", "limit"] => {
                let limit: usize = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid limit value: {}", value))
                })?;
                if limit == 0 {
                    return Err(Error::Config("Limit must be at least 1".to_string()));
                }
                self.geocoder.limit = limit;
            }
            ["geocoder", "label_template"] => {
                self.geocoder.label_template = value.to_string();
            }
            ["geocoder", "geocoding_params", name] if !name.is_empty() => {
                set_param(&mut self.geocoder.geocoding_params, name, value);
            }
            ["geocoder", "reverse_params", name] if !name.is_empty() => {
                set_param(&mut self.geocoder.reverse_params, name, value);
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }
            ["url", "providers", name] if !name.is_empty() => {
                self.url.providers.insert(name.to_string(), value.to_string());
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoder.service_url",
            "geocoder.limit",
            "geocoder.label_template",
            "geocoder.geocoding_params.<name>",
            "geocoder.reverse_params.<name>",
            "output.format",
            "url.default",
            "url.providers.<name>",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Build geocoder options from the `[geocoder]` section
    ///
    /// Options are validated when the geocoder is built.
    pub fn addok_options(&self) -> AddokOptions {
        let label_renderer = if self.geocoder.label_template.is_empty() {
            None
        } else {
            Some(LabelRenderer::from_template(
                self.geocoder.label_template.clone(),
            ))
        };

        AddokOptions {
            service_url: self.geocoder.service_url.clone(),
            limit: self.geocoder.limit,
            label_renderer,
            geocoding_query_params: self.geocoder.geocoding_params.clone(),
            reverse_query_params: self.geocoder.reverse_params.clone(),
        }
    }
}

fn set_param(params: &mut BTreeMap<String, String>, name: &str, value: &str) {
    if value.is_empty() {
        params.remove(name);
    } else {
        params.insert(name.to_string(), value.to_string());
    }
}
