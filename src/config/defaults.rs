//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default Addok service URL
pub const DEFAULT_SERVICE_URL: &str = crate::constants::api::ADDOK_URL;

/// Default maximum number of forward results
pub const DEFAULT_LIMIT: usize = crate::geo::addok::DEFAULT_LIMIT;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "addok-geocoder";
