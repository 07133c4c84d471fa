//! Centralized constants for the addok-geocoder crate

/// External API endpoints
pub mod api {
    /// Public Addok instance serving the French national address base
    pub const ADDOK_URL: &str = "https://api-adresse.data.gouv.fr";

    /// Forward geocoding path, appended to the service URL
    pub const SEARCH_PATH: &str = "/search/";

    /// Reverse geocoding path, appended to the service URL
    pub const REVERSE_PATH: &str = "/reverse/";

    /// User-Agent sent with every request
    pub const USER_AGENT: &str = concat!("addok-geocoder/", env!("CARGO_PKG_VERSION"));

    /// HTTP request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Addok feature classification labels
pub mod labels {
    /// Display labels for the `type` attribute of an Addok feature
    ///
    /// Types outside this table are displayed as-is.
    pub const TYPE_LABELS: &[(&str, &str)] = &[
        ("housenumber", "Numéro"),
        ("street", "Rue"),
        ("locality", "Lieu-dit"),
        ("municipality", "Commune"),
    ];

    /// Look up the display label for a feature type
    pub fn type_label(kind: &str) -> Option<&'static str> {
        TYPE_LABELS
            .iter()
            .find(|(key, _)| *key == kind)
            .map(|(_, label)| *label)
    }
}
