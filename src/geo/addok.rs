//! Addok geocoding backend
//!
//! Addok is the geocoder behind the French national address API
//! (api-adresse.data.gouv.fr). Both endpoints answer with a GeoJSON
//! FeatureCollection:
//!
//! ```text
//! GET {service_url}/search/?q=<text>&limit=<n>
//! GET {service_url}/reverse/?lat=<lat>&lon=<lon>
//! ```

use crate::constants::api::{ADDOK_URL, REVERSE_PATH, SEARCH_PATH};
use crate::constants::labels::type_label;
use crate::error::{Error, Result};
use crate::geo::transport::{HttpFetcher, JsonFetcher, QueryParams};
use crate::geo::{Geocoder, GeocodingResult, LatLng, LatLngBounds, Properties};
use crate::label::LabelRenderer;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Default maximum number of results for forward queries
pub const DEFAULT_LIMIT: usize = 5;

/// Options for an [`AddokGeocoder`]
///
/// Fixed once the geocoder is built; build a new geocoder to change them.
#[derive(Debug, Clone)]
pub struct AddokOptions {
    /// Base URL of the Addok instance, without the endpoint path
    pub service_url: String,
    /// Maximum number of results for forward queries
    pub limit: usize,
    /// Label renderer; `None` leaves [`GeocodingResult::html`] empty
    pub label_renderer: Option<LabelRenderer>,
    /// Extra query parameters for `/search/` (e.g., `postcode`, `type`)
    pub geocoding_query_params: BTreeMap<String, String>,
    /// Extra query parameters for `/reverse/`
    pub reverse_query_params: BTreeMap<String, String>,
}

impl Default for AddokOptions {
    fn default() -> Self {
        Self {
            service_url: ADDOK_URL.to_string(),
            limit: DEFAULT_LIMIT,
            label_renderer: Some(LabelRenderer::default_html()),
            geocoding_query_params: BTreeMap::new(),
            reverse_query_params: BTreeMap::new(),
        }
    }
}

impl AddokOptions {
    /// Check the options, normalizing the service URL
    fn validate(mut self) -> Result<Self> {
        let url = reqwest::Url::parse(&self.service_url).map_err(|e| {
            Error::InvalidOptions(format!("Invalid service URL '{}': {}", self.service_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidOptions(format!(
                "Service URL must be http or https: {}",
                self.service_url
            )));
        }
        if self.limit == 0 {
            return Err(Error::InvalidOptions(
                "Result limit must be at least 1".to_string(),
            ));
        }

        self.service_url = self.service_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Addok FeatureCollection, as far as the mapping needs it
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

/// Addok geocoder
#[derive(Debug, Clone)]
pub struct AddokGeocoder<F = HttpFetcher> {
    options: AddokOptions,
    fetcher: F,
}

impl AddokGeocoder<HttpFetcher> {
    /// Create a geocoder talking HTTP to `options.service_url`
    pub fn new(options: AddokOptions) -> Result<Self> {
        Self::with_fetcher(options, HttpFetcher::new()?)
    }
}

impl<F: JsonFetcher> AddokGeocoder<F> {
    /// Create a geocoder with a custom transport
    pub fn with_fetcher(options: AddokOptions, fetcher: F) -> Result<Self> {
        Ok(Self {
            options: options.validate()?,
            fetcher,
        })
    }

    pub fn options(&self) -> &AddokOptions {
        &self.options
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.options.service_url, path)
    }

    /// Query parameters for a forward request
    fn search_params(&self, query: &str) -> QueryParams {
        let base = [
            ("q".to_string(), query.to_string()),
            ("limit".to_string(), self.options.limit.to_string()),
        ];
        merge_params(base, &self.options.geocoding_query_params)
    }

    /// Query parameters for a reverse request
    fn reverse_params(&self, location: LatLng) -> QueryParams {
        let base = [
            ("lat".to_string(), location.lat.to_string()),
            ("lon".to_string(), location.lng.to_string()),
        ];
        merge_params(base, &self.options.reverse_query_params)
    }

    async fn fetch(&self, path: &str, params: QueryParams) -> Result<Vec<GeocodingResult>> {
        let url = self.endpoint(path);
        let data = self.fetcher.get_json(&url, &params).await?;
        let results = self.parse_results(data);
        debug!(url, count = results.len(), "Addok results");
        Ok(results)
    }

    /// Map a response body to result records
    ///
    /// A body without a usable feature list yields no results.
    fn parse_results(&self, data: Value) -> Vec<GeocodingResult> {
        match data.get("features") {
            None | Some(Value::Null) => {
                debug!("Addok response has no feature collection");
                return Vec::new();
            }
            Some(_) => {}
        }

        let collection: FeatureCollection = match serde_json::from_value(data) {
            Ok(collection) => collection,
            Err(e) => {
                warn!("Ignoring malformed Addok response: {}", e);
                return Vec::new();
            }
        };

        let mut results = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            match self.to_result(feature) {
                Some(result) => results.push(result),
                None => {
                    warn!("Ignoring Addok response with a feature lacking coordinates");
                    return Vec::new();
                }
            }
        }
        results
    }

    /// Map one feature; `None` when it has no usable point
    fn to_result(&self, feature: Feature) -> Option<GeocodingResult> {
        let (lng, lat) = match feature.geometry.coordinates.as_slice() {
            [lng, lat, ..] => (*lng, *lat),
            _ => return None,
        };
        let center = LatLng::new(lat, lng);
        let mut properties = feature.properties;

        let bbox = extent_bounds(&properties).unwrap_or_else(|| LatLngBounds::from_point(center));

        let localized = properties
            .get("type")
            .and_then(|v| v.as_str())
            .and_then(type_label);
        if let Some(label) = localized {
            properties.insert("type".to_string(), Value::from(label));
        }

        let name = ["name", "label"]
            .iter()
            .find_map(|key| properties.get(*key).and_then(|v| v.as_str()))
            .unwrap_or_default()
            .to_string();

        let html = self
            .options
            .label_renderer
            .as_ref()
            .map(|renderer| renderer.render(&properties));

        Some(GeocodingResult {
            name,
            center,
            bbox,
            html,
            properties,
        })
    }
}

impl<F: JsonFetcher> Geocoder for AddokGeocoder<F> {
    fn name(&self) -> &'static str {
        "addok"
    }

    async fn geocode(&self, query: &str) -> Result<Vec<GeocodingResult>> {
        self.fetch(SEARCH_PATH, self.search_params(query)).await
    }

    async fn reverse(&self, location: LatLng, _scale: f64) -> Result<Vec<GeocodingResult>> {
        self.fetch(REVERSE_PATH, self.reverse_params(location)).await
    }
}

/// Bounding box from an `[minLon, minLat, maxLon, maxLat]` extent attribute
fn extent_bounds(properties: &Properties) -> Option<LatLngBounds> {
    let extent: Vec<f64> = properties
        .get("extent")
        .and_then(|v| v.as_array())?
        .iter()
        .map(|v| v.as_f64())
        .collect::<Option<_>>()?;

    match extent.as_slice() {
        [min_lng, min_lat, max_lng, max_lat] => Some(LatLngBounds::new(
            LatLng::new(*min_lat, *min_lng),
            LatLng::new(*max_lat, *max_lng),
        )),
        _ => None,
    }
}

/// Base parameters followed by extras; an extra replaces a base param of the same name
fn merge_params<const N: usize>(
    base: [(String, String); N],
    extra: &BTreeMap<String, String>,
) -> QueryParams {
    let mut params: QueryParams = base
        .into_iter()
        .filter(|(key, _)| !extra.contains_key(key))
        .collect();
    params.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns a canned body and records every request
    #[derive(Default)]
    struct MockFetcher {
        body: Value,
        requests: Mutex<Vec<(String, QueryParams)>>,
    }

    impl MockFetcher {
        fn returning(body: Value) -> Self {
            Self {
                body,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> (String, QueryParams) {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }

        fn param(&self, key: &str) -> Option<String> {
            let (_, params) = self.last_request();
            params.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
        }
    }

    impl JsonFetcher for MockFetcher {
        async fn get_json(&self, url: &str, params: &[(String, String)]) -> Result<Value> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), params.to_vec()));
            Ok(self.body.clone())
        }
    }

    /// Always fails, like a transport that could not connect
    struct FailingFetcher;

    impl JsonFetcher for FailingFetcher {
        async fn get_json(&self, url: &str, _params: &[(String, String)]) -> Result<Value> {
            Err(Error::Geocoding(format!("Request to {} failed", url)))
        }
    }

    fn geocoder(body: Value) -> AddokGeocoder<MockFetcher> {
        AddokGeocoder::with_fetcher(AddokOptions::default(), MockFetcher::returning(body)).unwrap()
    }

    fn paix_feature() -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [2.33, 48.87]},
            "properties": {
                "label": "10 Rue de la Paix 75002 Paris",
                "name": "10 Rue de la Paix",
                "type": "housenumber",
                "context": "75, Paris, Île-de-France",
                "score": 0.97
            }
        })
    }

    fn collection(features: Vec<Value>) -> Value {
        json!({"type": "FeatureCollection", "features": features})
    }

    #[tokio::test]
    async fn test_geocode_house_number() {
        let options = AddokOptions {
            limit: 1,
            ..AddokOptions::default()
        };
        let geocoder = AddokGeocoder::with_fetcher(
            options,
            MockFetcher::returning(collection(vec![paix_feature()])),
        )
        .unwrap();

        let results = geocoder.geocode("10 rue de la Paix").await.unwrap();

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.name, "10 Rue de la Paix");
        assert_relative_eq!(result.center.lat, 48.87);
        assert_relative_eq!(result.center.lng, 2.33);
        assert_eq!(result.kind(), Some("Numéro"));

        let (url, _) = geocoder.fetcher.last_request();
        assert_eq!(url, "https://api-adresse.data.gouv.fr/search/");
        assert_eq!(geocoder.fetcher.param("q").as_deref(), Some("10 rue de la Paix"));
        assert_eq!(geocoder.fetcher.param("limit").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_center_swaps_coordinate_order() {
        let feature = json!({
            "geometry": {"coordinates": [-1.5, 47.2]},
            "properties": {"name": "Nantes"}
        });
        let results = geocoder(collection(vec![feature])).geocode("Nantes").await.unwrap();
        assert_eq!(results[0].center, LatLng::new(47.2, -1.5));
    }

    #[tokio::test]
    async fn test_missing_extent_collapses_bbox() {
        let results = geocoder(collection(vec![paix_feature()])).geocode("paix").await.unwrap();
        let result = &results[0];
        assert!(result.bbox.is_point());
        assert_eq!(result.bbox.south_west, result.center);
        assert_eq!(result.bbox.north_east, result.center);
    }

    #[tokio::test]
    async fn test_extent_becomes_bbox() {
        let feature = json!({
            "geometry": {"coordinates": [2.35, 48.85]},
            "properties": {
                "name": "Paris",
                "type": "municipality",
                "extent": [2.22, 48.81, 2.47, 48.90]
            }
        });
        let results = geocoder(collection(vec![feature])).geocode("Paris").await.unwrap();
        let bbox = results[0].bbox;
        assert_eq!(bbox.south_west, LatLng::new(48.81, 2.22));
        assert_eq!(bbox.north_east, LatLng::new(48.90, 2.47));
        assert_eq!(results[0].kind(), Some("Commune"));
    }

    #[tokio::test]
    async fn test_bad_extent_is_ignored() {
        let feature = json!({
            "geometry": {"coordinates": [2.35, 48.85]},
            "properties": {"name": "Paris", "extent": [2.22, 48.81]}
        });
        let results = geocoder(collection(vec![feature])).geocode("Paris").await.unwrap();
        assert!(results[0].bbox.is_point());
    }

    #[tokio::test]
    async fn test_type_labels() {
        let features = ["housenumber", "street", "locality", "municipality", "poi"]
            .iter()
            .map(|kind| {
                json!({
                    "geometry": {"coordinates": [0.0, 0.0]},
                    "properties": {"name": kind, "type": kind}
                })
            })
            .collect();
        let results = geocoder(collection(features)).geocode("x").await.unwrap();
        let kinds: Vec<_> = results.iter().map(|r| r.kind().unwrap()).collect();
        assert_eq!(kinds, ["Numéro", "Rue", "Lieu-dit", "Commune", "poi"]);
    }

    #[tokio::test]
    async fn test_results_keep_provider_order() {
        let features = ["first", "second", "third"]
            .iter()
            .map(|name| {
                json!({
                    "geometry": {"coordinates": [1.0, 2.0]},
                    "properties": {"name": name}
                })
            })
            .collect();
        let results = geocoder(collection(features)).geocode("x").await.unwrap();
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_absent_or_empty_features_yield_no_results() {
        for body in [
            json!({}),
            json!({"features": null}),
            json!({"features": []}),
            json!(null),
            json!("unexpected"),
        ] {
            let results = geocoder(body.clone()).geocode("x").await.unwrap();
            assert!(results.is_empty(), "expected no results for {}", body);
        }
    }

    #[tokio::test]
    async fn test_malformed_feature_discards_whole_response() {
        let broken = json!({"geometry": {"coordinates": [1.0]}, "properties": {}});
        let results = geocoder(collection(vec![paix_feature(), broken]))
            .geocode("x")
            .await
            .unwrap();
        assert!(results.is_empty());

        let results = geocoder(json!({"features": "nope"})).geocode("x").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_label_rendering() {
        let results = geocoder(collection(vec![paix_feature()])).geocode("x").await.unwrap();
        let html = results[0].html.as_deref().unwrap();
        assert!(html.contains("10 Rue de la Paix 75002 Paris"));
        assert!(html.contains("(Numéro)"));

        let options = AddokOptions {
            label_renderer: None,
            ..AddokOptions::default()
        };
        let geocoder = AddokGeocoder::with_fetcher(
            options,
            MockFetcher::returning(collection(vec![paix_feature()])),
        )
        .unwrap();
        let results = geocoder.geocode("x").await.unwrap();
        assert!(results[0].html.is_none());
    }

    #[tokio::test]
    async fn test_name_falls_back_to_label() {
        let feature = json!({
            "geometry": {"coordinates": [0.0, 0.0]},
            "properties": {"label": "Somewhere"}
        });
        let results = geocoder(collection(vec![feature])).geocode("x").await.unwrap();
        assert_eq!(results[0].name, "Somewhere");
    }

    #[tokio::test]
    async fn test_suggest_matches_geocode() {
        let geocoder = geocoder(collection(vec![paix_feature()]));
        let geocoded = geocoder.geocode("10 rue de la Paix").await.unwrap();
        let geocode_request = geocoder.fetcher.last_request();

        let suggested = geocoder.suggest("10 rue de la Paix").await.unwrap();
        assert_eq!(geocoded, suggested);
        assert_eq!(geocoder.fetcher.last_request(), geocode_request);
    }

    #[tokio::test]
    async fn test_reverse_request() {
        let geocoder = geocoder(collection(vec![paix_feature()]));
        let results = geocoder
            .reverse(LatLng::new(48.87, 2.33), 1000.0)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind(), Some("Numéro"));

        let (url, params) = geocoder.fetcher.last_request();
        assert_eq!(url, "https://api-adresse.data.gouv.fr/reverse/");
        assert_eq!(
            params,
            vec![
                ("lat".to_string(), "48.87".to_string()),
                ("lon".to_string(), "2.33".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_extra_params() {
        let mut options = AddokOptions::default();
        options
            .geocoding_query_params
            .insert("postcode".to_string(), "75002".to_string());
        options
            .geocoding_query_params
            .insert("limit".to_string(), "20".to_string());
        options
            .reverse_query_params
            .insert("type".to_string(), "street".to_string());
        let geocoder =
            AddokGeocoder::with_fetcher(options, MockFetcher::returning(collection(vec![]))).unwrap();

        geocoder.geocode("paix").await.unwrap();
        let (_, params) = geocoder.fetcher.last_request();
        assert_eq!(
            params,
            vec![
                ("q".to_string(), "paix".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("postcode".to_string(), "75002".to_string()),
            ]
        );

        geocoder.reverse(LatLng::new(1.0, 2.0), 0.0).await.unwrap();
        assert_eq!(geocoder.fetcher.param("type").as_deref(), Some("street"));
        assert_eq!(geocoder.fetcher.param("postcode"), None);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let geocoder =
            AddokGeocoder::with_fetcher(AddokOptions::default(), FailingFetcher).unwrap();
        assert!(matches!(
            geocoder.geocode("x").await,
            Err(Error::Geocoding(_))
        ));
        assert!(geocoder.reverse(LatLng::new(0.0, 0.0), 0.0).await.is_err());
    }

    #[test]
    fn test_service_url_trailing_slash() {
        let options = AddokOptions {
            service_url: "http://localhost:7878/".to_string(),
            ..AddokOptions::default()
        };
        let geocoder = AddokGeocoder::with_fetcher(options, MockFetcher::default()).unwrap();
        assert_eq!(geocoder.endpoint(SEARCH_PATH), "http://localhost:7878/search/");
    }

    #[test]
    fn test_invalid_options() {
        for options in [
            AddokOptions {
                service_url: "not a url".to_string(),
                ..AddokOptions::default()
            },
            AddokOptions {
                service_url: "ftp://example.org".to_string(),
                ..AddokOptions::default()
            },
            AddokOptions {
                limit: 0,
                ..AddokOptions::default()
            },
        ] {
            let result = AddokGeocoder::with_fetcher(options, MockFetcher::default());
            assert!(matches!(result, Err(Error::InvalidOptions(_))));
        }
    }

    #[test]
    fn test_default_options() {
        let options = AddokOptions::default();
        assert_eq!(options.service_url, ADDOK_URL);
        assert_eq!(options.limit, 5);
        assert!(options.label_renderer.is_some());
        assert!(options.geocoding_query_params.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_calls() {
        let geocoder = geocoder(collection(vec![paix_feature()]));
        let (a, b) = tokio::join!(
            geocoder.geocode("a"),
            geocoder.reverse(LatLng::new(1.0, 2.0), 0.0)
        );
        assert_eq!(a.unwrap().len(), 1);
        assert_eq!(b.unwrap().len(), 1);
        assert_eq!(geocoder.fetcher.requests.lock().unwrap().len(), 2);
    }
}
