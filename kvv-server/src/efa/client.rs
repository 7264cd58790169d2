//! EFA HTTP client.
//!
//! Issues the two fixed requests this service needs: the stop finder and
//! the departure monitor. Each call is a single attempt; failures surface
//! to the caller unchanged.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::domain::{DepartureOptions, DepartureRecord, StopRecord};

use super::departures::normalize_departures;
use super::error::EfaError;
use super::stops::normalize_stops;

/// Default base URL for the KVV EFA endpoints.
pub const DEFAULT_BASE_URL: &str = "https://projekte.kvv-efa.de/sl3-alone";

const STOP_FINDER_ENDPOINT: &str = "XSLT_STOPFINDER_REQUEST";
const DEPARTURE_MONITOR_ENDPOINT: &str = "XSLT_DM_REQUEST";

/// Default number of departures requested per stop.
const DEFAULT_DEPARTURE_LIMIT: u16 = 40;

/// Default stop finder hit list size.
const DEFAULT_SEARCH_LIMIT: u16 = 100;

/// Configuration for the EFA client.
#[derive(Debug, Clone)]
pub struct EfaConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// `limit` for the departure monitor
    pub departure_limit: u16,
    /// `anyMaxSizeHitList` for the stop finder
    pub search_limit: u16,
}

impl Default for EfaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            departure_limit: DEFAULT_DEPARTURE_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl EfaConfig {
    /// Set a custom base URL (for testing against a local upstream).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the number of departures requested per stop.
    pub fn with_departure_limit(mut self, limit: u16) -> Self {
        self.departure_limit = limit;
        self
    }
}

/// Append the EFA wildcard so the stop finder does prefix matching.
pub fn wildcard_query(query: &str) -> String {
    if query.ends_with('*') {
        query.to_string()
    } else {
        format!("{query}*")
    }
}

/// KVV EFA client.
#[derive(Debug, Clone)]
pub struct EfaClient {
    http: reqwest::Client,
    base_url: String,
    departure_limit: u16,
    search_limit: u16,
}

impl EfaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: EfaConfig) -> Result<Self, EfaError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            departure_limit: config.departure_limit,
            search_limit: config.search_limit,
        })
    }

    /// Raw stop finder response for a free-text query.
    ///
    /// `city`, when given, is passed upstream as the `anyResSort_sf` sort
    /// hint rather than being used to re-sort locally.
    pub async fn stop_finder(&self, query: &str, city: Option<&str>) -> Result<Value, EfaError> {
        let mut params = vec![
            ("outputFormat", "JSON".to_string()),
            ("coordOutputFormat", "WGS84[dd.ddddd]".to_string()),
            ("locationServerActive", "1".to_string()),
            ("type_sf", "any".to_string()),
            ("name_sf", wildcard_query(query)),
            ("anyObjFilter_sf", "2".to_string()),
            ("anyMaxSizeHitList", self.search_limit.to_string()),
        ];
        if let Some(city) = city.filter(|c| !c.trim().is_empty()) {
            params.push(("anyResSort_sf", city.to_string()));
        }

        self.get_json(STOP_FINDER_ENDPOINT, &params).await
    }

    /// Raw departure monitor response for a stop.
    pub async fn departure_monitor(&self, stop_id: &str) -> Result<Value, EfaError> {
        let params = [
            ("outputFormat", "JSON".to_string()),
            ("depType", "stopEvents".to_string()),
            ("mode", "direct".to_string()),
            ("type_dm", "stop".to_string()),
            ("name_dm", stop_id.to_string()),
            ("useRealtime", "1".to_string()),
            ("limit", self.departure_limit.to_string()),
        ];

        self.get_json(DEPARTURE_MONITOR_ENDPOINT, &params).await
    }

    /// Search stops and return them ranked.
    ///
    /// An empty query returns no stops without contacting upstream.
    pub async fn search_stops(
        &self,
        query: &str,
        city: Option<&str>,
    ) -> Result<Vec<StopRecord>, EfaError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let payload = self.stop_finder(query, city).await?;
        let stops = normalize_stops(&payload);
        debug!(query, found = stops.len(), "stop finder");
        Ok(stops)
    }

    /// Fetch and normalize departures for a stop.
    pub async fn departures(
        &self,
        stop_id: &str,
        options: DepartureOptions,
    ) -> Result<Vec<DepartureRecord>, EfaError> {
        let payload = self.departure_monitor(stop_id).await?;
        let departures = normalize_departures(&payload, options);
        debug!(stop_id, found = departures.len(), "departure monitor");
        Ok(departures)
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, EfaError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(EfaError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| EfaError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
