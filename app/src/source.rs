use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::normalizer;
use crate::reference;
use crate::types::{ConditionsSnapshot, NormalizedDataset, RawDataset};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;

/// Shown to the user whenever the dashboard runs on the fallback dataset.
pub const FETCH_FAILED_MESSAGE: &str = "Gagal memuat data. Menggunakan data demo.";

/// Result of one route load: always a displayable dataset, plus the
/// user-facing error when it had to fall back.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub dataset: NormalizedDataset,
    pub error: Option<String>,
}

impl LoadOutcome {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

pub struct RouteSource {
    client: Client,
    route_urls: Vec<String>,
    conditions_url: Option<String>,
    retry_delay: Duration,
}

impl RouteSource {
    pub fn new(
        route_urls: Vec<String>,
        conditions_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DashboardError::Http)?;

        Ok(Self {
            client,
            route_urls,
            conditions_url,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.route_source_urls.clone(),
            config.conditions_source_url.clone(),
            config.request_timeout(),
        )
    }

    /// Base delay between 503 retries; attempt `n` waits `n` times this.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn route_urls(&self) -> &[String] {
        &self.route_urls
    }

    /// Tries each route endpoint in order and returns the first dataset that
    /// carries at least one route.
    pub async fn fetch_dataset(&self) -> Result<RawDataset> {
        let mut last_error = None;

        for url in &self.route_urls {
            match self.fetch_with_retry::<RawDataset>(url).await {
                Ok(dataset) if dataset.success == Some(false) => {
                    warn!("Route source {} reported failure: {:?}", url, dataset.message);
                    last_error = Some(DashboardError::InvalidResponse(format!(
                        "success=false from {url}"
                    )));
                }
                Ok(dataset) if !dataset.has_routes() => {
                    warn!("Route source {} returned no routes", url);
                    last_error = Some(DashboardError::InvalidResponse(format!(
                        "no routes from {url}"
                    )));
                }
                Ok(dataset) => {
                    debug!("Loaded route dataset from {}", url);
                    return Ok(dataset);
                }
                Err(e) => {
                    warn!("Route source {} failed: {}", url, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(DashboardError::NoSource))
    }

    /// Fetches and normalizes the route dataset, substituting the fallback
    /// dataset when no endpoint delivers.
    pub async fn load_dataset(&self) -> LoadOutcome {
        match self.fetch_dataset().await {
            Ok(raw) => LoadOutcome {
                dataset: normalizer::normalize(Some(&raw)),
                error: None,
            },
            Err(e) => {
                warn!("Using fallback dataset: {}", e);
                LoadOutcome {
                    dataset: normalizer::normalize(None),
                    error: Some(FETCH_FAILED_MESSAGE.to_string()),
                }
            }
        }
    }

    /// Traffic and weather tables. Without a configured endpoint the sample
    /// tables are returned.
    pub async fn fetch_conditions(&self) -> Result<ConditionsSnapshot> {
        match &self.conditions_url {
            Some(url) => {
                let conditions = self.fetch_with_retry::<ConditionsSnapshot>(url).await?;
                debug!(
                    "Loaded conditions for {} traffic / {} weather entries",
                    conditions.traffic.len(),
                    conditions.weather.len()
                );
                Ok(conditions)
            }
            None => Ok(reference::sample_conditions()),
        }
    }

    async fn fetch_with_retry<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.fetch_json(url).await {
                Ok(body) => return Ok(body),
                Err(DashboardError::ServiceUnavailable) if attempts < MAX_RETRIES => {
                    let delay = self.retry_delay * attempts;
                    info!(
                        "Service unavailable at {} (attempt {}/{}), retrying in {}ms",
                        url,
                        attempts,
                        MAX_RETRIES,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(DashboardError::ServiceUnavailable);
        }
        if !status.is_success() {
            return Err(DashboardError::InvalidResponse(format!(
                "HTTP {status} for url={url}"
            )));
        }

        let body = response.text().await?;
        debug!("Response from {}: {} bytes", url, body.len());

        Ok(serde_json::from_str(&body)?)
    }
}
