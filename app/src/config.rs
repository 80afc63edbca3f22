use crate::error::{DashboardError, Result};
use std::time::Duration;

pub const DEFAULT_ROUTE_SOURCE_URLS: &str = "http://localhost:8000/api/pt-sanghiang-data,http://localhost:8001/api/pt-sanghiang-data,http://localhost:8000/api/test-route";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub route_source_urls: Vec<String>,
    pub conditions_source_url: Option<String>,
    pub route_refresh_secs: u64,
    pub conditions_refresh_secs: u64,
    pub request_timeout_secs: u64,
    pub bind_addr: String,
}

/// How often each refresh task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIntervals {
    pub routes: Duration,
    pub conditions: Duration,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            routes: Duration::from_secs(30),
            conditions: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let route_source_urls = parse_url_list(
            &dotenvy::var("ROUTE_SOURCE_URLS")
                .unwrap_or_else(|_| DEFAULT_ROUTE_SOURCE_URLS.to_string()),
        );
        if route_source_urls.is_empty() {
            return Err(DashboardError::Config(
                "ROUTE_SOURCE_URLS must list at least one URL".to_string(),
            ));
        }

        let conditions_source_url = dotenvy::var("CONDITIONS_SOURCE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let bind_addr = dotenvy::var("BIND_ADDR")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        Ok(Config {
            route_source_urls,
            conditions_source_url,
            route_refresh_secs: parse_env_secs("ROUTE_REFRESH_SECS", 30)?,
            conditions_refresh_secs: parse_env_secs("CONDITIONS_REFRESH_SECS", 60)?,
            request_timeout_secs: parse_env_secs("REQUEST_TIMEOUT_SECS", 30)?,
            bind_addr,
        })
    }

    pub fn refresh_intervals(&self) -> RefreshIntervals {
        RefreshIntervals {
            routes: Duration::from_secs(self.route_refresh_secs),
            conditions: Duration::from_secs(self.conditions_refresh_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_env_secs(key: &str, default: u64) -> Result<u64> {
    let secs = dotenvy::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse::<u64>()
        .map_err(|_| DashboardError::Config(format!("Invalid {key}")))?;

    if secs == 0 {
        return Err(DashboardError::Config(format!("{key} must be greater than zero")));
    }

    Ok(secs)
}
