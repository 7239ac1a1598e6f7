//! Backend endpoint resolution.

use std::net::IpAddr;

/// Development backend origin used when running on a loopback host.
pub const DEVELOPMENT_ORIGIN: &str = "http://localhost:5000";
/// Deployed backend origin used for every other host.
pub const PRODUCTION_ORIGIN: &str = "https://bugzilla-tggm.onrender.com";

const STATUS_PATH: &str = "/api/status";
const ANALYZE_PATH: &str = "/api/analyze";

/// Whether a hostname refers to the local machine.
pub fn is_loopback(host: &str) -> bool {
    let host = host.trim().trim_end_matches('.');
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    let bare = host
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(host);
    bare.parse::<IpAddr>()
        .map(|addr| addr.is_loopback())
        .unwrap_or(false)
}

/// Pick the backend origin for the current execution host.
pub fn resolve_base_url(host: &str) -> &'static str {
    if is_loopback(host) {
        DEVELOPMENT_ORIGIN
    } else {
        PRODUCTION_ORIGIN
    }
}

/// Backend location, computed once and handed to the probe and pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Build a config for a fixed base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Build a config from the execution hostname.
    pub fn from_hostname(host: &str) -> Self {
        let config = Self::new(resolve_base_url(host));
        log::info!("API base URL for host {host:?}: {}", config.base_url);
        config
    }

    /// Backend origin without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Health check endpoint.
    pub fn status_url(&self) -> String {
        format!("{}{STATUS_PATH}", self.base_url)
    }

    /// Log upload endpoint.
    pub fn analyze_url(&self) -> String {
        format!("{}{ANALYZE_PATH}", self.base_url)
    }
}
