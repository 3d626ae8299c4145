//! Backend location and session timing.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REHYDRATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub rehydrate_timeout: Duration,
}

impl ApiConfig {
    /// Config for `base_url`; a trailing slash is dropped.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = match base_url.trim() {
            "" => DEFAULT_API_BASE_URL.to_owned(),
            trimmed => trimmed.trim_end_matches('/').to_owned(),
        };
        Self { base_url, rehydrate_timeout: DEFAULT_REHYDRATE_TIMEOUT }
    }

    /// Config baked in at build time from `CAMPUS_API_URL`.
    ///
    /// Browser builds have no process environment, so the override is read
    /// when the crate is compiled.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::new(option_env!("CAMPUS_API_URL").unwrap_or(DEFAULT_API_BASE_URL))
    }

    #[must_use]
    pub fn with_rehydrate_timeout(mut self, timeout: Duration) -> Self {
        self.rehydrate_timeout = timeout;
        self
    }

    /// Absolute URL for an endpoint path such as `/api/notices/`.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}
