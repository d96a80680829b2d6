//! Connection to the OC Transpo API.
//!
//! A [`Connection`] owns the caller's credentials, the HTTP client and the
//! [`RateGate`] every request must pass. The query methods live next to the
//! feed they talk to: see [`crate::live`] and [`crate::gtfs`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::{ConfigError, Error, TransportError};
use crate::rate::{RateGate, RateLimit};

/// Address at which the API is available.
pub const DEFAULT_BASE_URL: &str = "https://api.octranspo1.com/v1.2/";

/// Default time allowed for a whole request, rate gate wait included.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_APP_ID: &str = "OCTRANSPO_APP_ID";
const ENV_API_KEY: &str = "OCTRANSPO_API_KEY";
const ENV_BASE_URL: &str = "OCTRANSPO_BASE_URL";
const ENV_RATE_PER_SEC: &str = "OCTRANSPO_RATE_PER_SEC";
const ENV_BURST: &str = "OCTRANSPO_BURST";
const ENV_TIMEOUT_SECS: &str = "OCTRANSPO_TIMEOUT_SECS";

/// Configuration for a [`Connection`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// Application ID issued with the API key
    pub app_id: String,
    /// API key
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Admission rate for outbound calls
    pub rate_limit: RateLimit,
    /// Upper bound on a whole request, or `None` to wait indefinitely
    pub timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Create a config with no rate limit and the default timeout.
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit: RateLimit::Unlimited,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Read configuration from `OCTRANSPO_*` environment variables.
    ///
    /// `OCTRANSPO_APP_ID` and `OCTRANSPO_API_KEY` are required. A rate limit
    /// is applied when `OCTRANSPO_RATE_PER_SEC` is set; `OCTRANSPO_BURST`
    /// defaults to 1.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let app_id = lookup(ENV_APP_ID).ok_or(ConfigError::MissingEnv(ENV_APP_ID))?;
        let api_key = lookup(ENV_API_KEY).ok_or(ConfigError::MissingEnv(ENV_API_KEY))?;
        let mut config = Self::new(app_id, api_key);

        if let Some(url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(url);
        }

        let parse = |name: &'static str| -> Result<Option<f64>, ConfigError> {
            lookup(name)
                .map(|value| {
                    value
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| ConfigError::InvalidEnv { name, value })
                })
                .transpose()
        };

        if let Some(rate) = parse(ENV_RATE_PER_SEC)? {
            let burst = match lookup(ENV_BURST) {
                Some(value) => value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnv {
                    name: ENV_BURST,
                    value,
                })?,
                None => 1,
            };
            config = config.with_rate_limit(rate, burst);
        }

        if let Some(secs) = parse(ENV_TIMEOUT_SECS)? {
            let timeout =
                Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidEnv {
                    name: ENV_TIMEOUT_SECS,
                    value: secs.to_string(),
                })?;
            config = config.with_timeout(timeout);
        }

        Ok(config)
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Limit calls to `per_sec` on average, with bursts of up to `burst`.
    pub fn with_rate_limit(mut self, per_sec: f64, burst: u32) -> Self {
        self.rate_limit = RateLimit::PerSecond {
            rate: per_sec,
            burst,
        };
        self
    }

    /// Set the overall request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Let requests wait as long as they need.
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }
}

/// A client for both OC Transpo feeds.
///
/// Clones share the same rate gate. Connections built separately (for
/// instance with different credentials) never share quota.
#[derive(Debug, Clone)]
pub struct Connection {
    http: reqwest::Client,
    app_id: String,
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
    gate: Arc<RateGate>,
}

impl Connection {
    /// Create a connection, validating the rate limit.
    pub fn new(config: ConnectionConfig) -> Result<Self, ConfigError> {
        let gate = RateGate::new(config.rate_limit)?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let mut base_url = config.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            http,
            app_id: config.app_id,
            api_key: config.api_key,
            base_url,
            timeout: config.timeout,
            gate: Arc::new(gate),
        })
    }

    /// The base URL requests are sent to, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The rate gate guarding this connection.
    pub fn rate_gate(&self) -> &RateGate {
        &self.gate
    }

    /// Request parameters every endpoint needs.
    pub(crate) fn credentials(&self) -> Vec<(&'static str, String)> {
        vec![
            ("appID", self.app_id.clone()),
            ("apiKey", self.api_key.clone()),
        ]
    }

    /// Send one request through the rate gate.
    ///
    /// GET requests carry `params` in the query string; anything else sends
    /// them as a form-encoded body. On a 200 the unread response is handed
    /// back to the caller.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Response, Error> {
        let url = format!("{}{}", self.base_url, endpoint);

        let request = if method == Method::GET {
            self.http.get(&url).query(params)
        } else {
            self.http.request(method.clone(), &url).form(params)
        };

        self.gate.acquire().await;

        debug!(endpoint, %method, "dispatching request");
        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(endpoint, %status, "non-200 response");
            return Err(TransportError::Status { status, url }.into());
        }

        Ok(response)
    }

    /// Run a whole request under the configured timeout.
    pub(crate) async fn bounded<T>(
        &self,
        request: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| TransportError::Cancelled(limit))?,
            None => request.await,
        }
    }
}

/// Fail early on a blank required parameter.
pub(crate) fn require(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MissingParameter(name));
    }
    Ok(value.to_string())
}
