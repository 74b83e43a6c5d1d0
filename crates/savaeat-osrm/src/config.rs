//! Public configuration for the OSRM client.

use std::time::Duration;

/// Public OSRM demo server. Fine for development, rate limited in practice.
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

/// Configuration for the OSRM client.
///
/// # Example
///
/// ```
/// use savaeat_osrm::OsrmClientConfig;
/// use std::time::Duration;
///
/// let config = OsrmClientConfig::new()
///     .with_base_url("http://localhost:5000")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct OsrmClientConfig {
    pub(crate) base_url: String,
    /// OSRM profile segment, e.g. `driving`.
    pub(crate) profile: String,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
    pub(crate) max_retries: u8,
    pub(crate) retry_base_delay: Duration,
}

impl Default for OsrmClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OSRM_URL.to_string(),
            profile: "driving".to_string(),
            user_agent: concat!("savaeat-osrm/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(300),
        }
    }
}

impl OsrmClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Root of the OSRM server, without the `/route/v1` part.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Per-request timeout. Defaults to 10 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retries after the first attempt for 5xx and network errors.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Base delay for exponential backoff. Doubles on each retry.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
