//! HTTP backend abstraction for the OSRM API.
//!
//! The production backend uses reqwest and retries transient failures. Tests
//! swap in a canned backend.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::OsrmClientConfig;
use crate::error::{OsrmError, OsrmResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch JSON from a URL and deserialize it.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> OsrmResult<T>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Body OSRM sends alongside 4xx statuses.
#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

/// Production backend with exponential backoff on 5xx and network errors.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
}

/// Longest wait between two attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// `base * 2^(attempt - 1)`, capped at `MAX_RETRY_DELAY`.
fn backoff_delay(base: Duration, attempt: u8) -> Duration {
    let factor = 2u32.saturating_pow(u32::from(attempt.saturating_sub(1)));
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

impl ReqwestBackend {
    pub fn new(config: &OsrmClientConfig) -> OsrmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// Fetch a URL with automatic retry for transient errors.
    async fn fetch_with_retry(&self, url: &Url) -> OsrmResult<reqwest::Response> {
        let mut last_error: Option<OsrmError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.retry_base_delay, attempt);
                tracing::debug!(
                    target: "savaeat.osrm",
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying routing request"
                );
                tokio::time::sleep(delay).await;
            }

            match self.client.get(url.as_str()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(OsrmError::ApiRequestFailed {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    // OSRM explains 4xx refusals in the body.
                    if status.is_client_error() {
                        if let Ok(body) = response.json::<ErrorBody>().await {
                            return Err(OsrmError::Refused {
                                code: body.code,
                                message: body.message,
                            });
                        }
                    }

                    return Err(OsrmError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| OsrmError::InvalidResponse {
            message: "Unknown error during fetch".to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> OsrmResult<T> {
        let response = self.fetch_with_retry(url).await?;
        let data: T = response.json().await?;
        Ok(data)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Returns one canned JSON value (or failure) and records requested URLs.
    pub struct FakeBackend {
        response: Result<serde_json::Value, u16>,
        pub requests: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        pub fn json(value: serde_json::Value) -> Self {
            Self {
                response: Ok(value),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn status(status: u16) -> Self {
            Self {
                response: Err(status),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> OsrmResult<T> {
            self.requests.lock().unwrap().push(url.to_string());
            match &self.response {
                Ok(value) => serde_json::from_value(value.clone()).map_err(Into::into),
                Err(status) => Err(OsrmError::ApiRequestFailed {
                    status: *status,
                    url: url.to_string(),
                }),
            }
        }
    }
}
