//! HTTP client that fetches SkillRack profile pages.

mod route;

use std::time::Duration;

use rackstat_core::AppConfig;
use reqwest::{Client, RequestBuilder};

use crate::backoff::BackoffSchedule;
use crate::block::{block_signature, is_block_page};
use crate::error::FetchError;
use crate::headers::{browser_headers, random_user_agent};
use crate::types::{FetchOutcome, FetchRoute, FetchedPage};

pub use route::{parse_http_url, rebase_url};
use route::Relay;

/// Upper bound on the TCP/TLS connect phase, independent of the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_REDIRECTS: usize = 5;

const RELAY_ACCEPT: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Status and body of one HTTP exchange, before classification.
#[derive(Debug)]
struct RawResponse {
    status: u16,
    body: String,
}

/// Fetches profile pages with bounded retry, linear backoff, rotating
/// browser headers, and block-page detection.
///
/// When a relay is configured each attempt goes through it first; if the
/// relay fails on a non-final attempt, the same attempt is retried directly.
#[derive(Debug)]
pub struct ProfileClient {
    client: Client,
    max_attempts: u32,
    backoff: BackoffSchedule,
    relay: Option<Relay>,
}

impl ProfileClient {
    /// Creates a client that fetches directly.
    ///
    /// `timeout` bounds each attempt. `max_attempts` counts the first try;
    /// zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout: Duration,
        max_attempts: u32,
        backoff: BackoffSchedule,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(CONNECT_TIMEOUT))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
            backoff,
            relay: None,
        })
    }

    /// Routes attempts through the relay at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute `http`/`https` URL.
    pub fn with_relay(mut self, endpoint: &str, api_key: &str) -> Result<Self, FetchError> {
        self.relay = Some(Relay::new(endpoint, api_key)?);
        Ok(self)
    }

    /// Builds a client from the fetch and relay settings in `config`.
    ///
    /// # Errors
    ///
    /// See [`ProfileClient::new`] and [`ProfileClient::with_relay`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let backoff = BackoffSchedule::new(
            Duration::from_millis(config.backoff_step_ms),
            Duration::from_millis(config.backoff_jitter_ms),
        );
        let client = Self::new(
            Duration::from_secs(config.fetch_timeout_secs),
            config.fetch_max_attempts,
            backoff,
        )?;
        match &config.relay_api_key {
            Some(key) => client.with_relay(&config.relay_url, key),
            None => Ok(client),
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn uses_relay(&self) -> bool {
        self.relay.is_some()
    }

    /// Fetches `url`, retrying blocks, 5xx responses and transport failures.
    ///
    /// # Errors
    ///
    /// - [`FetchError::NotFound`]: HTTP 401, 404 or 410 (not retried).
    /// - [`FetchError::Blocked`]: a block page on the final attempt.
    /// - [`FetchError::UpstreamStatus`]: HTTP 5xx on the final attempt.
    /// - [`FetchError::Timeout`] / [`FetchError::Connect`] / [`FetchError::Http`]:
    ///   transport failure on the final attempt.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut outcomes = Vec::new();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let is_final = attempt >= self.max_attempts;

            let delay = self.backoff.sample(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let (route, result) = self.send_attempt(url, attempt, is_final).await;
            let mut outcome = FetchOutcome::new(attempt, route, delay);

            let err = match result {
                Ok(response) => {
                    outcome.http_status = Some(response.status);
                    match classify(url, attempt, &response) {
                        None => {
                            outcome.raw_body = Some(response.body);
                            outcome.log(url);
                            outcomes.push(outcome);
                            return Ok(FetchedPage {
                                url: url.to_owned(),
                                outcomes,
                            });
                        }
                        Some(err) => {
                            if let Some(signature) = block_signature(&response.body) {
                                tracing::debug!(attempt, signature, "block page signature matched");
                            }
                            err
                        }
                    }
                }
                Err(err) => err,
            };

            outcome.blocked = matches!(err, FetchError::Blocked { .. });
            outcome.error_kind = Some(err.kind());
            outcome.log(url);
            outcomes.push(outcome);

            if is_final || !err.is_retriable() {
                tracing::error!(
                    url,
                    attempts = attempt,
                    error = %err,
                    "giving up on profile fetch"
                );
                return Err(err);
            }
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                error = %err,
                "transient fetch failure, retrying after backoff"
            );
        }
    }

    /// Sends one attempt, falling back from the relay to a direct request
    /// when the relay result is unusable and attempts remain.
    async fn send_attempt(
        &self,
        url: &str,
        attempt: u32,
        is_final: bool,
    ) -> (FetchRoute, Result<RawResponse, FetchError>) {
        let Some(relay) = &self.relay else {
            return (FetchRoute::Direct, self.send_direct(url, attempt).await);
        };

        let relayed = self.send_relay(relay, url).await;
        let usable = matches!(&relayed, Ok(r) if classify(url, attempt, r).is_none());
        if usable || is_final {
            return (FetchRoute::Relay, relayed);
        }

        match &relayed {
            Ok(r) => tracing::warn!(attempt, status = r.status, "relay response unusable, trying direct"),
            Err(e) => tracing::warn!(attempt, error = %e, "relay request failed, trying direct"),
        }
        (FetchRoute::Direct, self.send_direct(url, attempt).await)
    }

    async fn send_direct(&self, url: &str, attempt: u32) -> Result<RawResponse, FetchError> {
        let request = self
            .client
            .get(url)
            .headers(browser_headers(attempt, random_user_agent()));
        read_response(url, request).await
    }

    async fn send_relay(&self, relay: &Relay, url: &str) -> Result<RawResponse, FetchError> {
        let request = self
            .client
            .get(relay.request_url(url))
            .header(reqwest::header::ACCEPT, RELAY_ACCEPT);
        read_response(url, request).await
    }
}

/// Sends `request` and buffers the body.
///
/// `reqwest` errors are stripped of their URL, which for relay requests
/// carries the API key; `url` is recorded instead.
async fn read_response(url: &str, request: RequestBuilder) -> Result<RawResponse, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::from_transport(url, e.without_url()))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::from_transport(url, e.without_url()))?;
    Ok(RawResponse { status, body })
}

/// Maps a received response to the error it represents, or `None` if it is
/// usable content.
fn classify(url: &str, attempt: u32, response: &RawResponse) -> Option<FetchError> {
    match response.status {
        401 | 404 | 410 => Some(FetchError::NotFound {
            url: url.to_owned(),
            status: response.status,
        }),
        status if is_block_page(status, &response.body) => {
            Some(FetchError::Blocked { attempts: attempt })
        }
        status if status >= 500 => Some(FetchError::UpstreamStatus {
            status,
            url: url.to_owned(),
        }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
