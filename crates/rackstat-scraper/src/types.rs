//! Per-attempt fetch records and the accepted page.

use std::time::Duration;

use crate::error::FetchErrorKind;

/// Which network path an attempt's final request took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRoute {
    Direct,
    Relay,
}

/// What happened on one fetch attempt.
///
/// `raw_body` is only kept for the accepted attempt; block pages and error
/// bodies are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub attempt_number: u32,
    pub route: FetchRoute,
    /// Backoff slept before this attempt was sent.
    pub delay: Duration,
    pub http_status: Option<u16>,
    pub blocked: bool,
    pub error_kind: Option<FetchErrorKind>,
    pub raw_body: Option<String>,
}

impl FetchOutcome {
    pub(crate) fn new(attempt_number: u32, route: FetchRoute, delay: Duration) -> Self {
        Self {
            attempt_number,
            route,
            delay,
            http_status: None,
            blocked: false,
            error_kind: None,
            raw_body: None,
        }
    }

    pub(crate) fn log(&self, url: &str) {
        let delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX);
        match self.error_kind {
            None => tracing::info!(
                url,
                attempt = self.attempt_number,
                route = ?self.route,
                status = ?self.http_status,
                delay_ms,
                "profile page fetched"
            ),
            Some(kind) => tracing::warn!(
                url,
                attempt = self.attempt_number,
                route = ?self.route,
                status = ?self.http_status,
                blocked = self.blocked,
                error_kind = ?kind,
                delay_ms,
                "fetch attempt failed"
            ),
        }
    }
}

/// A page accepted as content, with the history of attempts that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    /// One entry per attempt; the last one is the accepted attempt.
    pub outcomes: Vec<FetchOutcome>,
}

impl FetchedPage {
    #[must_use]
    pub fn body(&self) -> &str {
        self.outcomes
            .last()
            .and_then(|o| o.raw_body.as_deref())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.outcomes.last().and_then(|o| o.http_status)
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.outcomes.last().map_or(0, |o| o.attempt_number)
    }
}
