//! The scrape pipeline: normalize, validate, fetch, extract.

use rackstat_core::{ProfileRecord, ScoreBreakdown};
use reqwest::Url;

use crate::client::{parse_http_url, rebase_url, ProfileClient};
use crate::error::{FetchError, ScrapeError};
use crate::normalize::{feedback, normalize_with, validate_profile_url, NormalizeOptions};
use crate::parse::extract;

/// Turns a user-supplied profile URL into a [`ProfileRecord`].
#[derive(Debug)]
pub struct ProfileScraper {
    client: ProfileClient,
    options: NormalizeOptions,
    upstream_base: Option<Url>,
}

impl ProfileScraper {
    #[must_use]
    pub fn new(client: ProfileClient) -> Self {
        Self {
            client,
            options: NormalizeOptions::default(),
            upstream_base: None,
        }
    }

    /// Sends validated requests to `base` instead of SkillRack, keeping the
    /// canonical path and query. Used to point the pipeline at a mirror or a
    /// local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidEndpoint`] if `base` is not an absolute
    /// `http`/`https` URL.
    pub fn with_upstream_base(mut self, base: &str) -> Result<Self, FetchError> {
        self.upstream_base = Some(parse_http_url(base)?);
        Ok(self)
    }

    /// Runs the full pipeline for `raw_url`.
    ///
    /// Validation runs on the normalized URL, so pasted input with stray
    /// whitespace or a missing scheme is accepted.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::InvalidUrl`] if the normalized URL is not a
    ///   SkillRack profile URL. No request is made.
    /// - [`ScrapeError::Fetch`] if the page could not be fetched.
    pub async fn scrape(&self, raw_url: &str) -> Result<ProfileRecord, ScrapeError> {
        let normalized = normalize_with(raw_url, self.options);
        if !validate_profile_url(&normalized.canonical_url) {
            return Err(ScrapeError::InvalidUrl {
                url: normalized.canonical_url,
            });
        }
        if let Some(message) = feedback(&normalized) {
            tracing::info!(url = %normalized.canonical_url, "{message}");
        }

        let target = match &self.upstream_base {
            Some(base) => rebase_url(&normalized.canonical_url, base)?,
            None => normalized.canonical_url,
        };

        let page = self.client.fetch(&target).await?;
        let record = extract(page.body());
        if !record.markup_recognized {
            tracing::warn!(
                url = %target,
                status = ?page.status(),
                "fetched page carries no recognizable profile markup"
            );
        }
        let breakdown = ScoreBreakdown::from_counts(&record.counts);
        tracing::info!(
            url = %target,
            attempts = page.attempts(),
            total_points = breakdown.total,
            ?breakdown,
            "profile scraped"
        );
        Ok(record)
    }
}
