//! Request URL construction for the relay route and upstream rebasing.

use reqwest::Url;

use crate::error::FetchError;

/// Anti-block relay: a fetch-as-a-service endpoint taking the target URL
/// and an API key as query parameters.
#[derive(Clone)]
pub(crate) struct Relay {
    endpoint: Url,
    api_key: String,
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .finish()
    }
}

impl Relay {
    pub(crate) fn new(endpoint: &str, api_key: &str) -> Result<Self, FetchError> {
        let endpoint = parse_http_url(endpoint)?;
        Ok(Self {
            endpoint,
            api_key: api_key.to_owned(),
        })
    }

    /// `{endpoint}?api_key=<key>&url=<target>`, percent-encoded.
    pub(crate) fn request_url(&self, target: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("url", target);
        url
    }
}

/// Moves `url` onto `base`'s scheme, host and port, keeping path and query.
///
/// # Errors
///
/// Returns [`FetchError::InvalidEndpoint`] if `url` does not parse.
pub fn rebase_url(url: &str, base: &Url) -> Result<String, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidEndpoint {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    let mut rebased = base.clone();
    rebased.set_path(parsed.path());
    rebased.set_query(parsed.query());
    Ok(rebased.to_string())
}

/// Parses an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns [`FetchError::InvalidEndpoint`] for unparsable input or any
/// other scheme.
pub fn parse_http_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::InvalidEndpoint {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::InvalidEndpoint {
            url: raw.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }
    Ok(url)
}
