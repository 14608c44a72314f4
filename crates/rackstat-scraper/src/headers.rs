//! Browser-like request headers, varied per attempt.
//!
//! The first attempt looks like a click-through from a search engine; later
//! attempts look like in-site navigation that bypasses caches.

use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, DNT, PRAGMA,
    REFERER, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
];

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const SEARCH_REFERER: &str = "https://www.google.com/";
const SITE_REFERER: &str = "https://www.skillrack.com/";

const SEC_FETCH_DEST: &str = "sec-fetch-dest";
const SEC_FETCH_MODE: &str = "sec-fetch-mode";
const SEC_FETCH_SITE: &str = "sec-fetch-site";
const SEC_CH_UA: &str = "sec-ch-ua";
const SEC_CH_UA_MOBILE: &str = "sec-ch-ua-mobile";
const SEC_CH_UA_PLATFORM: &str = "sec-ch-ua-platform";
const X_REQUESTED_WITH: &str = "x-requested-with";

/// Picks a user agent from [`USER_AGENTS`] uniformly at random.
#[must_use]
pub fn random_user_agent() -> &'static str {
    let index = rand::rng().random_range(0..USER_AGENTS.len());
    USER_AGENTS[index]
}

/// Header set for the 1-based `attempt`.
///
/// Deterministic for a given `user_agent`; callers draw the agent with
/// [`random_user_agent`]. `Accept-Encoding` is left to `reqwest` so that
/// decompression stays automatic.
#[must_use]
pub fn browser_headers(attempt: u32, user_agent: &'static str) -> HeaderMap {
    let first = attempt <= 1;
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(SEC_FETCH_DEST, HeaderValue::from_static("document"));
    headers.insert(SEC_FETCH_MODE, HeaderValue::from_static("navigate"));
    headers.insert(
        SEC_FETCH_SITE,
        HeaderValue::from_static(if first { "cross-site" } else { "same-origin" }),
    );
    headers.insert(
        SEC_CH_UA,
        HeaderValue::from_static(r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#),
    );
    headers.insert(SEC_CH_UA_MOBILE, HeaderValue::from_static("?0"));
    headers.insert(SEC_CH_UA_PLATFORM, HeaderValue::from_static(r#""Windows""#));
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static(if first { "max-age=0" } else { "no-cache" }),
    );
    headers.insert(
        REFERER,
        HeaderValue::from_static(if first { SEARCH_REFERER } else { SITE_REFERER }),
    );
    headers.insert(DNT, HeaderValue::from_static("1"));

    if !first {
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    }
    if attempt == 2 {
        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
    }

    headers
}
