//! Cleaning and validation of user-supplied SkillRack profile URLs.
//!
//! Users paste URLs from chat apps and address bars, so the input often has
//! stray whitespace, no scheme, or a missing `www.`. [`normalize`] repairs
//! those and rewrites the public `/profile/<id>/<key>` form to the
//! `/faces/resume.xhtml` page, which carries the same data and is served
//! without the interactive challenge the profile page tends to get.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

pub const CANONICAL_HOST: &str = "www.skillrack.com";

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("valid regex"));

static BARE_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(www\.)?skillrack\.com").expect("valid regex"));

/// The whole path must be `/profile/<id>/<key>`; anything after the key
/// other than a trailing slash, query or fragment leaves the URL untouched.
static PROFILE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://www\.skillrack\.com/profile/([0-9]+)/([A-Za-z0-9]+)/?(?:[?#].*)?$")
        .expect("valid regex")
});

static PROFILE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/profile/[0-9]+/[A-Za-z0-9]+$").expect("valid regex"));

const RESUME_PATH: &str = "/faces/resume.xhtml";

/// Which optional rewrites [`normalize_with`] applies.
///
/// Whitespace removal, scheme insertion and `www.` insertion always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Rewrite `http://` to `https://`.
    pub upgrade_scheme: bool,
    /// Rewrite `/profile/<id>/<key>` to `/faces/resume.xhtml?id=<id>&key=<key>`.
    pub rewrite_profile_path: bool,
}

impl NormalizeOptions {
    /// Cosmetic cleaning only: the URL keeps its scheme and path, as shown
    /// back to the user.
    #[must_use]
    pub const fn cosmetic() -> Self {
        Self {
            upgrade_scheme: false,
            rewrite_profile_path: false,
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            upgrade_scheme: true,
            rewrite_profile_path: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    pub canonical_url: String,
    pub was_modified: bool,
    /// One human-readable note per applied step, in application order.
    pub change_log: Vec<String>,
}

/// Normalizes with every rewrite enabled. Never fails; input that cannot
/// be repaired comes back in whatever shape the steps left it.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedUrl {
    normalize_with(raw, NormalizeOptions::default())
}

#[must_use]
pub fn normalize_with(raw: &str, options: NormalizeOptions) -> NormalizedUrl {
    let mut change_log = Vec::new();

    let trimmed = raw.trim();
    if trimmed != raw {
        change_log.push("Removed extra whitespace".to_owned());
    }

    let mut url: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    if url.len() != trimmed.len() {
        change_log.push("Removed spaces within URL".to_owned());
    }

    if !url.is_empty() && !SCHEME_RE.is_match(&url) && BARE_HOST_RE.is_match(&url) {
        url.insert_str(0, "https://");
        change_log.push("Added https:// protocol".to_owned());
    }

    if options.upgrade_scheme {
        if let Some(rest) = url.strip_prefix("http://") {
            url = format!("https://{rest}");
            change_log.push("Upgraded http:// to https://".to_owned());
        }
    }

    if url.contains("://skillrack.com") && !url.contains("://www.skillrack.com") {
        url = url.replacen("://skillrack.com", "://www.skillrack.com", 1);
        change_log.push("Added www subdomain".to_owned());
    }

    if options.rewrite_profile_path {
        if let Some(caps) = PROFILE_URL_RE.captures(&url) {
            let rewritten = format!(
                "https://{CANONICAL_HOST}{RESUME_PATH}?id={}&key={}",
                &caps[1], &caps[2]
            );
            url = rewritten;
            change_log.push("Converted profile URL to resume format".to_owned());
        }
    }

    NormalizedUrl {
        canonical_url: url,
        was_modified: !change_log.is_empty(),
        change_log,
    }
}

/// User-facing summary of the applied changes, or `None` when the input was
/// already clean.
#[must_use]
pub fn feedback(normalized: &NormalizedUrl) -> Option<String> {
    if !normalized.was_modified {
        return None;
    }
    Some(format!(
        "URL automatically cleaned: {}",
        normalized.change_log.join(", ")
    ))
}

/// Returns `true` when `url` is a SkillRack profile or resume page URL.
///
/// Accepts `http` or `https`, host exactly `www.skillrack.com`, and either
/// `/profile/<digits>/<alphanumeric>` or `/faces/resume.xhtml` with both
/// `id` and `key` query parameters. Unparsable input is rejected.
#[must_use]
pub fn validate_profile_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    if parsed.host_str() != Some(CANONICAL_HOST) {
        return false;
    }

    let path = parsed.path();
    if PROFILE_PATH_RE.is_match(path) {
        return true;
    }

    path == RESUME_PATH
        && parsed.query_pairs().any(|(k, _)| k == "id")
        && parsed.query_pairs().any(|(k, _)| k == "key")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
