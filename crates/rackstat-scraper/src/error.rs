use rackstat_core::ErrorCode;
use thiserror::Error;

/// Failure of the upstream fetch stage, after retries where they apply.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out: {source}")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream kept serving a block page after {attempts} attempt(s)")]
    Blocked { attempts: u32 },

    #[error("profile not found at {url} (HTTP {status})")]
    NotFound { url: String, status: u16 },

    #[error("unexpected HTTP status {status} from {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl FetchError {
    /// Classifies a transport-level `reqwest` failure.
    pub(crate) fn from_transport(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_owned(),
                source,
            }
        } else if source.is_connect() {
            Self::Connect {
                url: url.to_owned(),
                source,
            }
        } else {
            Self::Http(source)
        }
    }

    /// Returns `true` if another attempt could plausibly succeed.
    ///
    /// Not-found responses and endpoint misconfiguration are final.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::InvalidEndpoint { .. })
    }

    #[must_use]
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Connect { .. } => FetchErrorKind::Connect,
            Self::Timeout { .. } => FetchErrorKind::Timeout,
            Self::Blocked { .. } => FetchErrorKind::Blocked,
            Self::NotFound { .. } => FetchErrorKind::NotFound,
            Self::UpstreamStatus { .. } => FetchErrorKind::UpstreamStatus,
            Self::Http(_) | Self::InvalidEndpoint { .. } => FetchErrorKind::Http,
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Connect { .. } | Self::Timeout { .. } | Self::Blocked { .. } => {
                ErrorCode::NetworkError
            }
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::UpstreamStatus { .. } | Self::Http(_) | Self::InvalidEndpoint { .. } => {
                ErrorCode::ParseError
            }
        }
    }

    /// Message safe to show to an end user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Connect { .. } => {
                "Unable to connect to SkillRack. Please check your internet connection."
            }
            Self::Timeout { .. } => "Request timeout. Please try again.",
            Self::Blocked { .. } => {
                "Access temporarily blocked by security protection. This is likely due to Cloudflare protection on SkillRack. Please try again later or contact support if this persists."
            }
            Self::NotFound { .. } => {
                "Profile not found. Please check if the URL is correct and the profile is public."
            }
            Self::UpstreamStatus { .. } | Self::Http(_) | Self::InvalidEndpoint { .. } => {
                PARSE_FAILURE_MESSAGE
            }
        }
    }
}

/// Coarse failure category recorded on each [`crate::FetchOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Connect,
    Timeout,
    Blocked,
    NotFound,
    UpstreamStatus,
    Http,
}

pub const INVALID_URL_MESSAGE: &str =
    "Invalid SkillRack profile URL format. Expected: https://www.skillrack.com/profile/[id]/[hash]";

pub const PARSE_FAILURE_MESSAGE: &str =
    "Failed to parse profile data. Please verify the profile URL is correct.";

/// Failure of the whole scrape pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid profile URL: {url}")]
    InvalidUrl { url: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ScrapeError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidUrl { .. } => ErrorCode::InvalidUrl,
            Self::Fetch(err) => err.code(),
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => INVALID_URL_MESSAGE,
            Self::Fetch(err) => err.user_message(),
        }
    }
}
