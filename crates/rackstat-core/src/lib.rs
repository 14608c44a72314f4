pub mod app_config;
pub mod config;
pub mod goals;
pub mod profile;
pub mod score;

use serde::Serialize;
use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use goals::{plan_goal, AchievementPath, GoalCalculation, GoalError, GoalRequest};
pub use profile::{Certificate, Counters, LanguageUsage, ProfileRecord, StatLabel};
pub use score::{score, ScoreBreakdown, ScoreCategory};

/// Errors raised while loading [`AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Failure taxonomy reported to API callers.
///
/// Serialized in `SCREAMING_SNAKE_CASE`, e.g. `"INVALID_URL"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Client input is malformed or fails the host/path pattern.
    InvalidUrl,
    /// Connection failure, timeout, rate limit, or a persistent upstream block.
    NetworkError,
    /// Catch-all for any other failure in the fetch/extract pipeline.
    ParseError,
    /// Upstream explicitly reports the profile as absent or private.
    NotFound,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUrl => "INVALID_URL",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ParseError => "PARSE_ERROR",
            Self::NotFound => "NOT_FOUND",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
