use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Per-attempt upstream request timeout.
    pub fetch_timeout_secs: u64,
    /// Total fetch attempts per profile request, including the first.
    pub fetch_max_attempts: u32,
    /// Linear backoff step: attempt `n` waits `n * step` plus jitter.
    pub backoff_step_ms: u64,
    /// Upper bound of the random jitter added to each backoff delay.
    pub backoff_jitter_ms: u64,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
    /// API key for the anti-block relay; `None` fetches directly.
    pub relay_api_key: Option<String>,
    pub relay_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_max_attempts", &self.fetch_max_attempts)
            .field("backoff_step_ms", &self.backoff_step_ms)
            .field("backoff_jitter_ms", &self.backoff_jitter_ms)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field(
                "relay_api_key",
                &self.relay_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("relay_url", &self.relay_url)
            .finish()
    }
}
