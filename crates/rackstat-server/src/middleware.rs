use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Ledger size above which expired windows are swept on the next check.
const SWEEP_THRESHOLD: usize = 4096;

const UNKNOWN_CLIENT: &str = "unknown";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Time source for the rate limiter.
pub trait Clock: std::fmt::Debug + Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    resets_at: Instant,
    count: usize,
}

/// Fixed-window limiter keyed by client address.
///
/// Process-local: counts reset on restart and are not shared between
/// instances.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clock: Arc<dyn Clock>,
    ledger: Arc<Mutex<HashMap<String, RateLimitWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(max_requests: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_requests,
            window,
            clock,
            ledger: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a request from `key` and returns whether it is allowed.
    ///
    /// The first request from a key, or the first after its window has
    /// passed, opens a new window and is always allowed.
    pub async fn check(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut ledger = self.ledger.lock().await;

        if ledger.len() > SWEEP_THRESHOLD {
            ledger.retain(|_, window| now <= window.resets_at);
        }

        match ledger.get_mut(key) {
            Some(window) if now <= window.resets_at => {
                if window.count >= self.max_requests {
                    return false;
                }
                window.count += 1;
                true
            }
            _ => {
                ledger.insert(
                    key.to_owned(),
                    RateLimitWindow {
                        resets_at: now + self.window,
                        count: 1,
                    },
                );
                true
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn tracked_keys(&self) -> usize {
        self.ledger.lock().await.len()
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the per-client request limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req);
    if !rate_limit.check(&key).await {
        tracing::warn!(client = %key, "rate limit exceeded");
        return ApiError::rate_limited().into_response();
    }
    next.run(req).await
}

/// First `X-Forwarded-For` entry, else the peer IP, else `"unknown"`.
pub(crate) fn client_key(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').map(str::trim).find(|s| !s.is_empty()));
    if let Some(client) = forwarded {
        return client.to_owned();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(
            || UNKNOWN_CLIENT.to_owned(),
            |ConnectInfo(addr)| addr.ip().to_string(),
        )
}

/// Manually advanced clock for rate limiter tests.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct ManualClock {
    start: Instant,
    offset: std::sync::Mutex<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: std::sync::Mutex::new(Duration::ZERO),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        *self.offset.lock().expect("clock lock") += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().expect("clock lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn limiter(max: usize) -> (RateLimitState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let state = RateLimitState::with_clock(max, Duration::from_secs(60), clock.clone());
        (state, clock)
    }

    #[tokio::test]
    async fn allows_up_to_max_then_denies() {
        let (state, _clock) = limiter(3);
        for _ in 0..3 {
            assert!(state.check("10.0.0.1").await);
        }
        assert!(!state.check("10.0.0.1").await);
        assert!(!state.check("10.0.0.1").await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let (state, _clock) = limiter(1);
        assert!(state.check("a").await);
        assert!(!state.check("a").await);
        assert!(state.check("b").await);
    }

    #[tokio::test]
    async fn window_resets_after_it_elapses() {
        let (state, clock) = limiter(2);
        assert!(state.check("a").await);
        assert!(state.check("a").await);
        assert!(!state.check("a").await);

        clock.advance(Duration::from_secs(60));
        assert!(!state.check("a").await, "window end is inclusive");

        clock.advance(Duration::from_millis(1));
        assert!(state.check("a").await);
        assert!(state.check("a").await);
        assert!(!state.check("a").await);
    }

    #[tokio::test]
    async fn expired_windows_are_swept_when_ledger_grows() {
        let (state, clock) = limiter(1);
        for i in 0..=SWEEP_THRESHOLD {
            state.check(&format!("client-{i}")).await;
        }
        assert_eq!(state.tracked_keys().await, SWEEP_THRESHOLD + 1);

        clock.advance(Duration::from_secs(61));
        state.check("fresh").await;
        assert_eq!(state.tracked_keys().await, 1);
    }

    #[test]
    fn client_key_prefers_first_forwarded_entry() {
        let req = axum::http::Request::builder()
            .header("x-forwarded-for", " 203.0.113.7 , 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&req), "203.0.113.7");
    }

    #[test]
    fn client_key_falls_back_to_peer_address() {
        let mut req = axum::http::Request::builder().body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 5555))));
        assert_eq!(client_key(&req), "192.0.2.1");
    }

    #[test]
    fn client_key_defaults_to_unknown() {
        let req = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&req), "unknown");
    }
}
