mod goals;
mod profile;

use std::sync::Arc;

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderName, HeaderValue, StatusCode,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rackstat_core::ErrorCode;
use rackstat_scraper::{ProfileScraper, ScrapeError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<ProfileScraper>,
}

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope: `{"success": false, "error": "...", "code": "..."}`.
///
/// `error` is always a fixed user-facing message; underlying causes are
/// only logged.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: Option<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: message.into(),
            code,
        }
    }

    pub fn url_required() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            Some(ErrorCode::InvalidUrl),
            "URL is required and must be a string",
        )
    }

    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            Some(ErrorCode::InvalidUrl),
            "Method not allowed",
        )
    }

    pub fn rate_limited() -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            Some(ErrorCode::NetworkError),
            "Too many requests. Please wait a moment before trying again.",
        )
    }

    /// Maps a pipeline failure: invalid input is the caller's fault (400),
    /// everything after validation is reported as 500.
    pub fn from_scrape(request_id: &str, err: &ScrapeError) -> Self {
        let status = match err {
            ScrapeError::InvalidUrl { .. } => {
                tracing::info!(request_id, error = %err, "rejected profile URL");
                StatusCode::BAD_REQUEST
            }
            ScrapeError::Fetch(_) => {
                tracing::error!(request_id, code = %err.code(), error = %err, "profile scrape failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, Some(err.code()), err.user_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn cors_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let parse_profile_route = post(profile::parse_profile)
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
        .options(preflight)
        .fallback(method_not_allowed);

    let plan_goal_route = post(goals::plan_goal)
        .options(preflight)
        .fallback(method_not_allowed);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/parse-profile", parse_profile_route)
        .route("/api/plan-goal", plan_goal_route)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_header(ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
                .layer(cors_header(ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
                .layer(cors_header(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::response::Response;
    use rackstat_scraper::{BackoffSchedule, ProfileClient};

    use super::*;

    /// State whose scraper targets `upstream`; port 1 on loopback when the
    /// test must never reach the network.
    pub(crate) fn state_with_upstream(upstream: &str) -> AppState {
        let client = ProfileClient::new(Duration::from_secs(5), 2, BackoffSchedule::immediate())
            .expect("client");
        let scraper = ProfileScraper::new(client)
            .with_upstream_base(upstream)
            .expect("upstream base");
        AppState {
            scraper: Arc::new(scraper),
        }
    }

    pub(crate) fn offline_app(rate_limit: RateLimitState) -> Router {
        build_app(state_with_upstream("http://127.0.0.1:1"), rate_limit)
    }

    pub(crate) fn generous_limit() -> RateLimitState {
        RateLimitState::new(1_000, Duration::from_secs(60))
    }

    pub(crate) fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request")
    }

    pub(crate) async fn json_body(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{generous_limit, json_body, offline_app, post_json};
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    fn assert_cors(response: &axum::response::Response) {
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert!(headers.contains_key("x-request-id"));
    }

    #[test]
    fn api_error_omits_absent_code() {
        let err = ApiError::new(StatusCode::BAD_REQUEST, None, "bad goal");
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json, serde_json::json!({"success": false, "error": "bad goal"}));
    }

    #[test]
    fn scrape_errors_map_to_status_and_code() {
        let invalid = ApiError::from_scrape(
            "req-1",
            &ScrapeError::InvalidUrl {
                url: "x".to_owned(),
            },
        );
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.code, Some(ErrorCode::InvalidUrl));

        let blocked = ApiError::from_scrape(
            "req-2",
            &ScrapeError::Fetch(rackstat_scraper::FetchError::Blocked { attempts: 3 }),
        );
        assert_eq!(blocked.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(blocked.code, Some(ErrorCode::NetworkError));
        assert!(blocked.error.starts_with("Access temporarily blocked"));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = offline_app(generous_limit())
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(json_body(response).await, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn preflight_returns_empty_ok() {
        let response = offline_app(generous_limit())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/parse-profile")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn other_methods_get_405_envelope() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let response = offline_app(generous_limit())
                .oneshot(
                    Request::builder()
                        .method(method.clone())
                        .uri("/api/parse-profile")
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_cors(&response);
            assert_eq!(
                json_body(response).await,
                serde_json::json!({
                    "success": false,
                    "error": "Method not allowed",
                    "code": "INVALID_URL"
                })
            );
        }
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let response = offline_app(generous_limit())
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("x-request-id", "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.headers()["x-request-id"], "req-abc");
    }

    #[tokio::test]
    async fn error_responses_carry_cors_headers() {
        let response = offline_app(generous_limit())
            .oneshot(post_json("/api/parse-profile", "{}"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_cors(&response);
    }
}
