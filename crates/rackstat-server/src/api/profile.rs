use axum::{body::Bytes, extract::State, Extension, Json};
use rackstat_core::ProfileRecord;
use serde_json::{Map, Value};

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

/// Pulls a non-empty string `url` out of the request body.
///
/// Any body that is not a JSON object with such a field, including an empty
/// or malformed body, is rejected with the same message.
fn decode_profile_url(body: &[u8]) -> Result<String, ApiError> {
    let mut object: Map<String, Value> =
        serde_json::from_slice(body).map_err(|_| ApiError::url_required())?;
    match object.remove("url") {
        Some(Value::String(url)) if !url.is_empty() => Ok(url),
        _ => Err(ApiError::url_required()),
    }
}

pub(super) async fn parse_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ApiResponse<ProfileRecord>>, ApiError> {
    let url = decode_profile_url(&body)?;
    tracing::info!(request_id = %req_id.0, url = %url, "profile scrape requested");

    let record = state
        .scraper
        .scrape(&url)
        .await
        .map_err(|err| ApiError::from_scrape(&req_id.0, &err))?;
    Ok(Json(ApiResponse::ok(record)))
}
