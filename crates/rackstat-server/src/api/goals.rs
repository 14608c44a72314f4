use axum::{body::Bytes, http::StatusCode, Json};
use rackstat_core::{plan_goal as build_plan, GoalCalculation, GoalRequest};

use super::{ApiError, ApiResponse};

pub(super) async fn plan_goal(body: Bytes) -> Result<Json<ApiResponse<GoalCalculation>>, ApiError> {
    let request: GoalRequest = serde_json::from_slice(&body).map_err(|e| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            None,
            format!("Invalid goal request: {e}"),
        )
    })?;

    let plan = build_plan(request)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, None, e.to_string()))?;
    Ok(Json(ApiResponse::ok(plan)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::super::test_support::{generous_limit, json_body, offline_app, post_json};

    #[tokio::test]
    async fn returns_plan_for_valid_goal() {
        let response = offline_app(generous_limit())
            .oneshot(post_json(
                "/api/plan-goal",
                r#"{"currentPoints":2040,"targetPoints":3040,"timelineDays":30}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["requiredPoints"], 1000);
        assert_eq!(json["data"]["suggestions"][0]["strategy"], "Code Tracks Only");
        assert_eq!(json["data"]["suggestions"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn rejects_target_below_current() {
        let response = offline_app(generous_limit())
            .oneshot(post_json(
                "/api/plan-goal",
                r#"{"currentPoints":500,"targetPoints":100,"timelineDays":30}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({
                "success": false,
                "error": "Target must be higher than your current points (500)"
            })
        );
    }

    #[tokio::test]
    async fn rejects_malformed_body() {
        let response = offline_app(generous_limit())
            .oneshot(post_json("/api/plan-goal", r#"{"currentPoints":-1}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert!(json["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("Invalid goal request")));
    }
}
