pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/generate", post(handlers::handle_generate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::generation::orchestrator::Orchestrator;
    use crate::generation::testing::{Reply, ScriptedGenerator};
    use crate::models::profile::tests::sample_profile_json;

    fn app(replies: Vec<Reply>, profile: Option<Value>) -> Router {
        let generator = Arc::new(ScriptedGenerator::new(replies));
        build_router(AppState {
            orchestrator: Orchestrator::new(generator),
            profile: profile.map(Arc::new),
        })
    }

    fn generate_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(vec![], None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_returns_drafts() {
        let replies = vec![
            Reply::text(r#"{"persona": "Backend owner"}"#),
            Reply::text(r#"{"requirement_map": []}"#),
            Reply::text("## Summary\nRust backend engineer"),
            Reply::text("Hello,\nI would love to join."),
            Reply::text(r#"{"match_score": 93, "issues": ["Skills list is long"], "revision_instructions": ""}"#),
        ];
        let response = app(replies, Some(sample_profile_json()))
            .oneshot(generate_request(json!({"job_description": "Rust backend role"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["resume"], "## Summary\nRust backend engineer");
        assert_eq!(body["coverLetter"], "Hello,\nI would love to join.");
        assert_eq!(body["matchScore"], 93);
        assert_eq!(body["reviewRounds"], 1);
        assert_eq!(body["issues"], json!(["Skills list is long"]));
        assert!(body["runId"].is_string());
        assert!(body["generatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_description() {
        let response = app(vec![], Some(sample_profile_json()))
            .oneshot(generate_request(json!({"job_description": "   "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_without_profile() {
        let response = app(vec![], None)
            .oneshot(generate_request(json!({"job_description": "Rust backend role"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"]["code"], "PROFILE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_generation_failure_is_bad_gateway() {
        let response = app(vec![Reply::fail("quota")], Some(sample_profile_json()))
            .oneshot(generate_request(json!({"job_description": "Rust backend role"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");
        assert_eq!(body["error"]["message"], "An AI processing error occurred");
    }
}
