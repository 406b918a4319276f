//! Unit tests for authentication middleware
//!
//! Tests cover:
//! - Session token authentication (valid, expired, invalid)
//! - Missing and malformed `Authorization` headers
//! - Uniform 401 responses regardless of failure cause

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        extract::Extension,
        http::{header::AUTHORIZATION, Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use time::Duration;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::super::middleware::{require_auth, AuthUser};
    use crate::state::AppState;

    async fn whoami(Extension(user): Extension<AuthUser>) -> String {
        user.user_id.to_string()
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    async fn call(state: &AppState, authorization: Option<String>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app(state.clone())
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_passes_user_through() {
        let state = AppState::for_tests("dev");
        let user_id = Uuid::new_v4();
        let token = state
            .sessions
            .jwt()
            .issue(user_id, Duration::hours(1))
            .unwrap();

        let (status, body) = call(&state, Some(format!("Bearer {}", token.as_str()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user_id.to_string());
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let state = AppState::for_tests("dev");
        let (status, body) = call(&state, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["code"], 401);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let state = AppState::for_tests("dev");
        let token = state
            .sessions
            .jwt()
            .issue(Uuid::new_v4(), Duration::minutes(-1))
            .unwrap();

        let (status, _) = call(&state, Some(format!("Bearer {}", token.as_str()))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let state = AppState::for_tests("dev");
        let (status, _) = call(&state, Some("Bearer not.a.jwt".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_failure_responses_are_identical() {
        let state = AppState::for_tests("dev");
        let expired = state
            .sessions
            .jwt()
            .issue(Uuid::new_v4(), Duration::minutes(-1))
            .unwrap();

        let missing = call(&state, None).await;
        let garbage = call(&state, Some("Bearer garbage".to_string())).await;
        let expired = call(&state, Some(format!("Bearer {}", expired.as_str()))).await;
        let wrong_scheme = call(&state, Some("ApiKey something".to_string())).await;

        assert_eq!(missing, garbage);
        assert_eq!(missing, expired);
        assert_eq!(missing, wrong_scheme);
    }
}
