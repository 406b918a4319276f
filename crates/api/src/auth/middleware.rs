//! Authentication middleware for Axum

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::credentials::authorization_header;
use crate::{error::ApiError, state::AppState};

/// Authenticated caller, inserted into request extensions by [`require_auth`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Middleware that requires a valid session token in `Authorization: Bearer`
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let header = authorization_header(request.headers());

    match state.sessions.authenticate_request(header) {
        Ok(user_id) => {
            tracing::debug!(path = %path, user_id = %user_id, "require_auth: authenticated");
            request.extensions_mut().insert(AuthUser { user_id });
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(path = %path, error = %err, "require_auth: authentication failed");
            ApiError::from(err).into_response()
        }
    }
}
