//! Admin instrumentation: visit counter and dev-only reset

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, Response},
};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Counts every request routed to the static file server
pub async fn count_hits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.record_hit();
    next.run(request).await
}

/// GET /admin/metrics
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {} times!</p></body></html>",
        state.hits()
    ))
}

/// POST /admin/reset
///
/// Deletes every user. Chirps and refresh tokens go with them.
pub async fn reset(State(state): State<AppState>) -> ApiResult<StatusCode> {
    if !state.config.is_dev() {
        tracing::warn!(platform = %state.config.platform, "Reset rejected outside dev platform");
        return Err(ApiError::Forbidden(
            "Reset is only allowed on the dev platform".into(),
        ));
    }

    let deleted = state.store.delete_all_users().await?;
    tracing::warn!(deleted = deleted, "All users deleted");
    Ok(StatusCode::OK)
}
