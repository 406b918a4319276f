//! Polka billing webhook
//!
//! The API key is checked before the body is looked at, so an unauthenticated
//! caller learns nothing about payload validation.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::{authorization_header, verify_api_key},
    error::{ApiError, ApiResult},
    state::AppState,
};

pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Debug, Deserialize)]
pub struct PolkaEvent {
    pub event: String,
    pub data: PolkaEventData,
}

#[derive(Debug, Deserialize)]
pub struct PolkaEventData {
    pub user_id: Uuid,
}

/// POST /api/polka/webhooks
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<StatusCode> {
    verify_api_key(authorization_header(&headers), &state.config.polka_key).map_err(|e| {
        tracing::warn!(error = %e, "Polka webhook rejected: bad API key");
        ApiError::from(e)
    })?;

    let payload: PolkaEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Invalid webhook payload: {e}")))?;

    if payload.event != USER_UPGRADED_EVENT {
        tracing::debug!(event = %payload.event, "Ignoring Polka event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = payload.data.user_id;
    match state.store.set_chirpy_red(user_id, true).await {
        Ok(()) => {
            tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) if e.is_not_found() => Err(ApiError::NotFound("User not found".into())),
        Err(e) => Err(e.into()),
    }
}
