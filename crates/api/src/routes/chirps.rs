//! Chirp routes

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use chirpy_shared::Chirp;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::{AuthError, AuthUser},
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Maximum chirp length, in characters
pub const MAX_CHIRP_LENGTH: usize = 140;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const CENSOR: &str = "****";

#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

/// Mask profane words with `****`.
///
/// Matches are substring matches on the lowercase and capitalized spellings.
pub fn clean_body(body: &str) -> String {
    let mut cleaned = body.to_string();
    for word in PROFANE_WORDS {
        cleaned = cleaned.replace(word, CENSOR);
        cleaned = cleaned.replace(&capitalize(word), CENSOR);
    }
    cleaned
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_chirp_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Chirp not found".into()))
}

/// POST /api/chirps
pub async fn create_chirp(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CreateChirpRequest>,
) -> ApiResult<(StatusCode, Json<Chirp>)> {
    if req.body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ApiError::Validation("Chirp is too long".into()));
    }

    let body = clean_body(&req.body);
    let chirp = state
        .store
        .create_chirp(&body, auth_user.user_id)
        .await
        // A token that outlived its user is treated as a bad credential
        .map_err(|e| ApiError::from(AuthError::from(e)))?;

    tracing::info!(chirp_id = %chirp.id, user_id = %chirp.user_id, "Chirp created");
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// GET /api/chirps
pub async fn list_chirps(State(state): State<AppState>) -> ApiResult<Json<Vec<Chirp>>> {
    let chirps = state.store.list_chirps().await?;
    Ok(Json(chirps))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> ApiResult<Json<Chirp>> {
    let chirp_id = parse_chirp_id(&chirp_id)?;
    match state.store.get_chirp(chirp_id).await {
        Ok(chirp) => Ok(Json(chirp)),
        Err(e) if e.is_not_found() => Err(ApiError::NotFound("Chirp not found".into())),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/chirps/{chirp_id}
///
/// Only the author may delete a chirp.
pub async fn delete_chirp(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(chirp_id): Path<String>,
) -> ApiResult<StatusCode> {
    let chirp_id = parse_chirp_id(&chirp_id)?;
    let chirp = match state.store.get_chirp(chirp_id).await {
        Ok(chirp) => chirp,
        Err(e) if e.is_not_found() => return Err(ApiError::NotFound("Chirp not found".into())),
        Err(e) => return Err(e.into()),
    };

    if chirp.user_id != auth_user.user_id {
        tracing::warn!(
            chirp_id = %chirp_id,
            user_id = %auth_user.user_id,
            "Delete rejected: not the author"
        );
        return Err(ApiError::Forbidden(
            "You can only delete your own chirps".into(),
        ));
    }

    state.store.delete_chirp(chirp_id).await?;
    tracing::info!(chirp_id = %chirp_id, user_id = %auth_user.user_id, "Chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}
