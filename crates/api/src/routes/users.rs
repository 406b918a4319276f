//! User accounts and session routes

use axum::{
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chirpy_shared::PublicUser;
use serde::{Deserialize, Serialize};

use crate::{
    auth::{authorization_header, extract_bearer, AuthUser, SessionToken},
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl CredentialsRequest {
    fn validate(&self) -> ApiResult<()> {
        if self.email.trim().is_empty() {
            return Err(ApiError::Validation("Email is required".into()));
        }
        if self.password.is_empty() {
            return Err(ApiError::Validation("Password is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub token: SessionToken,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: SessionToken,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    req.validate()?;
    let user = state.sessions.register(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<PublicUser>> {
    req.validate()?;
    let user = state
        .sessions
        .update_credentials(auth_user.user_id, &req.email, &req.password)
        .await?;
    Ok(Json(user))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state.sessions.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        user: outcome.user,
        token: outcome.session_token,
        refresh_token: outcome.refresh_token.into_string(),
    }))
}

/// POST /api/refresh
///
/// The refresh token is presented as `Authorization: Bearer <token>`.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<TokenResponse>> {
    let refresh_token = extract_bearer(authorization_header(&headers))?;
    let token = state.sessions.refresh(refresh_token).await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /api/revoke
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let refresh_token = extract_bearer(authorization_header(&headers))?;
    state.sessions.revoke(refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
