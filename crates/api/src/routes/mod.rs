//! API routes

pub mod admin;
pub mod chirps;
pub mod health;
pub mod users;
pub mod webhooks;


use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::{auth::require_auth, state::AppState};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/healthz", get(health::healthz))
        .route("/api/users", post(users::create_user))
        .route("/api/login", post(users::login))
        .route("/api/refresh", post(users::refresh))
        .route("/api/revoke", post(users::revoke))
        .route("/api/chirps", get(chirps::list_chirps))
        .route("/api/chirps/{chirp_id}", get(chirps::get_chirp))
        .route("/api/polka/webhooks", post(webhooks::polka_webhook))
        .route("/admin/metrics", get(admin::metrics))
        .route("/admin/reset", post(admin::reset));

    // Session token required
    let protected_routes = Router::new()
        .route("/api/users", put(users::update_user))
        .route("/api/chirps", post(chirps::create_chirp))
        .route("/api/chirps/{chirp_id}", delete(chirps::delete_chirp))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let app_routes = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.fileserver_root))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin::count_hits,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(app_routes)
        .with_state(state)
}
