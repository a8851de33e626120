pub mod auth;
pub mod recover;
pub mod rest;
pub mod state;

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::web::state::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Builds the API routes on top of the shared state.
///
/// CORS and the Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    let recover_routes = Router::new()
        .route("/recover/check-username", post(recover::check_username_handler))
        .route("/recover/questions", post(recover::issue_questions_handler))
        .route("/recover/verify-answers", post(recover::verify_answers_handler))
        .route("/recover/update-password", post(recover::update_password_handler));

    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/update-styling", post(auth::update_styling_handler))
        .route("/auth/delete-account", post(auth::delete_account_handler));

    Router::new()
        .merge(recover_routes)
        .merge(auth_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
}
