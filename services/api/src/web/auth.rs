//! services/api/src/web/auth.rs
//!
//! Account endpoints. Signup hands out a server-generated username and login
//! only confirms credentials. Changing the theme and deleting the account
//! take the credentials again, since session issuance is up to the frontend.

use anon_journal_core::Account;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    /// Write this down: it is the only way back into the account.
    pub username: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStylingRequest {
    pub username: String,
    pub password: String,
    /// 0-based theme index.
    pub styling: i32,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DeleteAccountResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub username: String,
    pub styling: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            username: account.username,
            styling: account.styling_index,
            created_at: account.created_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new anonymous account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = SignupResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rng = StdRng::from_entropy();
    let username = state.accounts.signup(&req.password, &mut rng).await?;
    Ok((StatusCode::CREATED, Json(SignupResponse { username })))
}

/// POST /auth/login - Check a username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials valid", body = AccountResponse),
        (status = 400, description = "Malformed username"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.login(&req.username, &req.password).await?;
    Ok(Json(AccountResponse::from(account)))
}

/// POST /auth/update-styling - Pick a theme
#[utoipa::path(
    post,
    path = "/auth/update-styling",
    request_body = UpdateStylingRequest,
    responses(
        (status = 200, description = "Theme updated", body = AccountResponse),
        (status = 400, description = "Theme index out of range"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_styling_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateStylingRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .update_styling(&req.username, &req.password, req.styling)
        .await?;
    Ok(Json(AccountResponse::from(account)))
}

/// POST /auth/delete-account - Delete the account and all of its content
#[utoipa::path(
    post,
    path = "/auth/delete-account",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Account deleted", body = DeleteAccountResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_account_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<DeleteAccountResponse>, ApiError> {
    state
        .accounts
        .delete_account(&req.username, &req.password)
        .await?;
    Ok(Json(DeleteAccountResponse { success: true }))
}
