//! services/api/src/web/recover.rs
//!
//! Account recovery endpoints: check a username, fetch questions, verify
//! answers and set a new password.
//!
//! Every request carries the username again; nothing is kept between steps.

use anon_journal_core::QuestionId;
use axum::{extract::State, Json};
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
pub struct UsernameRequest {
    #[serde(default)]
    pub username: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CheckUsernameResponse {
    pub exists: bool,
}

/// A question as shown to the client.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct QuestionView {
    /// Echo this back in `verify-answers`.
    #[schema(value_type = String, example = "account_created")]
    pub id: QuestionId,
    pub number: u8,
    pub prompt: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct QuestionsResponse {
    pub questions: Vec<QuestionView>,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyAnswersRequest {
    #[serde(default)]
    pub username: String,
    /// The question ids that were issued, in the order answered.
    #[schema(value_type = Vec<String>)]
    pub questions: Vec<QuestionId>,
    /// `answers[i]` answers `questions[i]`.
    pub answers: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct VerifyAnswersResponse {
    pub correct: bool,
    /// Only returned on success when recovery tokens are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_token: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub recovery_token: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdatePasswordResponse {
    pub success: bool,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /recover/check-username - Does this username exist?
#[utoipa::path(
    post,
    path = "/recover/check-username",
    request_body = UsernameRequest,
    responses(
        (status = 200, description = "Lookup done", body = CheckUsernameResponse),
        (status = 400, description = "Username missing or of invalid length"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn check_username_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UsernameRequest>,
) -> Result<Json<CheckUsernameResponse>, ApiError> {
    let exists = state.recovery.check_username(&req.username).await?;
    Ok(Json(CheckUsernameResponse { exists }))
}

/// POST /recover/questions - Pick the recovery questions to ask.
#[utoipa::path(
    post,
    path = "/recover/questions",
    request_body = UsernameRequest,
    responses(
        (status = 200, description = "Questions issued", body = QuestionsResponse),
        (status = 400, description = "Username missing or of invalid length"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn issue_questions_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UsernameRequest>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let mut rng = StdRng::from_entropy();
    let questions = state
        .recovery
        .issue_questions(&req.username, &mut rng)
        .await?
        .into_iter()
        .map(|id| QuestionView {
            id,
            number: id.number(),
            prompt: id.prompt().to_string(),
        })
        .collect();

    Ok(Json(QuestionsResponse { questions }))
}

/// POST /recover/verify-answers - Check answers to the issued questions.
#[utoipa::path(
    post,
    path = "/recover/verify-answers",
    request_body = VerifyAnswersRequest,
    responses(
        (status = 200, description = "Answers checked", body = VerifyAnswersResponse),
        (status = 400, description = "Malformed submission"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn verify_answers_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyAnswersRequest>,
) -> Result<Json<VerifyAnswersResponse>, ApiError> {
    let verdict = state
        .recovery
        .verify_answers(&req.username, &req.questions, &req.answers)
        .await?;

    Ok(Json(VerifyAnswersResponse {
        correct: verdict.correct,
        recovery_token: verdict.recovery_token,
    }))
}

/// POST /recover/update-password - Set a new password after recovery.
#[utoipa::path(
    post,
    path = "/recover/update-password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = UpdatePasswordResponse),
        (status = 400, description = "Invalid username or password length"),
        (status = 401, description = "Recovery token missing or invalid"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_password_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<UpdatePasswordResponse>, ApiError> {
    state
        .recovery
        .update_password(&req.username, &req.password, req.recovery_token.as_deref())
        .await?;

    Ok(Json(UpdatePasswordResponse { success: true }))
}
