//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification.

use crate::web::{auth, recover};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        recover::check_username_handler,
        recover::issue_questions_handler,
        recover::verify_answers_handler,
        recover::update_password_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::update_styling_handler,
        auth::delete_account_handler,
    ),
    components(
        schemas(
            recover::UsernameRequest,
            recover::CheckUsernameResponse,
            recover::QuestionView,
            recover::QuestionsResponse,
            recover::VerifyAnswersRequest,
            recover::VerifyAnswersResponse,
            recover::UpdatePasswordRequest,
            recover::UpdatePasswordResponse,
            auth::SignupRequest,
            auth::SignupResponse,
            auth::LoginRequest,
            auth::AccountResponse,
            auth::UpdateStylingRequest,
            auth::DeleteAccountResponse,
        )
    ),
    tags(
        (name = "Anonymous Journal API", description = "Account signup, login and knowledge-based recovery.")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/recover/check-username",
            "/recover/questions",
            "/recover/verify-answers",
            "/recover/update-password",
            "/auth/signup",
            "/auth/login",
            "/auth/update-styling",
            "/auth/delete-account",
        ] {
            assert!(doc.paths.get_path_item(path).is_some(), "{path} is not documented");
        }
    }
}
