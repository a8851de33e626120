//! crates/anon_journal_core/src/recovery.rs
//!
//! Knowledge-based account recovery: identify, challenge, reset.
//!
//! The flow is stateless. Every step receives the username again and
//! re-derives whatever it needs from the store, so expected answers always
//! reflect the user's current data. A note posted between issuing and
//! verifying questions therefore changes the "most recent note" answer.

use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::ports::{PasswordService, PortError, UserStore};
use crate::questions::{answerable_questions, QuestionId};
use crate::scorer::score_answers;
use crate::token::RecoveryTokens;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 100;
pub const ANSWER_MAX_LEN: usize = 200;

//=========================================================================================
// Errors and Results
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("User not found")]
    NotFound,
    #[error("Recovery token is missing or invalid")]
    InvalidToken,
    #[error("An unexpected error occurred: {0}")]
    Internal(String),
}

impl From<PortError> for RecoveryError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(_) => RecoveryError::NotFound,
            other => RecoveryError::Internal(other.to_string()),
        }
    }
}

/// Outcome of an answer check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    /// Present only when the answers passed and tokens are enabled.
    pub recovery_token: Option<String>,
}

impl Verdict {
    fn incorrect() -> Self {
        Self {
            correct: false,
            recovery_token: None,
        }
    }
}

/// How many questions a challenge contains.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryPolicy {
    pub question_count: usize,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self { question_count: 3 }
    }
}

//=========================================================================================
// The Recovery Service
//=========================================================================================

#[derive(Clone)]
pub struct RecoveryService {
    store: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordService>,
    policy: RecoveryPolicy,
    tokens: Option<RecoveryTokens>,
}

impl RecoveryService {
    pub fn new(
        store: Arc<dyn UserStore>,
        passwords: Arc<dyn PasswordService>,
        policy: RecoveryPolicy,
    ) -> Self {
        Self {
            store,
            passwords,
            policy,
            tokens: None,
        }
    }

    /// Requires a signed token from `verify_answers` before a password reset.
    pub fn with_tokens(mut self, tokens: RecoveryTokens) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn tokens_enabled(&self) -> bool {
        self.tokens.is_some()
    }

    /// Step 1: does this username exist?
    pub async fn check_username(&self, username: &str) -> Result<bool, RecoveryError> {
        let username = validate_username(username)?;
        let exists = self.store.find_user_by_username(username).await?.is_some();
        Ok(exists)
    }

    /// Step 2: picks the questions to ask, in random order.
    ///
    /// Only questions the user can actually answer are candidates. An unknown
    /// username gets a sample of the whole bank instead of an error.
    pub async fn issue_questions<R>(
        &self,
        username: &str,
        rng: &mut R,
    ) -> Result<Vec<QuestionId>, RecoveryError>
    where
        R: Rng + Send + ?Sized,
    {
        let username = validate_username(username)?;

        let mut candidates = match self.store.find_user_by_username(username).await? {
            Some(user) => {
                let snapshot = self.store.get_recovery_snapshot(user.id).await?;
                answerable_questions(&user, &snapshot)
            }
            None => QuestionId::ALL.to_vec(),
        };

        candidates.shuffle(rng);
        candidates.truncate(self.policy.question_count);
        Ok(candidates)
    }

    /// Step 3: scores the submitted answers against the user's current data.
    ///
    /// `questions[i]` is the question `answers[i]` responds to. The threshold
    /// is computed over at least as many questions as `issue_questions` would
    /// hand out for this user, so answering a hand-picked subset never lowers
    /// it. An unknown username is simply incorrect.
    pub async fn verify_answers(
        &self,
        username: &str,
        questions: &[QuestionId],
        answers: &[String],
    ) -> Result<Verdict, RecoveryError> {
        let username = validate_username(username)?;
        validate_answers(questions, answers)?;

        let Some(user) = self.store.find_user_by_username(username).await? else {
            info!(username, "Recovery answers submitted for unknown username");
            return Ok(Verdict::incorrect());
        };
        let snapshot = self.store.get_recovery_snapshot(user.id).await?;

        // The bar is set by what would have been issued, not by what the client sent back.
        let issued = self
            .policy
            .question_count
            .min(answerable_questions(&user, &snapshot).len());

        let score = score_answers(
            &user,
            &snapshot,
            questions
                .iter()
                .copied()
                .zip(answers.iter().map(String::as_str)),
        );

        if !score.passed_out_of(issued) {
            warn!(
                username,
                correct = score.correct,
                considered = score.considered,
                issued,
                "Recovery answers rejected"
            );
            return Ok(Verdict::incorrect());
        }

        info!(username, correct = score.correct, "Recovery answers accepted");
        Ok(Verdict {
            correct: true,
            recovery_token: self.tokens.as_ref().map(|t| t.issue(&user, Utc::now())),
        })
    }

    /// Step 4: overwrites the user's password hash.
    ///
    /// Without tokens this trusts the caller to have passed `verify_answers`
    /// first. No sessions are revoked and nobody is notified.
    pub async fn update_password(
        &self,
        username: &str,
        new_password: &str,
        recovery_token: Option<&str>,
    ) -> Result<(), RecoveryError> {
        let username = validate_username(username)?;
        validate_password(new_password)?;

        let Some(user) = self.store.find_user_by_username(username).await? else {
            warn!(username, "Password reset requested for unknown username");
            return Err(RecoveryError::NotFound);
        };

        if let Some(tokens) = &self.tokens {
            let valid = recovery_token.is_some_and(|t| tokens.verify(&user, t, Utc::now()));
            if !valid {
                warn!(username, "Password reset rejected: bad recovery token");
                return Err(RecoveryError::InvalidToken);
            }
        }

        let hash = self.passwords.hash_password(new_password)?;
        self.store.update_password_hash(user.id, &hash).await?;
        info!(username, "Password updated through account recovery");
        Ok(())
    }
}

//=========================================================================================
// Input Validation
//=========================================================================================

/// Trims the username and checks its length.
pub fn validate_username(raw: &str) -> Result<&str, RecoveryError> {
    let username = raw.trim();
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(RecoveryError::Validation(format!(
            "username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
        )));
    }
    Ok(username)
}

fn validate_password(password: &str) -> Result<(), RecoveryError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(RecoveryError::Validation(format!(
            "password must be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_answers(questions: &[QuestionId], answers: &[String]) -> Result<(), RecoveryError> {
    if questions.is_empty() || questions.len() > QuestionId::ALL.len() {
        return Err(RecoveryError::Validation(format!(
            "between 1 and {} questions must be answered",
            QuestionId::ALL.len()
        )));
    }
    if questions.len() != answers.len() {
        return Err(RecoveryError::Validation(
            "every question needs exactly one answer".to_string(),
        ));
    }
    for (i, q) in questions.iter().enumerate() {
        if questions[..i].contains(q) {
            return Err(RecoveryError::Validation(format!(
                "question {} was answered more than once",
                q.number()
            )));
        }
    }
    if answers.iter().any(|a| a.chars().count() > ANSWER_MAX_LEN) {
        return Err(RecoveryError::Validation(format!(
            "answers must be at most {ANSWER_MAX_LEN} characters"
        )));
    }
    Ok(())
}
