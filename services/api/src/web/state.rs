//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and how it is wired from config.

use crate::config::Config;
use crate::error::ApiError;
use anon_journal_core::{
    AccountService, PasswordService, RecoveryPolicy, RecoveryService, RecoveryTokens, UserStore,
};
use chrono::Duration;
use std::sync::Arc;
use tracing::warn;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Holds no per-request data: every recovery step re-reads the store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recovery: RecoveryService,
    pub accounts: AccountService,
}

impl AppState {
    /// Builds the services on top of the given store and password hasher.
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn UserStore>,
        passwords: Arc<dyn PasswordService>,
    ) -> Result<Self, ApiError> {
        let policy = RecoveryPolicy {
            question_count: config.recovery_question_count,
        };
        let mut recovery = RecoveryService::new(store.clone(), passwords.clone(), policy);

        match &config.recovery_token_secret {
            Some(secret) => {
                let ttl = Duration::seconds(config.recovery_token_ttl_secs);
                let tokens = RecoveryTokens::new(secret.as_bytes(), ttl)
                    .map_err(|e| ApiError::Internal(format!("Invalid recovery token secret: {e}")))?;
                recovery = recovery.with_tokens(tokens);
            }
            None => warn!(
                "RECOVERY_TOKEN_SECRET is not set; password resets are not bound to a verified answer check"
            ),
        }

        Ok(Self {
            config,
            recovery,
            accounts: AccountService::new(store, passwords),
        })
    }
}
