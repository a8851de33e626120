//! crates/anon_journal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or hashers.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{RecoverySnapshot, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, hashing).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait UserStore: Send + Sync {
    // --- User Lookup ---
    /// Exact-match lookup. A missing user is `Ok(None)`, not an error.
    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>>;

    /// Earliest journal, its oldest entry and the latest note of a user.
    async fn get_recovery_snapshot(&self, user_id: Uuid) -> PortResult<RecoverySnapshot>;

    // --- User Mutation ---
    /// Fails with `PortError::Conflict` if the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User>;

    /// Fails with `PortError::NotFound` if the user no longer exists.
    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> PortResult<()>;

    /// Fails with `PortError::NotFound` if the user no longer exists.
    async fn update_styling(&self, user_id: Uuid, styling_index: i32) -> PortResult<()>;

    /// Removes the user together with their notes, journals and entries.
    async fn delete_user(&self, user_id: Uuid) -> PortResult<()>;
}

pub trait PasswordService: Send + Sync {
    /// Produces a self-describing hash (salt and parameters included).
    fn hash_password(&self, plaintext: &str) -> PortResult<String>;

    /// Returns `Ok(false)` on mismatch; errors only on a malformed hash.
    fn verify_password(&self, plaintext: &str, hash: &str) -> PortResult<bool>;
}
