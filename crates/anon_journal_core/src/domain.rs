//! crates/anon_journal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Number of background themes a user can pick from.
pub const THEME_COUNT: i32 = 10;

/// A registered user, including the sensitive password hash.
///
/// Only the core and the storage adapters see this struct; anything that
/// leaves the service goes through [`Account`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    /// 0-based index into the theme palette.
    pub styling_index: i32,
}

impl User {
    pub fn to_account(&self) -> Account {
        Account {
            username: self.username.clone(),
            styling_index: self.styling_index,
            created_at: self.created_at,
        }
    }
}

// Public view of a user - safe to hand to the web layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub styling_index: i32,
    pub created_at: DateTime<Utc>,
}

/// A short public note.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A longer journal, optionally private.
#[derive(Debug, Clone)]
pub struct Journal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

/// A single free-form text block inside a journal.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub id: Uuid,
    pub journal_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// The slice of a user's history that account recovery looks at.
///
/// Every field may be absent: a brand new account has no journals and no notes.
#[derive(Debug, Clone, Default)]
pub struct RecoverySnapshot {
    /// The earliest-created journal.
    pub earliest_journal: Option<Journal>,
    /// The oldest entry of `earliest_journal`.
    pub oldest_entry: Option<JournalEntry>,
    /// The most recently created note.
    pub latest_post: Option<Post>,
}
