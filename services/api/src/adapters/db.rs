//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `UserStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use anon_journal_core::domain::{Journal, JournalEntry, Post, RecoverySnapshot, User};
use anon_journal_core::ports::{PortError, PortResult, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Postgres error code for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `UserStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    password_hash: String,
    styling: i32,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            created_at: self.created_at,
            styling_index: self.styling,
        }
    }
}

#[derive(FromRow)]
struct PostRecord {
    id: Uuid,
    user_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
}
impl PostRecord {
    fn to_domain(self) -> Post {
        Post {
            id: self.id,
            user_id: self.user_id,
            text: self.text,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct JournalRecord {
    id: Uuid,
    user_id: Uuid,
    title: String,
    is_private: bool,
    created_at: DateTime<Utc>,
}
impl JournalRecord {
    fn to_domain(self) -> Journal {
        Journal {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            is_private: self.is_private,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct JournalEntryRecord {
    id: Uuid,
    journal_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}
impl JournalEntryRecord {
    fn to_domain(self) -> JournalEntry {
        JournalEntry {
            id: self.id,
            journal_id: self.journal_id,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `UserStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserStore for DbAdapter {
    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password_hash, styling, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(UserRecord::to_domain))
    }

    async fn get_recovery_snapshot(&self, user_id: Uuid) -> PortResult<RecoverySnapshot> {
        let earliest_journal = sqlx::query_as::<_, JournalRecord>(
            "SELECT id, user_id, title, is_private, created_at FROM journals \
             WHERE user_id = $1 ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(JournalRecord::to_domain);

        let oldest_entry = match &earliest_journal {
            Some(journal) => sqlx::query_as::<_, JournalEntryRecord>(
                "SELECT id, journal_id, content, created_at FROM journal_entries \
                 WHERE journal_id = $1 ORDER BY created_at ASC, id ASC LIMIT 1",
            )
            .bind(journal.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(JournalEntryRecord::to_domain),
            None => None,
        };

        let latest_post = sqlx::query_as::<_, PostRecord>(
            "SELECT id, user_id, text, created_at FROM posts \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(PostRecord::to_domain);

        Ok(RecoverySnapshot {
            earliest_journal,
            oldest_entry,
            latest_post,
        })
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, username, password_hash, styling, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let taken = matches!(
                &e,
                sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
            );
            if taken {
                PortError::Conflict(format!("Username {} is taken", username))
            } else {
                unexpected(e)
            }
        })?;

        Ok(record.to_domain())
    }

    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> PortResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn update_styling(&self, user_id: Uuid, styling_index: i32) -> PortResult<()> {
        let result = sqlx::query("UPDATE users SET styling = $1 WHERE id = $2")
            .bind(styling_index)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        // Posts, journals and entries go with it through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }
}
