//! services/api/src/adapters/memory.rs
//!
//! An in-memory implementation of the `UserStore` port. Used by the test
//! suite and when the service is started without a `DATABASE_URL`.

use std::collections::HashMap;

use anon_journal_core::domain::{Journal, JournalEntry, Post, RecoverySnapshot, User};
use anon_journal_core::ports::{PortError, PortResult, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: Vec<Post>,
    journals: Vec<Journal>,
    entries: Vec<JournalEntry>,
}

/// Keeps users and their content in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Seeding helpers (content CRUD lives outside this service) ---

    pub async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
        styling_index: i32,
    ) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
            styling_index,
        };
        self.tables.write().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn add_post(&self, user_id: Uuid, text: &str, created_at: DateTime<Utc>) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            text: text.to_string(),
            created_at,
        };
        self.tables.write().await.posts.push(post.clone());
        post
    }

    pub async fn add_journal(
        &self,
        user_id: Uuid,
        title: &str,
        is_private: bool,
        created_at: DateTime<Utc>,
    ) -> Journal {
        let journal = Journal {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            is_private,
            created_at,
        };
        self.tables.write().await.journals.push(journal.clone());
        journal
    }

    pub async fn add_journal_entry(
        &self,
        journal_id: Uuid,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> JournalEntry {
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            journal_id,
            content: content.to_string(),
            created_at,
        };
        self.tables.write().await.entries.push(entry.clone());
        entry
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_recovery_snapshot(&self, user_id: Uuid) -> PortResult<RecoverySnapshot> {
        let tables = self.tables.read().await;

        // Ties go to the earliest inserted row for "first", the latest for "most recent".
        let earliest_journal = tables
            .journals
            .iter()
            .filter(|j| j.user_id == user_id)
            .min_by_key(|j| j.created_at)
            .cloned();

        let oldest_entry = earliest_journal.as_ref().and_then(|journal| {
            tables
                .entries
                .iter()
                .filter(|e| e.journal_id == journal.id)
                .min_by_key(|e| e.created_at)
                .cloned()
        });

        let latest_post = tables
            .posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .max_by_key(|p| p.created_at)
            .cloned();

        Ok(RecoverySnapshot {
            earliest_journal,
            oldest_entry,
            latest_post,
        })
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == username) {
            return Err(PortError::Conflict(format!("Username {} is taken", username)));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
            styling_index: 0,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn update_styling(&self, user_id: Uuid, styling_index: i32) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        user.styling_index = styling_index;
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&user_id).is_none() {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        tables.posts.retain(|p| p.user_id != user_id);
        let journal_ids: Vec<Uuid> = tables
            .journals
            .iter()
            .filter(|j| j.user_id == user_id)
            .map(|j| j.id)
            .collect();
        tables.journals.retain(|j| j.user_id != user_id);
        tables.entries.retain(|e| !journal_ids.contains(&e.journal_id));
        Ok(())
    }
}
