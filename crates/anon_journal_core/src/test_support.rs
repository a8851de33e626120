//! Fixtures and fake ports shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{Journal, JournalEntry, Post, RecoverySnapshot, User};
use crate::ports::{PasswordService, PortError, PortResult, UserStore};

pub fn user_created(year: i32, month: u32, day: u32, styling_index: i32) -> User {
    User {
        id: Uuid::new_v4(),
        username: "quiet_otter_42".to_string(),
        password_hash: "plain:old-password".to_string(),
        created_at: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
        styling_index,
    }
}

pub fn journal(user: &User, title: &str) -> Journal {
    Journal {
        id: Uuid::new_v4(),
        user_id: user.id,
        title: title.to_string(),
        is_private: false,
        created_at: user.created_at + Duration::days(1),
    }
}

pub fn entry(journal: &Journal, content: &str) -> JournalEntry {
    JournalEntry {
        id: Uuid::new_v4(),
        journal_id: journal.id,
        content: content.to_string(),
        created_at: journal.created_at + Duration::hours(1),
    }
}

pub fn post(user: &User, text: &str) -> Post {
    Post {
        id: Uuid::new_v4(),
        user_id: user.id,
        text: text.to_string(),
        created_at: user.created_at + Duration::days(2),
    }
}

/// A `UserStore` over plain maps. Snapshots are seeded directly.
#[derive(Default)]
pub struct FakeStore {
    pub users: Mutex<HashMap<String, User>>,
    pub snapshots: Mutex<HashMap<Uuid, RecoverySnapshot>>,
    /// When set, every call fails with `PortError::Unexpected`.
    pub broken: bool,
}

impl FakeStore {
    pub fn with_user(user: User, snapshot: RecoverySnapshot) -> Self {
        let store = Self::default();
        store.snapshots.lock().unwrap().insert(user.id, snapshot);
        store.users.lock().unwrap().insert(user.username.clone(), user);
        store
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn password_hash_of(&self, username: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .get(username)
            .map(|u| u.password_hash.clone())
    }

    pub fn styling_of(&self, username: &str) -> Option<i32> {
        self.users
            .lock()
            .unwrap()
            .get(username)
            .map(|u| u.styling_index)
    }

    fn check(&self) -> PortResult<()> {
        if self.broken {
            Err(PortError::Unexpected("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for FakeStore {
    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        self.check()?;
        Ok(self.users.lock().unwrap().get(username).cloned())
    }

    async fn get_recovery_snapshot(&self, user_id: Uuid) -> PortResult<RecoverySnapshot> {
        self.check()?;
        Ok(self
            .snapshots
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(username) {
            return Err(PortError::Conflict(username.to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
            styling_index: 0,
        };
        users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> PortResult<()> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .values_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {user_id} not found")))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn update_styling(&self, user_id: Uuid, styling_index: i32) -> PortResult<()> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let user = users
            .values_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {user_id} not found")))?;
        user.styling_index = styling_index;
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|_, u| u.id != user_id);
        if users.len() == before {
            return Err(PortError::NotFound(format!("User {user_id} not found")));
        }
        self.snapshots.lock().unwrap().remove(&user_id);
        Ok(())
    }
}

/// Reversible "hashing" so tests can assert on what was stored.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash_password(&self, plaintext: &str) -> PortResult<String> {
        Ok(format!("plain:{plaintext}"))
    }

    fn verify_password(&self, plaintext: &str, hash: &str) -> PortResult<bool> {
        let stored = hash
            .strip_prefix("plain:")
            .ok_or_else(|| PortError::Unexpected("malformed hash".to_string()))?;
        Ok(stored == plaintext)
    }
}
