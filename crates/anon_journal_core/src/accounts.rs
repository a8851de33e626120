//! crates/anon_journal_core/src/accounts.rs
//!
//! Signup and credential checks. Users never choose a username and never
//! give an email: the server picks a random handle and only stores a
//! password hash.

use std::sync::Arc;

use rand::Rng;
use tracing::{error, info};

use crate::domain::{Account, User, THEME_COUNT};
use crate::ports::{PasswordService, PortError, UserStore};
use crate::recovery::{PASSWORD_MAX_LEN, PASSWORD_MIN_LEN, USERNAME_MAX_LEN, USERNAME_MIN_LEN};

/// Signup passwords are capped lower than reset passwords.
pub const SIGNUP_PASSWORD_MAX_LEN: usize = 30;

const USERNAME_PREFIX: &str = "anon_";
const USERNAME_SUFFIX_LEN: usize = 10;
const USERNAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const MAX_USERNAME_ATTEMPTS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("An unexpected error occurred: {0}")]
    Internal(String),
}

impl From<PortError> for AccountError {
    fn from(err: PortError) -> Self {
        match err {
            // The account vanished between the credential check and the write.
            PortError::NotFound(_) => AccountError::InvalidCredentials,
            other => AccountError::Internal(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { store, passwords }
    }

    /// Creates an account under a freshly generated username and returns it.
    pub async fn signup<R>(&self, password: &str, rng: &mut R) -> Result<String, AccountError>
    where
        R: Rng + Send + ?Sized,
    {
        let len = password.chars().count();
        if !(PASSWORD_MIN_LEN..=SIGNUP_PASSWORD_MAX_LEN).contains(&len) {
            return Err(AccountError::Validation(format!(
                "password must be between {PASSWORD_MIN_LEN} and {SIGNUP_PASSWORD_MAX_LEN} characters"
            )));
        }

        let password_hash = self.passwords.hash_password(password)?;

        // Collisions are astronomically rare; a handful of retries is plenty.
        for _ in 0..MAX_USERNAME_ATTEMPTS {
            let username = generate_username(&mut *rng);
            match self.store.create_user(&username, &password_hash).await {
                Ok(user) => {
                    info!(username = %user.username, "New account created");
                    return Ok(user.username);
                }
                Err(PortError::Conflict(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        error!("Could not find a free username after {MAX_USERNAME_ATTEMPTS} attempts");
        Err(AccountError::Internal(
            "could not allocate a username".to_string(),
        ))
    }

    /// Checks a username/password pair.
    ///
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<Account, AccountError> {
        let user = self.authenticate(username, password).await?;
        Ok(user.to_account())
    }

    /// Selects one of the `THEME_COUNT` themes for the account.
    pub async fn update_styling(
        &self,
        username: &str,
        password: &str,
        styling_index: i32,
    ) -> Result<Account, AccountError> {
        if !(0..THEME_COUNT).contains(&styling_index) {
            return Err(AccountError::Validation(format!(
                "styling must be between 0 and {}",
                THEME_COUNT - 1
            )));
        }
        let mut user = self.authenticate(username, password).await?;

        self.store.update_styling(user.id, styling_index).await?;
        info!(username = %user.username, styling_index, "Theme updated");
        user.styling_index = styling_index;
        Ok(user.to_account())
    }

    /// Deletes the account and everything written under it.
    pub async fn delete_account(&self, username: &str, password: &str) -> Result<(), AccountError> {
        let user = self.authenticate(username, password).await?;

        self.store.delete_user(user.id).await?;
        info!(username = %user.username, "Account deleted");
        Ok(())
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AccountError> {
        if !is_valid_login_username(username) {
            return Err(AccountError::Validation(
                "username can only contain letters, numbers, underscores and dashes".to_string(),
            ));
        }
        let len = password.chars().count();
        if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
            return Err(AccountError::InvalidCredentials);
        }

        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self.passwords.verify_password(password, &user.password_hash)? {
            return Err(AccountError::InvalidCredentials);
        }
        Ok(user)
    }
}

/// `anon_` followed by ten random lowercase letters or digits.
pub fn generate_username<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..USERNAME_SUFFIX_LEN)
        .map(|_| USERNAME_ALPHABET[rng.gen_range(0..USERNAME_ALPHABET.len())] as char)
        .collect();
    format!("{USERNAME_PREFIX}{suffix}")
}

fn is_valid_login_username(username: &str) -> bool {
    (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
