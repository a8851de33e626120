//! crates/anon_journal_core/src/token.rs
//!
//! Short-lived recovery tokens that tie a successful answer check to the
//! password update that follows it.
//!
//! A token is `<expires_unix>.<hex hmac>` where the MAC covers the username,
//! the expiry and the user's password hash at the time of issue. Nothing is
//! stored server side. Once the password changes the hash changes, so a token
//! can only be redeemed once.

use chrono::{DateTime, Duration, Utc};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::User;

type HmacSha256 = Hmac<Sha256>;

/// Issues and checks recovery tokens with a server secret.
#[derive(Clone)]
pub struct RecoveryTokens {
    keyed: HmacSha256,
    ttl: Duration,
}

impl std::fmt::Debug for RecoveryTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryTokens")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl RecoveryTokens {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, InvalidLength> {
        Ok(Self {
            keyed: HmacSha256::new_from_slice(secret)?,
            ttl,
        })
    }

    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> String {
        let expires = (now + self.ttl).timestamp();
        let tag = hex::encode(self.mac(user, expires).finalize().into_bytes());
        format!("{expires}.{tag}")
    }

    /// True if `token` was issued for this user, is unexpired and the
    /// password has not changed since.
    pub fn verify(&self, user: &User, token: &str, now: DateTime<Utc>) -> bool {
        let Some((expires, tag)) = token.split_once('.') else {
            return false;
        };
        let Ok(expires) = expires.parse::<i64>() else {
            return false;
        };
        if expires < now.timestamp() {
            return false;
        }
        let Ok(tag) = hex::decode(tag) else {
            return false;
        };
        self.mac(user, expires).verify_slice(&tag).is_ok()
    }

    fn mac(&self, user: &User, expires: i64) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(user.username.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac.update(b"\n");
        mac.update(user.password_hash.as_bytes());
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::user_created;

    fn tokens() -> RecoveryTokens {
        RecoveryTokens::new(b"test-secret", Duration::minutes(10)).unwrap()
    }

    #[test]
    fn issued_token_verifies() {
        let user = user_created(2022, 3, 1, 0);
        let now = Utc::now();
        let token = tokens().issue(&user, now);
        assert!(tokens().verify(&user, &token, now + Duration::minutes(9)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = user_created(2022, 3, 1, 0);
        let now = Utc::now();
        let token = tokens().issue(&user, now);
        assert!(!tokens().verify(&user, &token, now + Duration::minutes(11)));
    }

    #[test]
    fn token_is_bound_to_user_and_password() {
        let user = user_created(2022, 3, 1, 0);
        let now = Utc::now();
        let token = tokens().issue(&user, now);

        let mut other = user.clone();
        other.username = "someone_else".to_string();
        assert!(!tokens().verify(&other, &token, now));

        let mut reset = user.clone();
        reset.password_hash = "plain:changed".to_string();
        assert!(!tokens().verify(&reset, &token, now));
    }

    #[test]
    fn wrong_secret_or_garbage_is_rejected() {
        let user = user_created(2022, 3, 1, 0);
        let now = Utc::now();
        let token = tokens().issue(&user, now);

        let other = RecoveryTokens::new(b"another-secret", Duration::minutes(10)).unwrap();
        assert!(!other.verify(&user, &token, now));
        assert!(!tokens().verify(&user, "", now));
        assert!(!tokens().verify(&user, "not-a-token", now));
        assert!(!tokens().verify(&user, "123.zz", now));
    }
}
