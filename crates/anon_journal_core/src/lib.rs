pub mod accounts;
pub mod domain;
pub mod ports;
pub mod questions;
pub mod recovery;
pub mod scorer;
pub mod token;

#[cfg(test)]
mod test_support;

pub use accounts::{AccountError, AccountService};
pub use domain::{Account, Journal, JournalEntry, Post, RecoverySnapshot, User, THEME_COUNT};
pub use ports::{PasswordService, PortError, PortResult, UserStore};
pub use questions::QuestionId;
pub use recovery::{RecoveryError, RecoveryPolicy, RecoveryService, Verdict};
pub use scorer::Score;
pub use token::RecoveryTokens;
