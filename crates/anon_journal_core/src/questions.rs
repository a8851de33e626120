//! crates/anon_journal_core/src/questions.rs
//!
//! The recovery question bank.
//!
//! The service never asks users to register security questions. Instead each
//! question derives its expected answer from data the user already created:
//! when the account was made, what they wrote, which theme they picked. The
//! derivations are pure and are recomputed on every request.

use serde::{Deserialize, Serialize};

use crate::domain::{RecoverySnapshot, User, THEME_COUNT};

/// Identifies one of the six recovery questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    /// Month and year the account was created.
    AccountCreated,
    /// First word of the earliest journal's title.
    FirstJournalTitleWord,
    /// First word of the most recent note.
    LatestNoteFirstWord,
    /// Full title of the earliest journal.
    FirstJournalTitle,
    /// First word of the earliest journal's oldest entry.
    OldestEntryFirstWord,
    /// Currently selected theme, 1-based.
    CurrentTheme,
}

impl QuestionId {
    /// The full bank, in canonical order.
    pub const ALL: [QuestionId; 6] = [
        QuestionId::AccountCreated,
        QuestionId::FirstJournalTitleWord,
        QuestionId::LatestNoteFirstWord,
        QuestionId::FirstJournalTitle,
        QuestionId::OldestEntryFirstWord,
        QuestionId::CurrentTheme,
    ];

    /// 1-based position in the bank.
    pub fn number(self) -> u8 {
        match self {
            QuestionId::AccountCreated => 1,
            QuestionId::FirstJournalTitleWord => 2,
            QuestionId::LatestNoteFirstWord => 3,
            QuestionId::FirstJournalTitle => 4,
            QuestionId::OldestEntryFirstWord => 5,
            QuestionId::CurrentTheme => 6,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            QuestionId::AccountCreated => "What month and year did you create your account?",
            QuestionId::FirstJournalTitleWord => {
                "What is the first word of your first journal entry title?"
            }
            QuestionId::LatestNoteFirstWord => "What is the first word of your most recent note?",
            QuestionId::FirstJournalTitle => "What is the title of your first journal?",
            QuestionId::OldestEntryFirstWord => {
                "What is the first word of your oldest journal entry (if you have one)?"
            }
            QuestionId::CurrentTheme => {
                "What theme number do you currently have set? (Enter a number from 1 to 10)"
            }
        }
    }

    /// Derives the expected answer from the user's current data.
    ///
    /// Returns `None` when the question cannot be asked of this user, e.g. they
    /// have never written a journal. Never panics on missing data.
    pub fn expected_answer(self, user: &User, snapshot: &RecoverySnapshot) -> Option<String> {
        let answer = match self {
            QuestionId::AccountCreated => user.created_at.format("%B %Y").to_string(),
            QuestionId::FirstJournalTitleWord => {
                first_word(&snapshot.earliest_journal.as_ref()?.title)?.to_string()
            }
            QuestionId::LatestNoteFirstWord => {
                first_word(&snapshot.latest_post.as_ref()?.text)?.to_string()
            }
            QuestionId::FirstJournalTitle => {
                snapshot.earliest_journal.as_ref()?.title.trim().to_string()
            }
            QuestionId::OldestEntryFirstWord => {
                first_word(&snapshot.oldest_entry.as_ref()?.content)?.to_string()
            }
            QuestionId::CurrentTheme => {
                if !(0..THEME_COUNT).contains(&user.styling_index) {
                    return None;
                }
                (user.styling_index + 1).to_string()
            }
        };

        if answer.is_empty() {
            None
        } else {
            Some(answer)
        }
    }

    pub fn is_answerable(self, user: &User, snapshot: &RecoverySnapshot) -> bool {
        self.expected_answer(user, snapshot).is_some()
    }
}

/// The questions from the bank that can be asked of this user.
pub fn answerable_questions(user: &User, snapshot: &RecoverySnapshot) -> Vec<QuestionId> {
    QuestionId::ALL
        .into_iter()
        .filter(|q| q.is_answerable(user, snapshot))
        .collect()
}

/// First whitespace-delimited token, if any.
pub(crate) fn first_word(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{entry, journal, post, user_created};

    #[test]
    fn account_created_uses_english_month_and_year() {
        let user = user_created(2022, 3, 14, 0);
        let answer = QuestionId::AccountCreated.expected_answer(&user, &RecoverySnapshot::default());
        assert_eq!(answer.as_deref(), Some("March 2022"));
    }

    #[test]
    fn journal_questions_need_a_journal() {
        let user = user_created(2022, 3, 14, 0);
        let empty = RecoverySnapshot::default();

        assert_eq!(QuestionId::FirstJournalTitleWord.expected_answer(&user, &empty), None);
        assert_eq!(QuestionId::FirstJournalTitle.expected_answer(&user, &empty), None);
        assert_eq!(QuestionId::OldestEntryFirstWord.expected_answer(&user, &empty), None);
        assert_eq!(QuestionId::LatestNoteFirstWord.expected_answer(&user, &empty), None);
    }

    #[test]
    fn derives_words_and_titles_from_history() {
        let user = user_created(2022, 3, 14, 2);
        let first = journal(&user, "  New Beginnings  ");
        let snapshot = RecoverySnapshot {
            oldest_entry: Some(entry(&first, "Today I started over.")),
            earliest_journal: Some(first),
            latest_post: Some(post(&user, "Feeling okay today")),
        };

        let expect = |q: QuestionId| q.expected_answer(&user, &snapshot);
        assert_eq!(expect(QuestionId::FirstJournalTitleWord).as_deref(), Some("New"));
        assert_eq!(expect(QuestionId::FirstJournalTitle).as_deref(), Some("New Beginnings"));
        assert_eq!(expect(QuestionId::LatestNoteFirstWord).as_deref(), Some("Feeling"));
        assert_eq!(expect(QuestionId::OldestEntryFirstWord).as_deref(), Some("Today"));
        assert_eq!(expect(QuestionId::CurrentTheme).as_deref(), Some("3"));
    }

    #[test]
    fn blank_content_is_unanswerable() {
        let user = user_created(2023, 6, 1, 0);
        let first = journal(&user, "   ");
        let snapshot = RecoverySnapshot {
            oldest_entry: Some(entry(&first, "")),
            earliest_journal: Some(first),
            latest_post: Some(post(&user, " \n ")),
        };

        assert_eq!(
            answerable_questions(&user, &snapshot),
            vec![QuestionId::AccountCreated, QuestionId::CurrentTheme]
        );
    }

    #[test]
    fn out_of_range_theme_is_unanswerable() {
        for index in [-1, THEME_COUNT] {
            let user = user_created(2023, 6, 1, index);
            assert!(!QuestionId::CurrentTheme.is_answerable(&user, &RecoverySnapshot::default()));
        }
        let last = user_created(2023, 6, 1, THEME_COUNT - 1);
        let answer = QuestionId::CurrentTheme.expected_answer(&last, &RecoverySnapshot::default());
        assert_eq!(answer.as_deref(), Some("10"));
    }

    #[test]
    fn numbers_follow_canonical_order() {
        let numbers: Vec<u8> = QuestionId::ALL.iter().map(|q| q.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }
}
