//! crates/anon_journal_core/src/scorer.rs
//!
//! Compares submitted recovery answers with the answers derived from the
//! user's data and decides whether enough of them match.

use crate::domain::{RecoverySnapshot, User};
use crate::questions::{first_word, QuestionId};

/// Correct answers required out of a full six-question challenge.
const FULL_BANK_THRESHOLD: usize = 3;

/// Tally of one verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    /// Submitted questions that were answerable for the user.
    pub considered: usize,
    /// How many of those were answered correctly.
    pub correct: usize,
}

impl Score {
    pub fn passed(&self) -> bool {
        self.passed_out_of(0)
    }

    /// Like `passed`, but the threshold is taken over at least `issued`
    /// questions, so answering fewer than were asked cannot lower the bar.
    pub fn passed_out_of(&self, issued: usize) -> bool {
        self.considered > 0 && self.correct >= required_correct(self.considered.max(issued))
    }
}

/// Correct answers needed when `asked` questions were considered.
///
/// Scales 3-of-6 proportionally, rounding up, and never asks for more than
/// one correct answer per question.
pub fn required_correct(asked: usize) -> usize {
    let scaled = (asked * FULL_BANK_THRESHOLD).div_ceil(QuestionId::ALL.len());
    scaled.clamp(1, asked.max(1))
}

/// Checks a single submitted answer against the expected one.
pub fn answer_matches(question: QuestionId, expected: &str, submitted: &str) -> bool {
    match question {
        QuestionId::AccountCreated => {
            let submitted = strip_whitespace(submitted);
            !submitted.is_empty() && submitted == strip_whitespace(expected)
        }
        QuestionId::FirstJournalTitleWord
        | QuestionId::LatestNoteFirstWord
        | QuestionId::OldestEntryFirstWord => {
            let submitted = submitted.trim();
            match first_word(expected) {
                Some(word) => !submitted.is_empty() && submitted.to_lowercase() == word.to_lowercase(),
                None => false,
            }
        }
        QuestionId::FirstJournalTitle => {
            let submitted = submitted.trim();
            !submitted.is_empty() && submitted.to_lowercase() == expected.trim().to_lowercase()
        }
        QuestionId::CurrentTheme => {
            let digits: String = submitted.chars().filter(|c| c.is_ascii_digit()).collect();
            !digits.is_empty() && digits == expected
        }
    }
}

/// Scores a set of `(question, answer)` pairs against the user's data.
///
/// Questions that are not answerable for this user are skipped entirely.
pub fn score_answers<'a, I>(user: &User, snapshot: &RecoverySnapshot, answers: I) -> Score
where
    I: IntoIterator<Item = (QuestionId, &'a str)>,
{
    let mut score = Score::default();
    for (question, submitted) in answers {
        let Some(expected) = question.expected_answer(user, snapshot) else {
            continue;
        };
        score.considered += 1;
        if answer_matches(question, &expected, submitted) {
            score.correct += 1;
        }
    }
    score
}

fn strip_whitespace(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{journal, post, user_created};

    #[test]
    fn threshold_scales_with_questions_asked() {
        assert_eq!(required_correct(6), 3);
        assert_eq!(required_correct(5), 3);
        assert_eq!(required_correct(4), 2);
        assert_eq!(required_correct(3), 2);
        assert_eq!(required_correct(2), 1);
        assert_eq!(required_correct(1), 1);
    }

    #[test]
    fn nothing_considered_never_passes() {
        assert!(!Score { considered: 0, correct: 0 }.passed());
    }

    #[test]
    fn short_submissions_are_held_to_the_issued_threshold() {
        let one_right = Score { considered: 1, correct: 1 };
        assert!(one_right.passed());
        assert!(!one_right.passed_out_of(3));
        assert!(!one_right.passed_out_of(6));
        assert!(one_right.passed_out_of(2));

        let two_of_three = Score { considered: 3, correct: 2 };
        assert!(two_of_three.passed_out_of(3));
        assert!(two_of_three.passed_out_of(1));
    }

    #[test]
    fn month_year_ignores_case_and_whitespace() {
        for submitted in ["June 2023", "june 2023", "June2023", " JUNE   2023 ", "june\t2023"] {
            assert!(
                answer_matches(QuestionId::AccountCreated, "June 2023", submitted),
                "{submitted:?} should match"
            );
        }
        assert!(!answer_matches(QuestionId::AccountCreated, "June 2023", "July 2023"));
        assert!(!answer_matches(QuestionId::AccountCreated, "June 2023", "   "));
    }

    #[test]
    fn theme_ignores_non_digit_decoration() {
        for submitted in ["#3", "3", "Theme 3", " three is 3 "] {
            assert!(answer_matches(QuestionId::CurrentTheme, "3", submitted));
        }
        assert!(!answer_matches(QuestionId::CurrentTheme, "3", "2"));
        assert!(!answer_matches(QuestionId::CurrentTheme, "3", "33"));
        assert!(!answer_matches(QuestionId::CurrentTheme, "3", "three"));
    }

    #[test]
    fn first_word_questions_compare_only_the_first_token() {
        let q = QuestionId::LatestNoteFirstWord;
        assert!(answer_matches(q, "Feeling okay today", "feeling"));
        assert!(answer_matches(q, "Feeling okay today", "  FEELING "));
        assert!(!answer_matches(q, "Feeling okay today", "Feeling okay"));
        assert!(!answer_matches(q, "Feeling okay today", ""));
    }

    #[test]
    fn journal_title_compares_whole_title() {
        let q = QuestionId::FirstJournalTitle;
        assert!(answer_matches(q, "New Beginnings", "new beginnings"));
        assert!(!answer_matches(q, "New Beginnings", "New"));
    }

    #[test]
    fn unanswerable_questions_are_skipped() {
        let user = user_created(2022, 3, 1, 2);
        let snapshot = Default::default();

        let score = score_answers(
            &user,
            &snapshot,
            [
                (QuestionId::AccountCreated, "March 2022"),
                (QuestionId::FirstJournalTitle, "anything"),
                (QuestionId::CurrentTheme, "3"),
            ],
        );

        assert_eq!(score, Score { considered: 2, correct: 2 });
        assert!(score.passed());
    }

    #[test]
    fn all_wrong_fails_and_all_right_passes() {
        let user = user_created(2021, 11, 5, 0);
        let snapshot = RecoverySnapshot {
            earliest_journal: Some(journal(&user, "Quiet Mornings")),
            oldest_entry: None,
            latest_post: Some(post(&user, "Rain again")),
        };
        let questions = QuestionId::ALL;

        let right: Vec<String> = questions
            .iter()
            .map(|q| q.expected_answer(&user, &snapshot).unwrap_or_default())
            .collect();
        let score = score_answers(
            &user,
            &snapshot,
            questions.iter().copied().zip(right.iter().map(String::as_str)),
        );
        assert_eq!(score, Score { considered: 5, correct: 5 });
        assert!(score.passed());

        let score = score_answers(
            &user,
            &snapshot,
            questions.iter().copied().zip(std::iter::repeat("nope")),
        );
        assert_eq!(score.correct, 0);
        assert!(!score.passed());
    }
}
