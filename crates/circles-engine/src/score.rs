//! Two-pass feedback scoring

use crate::types::{Feedback, FeedbackVector};

/// Score `guess` against `secret`, both of the same length
///
/// Exact matches are credited first and consume the letter budget of the secret,
/// then the remaining positions are credited as present from left to right while
/// budget is left. A repeated letter is never credited more often than it occurs
/// in the secret.
#[must_use]
pub fn score(secret: &str, guess: &str) -> FeedbackVector {
    debug_assert_eq!(secret.len(), guess.len(), "secret and guess differ in length");
    score_positions(secret.as_bytes(), guess.as_bytes())
}

/// Score a shorter `guess` against the first positions of a longer `secret`
///
/// Only the first `guess.len()` positions are compared, but the letter budget
/// is taken from the whole secret. Used to carry a solved word into the grid
/// of a stage with longer words.
#[must_use]
pub fn score_prefix(secret: &str, guess: &str) -> FeedbackVector {
    debug_assert!(guess.len() <= secret.len(), "prefix is longer than the secret");
    score_positions(secret.as_bytes(), guess.as_bytes())
}

fn score_positions(secret: &[u8], guess: &[u8]) -> FeedbackVector {
    let mut remaining = [0_u8; 256];
    for &b in secret {
        remaining[usize::from(b)] += 1;
    }

    let mut feedback = FeedbackVector::absent(guess.len());
    for (pos, &b) in guess.iter().enumerate() {
        if secret.get(pos) == Some(&b) {
            feedback.set(pos, Feedback::Correct);
            remaining[usize::from(b)] -= 1;
        }
    }

    for (pos, &b) in guess.iter().enumerate() {
        if feedback[pos] == Feedback::Correct {
            continue;
        }
        let left = &mut remaining[usize::from(b)];
        if *left > 0 {
            feedback.set(pos, Feedback::Present);
            *left -= 1;
        }
    }

    feedback
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn feedback(digits: &str) -> FeedbackVector {
        digits.parse().unwrap()
    }

    #[rstest]
    #[case("crane", "trace", "02212")]
    #[case("crane", "crane", "22222")]
    #[case("abbey", "bbbbb", "02200")]
    #[case("level", "eerie", "12000")]
    #[case("aaabb", "aabab", "22112")]
    #[case("abcde", "fghij", "00000")]
    #[case("speed", "eerie", "11000")]
    #[case("banana", "ananas", "111110")]
    #[case("strange", "grantee", "1111102")]
    fn test_score(#[case] secret: &str, #[case] guess: &str, #[case] expected: &str) {
        assert_eq!(score(secret, guess), feedback(expected));
    }

    #[test]
    fn test_win_only_for_identical_words() {
        assert!(score("crane", "crane").is_win());
        assert!(!score("crane", "nacre").is_win());
    }

    #[test]
    fn test_length_matches_guess() {
        for (secret, guess) in [("abc", "cab"), ("planet", "banana"), ("strange", "grantee")] {
            assert_eq!(score(secret, guess).len(), guess.len());
        }
    }

    #[test]
    fn test_duplicate_credit_is_bounded() {
        // only two b in the secret, so only two positions may be credited
        let fb = score("abbey", "bbbbb");
        let credited = fb.iter().filter(|&&f| f != Feedback::Absent).count();
        assert_eq!(credited, 2);
    }

    #[test]
    fn test_present_goes_to_leftmost() {
        // one e left after nothing matched exactly; the first e gets it
        assert_eq!(score("ebbbb", "aeeaa"), feedback("01000"));
    }

    #[rstest]
    #[case("strange", "trance", "111101")]
    #[case("planets", "planet", "222222")]
    #[case("planet", "tapes", "11110")]
    #[case("abcdefg", "gfedcb", "111211")]
    fn test_score_prefix(#[case] secret: &str, #[case] guess: &str, #[case] expected: &str) {
        assert_eq!(score_prefix(secret, guess), feedback(expected));
    }

    #[test]
    fn test_score_prefix_uses_budget_of_whole_secret() {
        // the g only appears at the end of the secret, outside of the compared prefix
        assert_eq!(score_prefix("abcdefg", "gaaaaa"), feedback("110000"));
    }
}
