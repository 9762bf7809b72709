//! Wordle against a fixed secret, for any word length

use super::{shaped, GuessError, Scored};
use crate::{
    corpus::Corpus,
    score::{score, score_prefix},
    types::FeedbackVector,
};

/// Score a guess against the day's secret
///
/// # Errors
///
/// A shape error, or [`GuessError::UnknownWord`] if the guess is not in `corpus`
pub fn check(corpus: &Corpus, secret: &str, input: &str) -> Result<Scored, GuessError> {
    let guess = shaped(input, corpus.word_length())?;
    if !corpus.contains(&guess) {
        return Err(GuessError::UnknownWord);
    }
    Ok(score(secret, &guess).into())
}

/// Score the word solved in a previous, shorter stage as the first row of this grid
///
/// `solved` must have exactly `source_length` letters, fewer than the secret.
///
/// # Errors
///
/// A shape error if `solved` does not fit
pub fn prefill(secret: &str, source_length: usize, solved: &str) -> Result<FeedbackVector, GuessError> {
    if source_length >= secret.len() {
        return Err(GuessError::WrongLength {
            expected: secret.len().saturating_sub(1),
            found: source_length,
        });
    }
    let solved = shaped(solved, source_length)?;
    Ok(score_prefix(secret, &solved))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        Corpus::from_lines(["crane", "trace", "nacre", "slate"], 5).unwrap()
    }

    #[test]
    fn test_check_scores() {
        let scored = check(&corpus(), "crane", "Trace").unwrap();
        assert_eq!(scored.feedback, "02212".parse().unwrap());
        assert!(!scored.won);
    }

    #[test]
    fn test_check_wins() {
        let scored = check(&corpus(), "crane", "crane").unwrap();
        assert!(scored.won);
    }

    #[test]
    fn test_check_rejects_unknown_words() {
        assert_eq!(check(&corpus(), "crane", "cramp"), Err(GuessError::UnknownWord));
    }

    #[test]
    fn test_check_rejects_bad_shape() {
        assert_eq!(
            check(&corpus(), "crane", "cranes"),
            Err(GuessError::WrongLength {
                expected: 5,
                found: 6
            })
        );
        assert_eq!(check(&corpus(), "crane", "cr-ne"), Err(GuessError::NotAlphabetic));
    }

    #[test]
    fn test_prefill() {
        let feedback = prefill("strange", 6, "TRANCE").unwrap();
        assert_eq!(feedback, "111101".parse().unwrap());
    }

    #[test]
    fn test_prefill_requires_source_length() {
        assert_eq!(
            prefill("strange", 6, "crane"),
            Err(GuessError::WrongLength {
                expected: 6,
                found: 5
            })
        );
    }
}
