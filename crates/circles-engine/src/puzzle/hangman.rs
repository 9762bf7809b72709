//! Hangman: reveal letters, or risk the whole word

use super::{normalize, shaped, GuessError, Verdict};
use crate::corpus::Corpus;
use serde::{Deserialize, Serialize};

/// Positions revealed by a letter guess
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reveal {
    /// 0-based positions of the letter in the secret, ascending
    pub positions: Vec<usize>,
    /// The letter is not in the secret; the caller counts this against the wrong-guess budget
    pub is_wrong: bool,
}

/// Guess a single letter
///
/// # Errors
///
/// [`GuessError::SingleLetter`] unless the input is exactly one letter in [a-zA-Z]
pub fn guess_letter(secret: &str, input: &str) -> Result<Reveal, GuessError> {
    let letter = match normalize(input).as_bytes() {
        &[b] if b.is_ascii_lowercase() => b,
        _ => return Err(GuessError::SingleLetter),
    };

    let positions = secret
        .bytes()
        .enumerate()
        .filter(|&(_, b)| b == letter)
        .map(|(pos, _)| pos)
        .collect::<Vec<_>>();
    let is_wrong = positions.is_empty();

    Ok(Reveal {
        positions,
        is_wrong,
    })
}

/// Guess the whole word; there is no partial credit
///
/// # Errors
///
/// A shape error, or [`GuessError::UnknownWord`] if the guess is not in `corpus`
pub fn guess_word(corpus: &Corpus, secret: &str, input: &str) -> Result<Verdict, GuessError> {
    let word = shaped(input, corpus.word_length())?;
    if !corpus.contains(&word) {
        return Err(GuessError::UnknownWord);
    }
    Ok(Verdict { won: word == secret })
}
