//! Stateless validators, one per kind of puzzle
//!
//! Every validator normalizes its input (trim, lowercase), checks the shape,
//! checks membership where the puzzle requires it, and returns either an
//! outcome or a [`GuessError`]. Nothing is stored between calls; callers keep
//! the rows, wrong letters and chains they have accumulated.

pub mod adversary;
pub mod anagram;
pub mod chain;
pub mod hangman;
pub mod wordle;

use crate::{stage::Stage, types::FeedbackVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rejected guess
///
/// All variants are ordinary results, never panics. The display text is the
/// message shown to the player.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GuessError {
    /// The guess does not have the length of the stage's words
    #[error("Guess must be {expected} letters")]
    WrongLength {
        /// Required number of letters
        expected: usize,
        /// Number of letters received
        found: usize,
    },
    /// The guess contains something other than [a-z]
    #[error("Letters only")]
    NotAlphabetic,
    /// A hangman letter guess was not exactly one letter
    #[error("Single letter required")]
    SingleLetter,
    /// The guess is not in the corpus
    #[error("Not a recognized word")]
    UnknownWord,
    /// A chain word does not start with the last letter of the previous word
    #[error("Word must start with \"{}\"", .0.to_ascii_uppercase())]
    WrongStart(char),
    /// A chain word starts with a letter some earlier word already started with
    #[error("A word already starts with \"{}\", pick a different word", .0.to_ascii_uppercase())]
    StartReused(char),
    /// A chain word ends with a letter some earlier word already ended with
    #[error("A word already ends with \"{}\", pick a different word", .0.to_ascii_uppercase())]
    EndReused(char),
    /// The chain has no previous word to link to
    #[error("Missing previous word")]
    MissingPrevious,
    /// No word in the corpus reproduces the guess history
    #[error("No word is consistent with the guess history")]
    NoConsistentWord,
    /// An entry of the guess history has the wrong shape
    #[error("Entry {index} of the guess history is malformed")]
    MalformedHistory {
        /// 0-based index into the history
        index: usize,
    },
    /// A hint was requested for a position outside of the word
    #[error("Invalid position")]
    InvalidPosition {
        /// The requested position
        position: i64,
    },
    /// The stage does not play this kind of puzzle
    #[error("{0} does not accept this guess")]
    WrongStage(Stage),
}

/// Feedback for a Wordle-style guess
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scored {
    /// Feedback per position
    pub feedback: FeedbackVector,
    /// Every position is correct
    pub won: bool,
}

impl From<FeedbackVector> for Scored {
    fn from(feedback: FeedbackVector) -> Self {
        let won = feedback.is_win();
        Self { feedback, won }
    }
}

/// All-or-nothing result of a whole-word guess
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The guess solved the puzzle
    pub won: bool,
}

/// Trim and lowercase raw input
pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Normalize and require exactly `length` letters in [a-z]
pub(crate) fn shaped(input: &str, length: usize) -> Result<String, GuessError> {
    let word = normalize(input);
    let found = word.chars().count();
    if found != length {
        return Err(GuessError::WrongLength {
            expected: length,
            found,
        });
    }
    if !word.bytes().all(|b| b.is_ascii_lowercase()) {
        return Err(GuessError::NotAlphabetic);
    }
    Ok(word)
}
