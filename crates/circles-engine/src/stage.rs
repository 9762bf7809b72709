//! The seven stages of a daily run and the puzzle behind each of them

use crate::corpus::WordLength;
use serde::{
    de::{self, Unexpected, Visitor},
    Deserialize, Deserializer, Serialize,
};
use std::fmt;
use thiserror::Error;

/// Total number of stages in a daily run
pub const STAGE_COUNT: u8 = 7;

/// The kind of puzzle a stage plays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Puzzle {
    /// Guess letters one by one, or the whole word
    Hangman,
    /// Classic Wordle against a fixed daily secret
    Wordle {
        /// Length of secret and guesses
        length: WordLength,
    },
    /// Unscramble a rack of letters that contains one decoy
    Anagram,
    /// Build a chain of words, each starting with the last letter of the previous one
    Chain,
    /// Wordle without a fixed secret, the feedback is chosen to keep as many words alive as possible
    Adversarial,
}

/// One stage of the daily run, numbered 1 to [`STAGE_COUNT`]
///
/// Serializes as its number. Deserializes from a number or a numeric string,
/// so that stages can key JSON objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub enum Stage {
    /// Stage 1
    Hangman,
    /// Stage 2
    Wordle,
    /// Stage 3
    Anagram,
    /// Stage 4
    Chain,
    /// Stage 5
    EvilWordle,
    /// Stage 6
    BigWordle,
    /// Stage 7
    BiggerWordle,
}

impl Stage {
    /// All stages in play order
    pub const ALL: [Self; STAGE_COUNT as usize] = [
        Self::Hangman,
        Self::Wordle,
        Self::Anagram,
        Self::Chain,
        Self::EvilWordle,
        Self::BigWordle,
        Self::BiggerWordle,
    ];

    /// The 1-based stage number
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Hangman => 1,
            Self::Wordle => 2,
            Self::Anagram => 3,
            Self::Chain => 4,
            Self::EvilWordle => 5,
            Self::BigWordle => 6,
            Self::BiggerWordle => 7,
        }
    }

    /// The puzzle this stage plays
    #[must_use]
    pub const fn puzzle(self) -> Puzzle {
        match self {
            Self::Hangman => Puzzle::Hangman,
            Self::Wordle => Puzzle::Wordle {
                length: WordLength::Five,
            },
            Self::Anagram => Puzzle::Anagram,
            Self::Chain => Puzzle::Chain,
            Self::EvilWordle => Puzzle::Adversarial,
            Self::BigWordle => Puzzle::Wordle {
                length: WordLength::Six,
            },
            Self::BiggerWordle => Puzzle::Wordle {
                length: WordLength::Seven,
            },
        }
    }

    /// Length of the words played in this stage
    #[must_use]
    pub const fn word_length(self) -> WordLength {
        match self.puzzle() {
            Puzzle::Wordle { length } => length,
            Puzzle::Hangman | Puzzle::Anagram | Puzzle::Chain | Puzzle::Adversarial => {
                WordLength::Five
            }
        }
    }

    /// The stage whose solved word is carried into this stage's grid as a scored first row
    #[must_use]
    pub const fn prefill_source(self) -> Option<Self> {
        match self {
            Self::BigWordle => Some(Self::EvilWordle),
            Self::BiggerWordle => Some(Self::BigWordle),
            _ => None,
        }
    }

    /// Stages whose secret is drawn from the shared 5-letter pool and must not repeat on a day
    #[must_use]
    pub const fn draws_distinct_five(self) -> bool {
        matches!(self, Self::Wordle | Self::Anagram | Self::Chain)
    }

    /// Human readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hangman => "Hangman",
            Self::Wordle => "Wordle",
            Self::Anagram => "Anagram",
            Self::Chain => "Word Chain",
            Self::EvilWordle => "Evil Wordle",
            Self::BigWordle => "Big Wordle",
            Self::BiggerWordle => "Bigger Wordle",
        }
    }

    /// The stage after this one, if any
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::try_from(self.number() + 1).ok()
    }

    /// Map any number into the valid stage range
    #[must_use]
    pub fn clamped(number: i64) -> Self {
        let number = number.clamp(1, i64::from(STAGE_COUNT));
        // cannot fail, the number was clamped into range
        Self::ALL[usize::try_from(number - 1).unwrap_or_default()]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circle {} ({})", self.number(), self.name())
    }
}

/// A stage number outside of `1..=7`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("stage must be between 1 and 7, found {0}")]
pub struct InvalidStage(pub u8);

impl TryFrom<u8> for Stage {
    type Error = InvalidStage;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=STAGE_COUNT => Ok(Self::ALL[usize::from(value - 1)]),
            otherwise => Err(InvalidStage(otherwise)),
        }
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> Self {
        stage.number()
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StageVisitor;

        impl Visitor<'_> for StageVisitor {
            type Value = Stage;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a stage number between 1 and 7")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Stage, E> {
                u8::try_from(v)
                    .ok()
                    .and_then(|n| Stage::try_from(n).ok())
                    .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Stage, E> {
                u64::try_from(v)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Stage, E> {
                v.trim()
                    .parse::<u64>()
                    .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
                    .and_then(|n| self.visit_u64(n))
            }
        }

        deserializer.deserialize_any(StageVisitor)
    }
}
