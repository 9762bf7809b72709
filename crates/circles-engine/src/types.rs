//! Letters, letter sets and per-position feedback

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::{fmt, str::FromStr};

/// A possible letter, can only be lowercase ASCII characters, i.e. [a-z]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Letter(u8);

impl Letter {
    /// Create a new letter
    ///
    /// Returns None if the letter is not in [a-zA-Z]
    #[must_use]
    pub const fn try_new(b: u8) -> Option<Self> {
        match b {
            b'a'..=b'z' => Some(Self(b - b'a')),
            b'A'..=b'Z' => Some(Self(b - b'A')),
            _ => None,
        }
    }

    /// Create a letter from its position in the alphabet, wrapping around after `z`
    #[must_use]
    pub const fn nth(n: u64) -> Self {
        // cast is safe, the remainder is always below 26
        #[allow(clippy::cast_possible_truncation)]
        Self((n % 26) as u8)
    }

    /// The uppercase ASCII character of this letter
    #[must_use]
    pub const fn to_ascii_uppercase(self) -> char {
        (b'A' + self.0) as char
    }
}

impl From<Letter> for u8 {
    fn from(letter: Letter) -> Self {
        b'a' + letter.0
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> Self {
        char::from(u8::from(letter))
    }
}

/// A set of letters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct LetterSet(u32);

impl LetterSet {
    /// Create an empty set
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Test if a letter is contained in this set, O(1)
    #[must_use]
    pub const fn contains(self, letter: Letter) -> bool {
        (self.0 >> letter.0) & 1 == 1
    }

    /// Add a letter to this set, O(1)
    #[must_use]
    pub const fn add(self, letter: Letter) -> Self {
        Self(self.0 | (1 << letter.0))
    }

    /// Number of distinct letters in this set
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true iff no letter is in this set
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Letter> for LetterSet {
    fn from_iter<T: IntoIterator<Item = Letter>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), Self::add)
    }
}

/// The result for a single position of a guess
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Feedback {
    /// The letter is not in the secret, or all of its occurrences are already credited
    Absent = 0,
    /// The letter is in the secret, but on another position
    Present = 1,
    /// The letter is on the right position
    Correct = 2,
}

impl From<Feedback> for u8 {
    fn from(feedback: Feedback) -> Self {
        feedback as Self
    }
}

impl TryFrom<u8> for Feedback {
    type Error = InvalidFeedback;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Absent),
            1 => Ok(Self::Present),
            2 => Ok(Self::Correct),
            otherwise => Err(InvalidFeedback(otherwise)),
        }
    }
}

/// A feedback value outside of `0..=2`
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("feedback must be 0, 1 or 2, found {0}")]
pub struct InvalidFeedback(pub u8);

/// Feedback for every position of a guess
///
/// Serializes as a plain array of numbers, e.g. `[0, 2, 2, 1, 2]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackVector(SmallVec<[Feedback; 8]>);

impl FeedbackVector {
    /// Feedback of the given length where every position is [`Feedback::Absent`]
    #[must_use]
    pub fn absent(len: usize) -> Self {
        Self(SmallVec::from_elem(Feedback::Absent, len))
    }

    /// Number of positions
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true iff there are no positions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A guess wins when every position is [`Feedback::Correct`]
    #[must_use]
    pub fn is_win(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&f| f == Feedback::Correct)
    }

    /// Iterate over all positions
    pub fn iter(&self) -> std::slice::Iter<'_, Feedback> {
        self.0.iter()
    }

    pub(crate) fn set(&mut self, pos: usize, feedback: Feedback) {
        self.0[pos] = feedback;
    }
}

impl std::ops::Index<usize> for FeedbackVector {
    type Output = Feedback;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<Feedback> for FeedbackVector {
    fn from_iter<T: IntoIterator<Item = Feedback>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeedbackVector {
    type Item = &'a Feedback;

    type IntoIter = std::slice::Iter<'a, Feedback>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for FeedbackVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for feedback in self {
            let square = match feedback {
                Feedback::Absent => '⬛',
                Feedback::Present => '🟨',
                Feedback::Correct => '🟩',
            };
            write!(f, "{square}")?;
        }
        Ok(())
    }
}

/// Parses the compact digit form, e.g. `"02212"`
impl FromStr for FeedbackVector {
    type Err = InvalidFeedback;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.bytes()
            .map(|b| Feedback::try_from(b.wrapping_sub(b'0')))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_try_new() {
        assert_eq!(Letter::try_new(b'a'), Some(Letter(0)));
        assert_eq!(Letter::try_new(b'z'), Some(Letter(25)));
        assert_eq!(Letter::try_new(b'A'), Some(Letter(0)));
        assert_eq!(Letter::try_new(b'Z'), Some(Letter(25)));
        assert_eq!(Letter::try_new(b' '), None);
        assert_eq!(Letter::try_new(b'0'), None);
        assert_eq!(Letter::try_new(b'.'), None);
    }

    #[test]
    fn test_letter_into() {
        assert_eq!(u8::from(Letter(0)), b'a');
        assert_eq!(char::from(Letter(25)), 'z');
        assert_eq!(Letter(2).to_ascii_uppercase(), 'C');
    }

    #[test]
    fn test_letter_nth_wraps() {
        assert_eq!(Letter::nth(0), Letter(0));
        assert_eq!(Letter::nth(27), Letter(1));
        assert_eq!(Letter::nth(u64::from(u32::MAX)), Letter((u32::MAX % 26) as u8));
    }

    #[test]
    fn test_set() {
        let set = LetterSet::new();
        assert!(set.is_empty());
        assert!(!set.contains(Letter(0)));
        let set = set.add(Letter(0));
        assert!(set.contains(Letter(0)));
        assert!(!set.contains(Letter(1)));
        // set semantics
        let set = set.add(Letter(0)).add(Letter(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_set_from_word() {
        let set = b"level".iter().filter_map(|&b| Letter::try_new(b)).collect::<LetterSet>();
        assert_eq!(set.len(), 3);
        assert!(set.contains(Letter::try_new(b'v').unwrap()));
        assert!(!set.contains(Letter::try_new(b'x').unwrap()));
    }

    #[test]
    fn test_feedback_serializes_as_numbers() {
        let feedback: FeedbackVector = "02212".parse().unwrap();
        assert_eq!(serde_json::to_string(&feedback).unwrap(), "[0,2,2,1,2]");

        let parsed: FeedbackVector = serde_json::from_str("[0,2,2,1,2]").unwrap();
        assert_eq!(parsed, feedback);
    }

    #[test]
    fn test_feedback_rejects_unknown_values() {
        assert!(serde_json::from_str::<FeedbackVector>("[0,3]").is_err());
        assert_eq!("019".parse::<FeedbackVector>(), Err(InvalidFeedback(9)));
    }

    #[test]
    fn test_is_win() {
        assert!("22222".parse::<FeedbackVector>().unwrap().is_win());
        assert!(!"22212".parse::<FeedbackVector>().unwrap().is_win());
        assert!(!FeedbackVector::default().is_win());
    }

    #[test]
    fn test_display() {
        let feedback: FeedbackVector = "012".parse().unwrap();
        assert_eq!(feedback.to_string(), "⬛🟨🟩");
    }
}
