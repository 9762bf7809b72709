//! Word chain: each word starts with the last letter of the previous one

use super::{normalize, shaped, GuessError};
use crate::{
    corpus::Corpus,
    types::{Letter, LetterSet},
};
use serde::{Deserialize, Serialize};

/// An accepted link
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Always `true`; rejected links are errors
    pub valid: bool,
}

/// Check whether `input` may be appended to a chain ending in `previous`
///
/// `chain` holds every word of the chain so far, including the starting word.
/// The rules are checked in this order: shape, membership, the required start
/// letter, no start letter used twice, no end letter used twice.
///
/// # Errors
///
/// The first rule that is violated
pub fn check_link(
    corpus: &Corpus,
    input: &str,
    previous: &str,
    chain: &[String],
) -> Result<Link, GuessError> {
    let word = shaped(input, corpus.word_length())?;
    if !corpus.contains(&word) {
        return Err(GuessError::UnknownWord);
    }

    let previous = normalize(previous);
    let required = previous.bytes().last().ok_or(GuessError::MissingPrevious)?;

    let bytes = word.as_bytes();
    let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
    if first != required {
        return Err(GuessError::WrongStart(char::from(required)));
    }

    let (starts, ends) = used_letters(chain);
    if Letter::try_new(first).map_or(false, |l| starts.contains(l)) {
        return Err(GuessError::StartReused(char::from(first)));
    }
    if Letter::try_new(last).map_or(false, |l| ends.contains(l)) {
        return Err(GuessError::EndReused(char::from(last)));
    }

    Ok(Link { valid: true })
}

/// Letters that words of the chain start with, and letters they end with
fn used_letters(chain: &[String]) -> (LetterSet, LetterSet) {
    chain
        .iter()
        .map(|word| word.trim().as_bytes())
        .filter_map(|word| Some((*word.first()?, *word.last()?)))
        .fold((LetterSet::new(), LetterSet::new()), |(starts, ends), (first, last)| {
            let add = |set: LetterSet, b: u8| Letter::try_new(b).map_or(set, |l| set.add(l));
            (add(starts, first), add(ends, last))
        })
}
