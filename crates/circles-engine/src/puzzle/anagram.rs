//! Anagram: unscramble a rack of the secret's letters plus one decoy

use super::{shaped, GuessError, Verdict};
use crate::types::{Letter, LetterSet};
use serde::{Deserialize, Serialize};

/// A revealed letter of the secret
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    /// 0-based position in the secret
    pub position: usize,
    /// The letter at that position, uppercase
    pub letter: char,
}

/// The first letter of the walk `seed, seed + 7, seed + 14, ...` through the
/// alphabet that does not occur in `secret`
#[must_use]
pub fn decoy(secret: &str, seed: u32) -> Option<Letter> {
    let used = secret.bytes().filter_map(Letter::try_new).collect::<LetterSet>();
    (0..26)
        .map(|i| Letter::nth(u64::from(seed) + i * 7))
        .find(|&letter| !used.contains(letter))
}

/// The tiles shown to the player: secret plus decoy, shuffled the same way for everyone, uppercase
#[must_use]
pub fn rack(secret: &str, seed: u32) -> String {
    let mut tiles = secret.bytes().filter_map(Letter::try_new).collect::<Vec<_>>();
    tiles.extend(decoy(secret, seed));
    shuffle(&mut tiles, seed);
    tiles.into_iter().map(Letter::to_ascii_uppercase).collect()
}

/// Backwards Fisher-Yates walk with `j = (seed + 31 i) mod (i + 1)` in place of a random draw
fn shuffle<T>(items: &mut [T], seed: u32) {
    let seed = seed as usize;
    for i in (1..items.len()).rev() {
        let j = seed.wrapping_add(i * 31) % (i + 1);
        items.swap(i, j);
    }
}

/// Check a submission; any arrangement of exactly the secret's letters wins
///
/// # Errors
///
/// A shape error if the input is not a word of the secret's length
pub fn check(secret: &str, input: &str) -> Result<Verdict, GuessError> {
    let guess = shaped(input, secret.len())?;
    Ok(Verdict {
        won: sorted_letters(&guess) == sorted_letters(secret),
    })
}

fn sorted_letters(word: &str) -> Vec<u8> {
    let mut letters = word.as_bytes().to_vec();
    letters.sort_unstable();
    letters
}

/// Reveal the secret's letter at `position`
///
/// # Errors
///
/// [`GuessError::InvalidPosition`] if `position` is outside of the secret
pub fn hint(secret: &str, position: i64) -> Result<Hint, GuessError> {
    usize::try_from(position)
        .ok()
        .and_then(|pos| Some((pos, Letter::try_new(*secret.as_bytes().get(pos)?)?)))
        .map(|(position, letter)| Hint {
            position,
            letter: letter.to_ascii_uppercase(),
        })
        .ok_or(GuessError::InvalidPosition { position })
}
