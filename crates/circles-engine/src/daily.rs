//! Deterministic word selection per UTC day and stage

use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};
use time::{macros::format_description, Date, OffsetDateTime};

/// A UTC calendar day, the unit of "same puzzle for everyone"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DayKey(Date);

impl DayKey {
    /// The current UTC day
    #[must_use]
    pub fn today() -> Self {
        Self::from_date(OffsetDateTime::now_utc().date())
    }

    /// Wrap a calendar date
    #[must_use]
    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }
}

/// Formats as ISO `YYYY-MM-DD`
impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl From<DayKey> for String {
    fn from(day: DayKey) -> Self {
        day.to_string()
    }
}

impl TryFrom<String> for DayKey {
    type Error = time::error::Parse;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for DayKey {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s.trim(), format_description!("[year]-[month]-[day]")).map(Self)
    }
}

/// Order-dependent 31-polynomial hash over UTF-16 units, wrapped to `i32`, then made non-negative
#[must_use]
pub fn hash_key(key: &str) -> u32 {
    key.encode_utf16()
        .fold(0_i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// The seed for a stage on a day
///
/// Identical for every call with the same inputs, across processes.
#[must_use]
pub fn seed(day: DayKey, stage: Stage) -> u32 {
    hash_key(&format!("{day}:{}", stage.number()))
}

/// Select the word at `seed mod len`
///
/// # Panics
///
/// Panics if `words` is empty. Corpora are never empty once loaded.
#[must_use]
pub fn pick_word(words: &[String], seed: u32) -> &str {
    &words[start_index(words, seed)]
}

/// Select a word that is not in `excluded`
///
/// Starts at `seed mod len` and probes forward, wrapping around. When every word
/// is excluded, the last candidate examined is returned; a collision is preferred
/// over failing.
///
/// # Panics
///
/// Panics if `words` is empty. Corpora are never empty once loaded.
#[must_use]
pub fn pick_distinct_word<'w>(words: &'w [String], seed: u32, excluded: &HashSet<&str>) -> &'w str {
    let start = start_index(words, seed);
    let mut candidate = words[start].as_str();
    let mut current = start;
    let mut attempts = 0;
    while excluded.contains(candidate) && attempts < words.len() {
        current = (current + 1) % words.len();
        candidate = &words[current];
        attempts += 1;
    }
    candidate
}

fn start_index(words: &[String], seed: u32) -> usize {
    assert!(!words.is_empty(), "Cannot pick a word from an empty list");
    // u32 always fits into usize on supported targets
    seed as usize % words.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::Month;

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|&w| String::from(w)).collect()
    }

    #[test]
    fn test_day_display_is_iso() {
        let key = DayKey::from_date(Date::from_calendar_date(2024, Month::March, 9).unwrap());
        assert_eq!(key.to_string(), "2024-03-09");
        assert_eq!(day("2024-03-09"), key);
        assert!("2024-13-01".parse::<DayKey>().is_err());
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""2024-03-09""#);
    }

    #[rstest]
    #[case("", 0)]
    #[case("a", 97)]
    #[case("2024-01-15:1", 1_010_753_318)]
    #[case("2024-01-15:2", 1_010_753_317)]
    #[case("2024-03-09:3", 953_520_961)]
    // the raw hash is negative here
    #[case("2024-01-01:2", 1_010_786_952)]
    fn test_hash_key(#[case] key: &str, #[case] expected: u32) {
        assert_eq!(hash_key(key), expected);
    }

    #[test]
    fn test_seed_per_stage() {
        let today = day("2024-01-15");
        assert_eq!(seed(today, Stage::Hangman), 1_010_753_318);
        assert_eq!(seed(today, Stage::BiggerWordle), 1_010_753_312);
        assert_eq!(seed(today, Stage::Wordle), seed(today, Stage::Wordle));
        assert_ne!(seed(today, Stage::Wordle), seed(today, Stage::Anagram));
    }

    #[test]
    fn test_pick_word() {
        let list = words(&["aaaaa", "bbbbb", "ccccc"]);
        // 1_010_753_317 % 3 == 1
        assert_eq!(pick_word(&list, 1_010_753_317), "bbbbb");
        assert_eq!(pick_word(&list, 3), "aaaaa");
    }

    #[test]
    fn test_pick_distinct_probes_forward() {
        let list = words(&["aaaaa", "bbbbb", "ccccc", "ddddd"]);
        let excluded = HashSet::from(["bbbbb", "ccccc"]);
        assert_eq!(pick_distinct_word(&list, 1, &excluded), "ddddd");
        assert_eq!(pick_distinct_word(&list, 0, &excluded), "aaaaa");
    }

    #[test]
    fn test_pick_distinct_wraps_around() {
        let list = words(&["aaaaa", "bbbbb", "ccccc"]);
        let excluded = HashSet::from(["ccccc"]);
        assert_eq!(pick_distinct_word(&list, 2, &excluded), "aaaaa");
    }

    #[test]
    fn test_pick_distinct_tolerates_exhaustion() {
        let list = words(&["aaaaa", "bbbbb"]);
        let excluded = HashSet::from(["aaaaa", "bbbbb"]);
        let picked = pick_distinct_word(&list, 1, &excluded);
        assert!(list.iter().any(|w| w == picked));
    }

    #[test]
    #[should_panic(expected = "Cannot pick a word from an empty list")]
    fn test_pick_from_empty_panics() {
        let _ = pick_word(&[], 1);
    }
}
