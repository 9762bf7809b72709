//! Evil Wordle: there is no secret, the feedback is chosen to stay as ambiguous as possible
//!
//! On every guess, the candidates are the corpus words (minus the words other
//! stages use today) that reproduce every recorded (guess, feedback) pair of the
//! history. The candidates are grouped by the feedback they would give for the
//! new guess, and the feedback of the largest group is returned. Groups are
//! visited in the order their first member appears in the corpus and a later
//! group only wins with strictly more members, so ties go to the group seen first.
//!
//! When the only remaining candidate is the guess itself the player wins; the
//! adversary never denies a forced answer.

use super::{shaped, GuessError, Scored};
use crate::{corpus::Corpus, score::score, types::FeedbackVector};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A guess made earlier in the same attempt, with the feedback it received
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The guessed word
    pub guess: String,
    /// The feedback the adversary answered with
    pub feedback: FeedbackVector,
}

impl HistoryEntry {
    /// Create a new entry
    #[must_use]
    pub fn new(guess: impl Into<String>, feedback: FeedbackVector) -> Self {
        Self {
            guess: guess.into(),
            feedback,
        }
    }
}

/// All words, in corpus order, that are not excluded and agree with every entry of `history`
#[must_use]
pub fn consistent_words<'w>(
    words: &'w [String],
    excluded: &HashSet<&str>,
    history: &[HistoryEntry],
) -> Vec<&'w str> {
    words
        .iter()
        .map(String::as_str)
        .filter(|word| !excluded.contains(word))
        .filter(|word| {
            history
                .iter()
                .all(|entry| score(word, &entry.guess) == entry.feedback)
        })
        .collect()
}

/// Group candidates by the feedback each one would give for `guess`
///
/// Returns `(feedback, group size)` in the order the groups are first seen.
#[must_use]
pub fn partition(candidates: &[&str], guess: &str) -> Vec<(FeedbackVector, usize)> {
    let mut groups = Vec::<(FeedbackVector, usize)>::new();
    let mut index = HashMap::<FeedbackVector, usize>::new();

    for candidate in candidates {
        let feedback = score(candidate, guess);
        match index.get(&feedback) {
            Some(&i) => groups[i].1 += 1,
            None => {
                let _ = index.insert(feedback.clone(), groups.len());
                groups.push((feedback, 1));
            }
        }
    }

    groups
}

/// The feedback of the largest group; the earliest group wins a tie
#[must_use]
pub fn largest_group(groups: Vec<(FeedbackVector, usize)>) -> Option<FeedbackVector> {
    groups
        .into_iter()
        .fold(None, |best: Option<(FeedbackVector, usize)>, (feedback, size)| match best {
            Some((_, best_size)) if best_size >= size => best,
            _ => Some((feedback, size)),
        })
        .map(|(feedback, _)| feedback)
}

/// Answer a guess with the most evasive feedback that is consistent with the history
///
/// # Errors
///
/// A shape error or [`GuessError::UnknownWord`] for the guess,
/// [`GuessError::MalformedHistory`] for a history entry of the wrong shape,
/// and [`GuessError::NoConsistentWord`] if no word agrees with the history.
pub fn respond(
    corpus: &Corpus,
    excluded: &HashSet<&str>,
    history: &[HistoryEntry],
    input: &str,
) -> Result<Scored, GuessError> {
    let length = corpus.word_length();
    let guess = shaped(input, length)?;
    if !corpus.contains(&guess) {
        return Err(GuessError::UnknownWord);
    }
    let history = normalize_history(history, length)?;

    let candidates = consistent_words(corpus.words(), excluded, &history);
    debug!(
        "{} candidates remain after {} guesses",
        candidates.len(),
        history.len()
    );

    let feedback = largest_group(partition(&candidates, &guess)).ok_or_else(|| {
        warn!(
            "No word is consistent with a history of {} guesses, last guess {:?}",
            history.len(),
            history.last().map(|entry| entry.guess.as_str())
        );
        GuessError::NoConsistentWord
    })?;

    Ok(feedback.into())
}

fn normalize_history(history: &[HistoryEntry], length: usize) -> Result<Vec<HistoryEntry>, GuessError> {
    history
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let guess = shaped(&entry.guess, length)
                .map_err(|_| GuessError::MalformedHistory { index })?;
            if entry.feedback.len() != length {
                return Err(GuessError::MalformedHistory { index });
            }
            Ok(HistoryEntry::new(guess, entry.feedback.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &[&str] = &[
        "crane", "crate", "grate", "slate", "plate", "trace", "brace", "grace", "space", "place",
    ];

    fn corpus() -> Corpus {
        Corpus::from_lines(WORDS, 5).unwrap()
    }

    fn feedback(digits: &str) -> FeedbackVector {
        digits.parse().unwrap()
    }

    #[test]
    fn test_first_guess_picks_largest_group() {
        let corpus = corpus();
        let scored = respond(&corpus, &HashSet::new(), &[], "slate").unwrap();

        // brute force: the answer must belong to a group no smaller than any other
        let all = corpus.words().iter().map(String::as_str).collect::<Vec<_>>();
        let groups = partition(&all, "slate");
        let max = groups.iter().map(|(_, size)| *size).max().unwrap();
        let chosen = groups.iter().find(|(fb, _)| *fb == scored.feedback).unwrap();
        assert_eq!(chosen.1, max);
        // crane, brace and grace all answer slate with this feedback
        assert_eq!(scored.feedback, feedback("00202"));
        assert!(!scored.won);
    }

    #[test]
    fn test_history_narrows_candidates() {
        let history = [HistoryEntry::new("slate", feedback("00202"))];
        let corpus = corpus();
        let candidates = consistent_words(corpus.words(), &HashSet::new(), &history);
        assert_eq!(candidates, ["crane", "brace", "grace"]);
    }

    #[test]
    fn test_dodges_a_candidate_guess() {
        // crane is still possible, but brace and grace together are the bigger group
        let history = [HistoryEntry::new("slate", feedback("00202"))];
        let scored = respond(&corpus(), &HashSet::new(), &history, "crane").unwrap();
        assert_eq!(scored.feedback, feedback("12202"));
        assert!(!scored.won);
    }

    #[test]
    fn test_tie_goes_to_first_group() {
        // three groups of one; crane comes first in the corpus, so grace does not win
        let history = [HistoryEntry::new("slate", feedback("00202"))];
        let scored = respond(&corpus(), &HashSet::new(), &history, "grace").unwrap();
        assert_eq!(scored.feedback, feedback("02212"));
        assert!(!scored.won);
    }

    #[test]
    fn test_forced_win_is_not_denied() {
        let history = [
            HistoryEntry::new("slate", feedback("00202")),
            HistoryEntry::new("crane", feedback("12202")),
            HistoryEntry::new("grace", feedback("02222")),
        ];
        let corpus = corpus();
        let candidates = consistent_words(corpus.words(), &HashSet::new(), &history);
        assert_eq!(candidates, ["brace"]);

        let scored = respond(&corpus, &HashSet::new(), &history, "brace").unwrap();
        assert!(scored.won);
    }

    #[test]
    fn test_excluded_words_are_never_candidates() {
        let excluded = HashSet::from(["crane"]);
        let history = [HistoryEntry::new("slate", feedback("00202"))];
        let corpus = corpus();
        let candidates = consistent_words(corpus.words(), &excluded, &history);
        assert_eq!(candidates, ["brace", "grace"]);
    }

    #[test]
    fn test_inconsistent_history_is_an_error() {
        let history = [
            HistoryEntry::new("slate", feedback("22222")),
            HistoryEntry::new("crane", feedback("22222")),
        ];
        assert_eq!(
            respond(&corpus(), &HashSet::new(), &history, "grace"),
            Err(GuessError::NoConsistentWord)
        );
    }

    #[test]
    fn test_malformed_history_is_rejected() {
        let history = [HistoryEntry::new("slate", feedback("0020"))];
        assert_eq!(
            respond(&corpus(), &HashSet::new(), &history, "grace"),
            Err(GuessError::MalformedHistory { index: 0 })
        );

        let history = [HistoryEntry::new("sl@te", feedback("00202"))];
        assert_eq!(
            respond(&corpus(), &HashSet::new(), &history, "grace"),
            Err(GuessError::MalformedHistory { index: 0 })
        );
    }

    #[test]
    fn test_history_is_normalized() {
        let history = [HistoryEntry::new(" SLATE ", feedback("00202"))];
        let scored = respond(&corpus(), &HashSet::new(), &history, "crane").unwrap();
        assert_eq!(scored.feedback, feedback("12202"));
    }

    #[test]
    fn test_guess_must_be_a_word() {
        assert_eq!(
            respond(&corpus(), &HashSet::new(), &[], "zzzzz"),
            Err(GuessError::UnknownWord)
        );
    }

    #[test]
    fn test_largest_group() {
        let groups = vec![
            (feedback("00000"), 2),
            (feedback("10000"), 3),
            (feedback("20000"), 3),
            (feedback("22000"), 1),
        ];
        assert_eq!(largest_group(groups), Some(feedback("10000")));
        assert_eq!(largest_group(Vec::new()), None);
    }
}
