//! Per-user, per-day progress through the seven stages
//!
//! Records are keyed by `(user, day)`. A record for a new day starts over at
//! stage 1; records of earlier days are never read again and are dropped by
//! [`ProgressStore::sweep`].

use crate::{daily::DayKey, stage::Stage};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Where a user stands on one day
///
/// Snapshots are opaque UI state owned by the client; they are stored and
/// returned, never interpreted. Solved words are carried into later stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// The stage the user is currently playing
    pub stage: Stage,
    /// The run ended in a loss
    pub game_over: bool,
    /// All stages have been solved
    pub victory: bool,
    /// Client state per stage
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub snapshots: BTreeMap<Stage, Value>,
    /// The word that solved each completed stage, lowercase
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub solved_words: BTreeMap<Stage, String>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            stage: Stage::Hangman,
            game_over: false,
            victory: false,
            snapshots: BTreeMap::new(),
            solved_words: BTreeMap::new(),
        }
    }
}

impl ProgressRecord {
    /// The word that solved `stage`, if it has been solved
    #[must_use]
    pub fn solved_word(&self, stage: Stage) -> Option<&str> {
        self.solved_words.get(&stage).map(String::as_str)
    }

    /// Merge a patch into this record
    ///
    /// Every field present in the patch overwrites the stored one. The stage
    /// number is clamped into the valid range. A solved word is only accepted if
    /// it is made of letters and has the word length of its stage.
    pub fn apply(&mut self, patch: ProgressPatch) {
        if let Some(stage) = patch.stage {
            self.stage = Stage::clamped(stage);
        }
        if let Some(game_over) = patch.game_over {
            self.game_over = game_over;
        }
        if let Some(victory) = patch.victory {
            self.victory = victory;
        }
        self.snapshots.extend(patch.snapshots);

        for (stage, word) in patch.solved_words {
            let word = word.trim().to_lowercase();
            let length = stage.word_length().letters();
            if word.len() == length && word.bytes().all(|b| b.is_ascii_lowercase()) {
                let _ = self.solved_words.insert(stage, word);
            } else {
                debug!("Ignoring solved word {word:?} for {stage}, expected {length} letters");
            }
        }
    }
}

/// A partial update of a [`ProgressRecord`]; absent fields are left untouched
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPatch {
    /// New stage number, clamped into `1..=7`
    pub stage: Option<i64>,
    /// New loss flag
    pub game_over: Option<bool>,
    /// New victory flag
    pub victory: Option<bool>,
    /// Client state to replace, per stage
    #[serde(default)]
    pub snapshots: BTreeMap<Stage, Value>,
    /// Solved words to record, per stage
    #[serde(default)]
    pub solved_words: BTreeMap<Stage, String>,
}

/// In-memory progress of all users
///
/// Concurrent saves for the same key are not isolated from each other; the last
/// one to take the lock wins.
#[derive(Debug, Default)]
pub struct ProgressStore {
    records: Mutex<HashMap<(String, DayKey), ProgressRecord>>,
}

impl ProgressStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<(String, DayKey), ProgressRecord>> {
        // a panic while holding the lock cannot leave a record half-merged
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The record of `user` for `day`, created with defaults on first access
    #[must_use]
    pub fn get(&self, user: &str, day: DayKey) -> ProgressRecord {
        self.records()
            .entry((user.to_owned(), day))
            .or_default()
            .clone()
    }

    /// Merge `patch` into the record of `user` for `day` and return the result
    pub fn save(&self, user: &str, day: DayKey, patch: ProgressPatch) -> ProgressRecord {
        let mut records = self.records();
        let record = records.entry((user.to_owned(), day)).or_default();
        record.apply(patch);
        record.clone()
    }

    /// Forget the record of `user` for `day`. Returns whether there was one.
    pub fn reset(&self, user: &str, day: DayKey) -> bool {
        self.records().remove(&(user.to_owned(), day)).is_some()
    }

    /// Drop every record of a day before `today`. Returns the number of dropped records.
    pub fn sweep(&self, today: DayKey) -> usize {
        let mut records = self.records();
        let before = records.len();
        records.retain(|(_, day), _| *day >= today);
        let dropped = before - records.len();
        if dropped > 0 {
            debug!("Swept {dropped} progress records older than {today}");
        }
        dropped
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Returns true iff no record is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}
