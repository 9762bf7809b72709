//! The seven stages of one day, wired to their corpora and secrets

use crate::{
    corpus::{Corpus, CorpusError, Lexicon, WordLength},
    daily::{pick_distinct_word, pick_word, seed, DayKey},
    puzzle::{
        adversary::{self, HistoryEntry},
        anagram::{self, Hint},
        chain::{self, Link},
        hangman::{self, Reveal},
        wordle, GuessError, Scored, Verdict,
    },
    stage::{Puzzle, Stage},
    types::FeedbackVector,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Rules of a daily run that are not fixed by the stages themselves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Size of the prefix of the 5-letter corpus that hangman draws from
    pub easy_words: usize,
    /// Rows of every Wordle grid
    pub max_guesses: usize,
    /// Wrong letters a hangman player may guess before losing
    pub max_wrong_letters: usize,
    /// Words the player has to add to the starting word of the chain
    pub chain_length: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            easy_words: 1500,
            max_guesses: 6,
            max_wrong_letters: 6,
            chain_length: 4,
        }
    }
}

/// Validates guesses for every stage of any day
///
/// Holds no per-user state; every secret is recomputed from the day and the
/// stage when it is needed.
#[derive(Clone, Copy, Debug)]
pub struct Game<'a> {
    five: &'a Corpus,
    six: &'a Corpus,
    seven: &'a Corpus,
    config: GameConfig,
}

impl<'a> Game<'a> {
    /// Load all corpora of `lexicon` and create a game on top of them
    ///
    /// # Errors
    ///
    /// The first corpus that cannot be loaded
    pub fn new(lexicon: &'a Lexicon, config: GameConfig) -> Result<Self, CorpusError> {
        Ok(Self {
            five: lexicon.corpus(WordLength::Five)?,
            six: lexicon.corpus(WordLength::Six)?,
            seven: lexicon.corpus(WordLength::Seven)?,
            config,
        })
    }

    /// The rules this game was created with
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The corpus for words of `length`
    #[must_use]
    pub const fn corpus(&self, length: WordLength) -> &'a Corpus {
        match length {
            WordLength::Five => self.five,
            WordLength::Six => self.six,
            WordLength::Seven => self.seven,
        }
    }

    fn easy_words(&self) -> &'a [String] {
        self.five.prefix(self.config.easy_words.max(1))
    }

    /// The secret word of `stage` on `day`
    ///
    /// Stages 2 to 4 never repeat a word of an earlier stage of the same day.
    /// Evil Wordle has no secret and returns `None`. For the chain, the secret
    /// is its starting word.
    #[must_use]
    pub fn secret(&self, day: DayKey, stage: Stage) -> Option<&'a str> {
        match stage.puzzle() {
            Puzzle::Adversarial => None,
            Puzzle::Wordle { length } if length != WordLength::Five => {
                Some(pick_word(self.corpus(length).words(), seed(day, stage)))
            }
            _ => Some(self.draw_five(day, stage, &self.claimed_before(day, stage))),
        }
    }

    fn draw_five(&self, day: DayKey, stage: Stage, claimed: &HashSet<&str>) -> &'a str {
        let seed = seed(day, stage);
        if stage.draws_distinct_five() {
            pick_distinct_word(self.five.words(), seed, claimed)
        } else {
            pick_word(self.easy_words(), seed)
        }
    }

    /// The 5-letter secrets of all stages before `stage`
    fn claimed_before(&self, day: DayKey, stage: Stage) -> HashSet<&'a str> {
        let mut claimed = HashSet::new();
        for earlier in Stage::ALL.into_iter().take_while(|&s| s < stage) {
            if earlier == Stage::Hangman || earlier.draws_distinct_five() {
                let word = self.draw_five(day, earlier, &claimed);
                let _ = claimed.insert(word);
            }
        }
        claimed
    }

    /// Every 5-letter word that a stage with a fixed secret uses on `day`
    #[must_use]
    pub fn used_five_letter_words(&self, day: DayKey) -> HashSet<&'a str> {
        self.claimed_before(day, Stage::EvilWordle)
    }

    fn fixed_secret(&self, day: DayKey, stage: Stage) -> Result<&'a str, GuessError> {
        self.secret(day, stage).ok_or(GuessError::WrongStage(stage))
    }

    /// Hangman: reveal the positions of a letter
    ///
    /// # Errors
    ///
    /// [`GuessError::SingleLetter`] unless the input is a single letter
    pub fn guess_letter(&self, day: DayKey, input: &str) -> Result<Reveal, GuessError> {
        let secret = self.fixed_secret(day, Stage::Hangman)?;
        logged(Stage::Hangman, hangman::guess_letter(secret, input))
    }

    /// Hangman: guess the whole word
    ///
    /// # Errors
    ///
    /// A shape or membership error
    pub fn guess_hangman_word(&self, day: DayKey, input: &str) -> Result<Verdict, GuessError> {
        let secret = self.fixed_secret(day, Stage::Hangman)?;
        logged(Stage::Hangman, hangman::guess_word(self.five, secret, input))
    }

    /// Score a guess in any Wordle-style stage
    ///
    /// `history` holds the earlier guesses of this attempt; only Evil Wordle reads it.
    ///
    /// # Errors
    ///
    /// [`GuessError::WrongStage`] if `stage` is not a Wordle stage, otherwise a
    /// shape, membership or consistency error
    pub fn guess_wordle(
        &self,
        day: DayKey,
        stage: Stage,
        input: &str,
        history: &[HistoryEntry],
    ) -> Result<Scored, GuessError> {
        let result = match stage.puzzle() {
            Puzzle::Wordle { length } => {
                let secret = self.fixed_secret(day, stage)?;
                wordle::check(self.corpus(length), secret, input)
            }
            Puzzle::Adversarial => {
                let excluded = self.used_five_letter_words(day);
                adversary::respond(self.five, &excluded, history, input)
            }
            Puzzle::Hangman | Puzzle::Anagram | Puzzle::Chain => Err(GuessError::WrongStage(stage)),
        };
        logged(stage, result)
    }

    /// The shuffled tiles of the anagram stage, uppercase
    #[must_use]
    pub fn anagram_rack(&self, day: DayKey) -> String {
        self.secret(day, Stage::Anagram)
            .map(|secret| anagram::rack(secret, seed(day, Stage::Anagram)))
            .unwrap_or_default()
    }

    /// Submit an arrangement of the anagram tiles
    ///
    /// # Errors
    ///
    /// A shape error
    pub fn guess_anagram(&self, day: DayKey, input: &str) -> Result<Verdict, GuessError> {
        let secret = self.fixed_secret(day, Stage::Anagram)?;
        logged(Stage::Anagram, anagram::check(secret, input))
    }

    /// Reveal one letter of the anagram
    ///
    /// # Errors
    ///
    /// [`GuessError::InvalidPosition`] for a position outside of the word
    pub fn anagram_hint(&self, day: DayKey, position: i64) -> Result<Hint, GuessError> {
        let secret = self.fixed_secret(day, Stage::Anagram)?;
        logged(Stage::Anagram, anagram::hint(secret, position))
    }

    /// The word every chain of `day` starts with
    #[must_use]
    pub fn chain_start(&self, day: DayKey) -> &'a str {
        self.secret(day, Stage::Chain).unwrap_or_default()
    }

    /// Check a word the player wants to add to their chain
    ///
    /// # Errors
    ///
    /// The first chain rule the word violates
    pub fn check_chain_link(
        &self,
        input: &str,
        previous: &str,
        chain: &[String],
    ) -> Result<Link, GuessError> {
        logged(Stage::Chain, chain::check_link(self.five, input, previous, chain))
    }

    /// Score the word that solved the previous stage as the first row of `stage`
    ///
    /// # Errors
    ///
    /// [`GuessError::WrongStage`] for stages without a prefilled row, or a shape
    /// error if `solved` does not have the length of the previous stage
    pub fn prefill(&self, day: DayKey, stage: Stage, solved: &str) -> Result<FeedbackVector, GuessError> {
        let source = stage.prefill_source().ok_or(GuessError::WrongStage(stage))?;
        let secret = self.fixed_secret(day, stage)?;
        logged(stage, wordle::prefill(secret, source.word_length().letters(), solved))
    }

    /// The secret of every stage that has one
    #[must_use]
    pub fn today_words(&self, day: DayKey) -> BTreeMap<Stage, &'a str> {
        Stage::ALL
            .into_iter()
            .filter_map(|stage| Some((stage, self.secret(day, stage)?)))
            .collect()
    }
}

fn logged<T>(stage: Stage, result: Result<T, GuessError>) -> Result<T, GuessError> {
    if let Err(error) = &result {
        debug!("{stage} rejected a guess: {error}");
    }
    result
}
