//! JSON requests and responses for a thin client
//!
//! Every request is one JSON object with an `"action"` tag. Every response is
//! a plain JSON object; failures of any kind are `{"error": "..."}`.

use crate::{
    daily::DayKey,
    engine::Game,
    progress::{ProgressPatch, ProgressRecord, ProgressStore},
    puzzle::{
        adversary::HistoryEntry, anagram::Hint, chain::Link, hangman::Reveal, GuessError, Scored,
        Verdict,
    },
    scores::{DailyRecap, Reported, ScoreReport, Scoreboard},
    stage::Stage,
    types::FeedbackVector,
};
use log::info;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A puzzle request; none of them depends on who is asking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Guess a hangman word if `word` is given and not empty, otherwise a letter
    HangmanGuess {
        /// A single letter
        #[serde(default)]
        letter: Option<String>,
        /// The whole word
        #[serde(default)]
        word: Option<String>,
    },
    /// Guess in stage 2, 5, 6 or 7
    WordleGuess {
        /// The stage to guess in
        stage: Stage,
        /// The guessed word
        guess: String,
        /// Earlier guesses of this attempt, read in stage 5 only
        #[serde(default)]
        history: Vec<HistoryEntry>,
    },
    /// The tiles of the anagram
    AnagramLetters,
    /// Submit an anagram
    AnagramGuess {
        /// An arrangement of the tiles
        guess: String,
    },
    /// Reveal a letter of the anagram
    AnagramHint {
        /// 0-based position in the word
        position: i64,
    },
    /// The first word of today's chain
    ChainStart,
    /// Check a word to add to a chain
    #[serde(rename_all = "camelCase")]
    ChainValidate {
        /// The word to add
        guess: String,
        /// The current last word of the chain
        previous_word: String,
        /// All words of the chain so far, including the starting word
        #[serde(default)]
        chain: Vec<String>,
    },
    /// Score the word solved in the previous stage as the first row of stage 6 or 7
    Prefill {
        /// Stage 6 or 7
        stage: Stage,
        /// The word that solved the stage before
        word: String,
    },
    /// The secrets of today, for debugging
    TodayWords,
}

/// A request about a user's own progress and score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AccountRequest {
    /// Read today's progress of `user`
    GetProgress {
        /// User id
        user: String,
    },
    /// Merge a patch into today's progress of `user`
    SaveProgress {
        /// User id
        user: String,
        /// Fields to overwrite
        #[serde(flatten)]
        patch: ProgressPatch,
    },
    /// Start today over for `user`
    ResetProgress {
        /// User id
        user: String,
    },
    /// Record the score of a run
    ReportScore {
        /// User id
        user: String,
        /// The run to record
        #[serde(flatten)]
        report: ScoreReport,
    },
}

const ACCOUNT_ACTIONS: [&str; 4] = ["getProgress", "saveProgress", "resetProgress", "reportScore"];

/// Any request the service understands
///
/// Deserializing looks at the `"action"` tag first, so a bad field is
/// reported by name instead of as a mismatch of both request kinds.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// A puzzle request
    Puzzle(Request),
    /// A progress or score request
    Account(AccountRequest),
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let is_account = value
            .get("action")
            .and_then(Value::as_str)
            .map_or(false, |action| ACCOUNT_ACTIONS.contains(&action));
        let command = if is_account {
            AccountRequest::deserialize(value).map(Self::Account)
        } else {
            Request::deserialize(value).map(Self::Puzzle)
        };
        command.map_err(de::Error::custom)
    }
}

/// The failure shape shared by all requests
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Message for the player
    pub error: String,
}

/// Secrets of one day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayWords {
    /// The day
    pub date: DayKey,
    /// Secret per stage; Evil Wordle has none
    pub words: BTreeMap<Stage, String>,
}

/// Every response shape
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// `{positions, isWrong}`
    Reveal(Reveal),
    /// `{feedback, won}`
    Scored(Scored),
    /// `{won}`
    Verdict(Verdict),
    /// `{valid}`
    Link(Link),
    /// `{letters}`
    Letters {
        /// Uppercase tiles
        letters: String,
    },
    /// `{position, letter}`
    Hint(Hint),
    /// `{word}`
    Word {
        /// A single word
        word: String,
    },
    /// `{feedback}`
    Feedback {
        /// Feedback of a prefilled row
        feedback: FeedbackVector,
    },
    /// `{date, words}`
    TodayWords(TodayWords),
    /// A progress record
    Progress(ProgressRecord),
    /// `{total, daily}`
    Reported(Reported),
    /// `{ok}`
    Ok {
        /// Always true
        ok: bool,
    },
    /// `{error}`
    Error(ErrorReply),
}

impl Response {
    /// An error response with the given message
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorReply {
            error: message.into(),
        })
    }

    /// Returns true iff this is an error response
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<GuessError> for Response {
    fn from(error: GuessError) -> Self {
        Self::error(error.to_string())
    }
}

fn respond<T>(result: Result<T, GuessError>, wrap: impl FnOnce(T) -> Response) -> Response {
    result.map_or_else(Response::from, wrap)
}

impl Game<'_> {
    /// Answer a puzzle request for `day`
    #[must_use]
    pub fn handle(&self, day: DayKey, request: Request) -> Response {
        match request {
            Request::HangmanGuess { letter, word } => match word.filter(|w| !w.is_empty()) {
                Some(word) => respond(self.guess_hangman_word(day, &word), Response::Verdict),
                None => respond(
                    self.guess_letter(day, &letter.unwrap_or_default()),
                    Response::Reveal,
                ),
            },
            Request::WordleGuess {
                stage,
                guess,
                history,
            } => respond(self.guess_wordle(day, stage, &guess, &history), Response::Scored),
            Request::AnagramLetters => Response::Letters {
                letters: self.anagram_rack(day),
            },
            Request::AnagramGuess { guess } => respond(self.guess_anagram(day, &guess), Response::Verdict),
            Request::AnagramHint { position } => respond(self.anagram_hint(day, position), Response::Hint),
            Request::ChainStart => Response::Word {
                word: self.chain_start(day).to_owned(),
            },
            Request::ChainValidate {
                guess,
                previous_word,
                chain,
            } => respond(self.check_chain_link(&guess, &previous_word, &chain), Response::Link),
            Request::Prefill { stage, word } => respond(self.prefill(day, stage, &word), |feedback| {
                Response::Feedback { feedback }
            }),
            Request::TodayWords => Response::TodayWords(TodayWords {
                date: day,
                words: self
                    .today_words(day)
                    .into_iter()
                    .map(|(stage, word)| (stage, word.to_owned()))
                    .collect(),
            }),
        }
    }
}

/// A game together with the progress and scores of its players
#[derive(Debug)]
pub struct Service<'a> {
    game: Game<'a>,
    progress: ProgressStore,
    scores: Scoreboard,
}

impl<'a> Service<'a> {
    /// Create a service with empty stores, starting on `today`
    #[must_use]
    pub fn new(game: Game<'a>, today: DayKey) -> Self {
        Self {
            game,
            progress: ProgressStore::new(),
            scores: Scoreboard::new(today),
        }
    }

    /// The puzzles
    #[must_use]
    pub const fn game(&self) -> &Game<'a> {
        &self.game
    }

    /// Progress of all users
    #[must_use]
    pub const fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Scores of all users
    #[must_use]
    pub const fn scores(&self) -> &Scoreboard {
        &self.scores
    }

    /// Close every day before `today`
    ///
    /// Drops stale progress and returns the recaps of the closed days.
    pub fn rollover(&self, today: DayKey) -> Vec<DailyRecap> {
        let recaps = self.scores.rollover(today);
        let swept = self.progress.sweep(today);
        if !recaps.is_empty() || swept > 0 {
            info!(
                "Closed {} day(s) before {today}, dropped {swept} progress records",
                recaps.len()
            );
        }
        recaps
    }

    /// Answer any request for `day`
    pub fn handle(&self, day: DayKey, command: Command) -> Response {
        match command {
            Command::Puzzle(request) => self.game.handle(day, request),
            Command::Account(AccountRequest::GetProgress { user }) => {
                Response::Progress(self.progress.get(&user, day))
            }
            Command::Account(AccountRequest::SaveProgress { user, patch }) => {
                let _ = self.progress.save(&user, day, patch);
                Response::Ok { ok: true }
            }
            Command::Account(AccountRequest::ResetProgress { user }) => {
                let _ = self.progress.reset(&user, day);
                Response::Ok { ok: true }
            }
            Command::Account(AccountRequest::ReportScore { user, report }) => {
                Response::Reported(self.scores.report(&user, day, report))
            }
        }
    }

    /// Parse one JSON request and answer it; a request that cannot be parsed gets an error response
    pub fn handle_json(&self, day: DayKey, line: &str) -> Response {
        match serde_json::from_str::<Command>(line) {
            Ok(command) => self.handle(day, command),
            Err(error) => Response::error(format!("Invalid request: {error}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        corpus::{Lexicon, WordSource},
        engine::GameConfig,
    };
    use serde_json::{json, Value};

    const FIVE: &str = "crane\nslate\ntrace\nbrace\ngrace\nplate\ncrate\ngrate\nspace\nplace\neagle\nearth\n";
    const LONGER: &str = "planet\nbanana\ntrance\nsilent\nstrange\nplanets\nexample\n";

    fn lexicon() -> Lexicon {
        Lexicon::new(
            WordSource::Inline(String::from(FIVE)),
            WordSource::Inline(String::from(LONGER)),
        )
    }

    fn service(lexicon: &Lexicon) -> Service<'_> {
        let config = GameConfig {
            easy_words: 3,
            ..GameConfig::default()
        };
        Service::new(Game::new(lexicon, config).unwrap(), day())
    }

    fn day() -> DayKey {
        "2024-03-09".parse().unwrap()
    }

    fn call(service: &Service<'_>, request: Value) -> Value {
        let response = service.handle_json(day(), &request.to_string());
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_hangman_guess() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        assert_eq!(
            call(&service, json!({"action": "hangmanGuess", "letter": "a"})),
            json!({"positions": [2], "isWrong": false})
        );
        assert_eq!(
            call(&service, json!({"action": "hangmanGuess", "letter": "a", "word": "crane"})),
            json!({"won": true})
        );
        assert_eq!(
            call(&service, json!({"action": "hangmanGuess", "letter": "ab", "word": ""})),
            json!({"error": "Single letter required"})
        );
    }

    #[test]
    fn test_wordle_guess() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        assert_eq!(
            call(&service, json!({"action": "wordleGuess", "stage": 2, "guess": "crane"})),
            json!({"feedback": [1, 2, 2, 0, 2], "won": false})
        );
        assert_eq!(
            call(
                &service,
                json!({
                    "action": "wordleGuess",
                    "stage": 5,
                    "guess": "space",
                    "history": [
                        {"guess": "crane", "feedback": [1, 0, 2, 0, 2]},
                        {"guess": "place", "feedback": [1, 0, 2, 2, 2]}
                    ]
                })
            ),
            json!({"feedback": [2, 2, 2, 2, 2], "won": true})
        );
        assert_eq!(
            call(&service, json!({"action": "wordleGuess", "stage": 6, "guess": "zzzzzz"})),
            json!({"error": "Not a recognized word"})
        );
        assert_eq!(
            call(&service, json!({"action": "wordleGuess", "stage": 4, "guess": "crane"})),
            json!({"error": "Circle 4 (Word Chain) does not accept this guess"})
        );
    }

    #[test]
    fn test_anagram() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        assert_eq!(
            call(&service, json!({"action": "anagramLetters"})),
            json!({"letters": "LTEADS"})
        );
        assert_eq!(
            call(&service, json!({"action": "anagramGuess", "guess": "TALES"})),
            json!({"won": true})
        );
        assert_eq!(
            call(&service, json!({"action": "anagramHint", "position": 4})),
            json!({"position": 4, "letter": "E"})
        );
        assert_eq!(
            call(&service, json!({"action": "anagramHint", "position": 5})),
            json!({"error": "Invalid position"})
        );
    }

    #[test]
    fn test_chain() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        assert_eq!(
            call(&service, json!({"action": "chainStart"})),
            json!({"word": "brace"})
        );
        assert_eq!(
            call(
                &service,
                json!({"action": "chainValidate", "guess": "eagle", "previousWord": "brace", "chain": ["brace"]})
            ),
            json!({"error": "A word already ends with \"E\", pick a different word"})
        );
        assert_eq!(
            call(
                &service,
                json!({"action": "chainValidate", "guess": "earth", "previousWord": "brace"})
            ),
            json!({"valid": true})
        );
    }

    #[test]
    fn test_prefill_and_today_words() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        assert_eq!(
            call(&service, json!({"action": "prefill", "stage": 7, "word": "trance"})),
            json!({"feedback": [1, 1, 1, 1, 0, 1]})
        );
        assert_eq!(
            call(&service, json!({"action": "todayWords"})),
            json!({
                "date": "2024-03-09",
                "words": {"1": "crane", "2": "trace", "3": "slate", "4": "brace", "6": "trance", "7": "strange"}
            })
        );
    }

    #[test]
    fn test_progress_actions() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        assert_eq!(
            call(&service, json!({"action": "getProgress", "user": "alice"})),
            json!({"stage": 1, "gameOver": false, "victory": false})
        );
        assert_eq!(
            call(
                &service,
                json!({"action": "saveProgress", "user": "alice", "stage": 2, "solvedWords": {"1": "crane"}})
            ),
            json!({"ok": true})
        );
        assert_eq!(
            call(&service, json!({"action": "getProgress", "user": "alice"})),
            json!({"stage": 2, "gameOver": false, "victory": false, "solvedWords": {"1": "crane"}})
        );
        assert_eq!(
            call(&service, json!({"action": "resetProgress", "user": "alice"})),
            json!({"ok": true})
        );
        assert_eq!(
            call(&service, json!({"action": "getProgress", "user": "alice"}))["stage"],
            json!(1)
        );
    }

    #[test]
    fn test_report_score() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        let report = json!({"action": "reportScore", "user": "alice", "channelId": "c1", "dailyScore": 25});
        assert_eq!(call(&service, report.clone()), json!({"total": 25, "daily": 25}));
        assert_eq!(call(&service, report), json!({"total": 50, "daily": 25}));

        let recaps = service.rollover("2024-03-10".parse().unwrap());
        assert_eq!(recaps.len(), 1);
        assert_eq!(recaps[0].channels["c1"].total_points, 25);
    }

    #[test]
    fn test_rollover_sweeps_progress() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        let _ = call(&service, json!({"action": "getProgress", "user": "alice"}));
        assert_eq!(service.progress().len(), 1);

        assert!(service.rollover("2024-03-10".parse().unwrap()).is_empty());
        assert!(service.progress().is_empty());
    }

    #[test]
    fn test_invalid_requests() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        assert!(service.handle_json(day(), "not json").is_error());
        assert!(service.handle_json(day(), r#"{"action": "fly"}"#).is_error());
        assert!(service
            .handle_json(day(), r#"{"action": "wordleGuess", "stage": 9, "guess": "crane"}"#)
            .is_error());
    }

    #[test]
    fn test_null_letter_is_empty() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        assert_eq!(
            call(&service, json!({"action": "hangmanGuess", "letter": null, "word": "crane"})),
            json!({"won": true})
        );
        assert_eq!(
            call(&service, json!({"action": "hangmanGuess", "letter": null})),
            json!({"error": "Single letter required"})
        );
    }

    #[test]
    fn test_field_errors_are_named() {
        let lexicon = lexicon();
        let service = service(&lexicon);
        let reply = call(
            &service,
            json!({"action": "reportScore", "user": "alice", "dailyScore": 2.5}),
        );
        let error = reply["error"].as_str().unwrap();
        assert!(error.contains("expected i64"), "{error}");
        assert!(!error.contains("untagged"), "{error}");

        let reply = call(&service, json!({"action": "wordleGuess", "stage": 2}));
        let error = reply["error"].as_str().unwrap();
        assert!(error.contains("missing field `guess`"), "{error}");
    }

    #[test]
    fn test_command_dispatch() {
        let command: Command =
            serde_json::from_value(json!({"action": "resetProgress", "user": "bob"})).unwrap();
        assert_eq!(
            command,
            Command::Account(AccountRequest::ResetProgress {
                user: String::from("bob")
            })
        );
        let command: Command = serde_json::from_value(json!({"action": "chainStart"})).unwrap();
        assert_eq!(command, Command::Puzzle(Request::ChainStart));
    }

    #[test]
    fn test_request_shape() {
        let request: Request = serde_json::from_value(json!({
            "action": "chainValidate",
            "guess": "eagle",
            "previousWord": "crane"
        }))
        .unwrap();
        assert_eq!(
            request,
            Request::ChainValidate {
                guess: String::from("eagle"),
                previous_word: String::from("crane"),
                chain: Vec::new(),
            }
        );
    }
}
