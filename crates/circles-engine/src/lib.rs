/*!
The engine behind a daily run of seven word puzzles.

Every UTC day has one secret word per stage, the same for every player.
The stages are, in order: hangman, Wordle, an anagram, a word chain, an
adversarial Wordle that has no secret at all, and Wordle with six and with
seven letters.

The crate provides

- [`Lexicon`], the word lists per length, loaded once and read-only afterwards,
- [`daily`], the deterministic choice of a word per day and stage,
- [`score()`], the two-pass Wordle feedback,
- [`puzzle`], stateless validators for every kind of stage,
- [`Game`], which ties all of the above together for any day,
- [`ProgressStore`] and [`Scoreboard`], in-memory state of the players,
- [`api`], the JSON requests and responses of a thin client.

# Example

```rust
use circles_engine::{score, DayKey, Game, GameConfig, Lexicon, Stage, WordSource};

let lexicon = Lexicon::new(
    WordSource::Inline(String::from("crane\nslate\ntrace\nbrace\ngrace\nplate\n")),
    WordSource::Inline(String::from("planet\ntrance\nstrange\n")),
);
let game = Game::new(&lexicon, GameConfig::default())?;
let day: DayKey = "2024-03-09".parse()?;

// Everyone gets the same word today, and no two of the first four stages share one
let secret = game.secret(day, Stage::Wordle).unwrap();
assert_ne!(Some(secret), game.secret(day, Stage::Hangman));

let scored = game.guess_wordle(day, Stage::Wordle, secret, &[])?;
assert!(scored.won);

// Feedback is credited exact matches first
assert_eq!(score("trace", "crane").to_string(), "🟨🟩🟩⬛🟩");
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![warn(
    bad_style,
    dead_code,
    improper_ctypes,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    no_mangle_generic_items,
    non_shorthand_field_patterns,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_crate_dependencies,
    unused_extern_crates,
    unused_import_braces,
    unused_parens,
    unused_qualifications,
    unused_results,
    unused,
    while_true
)]

pub mod api;
pub mod corpus;
pub mod daily;
mod engine;
pub mod progress;
pub mod puzzle;
pub mod score;
pub mod scores;
pub mod stage;
pub mod types;

pub use api::{Command, Request, Response, Service};
pub use corpus::{Corpus, CorpusError, Lexicon, WordLength, WordSource};
pub use daily::DayKey;
pub use engine::{Game, GameConfig};
pub use progress::{ProgressPatch, ProgressRecord, ProgressStore};
pub use puzzle::{GuessError, Scored, Verdict};
pub use score::{score, score_prefix};
pub use scores::{ScoreReport, Scoreboard};
pub use stage::{Stage, STAGE_COUNT};
pub use types::{Feedback, FeedbackVector};
