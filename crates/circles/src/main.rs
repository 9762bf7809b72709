//! Play or serve the seven daily circles of word puzzles
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

use circles_engine::{
    puzzle::adversary::HistoryEntry, stage::Puzzle, DayKey, Game, GameConfig,
    Lexicon, ProgressPatch, ScoreReport, Service, Stage, Verdict, WordSource,
};
use clap::{value_parser, Arg, ArgMatches, Command};
use dialoguer::Input;
use eyre::{eyre, Result, WrapErr};
use log::{debug, info};
use serde_json::{json, Value};
use std::{
    collections::BTreeMap,
    io::{self, BufRead, Write},
    path::PathBuf,
};

fn main() -> Result<()> {
    env_logger::init();
    let opts = parse_opts()?;

    let lexicon = Lexicon::new(
        WordSource::File(opts.words),
        WordSource::File(opts.long_words),
    );
    let game = load_game(&lexicon, opts.config)?;

    match opts.mode {
        Mode::Today => print_today(&game, opts.day.unwrap_or_else(DayKey::today)),
        Mode::Serve => serve(game, opts.day)?,
        Mode::Play { user } => {
            let day = opts.day.unwrap_or_else(DayKey::today);
            play(&Service::new(game, day), day, &user)?;
        }
    }

    Ok(())
}

fn load_game(lexicon: &Lexicon, config: GameConfig) -> Result<Game<'_>> {
    Game::new(lexicon, config).wrap_err("The word lists could not be loaded.")
}

#[derive(Debug)]
struct Opts {
    words: PathBuf,
    long_words: PathBuf,
    day: Option<DayKey>,
    config: GameConfig,
    mode: Mode,
}

#[derive(Debug)]
enum Mode {
    Today,
    Serve,
    Play { user: String },
}

fn parse_day(s: &str) -> Result<DayKey, String> {
    s.parse()
        .map_err(|e| format!("Expected a date like 2024-03-09: {e}"))
}

fn parse_opts() -> Result<Opts> {
    let matches = Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("words")
                .value_name("WORDS")
                .help("The list of five letter words")
                .long_help(concat!(
                    "The list of five letter words. ",
                    "The list must contain one word per line. ",
                    "Lines that are not five letters in a-z are ignored. ",
                    "The order of the list decides the daily words, ",
                    "and the first words are the pool for the hangman stage."
                ))
                .short('w')
                .long("words")
                .env("CIRCLES_WORDS")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .default_value("/usr/share/dict/words"),
        )
        .arg(
            Arg::new("long-words")
                .value_name("LONG_WORDS")
                .help("The list of six and seven letter words")
                .long_help(concat!(
                    "The list of six and seven letter words. ",
                    "The list must contain one word per line. ",
                    "Words of any other length are ignored."
                ))
                .short('l')
                .long("long-words")
                .env("CIRCLES_LONG_WORDS")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .default_value("/usr/share/dict/words"),
        )
        .arg(
            Arg::new("date")
                .value_name("YYYY-MM-DD")
                .help("Play the puzzles of this day instead of today (UTC)")
                .short('d')
                .long("date")
                .global(true)
                .value_parser(parse_day),
        )
        .arg(
            Arg::new("easy-words")
                .value_name("N")
                .help("Draw the hangman word from the first N words [default: 1500]")
                .long("easy-words")
                .global(true)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("max-guesses")
                .value_name("N")
                .help("Rows of every Wordle grid [default: 6]")
                .long("max-guesses")
                .global(true)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("max-wrong-letters")
                .value_name("N")
                .help("Wrong letters allowed in hangman [default: 6]")
                .long("max-wrong-letters")
                .global(true)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("chain-length")
                .value_name("N")
                .help("Words to add to the word chain [default: 4]")
                .long("chain-length")
                .global(true)
                .value_parser(value_parser!(usize)),
        )
        .subcommand(Command::new("today").about("Print the secret word of every stage"))
        .subcommand(
            Command::new("serve")
                .about("Answer JSON requests, one per line, on stdin")
                .long_about(concat!(
                    "Answer JSON requests, one per line, on stdin. ",
                    "Every request is an object with an \"action\", ",
                    "every response is written as one line to stdout."
                )),
        )
        .subcommand(
            Command::new("play")
                .about("Play today's circles in the terminal (the default)")
                .arg(
                    Arg::new("user")
                        .value_name("NAME")
                        .help("The name progress and score are kept under")
                        .short('u')
                        .long("user")
                        .env("CIRCLES_USER")
                        .default_value("player"),
                ),
        )
        .get_matches();

    let path = |id: &str| {
        matches
            .get_one::<PathBuf>(id)
            .cloned()
            .ok_or_else(|| eyre!("Missing the value for --{id}"))
    };

    let defaults = GameConfig::default();
    let number = |id: &str, default: usize| matches.get_one::<usize>(id).copied().unwrap_or(default);
    let config = GameConfig {
        easy_words: number("easy-words", defaults.easy_words),
        max_guesses: number("max-guesses", defaults.max_guesses),
        max_wrong_letters: number("max-wrong-letters", defaults.max_wrong_letters),
        chain_length: number("chain-length", defaults.chain_length),
    };

    Ok(Opts {
        words: path("words")?,
        long_words: path("long-words")?,
        day: matches.get_one::<DayKey>("date").copied(),
        config,
        mode: mode(&matches),
    })
}

fn mode(matches: &ArgMatches) -> Mode {
    match matches.subcommand() {
        Some(("today", _)) => Mode::Today,
        Some(("serve", _)) => Mode::Serve,
        Some(("play", sub)) => Mode::Play {
            user: sub
                .get_one::<String>("user")
                .cloned()
                .unwrap_or_else(|| String::from("player")),
        },
        _ => Mode::Play {
            user: String::from("player"),
        },
    }
}

fn print_today(game: &Game<'_>, day: DayKey) {
    println!("Words for {day}");
    for stage in Stage::ALL {
        match game.secret(day, stage) {
            Some(word) => println!("  {stage}: {}", word.to_ascii_uppercase()),
            None => println!("  {stage}: none, the adversary decides"),
        }
    }
}

fn serve(game: Game<'_>, fixed_day: Option<DayKey>) -> Result<()> {
    let today = || fixed_day.unwrap_or_else(DayKey::today);
    let service = Service::new(game, today());
    info!("Serving the circles of {}", today());

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.wrap_err("Could not read a request.")?;
        if line.trim().is_empty() {
            continue;
        }

        let day = today();
        for recap in service.rollover(day) {
            info!("Recap of {}: {}", recap.day, serde_json::to_string(&recap)?);
        }

        let response = service.handle_json(day, &line);
        if response.is_error() {
            debug!("Request {line} failed");
        }
        serde_json::to_writer(&mut stdout, &response).wrap_err("Could not write a response.")?;
        writeln!(stdout)?;
        stdout.flush()?;
    }

    Ok(())
}

/// How a stage in the terminal ended
enum Outcome {
    Solved(String),
    Lost,
    Quit,
}

struct StageEnd {
    outcome: Outcome,
    points: u64,
    snapshot: Value,
}

fn prompt(text: &str) -> Result<String> {
    let input = Input::<String>::new()
        .with_prompt(text)
        .allow_empty(true)
        .interact_text()?;
    Ok(input.trim().to_lowercase())
}

fn points(count: usize, per_item: usize) -> u64 {
    u64::try_from(count * per_item).unwrap_or(u64::MAX)
}

fn play(service: &Service<'_>, day: DayKey, user: &str) -> Result<()> {
    let game = service.game();
    let record = service.progress().get(user, day);
    if record.victory || record.game_over {
        println!("You already finished the circles of {day}.");
        return Ok(());
    }

    println!("The seven circles of {day}. Enter nothing to stop playing.");
    let mut daily_score = 0;
    let mut current = Some(record.stage);
    let mut reached = record.stage;

    while let Some(stage) = current {
        reached = stage;
        println!();
        println!("== {stage} ==");

        let carried = stage.prefill_source().and_then(|source| {
            service
                .progress()
                .get(user, day)
                .solved_word(source)
                .map(String::from)
        });
        let end = match stage.puzzle() {
            Puzzle::Hangman => play_hangman(game, day)?,
            Puzzle::Wordle { .. } | Puzzle::Adversarial => {
                play_wordle(game, day, stage, carried.as_deref())?
            }
            Puzzle::Anagram => play_anagram(game, day)?,
            Puzzle::Chain => play_chain(game, day)?,
        };
        daily_score += end.points;

        let mut patch = ProgressPatch {
            snapshots: BTreeMap::from([(stage, end.snapshot)]),
            ..ProgressPatch::default()
        };
        current = match end.outcome {
            Outcome::Solved(word) => {
                println!("Solved with {}!", word.to_ascii_uppercase());
                let next = stage.next();
                patch.stage = Some(i64::from(next.unwrap_or(stage).number()));
                patch.victory = Some(next.is_none());
                patch.solved_words = BTreeMap::from([(stage, word)]);
                next
            }
            Outcome::Lost => {
                patch.game_over = Some(true);
                None
            }
            Outcome::Quit => None,
        };
        let record = service.progress().save(user, day, patch);
        debug!("Saved progress of {user}: {record:?}");
    }

    let record = service.progress().get(user, day);
    if record.victory {
        println!("\nYou conquered all seven circles!");
    } else if record.game_over {
        println!("\nYou fell at {reached}.");
    } else {
        println!("\nYou wandered away at {reached}.");
    }

    let reported = service.scores().report(
        user,
        day,
        ScoreReport {
            username: Some(user.to_owned()),
            stage_reached: Some(i64::from(reached.number())),
            victory: record.victory,
            game_over: record.game_over,
            daily_score: i64::try_from(daily_score).unwrap_or(i64::MAX),
            ..ScoreReport::default()
        },
    );
    println!(
        "Daily score: {} points, total score: {} points",
        reported.daily, reported.total
    );

    Ok(())
}

fn play_hangman(game: &Game<'_>, day: DayKey) -> Result<StageEnd> {
    let length = Stage::Hangman.word_length().letters();
    let budget = game.config().max_wrong_letters;
    let mut revealed = vec![None::<char>; length];
    let mut wrong = Vec::<char>::new();

    let outcome = loop {
        if revealed.iter().all(Option::is_some) {
            break Outcome::Solved(revealed.iter().flatten().collect());
        }
        if wrong.len() >= budget {
            println!("No guesses left.");
            break Outcome::Lost;
        }

        let pattern = revealed
            .iter()
            .map(|c| c.map_or('_', |c| c.to_ascii_uppercase()).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let misses = wrong.iter().collect::<String>().to_ascii_uppercase();
        println!("{pattern}    wrong: {misses} ({} left)", budget - wrong.len());

        let input = prompt("Guess a letter or the whole word")?;
        if input.is_empty() {
            break Outcome::Quit;
        }

        if input.chars().count() > 1 {
            match game.guess_hangman_word(day, &input) {
                Ok(Verdict { won: true }) => {
                    for (slot, letter) in revealed.iter_mut().zip(input.chars()) {
                        *slot = Some(letter);
                    }
                }
                Ok(Verdict { won: false }) => {
                    println!("That is not the word.");
                    wrong.push('*');
                }
                Err(e) => println!("{e}"),
            }
            continue;
        }

        let letter = input.chars().next().unwrap_or_default();
        if wrong.contains(&letter) || revealed.contains(&Some(letter)) {
            println!("You already tried that letter.");
            continue;
        }
        match game.guess_letter(day, &input) {
            Ok(reveal) if reveal.is_wrong => wrong.push(letter),
            Ok(reveal) => {
                for pos in reveal.positions {
                    revealed[pos] = Some(letter);
                }
            }
            Err(e) => println!("{e}"),
        }
    };

    Ok(StageEnd {
        outcome,
        points: points(revealed.iter().flatten().count(), 1),
        snapshot: json!({ "revealed": revealed, "wrongGuesses": wrong }),
    })
}

fn play_wordle(
    game: &Game<'_>,
    day: DayKey,
    stage: Stage,
    carried: Option<&str>,
) -> Result<StageEnd> {
    let length = stage.word_length().letters();
    let max_guesses = game.config().max_guesses;
    let mut rows = Vec::<HistoryEntry>::new();

    if let Some(word) = carried {
        match game.prefill(day, stage, word) {
            Ok(feedback) => rows.push(HistoryEntry::new(word, feedback)),
            Err(e) => debug!("Cannot prefill {stage} with {word}: {e}"),
        }
    }
    // the prefilled row is scored against a longer word and is no evidence for the adversary
    let prefilled = rows.len();

    let outcome = loop {
        for row in &rows {
            println!("  {:<8} {}", row.guess.to_ascii_uppercase(), row.feedback);
        }
        if rows.len() > prefilled && rows[rows.len() - 1].feedback.is_win() {
            break Outcome::Solved(rows[rows.len() - 1].guess.clone());
        }
        if rows.len() >= max_guesses {
            match game.secret(day, stage) {
                Some(secret) => println!("The word was {}.", secret.to_ascii_uppercase()),
                None => println!("The adversary kept every option open."),
            }
            break Outcome::Lost;
        }

        let input = prompt(&format!(
            "Guess {} of {max_guesses} ({length} letters)",
            rows.len() + 1
        ))?;
        if input.is_empty() {
            break Outcome::Quit;
        }

        match game.guess_wordle(day, stage, &input, &rows[prefilled..]) {
            Ok(scored) => rows.push(HistoryEntry::new(input, scored.feedback)),
            Err(e) => println!("{e}"),
        }
    };

    Ok(StageEnd {
        outcome,
        points: points(rows.len(), length),
        snapshot: json!({ "completedRows": rows }),
    })
}

fn play_anagram(game: &Game<'_>, day: DayKey) -> Result<StageEnd> {
    let length = Stage::Anagram.word_length().letters();
    let rack = game.anagram_rack(day);
    let mut hints = Vec::new();

    let outcome = loop {
        println!("Tiles: {rack}  (one of them does not belong, enter ? for a hint)");
        let input = prompt("Your word")?;
        match input.as_str() {
            "" => break Outcome::Quit,
            "?" => match game.anagram_hint(day, i64::try_from(hints.len()).unwrap_or(i64::MAX)) {
                Ok(hint) => {
                    println!("Letter {} is {}", hint.position + 1, hint.letter);
                    hints.push(hint);
                }
                Err(e) => println!("{e}"),
            },
            guess => match game.guess_anagram(day, guess) {
                Ok(Verdict { won: true }) => break Outcome::Solved(input),
                Ok(Verdict { won: false }) => println!("Not quite."),
                Err(e) => println!("{e}"),
            },
        }
    };

    let solved = matches!(outcome, Outcome::Solved(_));
    Ok(StageEnd {
        outcome,
        points: if solved { points(1, length) } else { 0 },
        snapshot: json!({ "letters": rack, "hints": hints }),
    })
}

fn play_chain(game: &Game<'_>, day: DayKey) -> Result<StageEnd> {
    let length = Stage::Chain.word_length().letters();
    let target = game.config().chain_length;
    let mut chain = vec![game.chain_start(day).to_owned()];

    let outcome = loop {
        let previous = chain[chain.len() - 1].clone();
        if chain.len() > target {
            break Outcome::Solved(previous);
        }
        println!(
            "Chain: {}  ({} more)",
            chain.join(" -> ").to_ascii_uppercase(),
            target + 1 - chain.len()
        );

        let last = previous.chars().last().unwrap_or_default().to_ascii_uppercase();
        let input = prompt(&format!("A word starting with {last}"))?;
        if input.is_empty() {
            break Outcome::Quit;
        }
        match game.check_chain_link(&input, &previous, &chain) {
            Ok(_) => chain.push(input),
            Err(e) => println!("{e}"),
        }
    };

    Ok(StageEnd {
        outcome,
        points: points(chain.len() - 1, length),
        snapshot: json!({ "chain": chain }),
    })
}
