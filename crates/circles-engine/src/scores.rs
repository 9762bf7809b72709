//! All-time score totals and the per-channel recap of a day

use crate::{daily::DayKey, stage::Stage};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    mem,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// A finished (or abandoned) run, as reported by the client
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreReport {
    /// The channel the run was played in; runs without one only count towards the total
    pub channel_id: Option<String>,
    /// Display name for the recap
    pub username: Option<String>,
    /// The last stage the user reached, clamped into `1..=7`
    pub stage_reached: Option<i64>,
    /// All stages were solved
    pub victory: bool,
    /// The run ended in a loss
    pub game_over: bool,
    /// Points earned today; negative values count as zero
    pub daily_score: i64,
}

/// Scores after a report was recorded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reported {
    /// All-time total of the user, including this report
    pub total: u64,
    /// The points this report added
    pub daily: u64,
}

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "stage")]
pub enum Outcome {
    /// Every stage solved
    Conquered,
    /// Lost at a stage
    Fell(Stage),
    /// Stopped playing at a stage
    WanderedAway(Stage),
}

impl Outcome {
    fn of(report: &ScoreReport) -> Self {
        let stage = Stage::clamped(report.stage_reached.unwrap_or(1));
        if report.victory {
            Self::Conquered
        } else if report.game_over {
            Self::Fell(stage)
        } else {
            Self::WanderedAway(stage)
        }
    }
}

/// One user's line of a channel recap
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapEntry {
    /// User id
    pub user: String,
    /// Display name
    pub username: String,
    /// How the latest run of the day ended
    pub outcome: Outcome,
    /// Points of the latest run of the day
    pub daily_score: u64,
    /// All-time total at the time the recap was taken
    pub total: u64,
}

/// The recap of one channel for one day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecap {
    /// Players ordered by user id
    pub entries: Vec<RecapEntry>,
    /// Sum of all daily scores
    pub total_points: u64,
    /// Mean daily score
    pub average_points: f64,
}

/// Everything that was reported on one day, per channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyRecap {
    /// The day the reports belong to
    pub day: DayKey,
    /// Recaps keyed by channel id
    pub channels: BTreeMap<String, ChannelRecap>,
}

#[derive(Debug)]
struct DailyEntry {
    username: String,
    outcome: Outcome,
    daily_score: u64,
}

#[derive(Debug)]
struct Board {
    day: DayKey,
    totals: HashMap<String, u64>,
    channels: BTreeMap<String, BTreeMap<String, DailyEntry>>,
    finished: Vec<DailyRecap>,
}

impl Board {
    /// Close the tracked day if `today` is a later one
    fn advance(&mut self, today: DayKey) {
        if today <= self.day {
            return;
        }
        info!("Day rolled over: {} -> {today}", self.day);
        let day = mem::replace(&mut self.day, today);
        let channels = mem::take(&mut self.channels);
        if channels.is_empty() {
            return;
        }

        let channels = channels
            .into_iter()
            .map(|(channel, users)| {
                let entries = users
                    .into_iter()
                    .map(|(user, entry)| RecapEntry {
                        total: self.totals.get(&user).copied().unwrap_or_default(),
                        user,
                        username: entry.username,
                        outcome: entry.outcome,
                        daily_score: entry.daily_score,
                    })
                    .collect::<Vec<_>>();
                let total_points = entries
                    .iter()
                    .fold(0_u64, |sum, e| sum.saturating_add(e.daily_score));
                #[allow(clippy::cast_precision_loss)]
                let average_points = total_points as f64 / entries.len() as f64;
                let recap = ChannelRecap {
                    entries,
                    total_points,
                    average_points,
                };
                (channel, recap)
            })
            .collect();

        self.finished.push(DailyRecap { day, channels });
    }
}

/// Score totals of all users and the reports of the current day
///
/// A user's latest report in a channel replaces their earlier one for the
/// recap, but every report adds to the all-time total.
#[derive(Debug)]
pub struct Scoreboard {
    board: Mutex<Board>,
}

impl Scoreboard {
    /// Create an empty scoreboard that tracks `today`
    #[must_use]
    pub fn new(today: DayKey) -> Self {
        Self {
            board: Mutex::new(Board {
                day: today,
                totals: HashMap::new(),
                channels: BTreeMap::new(),
                finished: Vec::new(),
            }),
        }
    }

    fn board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a report of `user` made on `today`
    ///
    /// A report dated before the tracked day counts towards that day.
    pub fn report(&self, user: &str, today: DayKey, report: ScoreReport) -> Reported {
        let mut board = self.board();
        board.advance(today);

        let daily = u64::try_from(report.daily_score).unwrap_or_default();
        let total = {
            let total = board.totals.entry(user.to_owned()).or_default();
            *total = total.saturating_add(daily);
            *total
        };

        if let Some(channel) = report.channel_id.as_deref().filter(|c| !c.is_empty()) {
            let username = report
                .username
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map_or_else(|| format!("User {user}"), String::from);
            let entry = DailyEntry {
                username,
                outcome: Outcome::of(&report),
                daily_score: daily,
            };
            let _ = board
                .channels
                .entry(channel.to_owned())
                .or_default()
                .insert(user.to_owned(), entry);
        }

        Reported { total, daily }
    }

    /// The all-time total of `user`
    #[must_use]
    pub fn total(&self, user: &str) -> u64 {
        self.board().totals.get(user).copied().unwrap_or_default()
    }

    /// Recaps of every day that ended before `today` and has not been taken yet
    ///
    /// Days without reports in any channel produce no recap.
    pub fn rollover(&self, today: DayKey) -> Vec<DailyRecap> {
        let mut board = self.board();
        board.advance(today);
        mem::take(&mut board.finished)
    }
}
