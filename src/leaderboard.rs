//! Persistent leaderboard rows and the save protocol
//!
//! This module defines the leaderboard's row shape, the course and topic
//! vocabulary, and the read-modify-write protocol used to save scores at
//! the end of a game. The storage backend itself sits behind the
//! [`LeaderboardStore`] trait so the engine stays independent of any
//! particular database.
//!
//! Writes are last-write-wins. Two hosts saving the same row concurrently
//! can interleave, which is accepted: sessions for the same course and
//! team name are not expected to run at the same time.

use enum_map::{Enum, EnumMap};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{LoadError, PersistenceError},
    teams::Team,
};

/// The course a leaderboard row belongs to
///
/// Each course owns a disjoint subset of the score columns; the other
/// columns are held at zero for rows of that course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Course {
    /// Base course, scored on the `avm` and `bvm` columns
    Aos,
    /// Extension course, scored on the `mod_1`, `mod_2a` and `mod_2b` columns
    Aosx,
}

impl Course {
    /// The score columns this course owns
    pub fn topics(self) -> &'static [Topic] {
        match self {
            Course::Aos => &[Topic::Avm, Topic::Bvm],
            Course::Aosx => &[Topic::Mod1, Topic::Mod2a, Topic::Mod2b],
        }
    }
}

/// A score column on the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Topic {
    /// Base course first topic
    #[serde(rename = "avm")]
    Avm,
    /// Base course second topic
    #[serde(rename = "bvm")]
    Bvm,
    /// Extension course first module
    #[serde(rename = "mod_1")]
    Mod1,
    /// Extension course module 2a
    #[serde(rename = "mod_2a")]
    Mod2a,
    /// Extension course module 2b
    #[serde(rename = "mod_2b")]
    Mod2b,
}

/// Canonicalizes a user-facing code before matching
///
/// Codes arrive from URLs and config files in mixed case with stray
/// spaces and underscores.
fn canonicalize(code: &str) -> String {
    code.trim()
        .to_lowercase()
        .replace([' ', '_'], "")
}

/// Parses a course and topic from their user-facing codes
///
/// Matching is forgiving about case, whitespace, and underscores, so
/// `"MOD_2A"` and `"mod 2a"` both resolve to [`Topic::Mod2a`].
///
/// # Errors
///
/// Returns [`LoadError::UnknownCourse`] or [`LoadError::UnknownTopic`]
/// when a code matches nothing.
pub fn parse_course_topic(course_code: &str, topic_code: &str) -> Result<(Course, Topic), LoadError> {
    let course = match canonicalize(course_code).as_str() {
        "aos" => Course::Aos,
        "aosx" => Course::Aosx,
        _ => return Err(LoadError::UnknownCourse(course_code.to_owned())),
    };
    let topic = match canonicalize(topic_code).as_str() {
        "avm" => Topic::Avm,
        "bvm" => Topic::Bvm,
        "mod1" => Topic::Mod1,
        "mod2a" => Topic::Mod2a,
        "mod2b" => Topic::Mod2b,
        _ => return Err(LoadError::UnknownTopic(topic_code.to_owned())),
    };
    Ok((course, topic))
}

/// A single leaderboard row, keyed by course and team name
///
/// The row carries one score per topic column plus a derived total. The
/// total is always recomputed before a write, never trusted from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// Course this row is ranked within
    pub course: Course,
    /// Team display name, the row key together with the course
    pub team_name: String,
    /// Score per topic column
    pub scores: EnumMap<Topic, u64>,
    /// Sum of the columns the course owns
    pub total_score: u64,
}

impl LeaderboardRow {
    /// A blank row for a team that has never been saved
    pub fn blank(course: Course, team_name: impl Into<String>) -> Self {
        Self {
            course,
            team_name: team_name.into(),
            scores: EnumMap::default(),
            total_score: 0,
        }
    }

    /// Recomputes the total from the columns the course owns
    fn recompute_total(&mut self) {
        self.total_score = self
            .course
            .topics()
            .iter()
            .map(|topic| self.scores[*topic])
            .sum();
    }
}

/// Storage backend for leaderboard rows
///
/// Rows are keyed by `(course, team_name)`. Implementations are expected
/// to upsert rather than insert, and failures surface as
/// [`PersistenceError`] so callers can log and carry on.
pub trait LeaderboardStore {
    /// Fetches the row for a team, `None` if never saved
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the backend is unreachable.
    fn fetch_row(
        &self,
        course: Course,
        team_name: &str,
    ) -> Result<Option<LeaderboardRow>, PersistenceError>;

    /// Inserts or replaces the row for its `(course, team_name)` key
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the write fails.
    fn upsert_row(&mut self, row: LeaderboardRow) -> Result<(), PersistenceError>;

    /// Loads every row for a course, best total first
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the backend is unreachable.
    fn load_rows(&self, course: Course) -> Result<Vec<LeaderboardRow>, PersistenceError>;

    /// Deletes every row for a course
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the delete fails.
    fn clear_rows(&mut self, course: Course) -> Result<(), PersistenceError>;
}

/// Saves one team's score into a single topic column
///
/// Read-modify-write: the existing row is fetched (or a blank one
/// created), the topic's column is replaced with `score`, every column
/// the course does not own is forced to zero, the total is recomputed
/// from the course's columns, and the row is written back. Columns of
/// the same course other than `topic` are preserved.
///
/// # Errors
///
/// Returns a [`PersistenceError`] when the read or the write fails; the
/// stored row is untouched in that case.
pub fn save_team_score<S: LeaderboardStore>(
    store: &mut S,
    course: Course,
    topic: Topic,
    team_name: &str,
    score: u64,
) -> Result<(), PersistenceError> {
    let mut row = store
        .fetch_row(course, team_name)?
        .unwrap_or_else(|| LeaderboardRow::blank(course, team_name));

    row.scores[topic] = score;
    for (other, value) in &mut row.scores {
        if !course.topics().contains(&other) {
            *value = 0;
        }
    }
    row.recompute_total();

    store.upsert_row(row)
}

/// Saves every team's score sequentially
///
/// Each team is attempted even after earlier failures, so one bad write
/// cannot block the rest of the roster. Failures are logged as they
/// happen; the first error is returned once all teams have been tried.
///
/// # Errors
///
/// Returns the first [`PersistenceError`] encountered, after attempting
/// every team.
pub fn save_all_teams<'a, S: LeaderboardStore>(
    store: &mut S,
    course: Course,
    topic: Topic,
    teams: impl Iterator<Item = &'a Team>,
) -> Result<(), PersistenceError> {
    let mut first_error = None;

    for team in teams {
        if let Err(error) = save_team_score(store, course, topic, &team.name, team.score) {
            warn!(team = %team.name, %error, "failed to save team score");
            first_error.get_or_insert(error);
        }
    }

    match first_error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Sorts rows for display, best total first
///
/// Ties break alphabetically by team name so repeated loads render the
/// same order.
pub fn sort_for_display(rows: &mut [LeaderboardRow]) {
    rows.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
}

/// In-memory store, suitable for tests and single-process hosting
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<LeaderboardRow>,
}

impl LeaderboardStore for MemoryStore {
    fn fetch_row(
        &self,
        course: Course,
        team_name: &str,
    ) -> Result<Option<LeaderboardRow>, PersistenceError> {
        Ok(self
            .rows
            .iter()
            .find(|row| row.course == course && row.team_name == team_name)
            .cloned())
    }

    fn upsert_row(&mut self, row: LeaderboardRow) -> Result<(), PersistenceError> {
        match self
            .rows
            .iter_mut()
            .find(|existing| existing.course == row.course && existing.team_name == row.team_name)
        {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
        Ok(())
    }

    fn load_rows(&self, course: Course) -> Result<Vec<LeaderboardRow>, PersistenceError> {
        let mut rows = self
            .rows
            .iter()
            .filter(|row| row.course == course)
            .cloned()
            .collect_vec();
        sort_for_display(&mut rows);
        Ok(rows)
    }

    fn clear_rows(&mut self, course: Course) -> Result<(), PersistenceError> {
        self.rows.retain(|row| row.course != course);
        Ok(())
    }
}
