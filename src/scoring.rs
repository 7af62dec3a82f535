//! Pure scoring functions shared by the board variants
//!
//! Everything here is a pure function of its inputs. The board state
//! machines own their mutable state and call into this module whenever a
//! score, line bonus, or answer evaluation is needed, which keeps the
//! scoring rules testable in isolation.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::{
    constants::{claim_grid::BONUS_POINTS, claim_grid::GRID_SIDE, scoring::BASE_SECONDS},
    teams::TeamId,
};

/// A completed line on the claim grid
///
/// Rows and columns are indexed from zero, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineKey {
    /// A fully claimed row
    Row(usize),
    /// A fully claimed column
    Col(usize),
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineKey::Row(i) => write!(f, "r{i}"),
            LineKey::Col(i) => write!(f, "c{i}"),
        }
    }
}

/// Lines on the grid fully claimed by `team`
///
/// `claims` is the grid in row-major order, one entry per tile. Rows come
/// before columns, each in ascending index order, so the result is
/// deterministic for a given claim pattern.
pub fn completed_lines(claims: &[Option<TeamId>], team: TeamId) -> Vec<LineKey> {
    let owns = |row: usize, col: usize| claims.get(row * GRID_SIDE + col) == Some(&Some(team));

    let rows = (0..GRID_SIDE)
        .filter(|&row| (0..GRID_SIDE).all(|col| owns(row, col)))
        .map(LineKey::Row);
    let cols = (0..GRID_SIDE)
        .filter(|&col| (0..GRID_SIDE).all(|row| owns(row, col)))
        .map(LineKey::Col);

    rows.chain(cols).collect()
}

/// Recomputes a team's claim-grid total from the full claim pattern
///
/// The total is the sum of the point values of every tile the team has
/// claimed, plus [`BONUS_POINTS`] for each completed line. Recomputing
/// from scratch instead of accumulating deltas means a claim can never
/// double-count a bonus.
pub fn claim_grid_total(claims: &[Option<TeamId>], points: &[u64], team: TeamId) -> u64 {
    let base: u64 = claims
        .iter()
        .zip(points)
        .filter(|(claim, _)| **claim == Some(team))
        .map(|(_, points)| *points)
        .sum();
    let bonus = completed_lines(claims, team).len() as u64 * BONUS_POINTS;
    base + bonus
}

/// Converts elapsed time into a final score for the timed variants
///
/// Scores count down from [`BASE_SECONDS`] one point per whole elapsed
/// second, floored at zero. Sub-second remainders are truncated.
pub fn time_to_score(elapsed: Duration) -> u64 {
    BASE_SECONDS.saturating_sub(elapsed.as_secs())
}

/// Whether two id slices are equal as sets, order and duplicates ignored
pub fn set_equal(a: &[String], b: &[String]) -> bool {
    let sa: HashSet<&str> = a.iter().map(String::as_str).collect();
    let sb: HashSet<&str> = b.iter().map(String::as_str).collect();
    sa == sb
}

/// Canonicalizes a fill-in answer before comparison
///
/// Applies whitespace trimming and case folding according to the puzzle's
/// flags. Both the user's value and the answer key go through the same
/// normalization.
pub fn normalize(value: &str, trim: bool, case_insensitive: bool) -> String {
    let trimmed = if trim { value.trim() } else { value };
    if case_insensitive {
        trimmed.to_lowercase()
    } else {
        trimmed.to_owned()
    }
}

/// Placement status of a single option after a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionStatus {
    /// Placed in a tile that requires it
    Correct,
    /// Placed in a tile that does not require it
    Wrong,
}

/// Per-tile counts after a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSummary {
    /// Placed options the tile requires
    pub correct_count: usize,
    /// Placed options the tile does not require
    pub wrong_count: usize,
    /// Options the tile requires in total
    pub required_count: usize,
}

/// Outcome of evaluating a full set of placements against the tiles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Whether every tile's placements exactly match its requirements
    pub all_correct: bool,
    /// Tiles whose placements do not exactly match, unfilled included
    pub wrong_tiles: Vec<String>,
    /// Status of each placed option, keyed by option id
    pub option_status: HashMap<String, OptionStatus>,
    /// Counts per tile, keyed by tile id
    pub tile_summary: HashMap<String, TileSummary>,
}

/// Evaluates placements against the tiles' requirements
///
/// A tile is correct only when its placed ids exactly match its required
/// ids as a set. An individual option is correct when the tile it sits in
/// requires it, regardless of whether that tile is fully solved. Tiles
/// absent from `placements` count as unfilled.
pub fn evaluate_placements<'a>(
    tiles: impl Iterator<Item = (&'a str, &'a [String])>,
    placements: &HashMap<String, Vec<String>>,
) -> MatchOutcome {
    let mut outcome = MatchOutcome {
        all_correct: true,
        ..MatchOutcome::default()
    };

    for (tile_id, required) in tiles {
        let placed = placements.get(tile_id).map_or(&[] as &[String], Vec::as_slice);
        let required_set: HashSet<&str> = required.iter().map(String::as_str).collect();

        let mut correct_count = 0;
        for option in placed {
            let status = if required_set.contains(option.as_str()) {
                correct_count += 1;
                OptionStatus::Correct
            } else {
                OptionStatus::Wrong
            };
            outcome.option_status.insert(option.clone(), status);
        }

        outcome.tile_summary.insert(
            tile_id.to_owned(),
            TileSummary {
                correct_count,
                wrong_count: placed.len() - correct_count,
                required_count: required.len(),
            },
        );

        if !set_equal(required, placed) {
            outcome.all_correct = false;
            outcome.wrong_tiles.push(tile_id.to_owned());
        }
    }

    outcome
}
