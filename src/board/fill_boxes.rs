//! Fill-boxes grid board
//!
//! A timed grid of text cells. Some cells are locked presets that frame
//! the puzzle; the rest are typed in by the team and checked against an
//! answer key on submit. Comparison is configurable for whitespace
//! trimming and case folding. Wrong cells add a time penalty and can be
//! selectively cleared for another attempt.

use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use web_time::Instant;

use crate::{
    constants::fill_boxes::{MAX_CELL_LENGTH, PENALTY_PER_WRONG_SECS},
    error::LoadError,
    scoring,
    timer::GameTimer,
};

/// A grid coordinate, rendered as `"row,col"` in serialized form
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct CellKey {
    /// Zero-based row
    pub row: u32,
    /// Zero-based column
    pub col: u32,
}

impl CellKey {
    /// Creates a key for the given row and column
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Error parsing a cell key from its `"row,col"` form
#[derive(Debug, Error)]
#[error("invalid cell key: {0:?}")]
pub struct ParseCellKeyError(String);

impl FromStr for CellKey {
    type Err = ParseCellKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| ParseCellKeyError(s.to_owned()))?;
        Ok(Self {
            row: row.parse().map_err(|_| ParseCellKeyError(s.to_owned()))?,
            col: col.parse().map_err(|_| ParseCellKeyError(s.to_owned()))?,
        })
    }
}

/// Check state of a cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellStatus {
    /// Not judged since the last edit or clear
    #[default]
    Neutral,
    /// Matched the answer key on the last submit
    Correct,
    /// Missed the answer key on the last submit
    Wrong,
}

/// A preset cell placed before play starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetCell {
    /// Where the cell sits
    pub key: CellKey,
    /// Its starting value
    pub value: String,
    /// Whether the team is barred from editing it
    pub locked: bool,
}

/// Validated fill-boxes puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBoxesConfig {
    rows: u32,
    cols: u32,
    /// Heading shown above the reference passage
    pub passage_title: String,
    /// Reference passage the answers are drawn from
    pub passage_text: String,
    preset_cells: Vec<PresetCell>,
    answer_key: HashMap<CellKey, String>,
    /// Whether to trim whitespace before comparing
    pub trim: bool,
    /// Whether to compare case-insensitively
    pub case_insensitive: bool,
}

impl FillBoxesConfig {
    /// Validates the puzzle
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Validation`] for zero-sized grids, cells
    /// outside the grid, an empty answer key, or answers beyond
    /// [`MAX_CELL_LENGTH`].
    pub fn new(
        rows: u32,
        cols: u32,
        passage_title: String,
        passage_text: String,
        preset_cells: Vec<PresetCell>,
        answer_key: HashMap<CellKey, String>,
        trim: bool,
        case_insensitive: bool,
    ) -> Result<Self, LoadError> {
        if rows == 0 || cols == 0 {
            return Err(LoadError::Validation(format!(
                "grid must be non-empty, got {rows}x{cols}"
            )));
        }
        if answer_key.is_empty() {
            return Err(LoadError::Validation(
                "answer key has no cells".to_owned(),
            ));
        }
        let in_bounds = |key: &CellKey| key.row < rows && key.col < cols;
        for preset in &preset_cells {
            if !in_bounds(&preset.key) {
                return Err(LoadError::Validation(format!(
                    "preset cell {} outside {rows}x{cols} grid",
                    preset.key
                )));
            }
        }
        for (key, answer) in &answer_key {
            if !in_bounds(key) {
                return Err(LoadError::Validation(format!(
                    "answer cell {key} outside {rows}x{cols} grid"
                )));
            }
            if answer.chars().count() > MAX_CELL_LENGTH {
                return Err(LoadError::Validation(format!(
                    "answer for cell {key} exceeds {MAX_CELL_LENGTH} characters"
                )));
            }
        }
        Ok(Self {
            rows,
            cols,
            passage_title,
            passage_text,
            preset_cells,
            answer_key,
            trim,
            case_insensitive,
        })
    }

    /// Grid height
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Grid width
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Creates the playing state
    ///
    /// Preset cells start with their values; answer cells not covered by
    /// a preset start empty and unlocked. Every known cell starts
    /// neutral.
    pub fn to_state(&self) -> FillBoxesState {
        let mut values = HashMap::new();
        let mut locked = HashSet::new();
        let mut status = HashMap::new();

        for preset in &self.preset_cells {
            values.insert(preset.key, preset.value.clone());
            if preset.locked {
                locked.insert(preset.key);
            }
            status.insert(preset.key, CellStatus::Neutral);
        }
        for key in self.answer_key.keys() {
            values.entry(*key).or_default();
            status.insert(*key, CellStatus::Neutral);
        }

        FillBoxesState {
            config: self.clone(),
            values,
            locked,
            status,
            submitted: false,
            solved: false,
        }
    }
}

/// Counts from the latest submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOutcome {
    /// Whether every answer cell matched
    pub all_correct: bool,
    /// Answer cells that matched
    pub correct_count: usize,
    /// Answer cells that missed
    pub wrong_count: usize,
}

/// Live state of a fill-boxes game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBoxesState {
    config: FillBoxesConfig,
    values: HashMap<CellKey, String>,
    locked: HashSet<CellKey>,
    status: HashMap<CellKey, CellStatus>,
    submitted: bool,
    solved: bool,
}

impl FillBoxesState {
    /// The underlying puzzle
    pub fn config(&self) -> &FillBoxesConfig {
        &self.config
    }

    /// Current value of a cell, empty for unknown cells
    pub fn value(&self, key: CellKey) -> &str {
        self.values.get(&key).map_or("", String::as_str)
    }

    /// Whether the team is barred from editing a cell
    pub fn is_locked(&self, key: CellKey) -> bool {
        self.locked.contains(&key)
    }

    /// Check state of a cell
    pub fn status(&self, key: CellKey) -> CellStatus {
        self.status.get(&key).copied().unwrap_or_default()
    }

    /// Whether a submission has happened since the last clear
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    /// Whether a submission has solved the puzzle
    pub fn solved(&self) -> bool {
        self.solved
    }

    /// Outcome of the latest submission
    pub fn outcome(&self) -> Option<FillOutcome> {
        if !self.submitted {
            return None;
        }
        Some(self.evaluate())
    }

    fn normalize(&self, value: &str) -> String {
        scoring::normalize(value, self.config.trim, self.config.case_insensitive)
    }

    fn evaluate(&self) -> FillOutcome {
        let mut correct_count = 0;
        let mut wrong_count = 0;
        for (key, answer) in &self.config.answer_key {
            if self.normalize(self.value(*key)) == self.normalize(answer) {
                correct_count += 1;
            } else {
                wrong_count += 1;
            }
        }
        FillOutcome {
            all_correct: wrong_count == 0,
            correct_count,
            wrong_count,
        }
    }

    /// Types a value into a cell
    ///
    /// Locked cells, cells the puzzle does not know about, and edits
    /// after the puzzle is solved are ignored. Values beyond
    /// [`MAX_CELL_LENGTH`] characters are cut off.
    pub fn set_cell(&mut self, key: CellKey, value: &str) {
        if self.solved || self.locked.contains(&key) {
            return;
        }
        let Some(slot) = self.values.get_mut(&key) else {
            return;
        };
        *slot = value.chars().take(MAX_CELL_LENGTH).collect();
        self.status.insert(key, CellStatus::Neutral);
    }

    /// Submits the grid for checking
    ///
    /// Starts the clock if it is not running yet. Every answer cell is
    /// compared under the puzzle's normalization flags and marked
    /// correct or wrong; each wrong cell adds
    /// [`PENALTY_PER_WRONG_SECS`] seconds to the clock. A fully correct
    /// grid stops the clock. Ignored once solved.
    pub fn submit(&mut self, timer: &mut GameTimer, now: Instant) {
        if self.solved {
            return;
        }
        timer.start_if_needed(now);

        let outcome = self.evaluate();
        for (key, answer) in &self.config.answer_key {
            let matched = self.normalize(self.values.get(key).map_or("", String::as_str))
                == self.normalize(answer);
            self.status.insert(
                *key,
                if matched {
                    CellStatus::Correct
                } else {
                    CellStatus::Wrong
                },
            );
        }

        if outcome.wrong_count > 0 {
            timer.add_penalty_seconds(outcome.wrong_count as u64 * PENALTY_PER_WRONG_SECS);
        }
        if outcome.all_correct {
            self.solved = true;
            timer.stop(now);
        }
        self.submitted = true;
    }

    /// Clears only the cells marked wrong, keeping correct ones
    ///
    /// Locked cells are never touched. Cleared cells go back to neutral
    /// and the submitted flag drops so the next submit is a fresh
    /// judgement. Idempotent: a second call with no new wrong marks
    /// changes nothing.
    pub fn retry_wrong_only(&mut self) {
        for key in self.config.answer_key.keys() {
            if self.locked.contains(key) {
                continue;
            }
            if self.status.get(key) == Some(&CellStatus::Wrong) {
                self.values.insert(*key, String::new());
                self.status.insert(*key, CellStatus::Neutral);
            }
        }
        self.submitted = false;
    }

    /// Clears every unlocked answer cell back to empty and neutral
    ///
    /// The clock is reset by the caller alongside this.
    pub fn clear_all_inputs(&mut self) {
        for key in self.config.answer_key.keys() {
            if self.locked.contains(key) {
                continue;
            }
            self.values.insert(*key, String::new());
            self.status.insert(*key, CellStatus::Neutral);
        }
        self.submitted = false;
        self.solved = false;
    }
}
