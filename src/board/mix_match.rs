//! Mix-match pairing board
//!
//! A timed puzzle of 25 tiles, each requiring one option from a shared
//! bank to be dropped onto it. Submissions are evaluated all at once;
//! every tile that is not exactly right adds a time penalty, and the
//! clock stops the moment a submission solves the whole board.

use std::collections::HashMap;

use garde::Validate;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::{
    constants::mix_match::{MIN_OPTIONS, PENALTY_PER_WRONG_SECS, PLACEMENT_CAPACITY, TILE_COUNT},
    error::LoadError,
    scoring::{self, MatchOutcome},
    timer::GameTimer,
};

/// An option in the shared bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MatchOption {
    /// Stable option id from the content source
    #[garde(length(min = 1))]
    pub id: String,
    /// Text shown on the draggable chip
    #[garde(length(min = 1, max = 200))]
    pub label: String,
}

/// A tile that options are placed onto
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MatchTile {
    /// Stable tile id from the content source
    #[garde(length(min = 1))]
    pub id: String,
    /// Tile heading
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    /// Option ids this tile requires
    #[garde(length(min = 1))]
    pub required: Vec<String>,
}

/// Validated puzzle for a mix-match game
///
/// Distractor options beyond the required ones are expected; the bank is
/// larger than the board on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixMatchConfig {
    tiles: Vec<MatchTile>,
    options: Vec<MatchOption>,
}

impl MixMatchConfig {
    /// Validates the puzzle
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::WrongCount`] unless exactly [`TILE_COUNT`]
    /// tiles are supplied, [`LoadError::TooFew`] when the bank holds
    /// fewer than [`MIN_OPTIONS`] options, and
    /// [`LoadError::DanglingOption`] when a tile requires an option id
    /// the bank does not contain.
    pub fn new(tiles: Vec<MatchTile>, options: Vec<MatchOption>) -> Result<Self, LoadError> {
        if tiles.len() != TILE_COUNT {
            return Err(LoadError::WrongCount {
                what: "mix-match tiles",
                expected: TILE_COUNT,
                actual: tiles.len(),
            });
        }
        if options.len() < MIN_OPTIONS {
            return Err(LoadError::TooFew {
                what: "mix-match options",
                minimum: MIN_OPTIONS,
                actual: options.len(),
            });
        }
        for tile in &tiles {
            tile.validate()?;
            for required in &tile.required {
                if !options.iter().any(|option| option.id == *required) {
                    return Err(LoadError::DanglingOption {
                        tile: tile.id.clone(),
                        option: required.clone(),
                    });
                }
            }
        }
        for option in &options {
            option.validate()?;
        }
        Ok(Self { tiles, options })
    }

    /// Creates the playing state with an empty placement per tile
    pub fn to_state(&self) -> MixMatchState {
        MixMatchState {
            config: self.clone(),
            placements: self
                .tiles
                .iter()
                .map(|tile| (tile.id.clone(), Vec::new()))
                .collect(),
            last_outcome: None,
            solved: false,
        }
    }
}

/// Live state of a mix-match game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixMatchState {
    config: MixMatchConfig,
    /// Option ids placed on each tile, keyed by tile id
    placements: HashMap<String, Vec<String>>,
    /// Evaluation of the latest submission
    last_outcome: Option<MatchOutcome>,
    solved: bool,
}

impl MixMatchState {
    /// The puzzle's tiles in source order
    pub fn tiles(&self) -> &[MatchTile] {
        &self.config.tiles
    }

    /// Options placed on a tile
    pub fn placed_on(&self, tile_id: &str) -> &[String] {
        self.placements
            .get(tile_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Options still in the bank, in source order
    pub fn bank(&self) -> Vec<&MatchOption> {
        self.config
            .options
            .iter()
            .filter(|option| {
                !self
                    .placements
                    .values()
                    .any(|placed| placed.contains(&option.id))
            })
            .collect()
    }

    /// Evaluation of the latest submission, if any
    pub fn last_outcome(&self) -> Option<&MatchOutcome> {
        self.last_outcome.as_ref()
    }

    /// Whether a submission has solved the whole board
    pub fn solved(&self) -> bool {
        self.solved
    }

    /// Places an option onto a tile
    ///
    /// An option sits in at most one place, so it is first removed from
    /// wherever it currently is. A tile holds at most
    /// [`PLACEMENT_CAPACITY`] options; placing onto a full tile bumps the
    /// oldest occupant back to the bank. Unknown tile or option ids, and
    /// calls after the board is solved, are ignored.
    pub fn place_option(&mut self, tile_id: &str, option_id: &str) {
        if self.solved {
            return;
        }
        if !self.config.options.iter().any(|option| option.id == option_id) {
            return;
        }
        if !self.placements.contains_key(tile_id) {
            return;
        }

        for placed in self.placements.values_mut() {
            placed.retain(|id| id != option_id);
        }

        let Some(placed) = self.placements.get_mut(tile_id) else {
            return;
        };
        while placed.len() >= PLACEMENT_CAPACITY {
            placed.remove(0);
        }
        placed.push(option_id.to_owned());
    }

    /// Returns an option to the bank from wherever it is placed
    ///
    /// Ignored after the board is solved.
    pub fn return_option(&mut self, option_id: &str) {
        if self.solved {
            return;
        }
        for placed in self.placements.values_mut() {
            placed.retain(|id| id != option_id);
        }
    }

    /// Submits the current placements for evaluation
    ///
    /// Starts the clock if it is not running yet, so a submission on an
    /// untouched board still costs time. Every tile that is not exactly
    /// right, unfilled tiles included, adds
    /// [`PENALTY_PER_WRONG_SECS`] seconds to the clock. A fully correct
    /// submission stops the clock. Ignored once solved.
    pub fn submit(&mut self, timer: &mut GameTimer, now: Instant) {
        if self.solved {
            return;
        }
        timer.start_if_needed(now);

        let outcome = scoring::evaluate_placements(
            self.config
                .tiles
                .iter()
                .map(|tile| (tile.id.as_str(), tile.required.as_slice())),
            &self.placements,
        );

        let wrong_count = outcome.wrong_tiles.len() as u64;
        if wrong_count > 0 {
            timer.add_penalty_seconds(wrong_count * PENALTY_PER_WRONG_SECS);
        }

        if outcome.all_correct {
            self.solved = true;
            timer.stop(now);
        }
        self.last_outcome = Some(outcome);
    }

    /// Clears every placement and forgets past submissions
    ///
    /// The clock keeps its accrued time; a reset mid-run does not erase
    /// penalties already earned.
    pub fn reset(&mut self) {
        for placed in self.placements.values_mut() {
            placed.clear();
        }
        self.last_outcome = None;
        self.solved = false;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use web_time::Duration;

    fn config() -> MixMatchConfig {
        let tiles = (0..TILE_COUNT)
            .map(|i| MatchTile {
                id: format!("t{i}"),
                title: format!("tile {i}"),
                required: vec![format!("o{i}")],
            })
            .collect();
        // 25 required options plus 10 distractors
        let options = (0..MIN_OPTIONS + 10)
            .map(|i| MatchOption {
                id: format!("o{i}"),
                label: format!("option {i}"),
            })
            .collect();
        MixMatchConfig::new(tiles, options).unwrap()
    }

    fn solve(state: &mut MixMatchState) {
        for i in 0..TILE_COUNT {
            state.place_option(&format!("t{i}"), &format!("o{i}"));
        }
    }

    #[test]
    fn test_config_rejects_wrong_tile_count() {
        assert!(matches!(
            MixMatchConfig::new(vec![], vec![]),
            Err(LoadError::WrongCount { expected: 25, .. })
        ));
    }

    #[test]
    fn test_config_rejects_small_bank() {
        let tiles = (0..TILE_COUNT)
            .map(|i| MatchTile {
                id: format!("t{i}"),
                title: format!("tile {i}"),
                required: vec![format!("o{i}")],
            })
            .collect();
        let options = (0..5)
            .map(|i| MatchOption {
                id: format!("o{i}"),
                label: format!("option {i}"),
            })
            .collect();
        assert!(matches!(
            MixMatchConfig::new(tiles, options),
            Err(LoadError::TooFew { minimum: 25, .. })
        ));
    }

    #[test]
    fn test_config_rejects_dangling_required_id() {
        let mut tiles: Vec<MatchTile> = (0..TILE_COUNT)
            .map(|i| MatchTile {
                id: format!("t{i}"),
                title: format!("tile {i}"),
                required: vec![format!("o{i}")],
            })
            .collect();
        tiles[7].required = vec!["missing".to_owned()];
        let options = (0..MIN_OPTIONS)
            .map(|i| MatchOption {
                id: format!("o{i}"),
                label: format!("option {i}"),
            })
            .collect();

        let result = MixMatchConfig::new(tiles, options);
        match result {
            Err(LoadError::DanglingOption { tile, option }) => {
                assert_eq!(tile, "t7");
                assert_eq!(option, "missing");
            }
            other => panic!("expected DanglingOption, got {other:?}"),
        }
    }

    #[test]
    fn test_placement_is_exclusive() {
        let mut state = config().to_state();
        state.place_option("t0", "o5");
        state.place_option("t1", "o5");

        assert!(state.placed_on("t0").is_empty());
        assert_eq!(state.placed_on("t1"), ["o5"]);
    }

    #[test]
    fn test_full_tile_bumps_occupant_back_to_bank() {
        let mut state = config().to_state();
        state.place_option("t0", "o1");
        state.place_option("t0", "o2");

        assert_eq!(state.placed_on("t0"), ["o2"]);
        assert!(state.bank().iter().any(|option| option.id == "o1"));
    }

    #[test]
    fn test_return_option() {
        let mut state = config().to_state();
        state.place_option("t0", "o1");
        state.return_option("o1");
        assert!(state.placed_on("t0").is_empty());
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut state = config().to_state();
        state.place_option("nope", "o1");
        state.place_option("t0", "nope");
        assert!(state.placed_on("t0").is_empty());
        assert!(state.bank().iter().any(|option| option.id == "o1"));
    }

    #[test]
    fn test_submit_penalizes_every_imperfect_tile() {
        let mut state = config().to_state();
        let mut timer = GameTimer::new();
        let t0 = Instant::now();

        // one tile right, one wrong, 23 unfilled
        state.place_option("t0", "o0");
        state.place_option("t1", "o30");
        state.submit(&mut timer, t0);

        assert!(timer.is_running());
        let penalty = 24 * PENALTY_PER_WRONG_SECS;
        assert_eq!(timer.elapsed(t0), Duration::from_secs(penalty));
        assert!(!state.solved());
        assert_eq!(state.last_outcome().unwrap().wrong_tiles.len(), 24);
    }

    #[test]
    fn test_perfect_submission_stops_the_clock() {
        let mut state = config().to_state();
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);

        solve(&mut state);
        state.submit(&mut timer, t0 + Duration::from_secs(90));

        assert!(state.solved());
        assert!(!timer.is_running());
        assert_eq!(
            timer.elapsed(t0 + Duration::from_secs(300)),
            Duration::from_secs(90)
        );

        // further edits are ignored once solved
        state.return_option("o0");
        assert_eq!(state.placed_on("t0"), ["o0"]);
    }

    #[test]
    fn test_reset_clears_placements_and_outcome() {
        let mut state = config().to_state();
        let mut timer = GameTimer::new();
        solve(&mut state);
        state.submit(&mut timer, Instant::now());

        state.reset();
        assert!(!state.solved());
        assert!(state.last_outcome().is_none());
        assert_eq!(state.bank().len(), MIN_OPTIONS + 10);
    }
}
