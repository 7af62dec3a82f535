//! Board configuration, live state, and event dispatch
//!
//! Wraps the per-variant configs and states in a pair of tagged unions
//! and routes host events to whichever variant is active. Events that do
//! not apply to the active variant are ignored, so a stale click on the
//! host screen can never corrupt a game.

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::{
    teams::{TeamId, TeamRoster},
    timer::GameTimer,
};

use super::{
    beacon_points::{BeaconPointsConfig, BeaconPointsState},
    category::{CategoryConfig, CategoryPhase, CategoryState},
    claim_grid::{ClaimGridConfig, ClaimGridState, GridPhase},
    fill_boxes::{CellKey, FillBoxesConfig, FillBoxesState},
    mix_match::{MixMatchConfig, MixMatchState},
};

/// Which variant a board is, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoardKind {
    /// Turn-based grid claiming with line bonuses
    ClaimGrid,
    /// Turn-based category quiz with steals
    Category,
    /// Timed pairing puzzle
    MixMatch,
    /// Timed fill-in grid
    FillBoxes,
    /// Timed map-labelling puzzle
    BeaconPoints,
}

impl BoardKind {
    /// Whether the variant is scored from the clock
    pub fn is_timed(self) -> bool {
        matches!(
            self,
            BoardKind::MixMatch | BoardKind::FillBoxes | BoardKind::BeaconPoints
        )
    }
}

/// A variant-agnostic view of where the game currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Board shown, waiting for a pick
    Board,
    /// A question is being answered
    Question,
    /// A wrong answer is open to steals
    Steal,
    /// An outcome is on screen awaiting acknowledgement
    Reveal,
    /// A timed puzzle is in play
    Playing,
    /// A timed puzzle has reached its final judgement
    Solved,
}

/// Validated configuration for any board variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum BoardConfig {
    /// Claim-grid questions
    ClaimGrid(ClaimGridConfig),
    /// Category tiles
    Category(CategoryConfig),
    /// Mix-match puzzle
    MixMatch(MixMatchConfig),
    /// Fill-boxes puzzle
    FillBoxes(FillBoxesConfig),
    /// Beacon-points map
    BeaconPoints(BeaconPointsConfig),
}

impl BoardConfig {
    /// Creates the live state for this configuration
    pub fn to_state(&self) -> BoardState {
        match self {
            BoardConfig::ClaimGrid(config) => BoardState::ClaimGrid(config.to_state()),
            BoardConfig::Category(config) => BoardState::Category(config.to_state()),
            BoardConfig::MixMatch(config) => BoardState::MixMatch(config.to_state()),
            BoardConfig::FillBoxes(config) => BoardState::FillBoxes(config.to_state()),
            BoardConfig::BeaconPoints(config) => BoardState::BeaconPoints(config.to_state()),
        }
    }

    /// Which variant this configures
    pub fn kind(&self) -> BoardKind {
        match self {
            BoardConfig::ClaimGrid(_) => BoardKind::ClaimGrid,
            BoardConfig::Category(_) => BoardKind::Category,
            BoardConfig::MixMatch(_) => BoardKind::MixMatch,
            BoardConfig::FillBoxes(_) => BoardKind::FillBoxes,
            BoardConfig::BeaconPoints(_) => BoardKind::BeaconPoints,
        }
    }
}

/// An input from the host screen
///
/// Events carry everything the board needs; the board never reaches
/// back out to the UI. Events meant for a different variant than the
/// active one are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum GameEvent {
    /// A team picks a tile on a turn-based board
    PickTile {
        /// Tile id (category) or row-major index (claim grid)
        tile: u64,
        /// The picking team
        team: TeamId,
    },
    /// The host judges the open claim-grid question
    MarkAnswer {
        /// Whether the answer was correct
        correct: bool,
    },
    /// A team arms to steal the open category question
    ArmStealer {
        /// The arming team
        team: TeamId,
    },
    /// The answering team submits a category choice
    SubmitChoice {
        /// Key of the chosen option
        option: String,
    },
    /// An option is dropped onto a mix-match tile or a map zone
    PlaceOption {
        /// Target tile or zone id
        tile: String,
        /// Dragged option id or label
        option: String,
    },
    /// An option is dragged back to the bank
    ReturnOption {
        /// The returned option id or label
        option: String,
    },
    /// A fill-boxes cell is typed into
    SetCell {
        /// The edited cell
        cell: CellKey,
        /// New cell value
        value: String,
    },
    /// The current answers are submitted for checking
    Submit,
    /// Wrong fill-boxes cells are cleared for another attempt
    RetryWrong,
    /// The board is cleared back to its starting position
    ClearInputs,
    /// The reveal overlay is dismissed
    AcknowledgeReveal,
}

/// Live state of whichever board variant is being played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum BoardState {
    /// Claim-grid game in progress
    ClaimGrid(ClaimGridState),
    /// Category game in progress
    Category(CategoryState),
    /// Mix-match game in progress
    MixMatch(MixMatchState),
    /// Fill-boxes game in progress
    FillBoxes(FillBoxesState),
    /// Beacon-points game in progress
    BeaconPoints(BeaconPointsState),
}

impl BoardState {
    /// Which variant is being played
    pub fn kind(&self) -> BoardKind {
        match self {
            BoardState::ClaimGrid(_) => BoardKind::ClaimGrid,
            BoardState::Category(_) => BoardKind::Category,
            BoardState::MixMatch(_) => BoardKind::MixMatch,
            BoardState::FillBoxes(_) => BoardKind::FillBoxes,
            BoardState::BeaconPoints(_) => BoardKind::BeaconPoints,
        }
    }

    /// A variant-agnostic view of where the game currently is
    pub fn phase(&self) -> Phase {
        match self {
            BoardState::ClaimGrid(state) => match state.phase() {
                GridPhase::Board => Phase::Board,
                GridPhase::Question { .. } => Phase::Question,
                GridPhase::Reveal { .. } => Phase::Reveal,
            },
            BoardState::Category(state) => match state.phase() {
                CategoryPhase::Board => Phase::Board,
                CategoryPhase::Question => Phase::Question,
                CategoryPhase::Steal => Phase::Steal,
                CategoryPhase::Reveal => Phase::Reveal,
            },
            BoardState::MixMatch(state) => {
                if state.solved() {
                    Phase::Solved
                } else {
                    Phase::Playing
                }
            }
            BoardState::FillBoxes(state) => {
                if state.solved() {
                    Phase::Solved
                } else {
                    Phase::Playing
                }
            }
            BoardState::BeaconPoints(state) => {
                if state.finished() {
                    Phase::Solved
                } else {
                    Phase::Playing
                }
            }
        }
    }

    /// The claim-grid state, if that variant is active
    pub fn as_claim_grid(&self) -> Option<&ClaimGridState> {
        match self {
            BoardState::ClaimGrid(state) => Some(state),
            _ => None,
        }
    }

    /// The category state, if that variant is active
    pub fn as_category(&self) -> Option<&CategoryState> {
        match self {
            BoardState::Category(state) => Some(state),
            _ => None,
        }
    }

    /// The mix-match state, if that variant is active
    pub fn as_mix_match(&self) -> Option<&MixMatchState> {
        match self {
            BoardState::MixMatch(state) => Some(state),
            _ => None,
        }
    }

    /// The fill-boxes state, if that variant is active
    pub fn as_fill_boxes(&self) -> Option<&FillBoxesState> {
        match self {
            BoardState::FillBoxes(state) => Some(state),
            _ => None,
        }
    }

    /// The beacon-points state, if that variant is active
    pub fn as_beacon_points(&self) -> Option<&BeaconPointsState> {
        match self {
            BoardState::BeaconPoints(state) => Some(state),
            _ => None,
        }
    }

    /// Routes an event to the active variant
    ///
    /// `ClearInputs` doubles as a full board reset for every variant:
    /// claims and scores on turn-based boards, placements on mix-match,
    /// cell values plus the clock on fill-boxes, and labels plus the
    /// clock on beacon points (whose clears always restart the run).
    /// All other mismatched events are ignored.
    pub fn apply(
        &mut self,
        event: GameEvent,
        teams: &mut TeamRoster,
        timer: &mut GameTimer,
        now: Instant,
    ) {
        match self {
            BoardState::ClaimGrid(state) => match event {
                GameEvent::PickTile { tile, team } => {
                    if let Ok(tile) = usize::try_from(tile) {
                        state.pick_tile(tile, team);
                    }
                }
                GameEvent::MarkAnswer { correct } => state.mark_answer(correct, teams),
                GameEvent::AcknowledgeReveal => state.acknowledge_reveal(),
                GameEvent::ClearInputs => {
                    state.reset();
                    teams.reset_scores();
                }
                _ => {}
            },
            BoardState::Category(state) => match event {
                GameEvent::PickTile { tile, team } => state.pick_tile(tile, team),
                GameEvent::ArmStealer { team } => state.arm_stealer(team),
                GameEvent::SubmitChoice { option } => state.submit_choice(&option, teams),
                GameEvent::AcknowledgeReveal => state.acknowledge_reveal(),
                GameEvent::ClearInputs => {
                    state.reset();
                    teams.reset_scores();
                }
                _ => {}
            },
            BoardState::MixMatch(state) => match event {
                GameEvent::PlaceOption { tile, option } => state.place_option(&tile, &option),
                GameEvent::ReturnOption { option } => state.return_option(&option),
                GameEvent::Submit => state.submit(timer, now),
                GameEvent::ClearInputs => state.reset(),
                _ => {}
            },
            BoardState::FillBoxes(state) => match event {
                GameEvent::SetCell { cell, value } => state.set_cell(cell, &value),
                GameEvent::Submit => state.submit(timer, now),
                GameEvent::RetryWrong => state.retry_wrong_only(),
                GameEvent::ClearInputs => {
                    state.clear_all_inputs();
                    timer.reset();
                }
                _ => {}
            },
            BoardState::BeaconPoints(state) => match event {
                GameEvent::PlaceOption { tile, option } => state.place_label(&tile, &option),
                GameEvent::ReturnOption { option } => state.return_label(&option),
                GameEvent::Submit => state.finish(timer, now),
                GameEvent::ClearInputs => {
                    state.reset();
                    timer.reset();
                }
                _ => {}
            },
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{board::claim_grid::GridQuestion, teams::Team};

    fn grid_config() -> BoardConfig {
        let questions = (0..16)
            .map(|i| GridQuestion {
                prompt: format!("q{i}"),
                answer: format!("a{i}"),
                points: 100,
            })
            .collect();
        BoardConfig::ClaimGrid(ClaimGridConfig::new(questions).unwrap())
    }

    #[test]
    fn test_kind_survives_to_state() {
        let config = grid_config();
        assert_eq!(config.kind(), BoardKind::ClaimGrid);
        assert_eq!(config.to_state().kind(), BoardKind::ClaimGrid);
    }

    #[test]
    fn test_timed_kinds() {
        assert!(BoardKind::MixMatch.is_timed());
        assert!(BoardKind::FillBoxes.is_timed());
        assert!(BoardKind::BeaconPoints.is_timed());
        assert!(!BoardKind::ClaimGrid.is_timed());
        assert!(!BoardKind::Category.is_timed());
    }

    #[test]
    fn test_foreign_events_are_ignored() {
        let mut teams = TeamRoster::new(vec![Team::new("Red", "#f00")]);
        let mut timer = GameTimer::new();
        let now = Instant::now();
        let mut board = grid_config().to_state();

        // mix-match and fill-boxes events bounce off a claim grid
        board.apply(GameEvent::Submit, &mut teams, &mut timer, now);
        board.apply(
            GameEvent::SetCell {
                cell: CellKey::new(0, 0),
                value: "x".to_owned(),
            },
            &mut teams,
            &mut timer,
            now,
        );

        assert_eq!(board.phase(), Phase::Board);
        assert!(!timer.is_started());
    }

    #[test]
    fn test_phase_view_follows_the_grid() {
        let mut teams = TeamRoster::new(vec![Team::new("Red", "#f00")]);
        let red = teams.ids()[0];
        let mut timer = GameTimer::new();
        let now = Instant::now();
        let mut board = grid_config().to_state();

        assert_eq!(board.phase(), Phase::Board);
        board.apply(
            GameEvent::PickTile { tile: 0, team: red },
            &mut teams,
            &mut timer,
            now,
        );
        assert_eq!(board.phase(), Phase::Question);
        board.apply(
            GameEvent::MarkAnswer { correct: true },
            &mut teams,
            &mut timer,
            now,
        );
        assert_eq!(board.phase(), Phase::Reveal);
    }

    #[test]
    fn test_clear_inputs_resets_grid_and_scores() {
        let mut teams = TeamRoster::new(vec![Team::new("Red", "#f00")]);
        let red = teams.ids()[0];
        let mut timer = GameTimer::new();
        let now = Instant::now();
        let mut board = grid_config().to_state();

        board.apply(
            GameEvent::PickTile { tile: 0, team: red },
            &mut teams,
            &mut timer,
            now,
        );
        board.apply(
            GameEvent::MarkAnswer { correct: true },
            &mut teams,
            &mut timer,
            now,
        );
        board.apply(GameEvent::AcknowledgeReveal, &mut teams, &mut timer, now);
        assert_eq!(teams.get(red).unwrap().score, 100);

        board.apply(GameEvent::ClearInputs, &mut teams, &mut timer, now);
        assert_eq!(teams.get(red).unwrap().score, 0);
        let grid = board.as_claim_grid().unwrap();
        assert!(grid.tiles().iter().all(|t| t.claimed_by.is_none()));
    }
}
