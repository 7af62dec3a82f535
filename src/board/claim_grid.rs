//! Claim-grid game board
//!
//! A 4x4 grid of hidden questions. Teams take turns picking a tile; a
//! correct answer claims the tile for that team, and completing a full
//! row or column earns a fixed bonus. Scores are recomputed from the
//! whole claim pattern after every change so bonuses can never be
//! double-counted.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    constants::claim_grid::{MAX_ANSWER_LENGTH, MAX_PROMPT_LENGTH, TILE_COUNT},
    error::LoadError,
    scoring,
    teams::{TeamId, TeamRoster},
};

/// A single question behind a grid tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GridQuestion {
    /// Question text shown when the tile is picked
    #[garde(length(max = MAX_PROMPT_LENGTH))]
    pub prompt: String,
    /// Answer text shown to the host for judging
    #[garde(length(max = MAX_ANSWER_LENGTH))]
    pub answer: String,
    /// Points the tile is worth when claimed
    #[garde(skip)]
    pub points: u64,
}

/// Validated set of questions for a claim-grid game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimGridConfig {
    questions: Vec<GridQuestion>,
}

impl ClaimGridConfig {
    /// Validates the question set
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::WrongCount`] unless exactly [`TILE_COUNT`]
    /// questions are supplied, or a validation error if any question
    /// exceeds the length limits.
    pub fn new(questions: Vec<GridQuestion>) -> Result<Self, LoadError> {
        if questions.len() != TILE_COUNT {
            return Err(LoadError::WrongCount {
                what: "claim grid questions",
                expected: TILE_COUNT,
                actual: questions.len(),
            });
        }
        for question in &questions {
            question.validate()?;
        }
        Ok(Self { questions })
    }

    /// Creates the playing state, shuffling questions onto the grid
    pub fn to_state(&self) -> ClaimGridState {
        let mut questions = self.questions.clone();
        fastrand::shuffle(&mut questions);
        ClaimGridState {
            tiles: questions
                .into_iter()
                .map(|question| GridTile {
                    question,
                    claimed_by: None,
                })
                .collect(),
            phase: GridPhase::Board,
        }
    }
}

/// A tile on the live grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTile {
    /// The question behind the tile
    pub question: GridQuestion,
    /// Team that claimed the tile, `None` while unclaimed
    pub claimed_by: Option<TeamId>,
}

/// Where the claim-grid game currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "phase")]
pub enum GridPhase {
    /// Grid shown, waiting for a team to pick a tile
    Board,
    /// A tile's question is on screen, awaiting the host's judgement
    Question {
        /// Index of the picked tile in row-major order
        tile: usize,
        /// Team answering the question
        team: TeamId,
    },
    /// Judgement shown, waiting for the host to return to the board
    Reveal {
        /// Index of the judged tile
        tile: usize,
        /// Team that answered
        team: TeamId,
        /// Whether the answer was judged correct
        correct: bool,
    },
}

/// Live state of a claim-grid game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimGridState {
    tiles: Vec<GridTile>,
    phase: GridPhase,
}

impl ClaimGridState {
    /// Current phase
    pub fn phase(&self) -> GridPhase {
        self.phase
    }

    /// The grid tiles in row-major order
    pub fn tiles(&self) -> &[GridTile] {
        &self.tiles
    }

    /// Claim pattern in row-major order, one entry per tile
    fn claims(&self) -> Vec<Option<TeamId>> {
        self.tiles.iter().map(|tile| tile.claimed_by).collect()
    }

    /// Opens a tile's question for `team`
    ///
    /// Ignored outside the board phase, for an out-of-range index, and
    /// for tiles already claimed.
    pub fn pick_tile(&mut self, tile: usize, team: TeamId) {
        if self.phase == GridPhase::Board
            && self.tiles.get(tile).is_some_and(|t| t.claimed_by.is_none())
        {
            self.phase = GridPhase::Question { tile, team };
        }
    }

    /// Records the host's judgement of the open question
    ///
    /// A correct answer claims the tile, after which the answering
    /// team's score is recomputed from the full claim pattern, line
    /// bonuses included. A wrong answer leaves the tile open for any
    /// team. Ignored outside the question phase, and for a phase whose
    /// tile index does not exist on the grid (possible only in a
    /// hand-edited snapshot).
    pub fn mark_answer(&mut self, correct: bool, teams: &mut TeamRoster) {
        let GridPhase::Question { tile, team } = self.phase else {
            return;
        };

        if correct {
            let Some(picked) = self.tiles.get_mut(tile) else {
                return;
            };
            picked.claimed_by = Some(team);
            let points: Vec<u64> = self.tiles.iter().map(|t| t.question.points).collect();
            let total = scoring::claim_grid_total(&self.claims(), &points, team);
            teams.set_score(team, total);
        }

        self.phase = GridPhase::Reveal {
            tile,
            team,
            correct,
        };
    }

    /// Returns to the board after a reveal
    ///
    /// Ignored outside the reveal phase.
    pub fn acknowledge_reveal(&mut self) {
        if matches!(self.phase, GridPhase::Reveal { .. }) {
            self.phase = GridPhase::Board;
        }
    }

    /// Clears every claim and returns to the board
    ///
    /// Tile order is kept; only ownership is wiped. Team scores are reset
    /// by the caller alongside this.
    pub fn reset(&mut self) {
        for tile in &mut self.tiles {
            tile.claimed_by = None;
        }
        self.phase = GridPhase::Board;
    }

    /// Lines fully claimed by `team`, for the host display
    pub fn completed_lines(&self, team: TeamId) -> Vec<scoring::LineKey> {
        scoring::completed_lines(&self.claims(), team)
    }
}
