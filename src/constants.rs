//! Configuration constants for the game engine
//!
//! This module contains the board dimensions, count invariants, and
//! scoring parameters used throughout the engine. Load-time validation
//! and the scoring functions both read from here so the numbers cannot
//! drift apart.

/// Claim-grid (Bingo-style) board constants
pub mod claim_grid {
    /// Number of tiles per side of the square grid
    pub const GRID_SIDE: usize = 4;
    /// Total number of tiles (and therefore questions) on the board
    pub const TILE_COUNT: usize = GRID_SIDE * GRID_SIDE;
    /// Points awarded for each fully same-team row or column
    pub const BONUS_POINTS: u64 = 100;
    /// Maximum length of a question prompt in characters
    pub const MAX_PROMPT_LENGTH: usize = 400;
    /// Maximum length of an answer in characters
    pub const MAX_ANSWER_LENGTH: usize = 200;
}

/// Category steal-quiz constants
pub mod category {
    /// Maximum length of a question prompt in characters
    pub const MAX_PROMPT_LENGTH: usize = 400;
    /// Maximum length of a single answer option in characters
    pub const MAX_OPTION_LENGTH: usize = 200;
    /// Maximum number of answer options per question
    pub const MAX_OPTION_COUNT: usize = 8;
}

/// Tile-matching puzzle constants
pub mod mix_match {
    /// Exact number of tiles a puzzle must contain
    pub const TILE_COUNT: usize = 25;
    /// Minimum number of options a puzzle must supply
    pub const MIN_OPTIONS: usize = 25;
    /// Recommended number of options (the surplus over the tile count
    /// acts as decoys)
    pub const RECOMMENDED_OPTIONS: usize = 35;
    /// How many options a single tile holds under current rules
    pub const PLACEMENT_CAPACITY: usize = 1;
    /// Penalty in seconds added per wrong tile on submission
    pub const PENALTY_PER_WRONG_SECS: u64 = 5;
}

/// Map-labelling puzzle constants
pub mod beacon_points {
    /// Penalty in seconds added per wrong or empty zone at the finish
    pub const PENALTY_PER_WRONG_SECS: u64 = 10;
    /// Maximum length of a zone label in characters
    pub const MAX_LABEL_LENGTH: usize = 200;
}

/// Fill-in-the-blanks sheet constants
pub mod fill_boxes {
    /// Penalty in seconds added per wrong cell on submission
    pub const PENALTY_PER_WRONG_SECS: u64 = 5;
    /// Maximum length of a cell value in characters
    pub const MAX_CELL_LENGTH: usize = 100;
}

/// Time-to-score conversion constants
pub mod scoring {
    /// Starting score pool for timed variants; each elapsed second
    /// (penalties included) costs one point, floored at zero
    pub const BASE_SECONDS: u64 = 600;
}
