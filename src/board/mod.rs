//! Game board variants and configuration
//!
//! This module contains the five board variants a session can play: the
//! claim grid, the category steal-quiz, the mix-match pairing puzzle,
//! the fill-boxes sheet, and the beacon-points map. Each variant has its
//! own configuration, state machine, and validation. The `config`
//! submodule wraps them in tagged unions and routes host events to
//! whichever variant is active.

pub mod beacon_points;
pub mod category;
pub mod claim_grid;
pub mod config;
pub mod fill_boxes;
pub mod mix_match;
