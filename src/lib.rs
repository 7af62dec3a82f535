//! # Team Quiz Engine
//!
//! This library provides the core game logic for a host-run team quiz
//! system. One host screen drives a session for a handful of teams in the
//! room: the host picks a board variant, registers teams, plays the game
//! through events, and saves the final scores to a shared leaderboard.
//!
//! Five board variants are included: a claim grid with line bonuses, a
//! category quiz with steals, and three timed puzzles (mix-match pairing,
//! fill-boxes, and beacon-points map labelling) that score from the
//! shared clock. The leaderboard sits behind a storage trait so hosts can
//! plug in their own backend.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]

pub mod board;
pub mod constants;
pub mod error;
pub mod leaderboard;
pub mod scoring;
pub mod session;
pub mod teams;
pub mod timer;
