//! Beacon-points map board
//!
//! A timed puzzle where labels from a shared bank are dropped onto zones
//! of a projected map, one label per zone. Unlike mix-match, finishing
//! is a single judgement: every zone is checked against its expected
//! label, each wrong or empty zone adds a time penalty, and the clock
//! stops whatever the result. A retry wipes the board and the clock for
//! a fresh run.

use std::collections::HashMap;

use garde::Validate;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::{
    constants::beacon_points::{MAX_LABEL_LENGTH, PENALTY_PER_WRONG_SECS},
    error::LoadError,
    scoring::OptionStatus,
    timer::GameTimer,
};

/// A droppable zone on the map
///
/// Zone geometry (position and size on the projected image) is
/// presentation data and stays with the host; the engine only needs the
/// zone's identity and its expected label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MapZone {
    /// Stable zone id from the content source
    #[garde(length(min = 1))]
    pub id: String,
    /// The label this zone expects, compared verbatim
    #[garde(length(min = 1, max = MAX_LABEL_LENGTH))]
    pub answer: String,
}

/// Validated puzzle for a beacon-points game
///
/// Labels beyond the zone answers act as decoys, as in mix-match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconPointsConfig {
    zones: Vec<MapZone>,
    labels: Vec<String>,
}

impl BeaconPointsConfig {
    /// Validates the puzzle
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::TooFew`] when no zones are supplied,
    /// [`LoadError::DanglingOption`] when a zone expects a label the
    /// bank does not contain, and a validation error for duplicate zone
    /// ids, duplicate labels, or labels outside the length limits.
    pub fn new(zones: Vec<MapZone>, labels: Vec<String>) -> Result<Self, LoadError> {
        if zones.is_empty() {
            return Err(LoadError::TooFew {
                what: "map zones",
                minimum: 1,
                actual: 0,
            });
        }
        for (i, zone) in zones.iter().enumerate() {
            zone.validate()?;
            if zones[..i].iter().any(|earlier| earlier.id == zone.id) {
                return Err(LoadError::Validation(format!(
                    "duplicate zone id \"{}\"",
                    zone.id
                )));
            }
        }
        for (i, label) in labels.iter().enumerate() {
            if label.is_empty() || label.chars().count() > MAX_LABEL_LENGTH {
                return Err(LoadError::Validation(format!(
                    "label \"{label}\" is empty or too long"
                )));
            }
            if labels[..i].contains(label) {
                return Err(LoadError::Validation(format!(
                    "duplicate label \"{label}\""
                )));
            }
        }
        for zone in &zones {
            if !labels.contains(&zone.answer) {
                return Err(LoadError::DanglingOption {
                    tile: zone.id.clone(),
                    option: zone.answer.clone(),
                });
            }
        }
        Ok(Self { zones, labels })
    }

    /// Creates the playing state with every zone empty
    pub fn to_state(&self) -> BeaconPointsState {
        BeaconPointsState {
            config: self.clone(),
            placements: HashMap::new(),
            statuses: HashMap::new(),
            last_outcome: None,
            finished: false,
        }
    }
}

/// Counts from the finish judgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconOutcome {
    /// Whether every zone held its expected label
    pub all_correct: bool,
    /// Zones that matched
    pub correct_count: usize,
    /// Zones that missed, empty ones included
    pub wrong_count: usize,
}

/// Live state of a beacon-points game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconPointsState {
    config: BeaconPointsConfig,
    /// Label placed on each zone, keyed by zone id
    placements: HashMap<String, String>,
    /// Per-zone judgement, populated only by a finish
    statuses: HashMap<String, OptionStatus>,
    last_outcome: Option<BeaconOutcome>,
    finished: bool,
}

impl BeaconPointsState {
    /// The map zones in source order
    pub fn zones(&self) -> &[MapZone] {
        &self.config.zones
    }

    /// The label placed on a zone, if any
    pub fn placed_on(&self, zone_id: &str) -> Option<&str> {
        self.placements.get(zone_id).map(String::as_str)
    }

    /// A zone's judgement from the finish, `None` before one
    pub fn zone_status(&self, zone_id: &str) -> Option<OptionStatus> {
        self.statuses.get(zone_id).copied()
    }

    /// Labels still in the bank, in source order
    pub fn bank(&self) -> Vec<&str> {
        self.config
            .labels
            .iter()
            .filter(|label| !self.placements.values().any(|placed| placed == *label))
            .map(String::as_str)
            .collect()
    }

    /// Counts from the finish, if it has happened
    pub fn last_outcome(&self) -> Option<BeaconOutcome> {
        self.last_outcome
    }

    /// Whether the finish judgement has happened
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Places a label onto a zone
    ///
    /// A label sits on at most one zone, so it is first removed from
    /// wherever it currently is; a zone holds one label, so placing onto
    /// an occupied zone sends the occupant back to the bank. Unknown
    /// zone or label values, and calls after the finish, are ignored.
    pub fn place_label(&mut self, zone_id: &str, label: &str) {
        if self.finished {
            return;
        }
        if !self.config.labels.iter().any(|known| known == label) {
            return;
        }
        if !self.config.zones.iter().any(|zone| zone.id == zone_id) {
            return;
        }
        self.placements.retain(|_, placed| placed != label);
        self.placements.insert(zone_id.to_owned(), label.to_owned());
    }

    /// Returns a label to the bank from wherever it is placed
    ///
    /// Ignored after the finish.
    pub fn return_label(&mut self, label: &str) {
        if self.finished {
            return;
        }
        self.placements.retain(|_, placed| placed != label);
    }

    /// Judges every zone and freezes the run
    ///
    /// Starts the clock if it is not running yet, so finishing an
    /// untouched board still costs time. Every zone not holding exactly
    /// its expected label, empty zones included, adds
    /// [`PENALTY_PER_WRONG_SECS`] seconds to the clock; then the clock
    /// stops regardless of the result. Ignored once finished.
    pub fn finish(&mut self, timer: &mut GameTimer, now: Instant) {
        if self.finished {
            return;
        }
        timer.start_if_needed(now);

        let mut correct_count = 0usize;
        let mut wrong_count = 0usize;
        for zone in &self.config.zones {
            let status = if self.placements.get(&zone.id) == Some(&zone.answer) {
                correct_count += 1;
                OptionStatus::Correct
            } else {
                wrong_count += 1;
                OptionStatus::Wrong
            };
            self.statuses.insert(zone.id.clone(), status);
        }

        if wrong_count > 0 {
            timer.add_penalty_seconds(wrong_count as u64 * PENALTY_PER_WRONG_SECS);
        }
        timer.stop(now);

        self.last_outcome = Some(BeaconOutcome {
            all_correct: wrong_count == 0,
            correct_count,
            wrong_count,
        });
        self.finished = true;
    }

    /// Clears every placement and judgement for a fresh run
    ///
    /// The caller resets the clock alongside this; a retry starts over
    /// from zero.
    pub fn reset(&mut self) {
        self.placements.clear();
        self.statuses.clear();
        self.last_outcome = None;
        self.finished = false;
    }
}
