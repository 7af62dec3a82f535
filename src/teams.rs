//! Team identity and roster management
//!
//! This module holds the roster of competing teams for a game session. Teams
//! are created up front by the host and keep a running score that the board
//! variants award into. The roster preserves insertion order so the host
//! screen lists teams in the order they were registered.

use std::{fmt::Display, str::FromStr};

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use uuid::Uuid;

/// A unique identifier for a team
///
/// Team IDs persist for the lifetime of a session and are used to record
/// tile claims and score awards.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Creates a new random team ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TeamId {
    /// Creates a new random team ID (same as `new()`)
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TeamId {
    /// Formats the ID as a UUID string
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TeamId {
    type Err = uuid::Error;

    /// Parses a team ID from a UUID string
    ///
    /// # Errors
    ///
    /// Returns a `uuid::Error` if the string is not a valid UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A competing team with its running score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Team {
    /// Unique identifier, assigned at registration
    #[garde(skip)]
    pub id: TeamId,
    /// Display name shown on the host screen and the leaderboard
    #[garde(length(min = 1, max = 100))]
    pub name: String,
    /// Display color as a CSS color string
    #[garde(length(max = 50))]
    pub color: String,
    /// Running score, accumulated by the board variants
    #[garde(skip)]
    pub score: u64,
}

impl Team {
    /// Creates a team with a fresh random ID and a zero score
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: TeamId::new(),
            name: name.into(),
            color: color.into(),
            score: 0,
        }
    }
}

/// The roster of teams competing in a session
///
/// Insertion order is preserved. All mutation goes through scoring methods
/// so a team's score can never drift from what the board awarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    teams: Vec<Team>,
}

impl TeamRoster {
    /// Creates a roster from the given teams, keeping their order
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    /// Number of teams on the roster
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether the roster has no teams
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Looks up a team by ID
    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Whether a team with the given ID is on the roster
    pub fn contains(&self, id: TeamId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates over teams in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter()
    }

    /// All team IDs in registration order
    pub fn ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id).collect()
    }

    /// Adds `points` to a team's score
    ///
    /// Unknown IDs are ignored; the board variants only hand out IDs that
    /// came from this roster.
    pub fn award(&mut self, id: TeamId, points: u64) {
        if let Some(team) = self.teams.iter_mut().find(|t| t.id == id) {
            team.score += points;
        }
    }

    /// Replaces a team's score outright
    pub fn set_score(&mut self, id: TeamId, score: u64) {
        if let Some(team) = self.teams.iter_mut().find(|t| t.id == id) {
            team.score = score;
        }
    }

    /// Replaces every team's score with the given value
    ///
    /// Timed variants use this at game end, where every team on the roster
    /// earns the same time-derived score.
    pub fn set_all_scores(&mut self, score: u64) {
        for team in &mut self.teams {
            team.score = score;
        }
    }

    /// Zeroes every score, keeping the roster intact
    pub fn reset_scores(&mut self) {
        self.set_all_scores(0);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn roster_of(names: &[&str]) -> TeamRoster {
        TeamRoster::new(names.iter().map(|n| Team::new(*n, "#ff0000")).collect())
    }

    #[test]
    fn test_team_id_round_trips_through_string() {
        let id = TeamId::new();
        let parsed: TeamId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_roster_preserves_order() {
        let roster = roster_of(&["Red", "Blue", "Green"]);
        let names: Vec<_> = roster.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Blue", "Green"]);
    }

    #[test]
    fn test_award_accumulates() {
        let mut roster = roster_of(&["Red", "Blue"]);
        let red = roster.ids()[0];
        roster.award(red, 200);
        roster.award(red, 300);
        assert_eq!(roster.get(red).unwrap().score, 500);
        assert_eq!(roster.iter().nth(1).unwrap().score, 0);
    }

    #[test]
    fn test_award_unknown_id_is_ignored() {
        let mut roster = roster_of(&["Red"]);
        roster.award(TeamId::new(), 100);
        assert_eq!(roster.iter().next().unwrap().score, 0);
    }

    #[test]
    fn test_set_all_scores() {
        let mut roster = roster_of(&["Red", "Blue"]);
        let red = roster.ids()[0];
        roster.award(red, 42);
        roster.set_all_scores(517);
        assert!(roster.iter().all(|t| t.score == 517));
    }

    #[test]
    fn test_team_name_validation() {
        let mut team = Team::new("Red", "#ff0000");
        assert!(team.validate().is_ok());
        team.name = String::new();
        assert!(team.validate().is_err());
    }
}
