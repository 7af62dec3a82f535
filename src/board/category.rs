//! Category steal-quiz board
//!
//! Teams pick tiles from a category board. The picking team answers a
//! multiple-choice question; a wrong answer opens the question to steals
//! from teams that have not yet attempted it. The tile is claimed by
//! whoever answers correctly, or left unclaimed once every team has
//! missed.

use std::collections::HashSet;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    constants::category::{MAX_OPTION_COUNT, MAX_OPTION_LENGTH, MAX_PROMPT_LENGTH},
    error::LoadError,
    teams::{TeamId, TeamRoster},
};

/// One answer choice on a category question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryOption {
    /// Short key the choice is submitted by, e.g. `"A"`
    #[garde(length(min = 1, max = 10))]
    pub key: String,
    /// Choice text shown on screen
    #[garde(length(max = MAX_OPTION_LENGTH))]
    pub text: String,
}

/// A multiple-choice question behind a category tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CategoryQuestion {
    /// Question text
    #[garde(length(max = MAX_PROMPT_LENGTH))]
    pub prompt: String,
    /// Answer choices in display order
    #[garde(length(min = 2, max = MAX_OPTION_COUNT), dive)]
    pub options: Vec<CategoryOption>,
    /// Key of the correct choice
    #[garde(skip)]
    pub correct: String,
}

/// A tile on the category board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTile {
    /// Stable tile id from the content source
    pub id: u64,
    /// Category heading the tile sits under
    pub category: String,
    /// Points awarded to whoever claims the tile
    pub points: u64,
    /// The tile's question
    pub question: CategoryQuestion,
}

/// Validated tile set for a category game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    tiles: Vec<CategoryTile>,
}

impl CategoryConfig {
    /// Validates the tile set loaded for `topic`
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] when `tiles` is empty, a
    /// validation error when a question exceeds the limits, and
    /// [`LoadError::Validation`] when a question's correct key does not
    /// appear among its options.
    pub fn new(tiles: Vec<CategoryTile>, topic: &str) -> Result<Self, LoadError> {
        if tiles.is_empty() {
            return Err(LoadError::NotFound {
                topic: topic.to_owned(),
            });
        }
        for tile in &tiles {
            tile.question.validate()?;
            if !tile
                .question
                .options
                .iter()
                .any(|option| option.key == tile.question.correct)
            {
                return Err(LoadError::Validation(format!(
                    "tile {} marks \"{}\" correct but offers no such option",
                    tile.id, tile.question.correct
                )));
            }
        }
        Ok(Self { tiles })
    }

    /// Creates the playing state, tiles in source order
    pub fn to_state(&self) -> CategoryState {
        CategoryState {
            tiles: self
                .tiles
                .iter()
                .cloned()
                .map(|tile| LiveTile {
                    tile,
                    claimed_by: None,
                })
                .collect(),
            phase: CategoryPhase::Board,
            active_tile: None,
            picking_team: None,
            armed_team: None,
            attempted: HashSet::new(),
            reveal: None,
        }
    }
}

/// A tile together with its claim status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveTile {
    /// The underlying tile
    pub tile: CategoryTile,
    /// Team that claimed the tile, `None` while open
    pub claimed_by: Option<TeamId>,
}

/// Where the category game currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryPhase {
    /// Board shown, waiting for a pick
    Board,
    /// The picking team is answering
    Question,
    /// Wrong answer given, other teams may arm to steal
    Steal,
    /// Outcome shown, waiting for acknowledgement
    Reveal,
}

/// Outcome of a resolved question, shown until acknowledged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    /// Key of the correct choice
    pub correct: String,
    /// Key the answering team chose
    pub chosen: String,
    /// Whether the chosen key was correct
    pub was_correct: bool,
    /// Points handed out, zero when no one got it
    pub points_awarded: u64,
    /// Team that claimed the tile, `None` when no one got it
    pub winner: Option<TeamId>,
    /// Host-screen message, e.g. `"Red +500"`
    pub message: String,
}

/// Live state of a category steal-quiz game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryState {
    tiles: Vec<LiveTile>,
    phase: CategoryPhase,
    active_tile: Option<u64>,
    picking_team: Option<TeamId>,
    armed_team: Option<TeamId>,
    attempted: HashSet<TeamId>,
    reveal: Option<RevealState>,
}

impl CategoryState {
    /// Current phase
    pub fn phase(&self) -> CategoryPhase {
        self.phase
    }

    /// All tiles with their claim status
    pub fn tiles(&self) -> &[LiveTile] {
        &self.tiles
    }

    /// The open tile, if a question is in play
    pub fn active_tile(&self) -> Option<&LiveTile> {
        let id = self.active_tile?;
        self.tiles.iter().find(|live| live.tile.id == id)
    }

    /// Outcome of the last resolved question, until acknowledged
    pub fn reveal(&self) -> Option<&RevealState> {
        self.reveal.as_ref()
    }

    /// Teams still allowed to arm during a steal
    pub fn stealable_teams(&self, teams: &TeamRoster) -> Vec<TeamId> {
        if self.phase != CategoryPhase::Steal {
            return teams.ids();
        }
        teams
            .ids()
            .into_iter()
            .filter(|id| !self.attempted.contains(id))
            .collect()
    }

    /// Opens a tile's question for `team`
    ///
    /// Ignored outside the board phase, for unknown tiles, and for tiles
    /// already claimed. The picking team counts as having attempted the
    /// question from the start.
    pub fn pick_tile(&mut self, tile_id: u64, team: TeamId) {
        if self.phase != CategoryPhase::Board {
            return;
        }
        let Some(live) = self.tiles.iter().find(|live| live.tile.id == tile_id) else {
            return;
        };
        if live.claimed_by.is_some() {
            return;
        }

        self.active_tile = Some(tile_id);
        self.picking_team = Some(team);
        self.attempted = HashSet::from([team]);
        self.armed_team = None;
        self.reveal = None;
        self.phase = CategoryPhase::Question;
    }

    /// Arms a team to attempt the steal
    ///
    /// Ignored outside the steal phase and for teams that already
    /// attempted the question.
    pub fn arm_stealer(&mut self, team: TeamId) {
        if self.phase != CategoryPhase::Steal {
            return;
        }
        if self.attempted.contains(&team) {
            return;
        }
        self.armed_team = Some(team);
    }

    /// Submits the answering team's choice
    ///
    /// In the question phase the picking team answers; in the steal phase
    /// the armed team does, and the call is ignored if no team is armed.
    ///
    /// A correct choice claims the tile, awards its points, and moves to
    /// reveal. A wrong choice marks the team as attempted; once every
    /// team on the roster has attempted, the question resolves with no
    /// winner and the tile stays open. Otherwise the steal continues.
    pub fn submit_choice(&mut self, chosen: &str, teams: &mut TeamRoster) {
        let answering = match self.phase {
            CategoryPhase::Question => self.picking_team,
            CategoryPhase::Steal => self.armed_team,
            CategoryPhase::Board | CategoryPhase::Reveal => None,
        };
        let Some(answering) = answering else {
            return;
        };
        let Some(active_id) = self.active_tile else {
            return;
        };
        let Some(live) = self.tiles.iter_mut().find(|live| live.tile.id == active_id) else {
            return;
        };
        if live.claimed_by.is_some() {
            return;
        }

        let correct = live.tile.question.correct.clone();
        let points = live.tile.points;

        if chosen == correct {
            live.claimed_by = Some(answering);
            teams.award(answering, points);

            let team_name = teams
                .get(answering)
                .map_or("Team", |team| team.name.as_str())
                .to_owned();
            self.reveal = Some(RevealState {
                correct,
                chosen: chosen.to_owned(),
                was_correct: true,
                points_awarded: points,
                winner: Some(answering),
                message: format!("{team_name} +{points}"),
            });
            self.armed_team = None;
            self.phase = CategoryPhase::Reveal;
            return;
        }

        self.attempted.insert(answering);
        self.armed_team = None;

        if self.attempted.len() >= teams.len() {
            self.reveal = Some(RevealState {
                chosen: chosen.to_owned(),
                was_correct: false,
                points_awarded: 0,
                winner: None,
                message: format!("No one got it. Correct answer: {correct}"),
                correct,
            });
            self.phase = CategoryPhase::Reveal;
        } else {
            self.phase = CategoryPhase::Steal;
        }
    }

    /// Dismisses the reveal and returns to the board
    ///
    /// Ignored outside the reveal phase.
    pub fn acknowledge_reveal(&mut self) {
        if self.phase != CategoryPhase::Reveal {
            return;
        }
        self.reveal = None;
        self.active_tile = None;
        self.picking_team = None;
        self.armed_team = None;
        self.attempted.clear();
        self.phase = CategoryPhase::Board;
    }

    /// Clears every claim and per-question state, back to the board
    ///
    /// Team scores are reset by the caller alongside this.
    pub fn reset(&mut self) {
        for live in &mut self.tiles {
            live.claimed_by = None;
        }
        self.reveal = None;
        self.active_tile = None;
        self.picking_team = None;
        self.armed_team = None;
        self.attempted.clear();
        self.phase = CategoryPhase::Board;
    }

    /// Whether every tile has been claimed
    pub fn board_cleared(&self) -> bool {
        self.tiles.iter().all(|live| live.claimed_by.is_some())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::teams::Team;

    fn tile(id: u64, points: u64) -> CategoryTile {
        CategoryTile {
            id,
            category: "History".to_owned(),
            points,
            question: CategoryQuestion {
                prompt: format!("question {id}"),
                options: vec![
                    CategoryOption {
                        key: "A".to_owned(),
                        text: "first".to_owned(),
                    },
                    CategoryOption {
                        key: "B".to_owned(),
                        text: "second".to_owned(),
                    },
                ],
                correct: "A".to_owned(),
            },
        }
    }

    fn state() -> CategoryState {
        CategoryConfig::new(vec![tile(1, 500), tile(2, 300)], "history")
            .unwrap()
            .to_state()
    }

    fn roster3() -> TeamRoster {
        TeamRoster::new(vec![
            Team::new("Red", "#f00"),
            Team::new("Blue", "#00f"),
            Team::new("Green", "#0f0"),
        ])
    }

    #[test]
    fn test_config_rejects_empty_topic() {
        assert!(matches!(
            CategoryConfig::new(vec![], "history"),
            Err(LoadError::NotFound { .. })
        ));
    }

    #[test]
    fn test_config_rejects_dangling_correct_key() {
        let mut bad = tile(1, 500);
        bad.question.correct = "Z".to_owned();
        assert!(matches!(
            CategoryConfig::new(vec![bad], "history"),
            Err(LoadError::Validation(_))
        ));
    }

    #[test]
    fn test_correct_pick_claims_and_awards() {
        let mut teams = roster3();
        let red = teams.ids()[0];
        let mut state = state();

        state.pick_tile(1, red);
        state.submit_choice("A", &mut teams);

        assert_eq!(state.phase(), CategoryPhase::Reveal);
        let reveal = state.reveal().unwrap();
        assert_eq!(reveal.winner, Some(red));
        assert_eq!(reveal.points_awarded, 500);
        assert_eq!(reveal.message, "Red +500");
        assert_eq!(teams.get(red).unwrap().score, 500);

        state.acknowledge_reveal();
        assert_eq!(state.phase(), CategoryPhase::Board);
        assert_eq!(state.tiles()[0].claimed_by, Some(red));
    }

    #[test]
    fn test_wrong_answer_opens_steal() {
        let mut teams = roster3();
        let red = teams.ids()[0];
        let mut state = state();

        state.pick_tile(1, red);
        state.submit_choice("B", &mut teams);

        assert_eq!(state.phase(), CategoryPhase::Steal);
        assert_eq!(teams.get(red).unwrap().score, 0);
        // the picker cannot steal their own question
        let stealable = state.stealable_teams(&teams);
        assert!(!stealable.contains(&red));
        assert_eq!(stealable.len(), 2);
    }

    #[test]
    fn test_successful_steal_awards_full_points() {
        let mut teams = roster3();
        let [red, blue] = [teams.ids()[0], teams.ids()[1]];
        let mut state = state();

        state.pick_tile(1, red);
        state.submit_choice("B", &mut teams);
        state.arm_stealer(blue);
        state.submit_choice("A", &mut teams);

        let reveal = state.reveal().unwrap();
        assert_eq!(reveal.winner, Some(blue));
        assert_eq!(teams.get(blue).unwrap().score, 500);
        state.acknowledge_reveal();
        assert_eq!(state.tiles()[0].claimed_by, Some(blue));
    }

    #[test]
    fn test_exhausted_steal_leaves_tile_open() {
        let mut teams = roster3();
        let [red, blue, green] = [teams.ids()[0], teams.ids()[1], teams.ids()[2]];
        let mut state = state();

        state.pick_tile(1, red);
        state.submit_choice("B", &mut teams);
        state.arm_stealer(blue);
        state.submit_choice("B", &mut teams);
        state.arm_stealer(green);
        state.submit_choice("B", &mut teams);

        assert_eq!(state.phase(), CategoryPhase::Reveal);
        let reveal = state.reveal().unwrap();
        assert_eq!(reveal.winner, None);
        assert_eq!(reveal.message, "No one got it. Correct answer: A");
        assert!(teams.iter().all(|t| t.score == 0));

        state.acknowledge_reveal();
        // the tile can be picked again later
        assert_eq!(state.tiles()[0].claimed_by, None);
    }

    #[test]
    fn test_attempted_team_cannot_arm() {
        let mut teams = roster3();
        let [red, blue] = [teams.ids()[0], teams.ids()[1]];
        let mut state = state();

        state.pick_tile(1, red);
        state.submit_choice("B", &mut teams);
        state.arm_stealer(blue);
        state.submit_choice("B", &mut teams);

        // blue already missed, arming again is ignored
        state.arm_stealer(blue);
        state.submit_choice("A", &mut teams);
        assert_eq!(state.phase(), CategoryPhase::Steal);
        assert_eq!(teams.get(blue).unwrap().score, 0);
    }

    #[test]
    fn test_claimed_tile_cannot_be_picked() {
        let mut teams = roster3();
        let [red, blue] = [teams.ids()[0], teams.ids()[1]];
        let mut state = state();

        state.pick_tile(1, red);
        state.submit_choice("A", &mut teams);
        state.acknowledge_reveal();

        state.pick_tile(1, blue);
        assert_eq!(state.phase(), CategoryPhase::Board);
    }

    #[test]
    fn test_reset_reopens_claimed_tiles() {
        let mut teams = roster3();
        let red = teams.ids()[0];
        let mut state = state();

        state.pick_tile(1, red);
        state.submit_choice("A", &mut teams);
        state.acknowledge_reveal();

        state.reset();
        assert!(state.tiles().iter().all(|live| live.claimed_by.is_none()));
        assert_eq!(state.phase(), CategoryPhase::Board);
    }

    #[test]
    fn test_board_cleared() {
        let mut teams = roster3();
        let red = teams.ids()[0];
        let mut state = state();
        assert!(!state.board_cleared());

        for tile_id in [1, 2] {
            state.pick_tile(tile_id, red);
            state.submit_choice("A", &mut teams);
            state.acknowledge_reveal();
        }
        assert!(state.board_cleared());
    }
}
