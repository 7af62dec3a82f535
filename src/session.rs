//! A full game session from setup to the leaderboard save
//!
//! A session ties together one board, the team roster, the shared clock,
//! and the leaderboard slot the final scores land in. The host screen
//! drives it purely through [`GameEvent`]s plus the explicit end call,
//! which converts elapsed time into scores for the timed variants and
//! pushes every team's result to the leaderboard exactly once.

use serde::{Deserialize, Serialize};
use tracing::info;
use web_time::{Duration, Instant};

use crate::{
    board::config::{BoardConfig, BoardKind, BoardState, GameEvent, Phase},
    error::PersistenceError,
    leaderboard::{self, Course, LeaderboardStore, Topic},
    scoring,
    teams::TeamRoster,
    timer::GameTimer,
};

/// One hosted game from setup to the leaderboard save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    board: BoardState,
    teams: TeamRoster,
    timer: GameTimer,
    course: Course,
    topic: Topic,
    /// Trips when a save begins, drops again only if the save fails
    saving: bool,
    ended: bool,
}

impl GameSession {
    /// Starts a session for the given board and roster
    ///
    /// The clock starts stopped; timed boards start it on the first
    /// submission, or earlier through [`start_timer`](Self::start_timer).
    pub fn new(config: &BoardConfig, teams: TeamRoster, course: Course, topic: Topic) -> Self {
        Self {
            board: config.to_state(),
            teams,
            timer: GameTimer::new(),
            course,
            topic,
            saving: false,
            ended: false,
        }
    }

    /// The live board
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// The team roster with running scores
    pub fn teams(&self) -> &TeamRoster {
        &self.teams
    }

    /// Which variant is being played
    pub fn kind(&self) -> BoardKind {
        self.board.kind()
    }

    /// Where the active board currently is
    pub fn phase(&self) -> Phase {
        self.board.phase()
    }

    /// The leaderboard slot the final scores are saved into
    pub fn destination(&self) -> (Course, Topic) {
        (self.course, self.topic)
    }

    /// Whether the session has ended and its scores are saved
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Elapsed play time at `now`
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.timer.elapsed(now)
    }

    /// Elapsed play time at `now` as `mm:ss` for the host screen
    pub fn formatted_elapsed(&self, now: Instant) -> String {
        self.timer.formatted(now)
    }

    /// Starts the clock ahead of the first submission
    ///
    /// Idempotent, and ignored for turn-based boards, which are not
    /// scored from the clock.
    pub fn start_timer(&mut self, now: Instant) {
        if self.kind().is_timed() {
            self.timer.start_if_needed(now);
        }
    }

    /// Routes a host-screen event to the board
    ///
    /// Ignored once the session has ended.
    pub fn apply(&mut self, event: GameEvent, now: Instant) {
        if self.ended {
            return;
        }
        self.board.apply(event, &mut self.teams, &mut self.timer, now);
    }

    /// Clears the board back to its starting position
    ///
    /// Shorthand for [`GameEvent::ClearInputs`]; ignored once the session
    /// has ended.
    pub fn reset_board(&mut self, now: Instant) {
        self.apply(GameEvent::ClearInputs, now);
    }

    /// Ends the game and saves every team's score to the leaderboard
    ///
    /// The clock stops first. On a timed board every team on the roster
    /// receives the same time-derived score; turn-based boards keep the
    /// scores accumulated during play. At most one save happens per
    /// session: repeated calls after a success are no-ops, while a
    /// failed save releases the guard so the host can retry.
    ///
    /// # Errors
    ///
    /// Returns the first [`PersistenceError`] from the store; every team
    /// is still attempted before it surfaces.
    pub fn end_game<S: LeaderboardStore>(
        &mut self,
        store: &mut S,
        now: Instant,
    ) -> Result<(), PersistenceError> {
        if self.ended || self.saving {
            return Ok(());
        }

        self.timer.stop(now);
        if self.kind().is_timed() {
            let score = scoring::time_to_score(self.timer.elapsed(now));
            self.teams.set_all_scores(score);
        }

        self.saving = true;
        match leaderboard::save_all_teams(store, self.course, self.topic, self.teams.iter()) {
            Ok(()) => {
                self.ended = true;
                info!(
                    course = ?self.course,
                    topic = ?self.topic,
                    teams = self.teams.len(),
                    "game ended, scores saved"
                );
                Ok(())
            }
            Err(error) => {
                self.saving = false;
                Err(error)
            }
        }
    }
}
