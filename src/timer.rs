//! Stopwatch with penalty injection
//!
//! Every timed game variant shares this stopwatch. It supports idempotent
//! start, freeze-on-stop, reset, and penalty injection that raises elapsed
//! time without producing a visible jump beyond the penalty itself. The
//! timer never reads the clock on its own: callers pass in `now` sampled
//! from a monotonic clock (`web_time::Instant`), which keeps the engine
//! WASM-compatible and the tests deterministic.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use web_time::{Duration, Instant};

/// Serialization helper for `GameTimer`
///
/// The monotonic baseline cannot survive a restart, so a restored timer
/// always comes back stopped. Only banked time crosses the snapshot: a
/// timer serialized while running loses the live span since its last
/// start, so callers stop the clock before saving.
#[serde_as]
#[derive(Deserialize)]
struct GameTimerSerde {
    started: bool,
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    banked: Duration,
}

/// A pausable stopwatch with penalty injection
///
/// Elapsed time is the banked duration accrued across previous runs and
/// penalties, plus the live span since the last start while running. This
/// representation makes penalty continuity automatic: a penalty raises the
/// banked portion and the live portion keeps ticking undisturbed.
///
/// The timer cannot fail. Contradictory call orders are well-defined; in
/// particular, applying a penalty to a never-started timer simply raises
/// elapsed time from zero.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GameTimerSerde")]
pub struct GameTimer {
    /// Whether the timer has ever been started since the last reset
    started: bool,
    /// Whether the timer is currently counting
    #[serde(skip)]
    running: bool,
    /// Sample taken at the most recent start, `None` while stopped
    #[serde(skip)]
    started_at: Option<Instant>,
    /// Time accrued across previous runs plus injected penalties
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    banked: Duration,
}

impl From<GameTimerSerde> for GameTimer {
    fn from(serde: GameTimerSerde) -> Self {
        Self {
            started: serde.started,
            running: false,
            started_at: None,
            banked: serde.banked,
        }
    }
}

impl GameTimer {
    /// Creates a fresh timer at zero, not running
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins counting only if not already running
    ///
    /// Idempotent: calling it on a running timer changes nothing, and in
    /// particular never resets elapsed time. Restarting after a stop
    /// continues from the frozen value.
    pub fn start_if_needed(&mut self, now: Instant) {
        if self.running {
            return;
        }
        self.started = true;
        self.running = true;
        self.started_at = Some(now);
    }

    /// Freezes elapsed time
    ///
    /// Subsequent [`elapsed`](Self::elapsed) reads return the frozen value
    /// until the timer is started again.
    pub fn stop(&mut self, now: Instant) {
        if let Some(started_at) = self.started_at.take() {
            self.banked += now.saturating_duration_since(started_at);
        }
        self.running = false;
    }

    /// Zeroes everything and stops counting
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Adds `secs` seconds to elapsed time as a scoring deduction
    ///
    /// The live span since the last start is unaffected, so a running
    /// timer's display jumps by exactly the penalty and keeps ticking
    /// smoothly afterwards. Well-defined before any start: elapsed time is
    /// raised from zero and survives a later `start_if_needed`.
    pub fn add_penalty_seconds(&mut self, secs: u64) {
        self.banked += Duration::from_secs(secs);
    }

    /// Samples elapsed time at `now`
    ///
    /// Monotonically non-decreasing for non-decreasing `now`, except
    /// across an explicit [`reset`](Self::reset).
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) => self.banked + now.saturating_duration_since(started_at),
            None => self.banked,
        }
    }

    /// Whether the timer is currently counting
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the timer has been started since the last reset
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Renders elapsed time at `now` as `mm:ss`
    pub fn formatted(&self, now: Instant) -> String {
        format_mm_ss(self.elapsed(now))
    }
}

/// Renders a duration as `mm:ss`, truncated (never rounded) from
/// milliseconds
pub fn format_mm_ss(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_fresh_timer_is_zero_and_stopped() {
        let timer = GameTimer::new();
        let now = Instant::now();
        assert_eq!(timer.elapsed(now), Duration::ZERO);
        assert!(!timer.is_running());
        assert!(!timer.is_started());
    }

    #[test]
    fn test_elapsed_tracks_time_while_running() {
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);
        assert_eq!(timer.elapsed(t0 + secs(5)), secs(5));
        assert_eq!(timer.elapsed(t0 + secs(9)), secs(9));
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);
        // a second start later must not rebase the running span
        timer.start_if_needed(t0 + secs(3));
        assert_eq!(timer.elapsed(t0 + secs(5)), secs(5));
    }

    #[test]
    fn test_stop_freezes_elapsed() {
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);
        timer.stop(t0 + secs(4));
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed(t0 + secs(60)), secs(4));
    }

    #[test]
    fn test_restart_continues_from_frozen_value() {
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);
        timer.stop(t0 + secs(4));
        timer.start_if_needed(t0 + secs(10));
        assert_eq!(timer.elapsed(t0 + secs(13)), secs(7));
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);
        timer.add_penalty_seconds(30);
        timer.reset();
        assert_eq!(timer.elapsed(t0 + secs(99)), Duration::ZERO);
        assert!(!timer.is_started());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_penalty_continuity_while_running() {
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);

        let before = timer.elapsed(t0 + secs(5));
        timer.add_penalty_seconds(10);
        let after = timer.elapsed(t0 + secs(5));
        // the jump is exactly the penalty, nothing more
        assert_eq!(after - before, secs(10));
        // and the timer keeps ticking smoothly afterwards
        assert_eq!(timer.elapsed(t0 + secs(7)), secs(17));
    }

    #[test]
    fn test_penalty_before_start_raises_elapsed_from_zero() {
        let mut timer = GameTimer::new();
        timer.add_penalty_seconds(10);

        let t0 = Instant::now();
        assert_eq!(timer.elapsed(t0), secs(10));

        // a later start keeps the penalty
        timer.start_if_needed(t0);
        assert_eq!(timer.elapsed(t0 + secs(2)), secs(12));
    }

    #[test]
    fn test_penalty_while_stopped() {
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);
        timer.stop(t0 + secs(4));
        timer.add_penalty_seconds(5);
        assert_eq!(timer.elapsed(t0 + secs(20)), secs(9));
    }

    #[test]
    fn test_format_mm_ss_truncates() {
        assert_eq!(format_mm_ss(Duration::from_millis(0)), "00:00");
        assert_eq!(format_mm_ss(Duration::from_millis(61_900)), "01:01");
        assert_eq!(format_mm_ss(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_mm_ss(secs(600)), "10:00");
    }

    #[test]
    fn test_serde_round_trip_restores_stopped() {
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);
        timer.stop(t0 + secs(42));

        let json = serde_json::to_string(&timer).unwrap();
        let restored: GameTimer = serde_json::from_str(&json).unwrap();

        assert!(!restored.is_running());
        assert!(restored.is_started());
        assert_eq!(restored.elapsed(Instant::now()), secs(42));
    }

    #[test]
    fn test_serde_while_running_keeps_only_banked_time() {
        let mut timer = GameTimer::new();
        let t0 = Instant::now();
        timer.start_if_needed(t0);
        timer.stop(t0 + secs(4));
        timer.start_if_needed(t0 + secs(10));

        // the live span since the restart is not captured
        let json = serde_json::to_string(&timer).unwrap();
        let restored: GameTimer = serde_json::from_str(&json).unwrap();

        assert!(!restored.is_running());
        assert_eq!(restored.elapsed(Instant::now()), secs(4));
    }
}
