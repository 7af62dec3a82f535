//! Error taxonomy for the game engine
//!
//! Two fallible seams exist: loading board data from a question/puzzle
//! store, and reading/writing the leaderboard row store. Everything else
//! in the engine is infallible: operations invoked in an invalid phase
//! are silent no-ops, never errors, since they are only reachable through
//! race-prone UI sequences and must not corrupt state.

use thiserror::Error;

/// A failure to build a board from store-supplied data
///
/// Validation failures are raised before any board is constructed; a
/// board is never partially built from invalid data. `NotFound` is a
/// displayable "no content" outcome rather than a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The store returned a different number of rows than the board
    /// shape requires
    #[error("expected exactly {expected} {what}, got {actual}")]
    WrongCount {
        /// What was being counted (questions, tiles, options)
        what: &'static str,
        /// The required count
        expected: usize,
        /// The count actually returned
        actual: usize,
    },
    /// The store returned fewer rows than the minimum the board accepts
    #[error("expected at least {minimum} {what}, got {actual}")]
    TooFew {
        /// What was being counted
        what: &'static str,
        /// The minimum acceptable count
        minimum: usize,
        /// The count actually returned
        actual: usize,
    },
    /// A tile references an option id that is not among the supplied
    /// options
    #[error("tile \"{tile}\" references unknown option \"{option}\"")]
    DanglingOption {
        /// The offending tile's id
        tile: String,
        /// The missing option id
        option: String,
    },
    /// The store has no rows for the requested topic
    #[error("no content found for topic \"{topic}\"")]
    NotFound {
        /// The topic code that was requested
        topic: String,
    },
    /// A course code could not be recognized
    #[error("unknown course: {0}")]
    UnknownCourse(String),
    /// A topic code could not be recognized
    #[error("unknown topic code: {0}")]
    UnknownTopic(String),
    /// Structural validation of the supplied data failed
    #[error("invalid board data: {0}")]
    Validation(String),
}

impl From<garde::Report> for LoadError {
    fn from(report: garde::Report) -> Self {
        Self::Validation(report.to_string())
    }
}

/// A leaderboard store read or write failure
///
/// Persistence errors are logged at the call site and surfaced to the
/// host so it can offer a deliberate retry; they never prevent the local
/// session from reaching its end-of-game state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("leaderboard store failure: {message}")]
pub struct PersistenceError {
    message: String,
}

impl PersistenceError {
    /// Wraps a backend-specific failure description
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
