//! Errors that prevent a run from starting.
//!
//! Gameplay failures (blocked moves, missed goal) are not errors: they show
//! up as trace events and as the verdict of the outcome.

use ruko_types::world::WorldError;
use ruko_types::CheckErrors;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RunError {
    /// The program has no blocks.
    #[error("nothing to run: the program is empty")]
    EmptyProgram,

    /// The program tree is malformed (e.g. a loop count outside `2..=6`).
    #[error("malformed program: {0}")]
    MalformedProgram(CheckErrors),

    /// The world breaks its layout invariants.
    #[error("invalid world: {0}")]
    InvalidWorld(#[from] WorldError),

    /// `begin` was called on a run that is not idle.
    #[error("run already started; reset it first")]
    AlreadyStarted,
}

pub type RunResult<T> = Result<T, RunError>;
