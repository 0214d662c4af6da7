//! Trace events and run outcomes consumed by the host.

use crate::goal::Verdict;
use ruko_types::world::{CollectedSet, Pos};
use ruko_types::BlockPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an atomic action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEventKind {
    /// The actor stepped to a new cell.
    Moved,
    /// A move hit a wall or the grid edge; the actor stayed put.
    Blocked,
    /// An item on the actor's cell was picked up.
    Collected,
    /// A wait block ran.
    Waited,
    /// A break block ran.
    Broke,
}

impl fmt::Display for TraceEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moved => write!(f, "moved"),
            Self::Blocked => write!(f, "blocked"),
            Self::Collected => write!(f, "collected"),
            Self::Waited => write!(f, "waited"),
            Self::Broke => write!(f, "broke"),
        }
    }
}

/// One host-visible unit of progress.
///
/// `actor_pos` and `collected` describe the state *after* the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Zero-based sequence number within the run.
    pub step: u32,
    pub kind: TraceEventKind,
    pub actor_pos: Pos,
    pub collected: CollectedSet,
    /// The block that produced this event.
    pub block: BlockPath,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} at {} (block {}, {}/{} collected)",
            self.step,
            self.kind,
            self.actor_pos,
            self.block,
            self.collected.collected_count(),
            self.collected.len()
        )
    }
}

/// Terminal state of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub final_pos: Pos,
    pub collected: CollectedSet,
    /// A break escaped every enclosing loop and aborted the program.
    pub terminated_early: bool,
    pub verdict: Verdict,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        self.verdict.is_success()
    }
}

/// A run executed to completion: its full trace plus the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub trace: Vec<TraceEvent>,
    pub outcome: ExecutionOutcome,
}

/// Control signal returned from executing a block.
///
/// `Broke` travels up the tree until a loop absorbs it. If it reaches the
/// program root the run terminates early.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakSignal {
    Continue,
    Broke,
}

impl BreakSignal {
    pub fn is_broke(self) -> bool {
        matches!(self, Self::Broke)
    }
}
