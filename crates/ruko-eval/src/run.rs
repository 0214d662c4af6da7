//! Host-facing run lifecycle: a lazy, cancellable stepper.
//!
//! ```text
//! Idle ──begin──▶ Running ──(last event)──▶ Finished(outcome)
//!                    │
//!                    └──cancel──▶ Cancelled
//! ```
//!
//! `reset` returns any state to `Idle` with fresh run state.
//!
//! The stepper keeps an explicit frame stack instead of recursing, so each
//! call to [`Iterator::next`] runs until exactly one [`TraceEvent`] is
//! produced and then hands control back to the host.

use crate::actor::ActorState;
use crate::error::{RunError, RunResult};
use crate::goal::GoalPredicate;
use crate::trace::{ExecutionOutcome, TraceEvent};
use ruko_types::ast::{Block, Program};
use ruko_types::world::World;
use ruko_types::BlockPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

// ══════════════════════════════════════════════════════════════════════════════
// Cancellation
// ══════════════════════════════════════════════════════════════════════════════

/// Cloneable cancellation flag. May be tripped from any thread; the run
/// observes it before its next atomic action.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Status
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Finished,
    Cancelled,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Finished => write!(f, "finished"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

enum RunState {
    Idle,
    Running,
    Finished(ExecutionOutcome),
    Cancelled,
}

// ══════════════════════════════════════════════════════════════════════════════
// Frames
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
enum Scope {
    Root,
    /// Absorbs a break. `remaining` counts iterations left after the
    /// current one.
    Loop { remaining: u8 },
    /// `If` or `Function` body: a break passes straight through.
    Branch,
}

/// One block sequence being executed. `next` is the index of the block to
/// run next, so `next - 1` is the block currently open in a child frame.
#[derive(Debug, Clone, Copy)]
struct Frame {
    scope: Scope,
    next: usize,
}

impl Frame {
    fn enter(scope: Scope) -> Self {
        Self { scope, next: 0 }
    }
}

/// The sequence the innermost frame walks.
fn body_at<'p>(root: &'p [Block], frames: &[Frame]) -> &'p [Block] {
    let mut blocks = root;
    if let Some((_, parents)) = frames.split_last() {
        for frame in parents {
            blocks = frame
                .next
                .checked_sub(1)
                .and_then(|index| blocks.get(index))
                .and_then(Block::body)
                .unwrap_or(&[]);
        }
    }
    blocks
}

fn current_path(frames: &[Frame]) -> BlockPath {
    frames.iter().map(|frame| frame.next.saturating_sub(1)).collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// RunHandle
// ══════════════════════════════════════════════════════════════════════════════

/// A single run of a program against a world.
///
/// Yields one [`TraceEvent`] per atomic action. Once the iterator is
/// exhausted, [`outcome`](Self::outcome) holds the verdict unless the run
/// was cancelled.
pub struct RunHandle {
    program: Program,
    world: World,
    goal: Box<dyn GoalPredicate + Send + Sync>,
    state: RunState,
    actor: ActorState,
    frames: Vec<Frame>,
    terminated_early: bool,
    cancel: CancelToken,
}

impl RunHandle {
    /// Validate `program` and `world` and prepare an idle run.
    pub fn new(
        program: Program,
        world: World,
        goal: impl GoalPredicate + Send + Sync + 'static,
    ) -> RunResult<Self> {
        crate::validate(&program, &world)?;
        let actor = ActorState::spawn(&world);
        Ok(Self {
            program,
            world,
            goal: Box::new(goal),
            state: RunState::Idle,
            actor,
            frames: Vec::new(),
            terminated_early: false,
            cancel: CancelToken::new(),
        })
    }

    /// Replace the goal predicate.
    pub fn with_goal(mut self, goal: impl GoalPredicate + Send + Sync + 'static) -> Self {
        self.goal = Box::new(goal);
        self
    }

    /// Move an idle run to `Running`.
    pub fn begin(&mut self) -> RunResult<()> {
        if !matches!(self.state, RunState::Idle) {
            return Err(RunError::AlreadyStarted);
        }
        self.frames = vec![Frame::enter(Scope::Root)];
        self.state = RunState::Running;
        info!(
            blocks = self.program.len(),
            start = %self.world.start,
            goal = %self.world.goal,
            "run started"
        );
        Ok(())
    }

    /// Discard all run state and return to `Idle`.
    ///
    /// Tokens handed out earlier stay tripped (or trippable) but no longer
    /// affect this handle; fetch a new one with [`cancel_token`](Self::cancel_token).
    pub fn reset(&mut self) {
        self.actor = ActorState::spawn(&self.world);
        self.frames.clear();
        self.terminated_early = false;
        self.cancel = CancelToken::new();
        self.state = RunState::Idle;
        debug!("run reset");
    }

    /// Stop the run. No further events are produced and no outcome is
    /// recorded.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if matches!(self.state, RunState::Running) {
            self.mark_cancelled();
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> RunStatus {
        match self.state {
            RunState::Idle => RunStatus::Idle,
            RunState::Running => RunStatus::Running,
            RunState::Finished(_) => RunStatus::Finished,
            RunState::Cancelled => RunStatus::Cancelled,
        }
    }

    /// The outcome of a finished run.
    pub fn outcome(&self) -> Option<&ExecutionOutcome> {
        match &self.state {
            RunState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    fn mark_cancelled(&mut self) {
        debug!(depth = self.frames.len(), pos = %self.actor.pos, "run cancelled");
        self.frames.clear();
        self.state = RunState::Cancelled;
    }

    fn finish(&mut self) {
        let verdict = self
            .goal
            .evaluate(&self.world, self.actor.pos, &self.actor.collected);
        info!(
            verdict = %verdict,
            final_pos = %self.actor.pos,
            terminated_early = self.terminated_early,
            "run finished"
        );
        self.state = RunState::Finished(ExecutionOutcome {
            final_pos: self.actor.pos,
            collected: self.actor.collected.clone(),
            terminated_early: self.terminated_early,
            verdict,
        });
    }

    /// Pop frames until a loop absorbs the break. Popping the root means
    /// the break escaped the program.
    fn unwind_break(&mut self) {
        while let Some(frame) = self.frames.pop() {
            match frame.scope {
                Scope::Loop { .. } => {
                    debug!(block = %current_path(&self.frames), "break absorbed by loop");
                    return;
                }
                Scope::Branch => {}
                Scope::Root => {
                    debug!("break escaped every loop; program halted");
                    self.terminated_early = true;
                }
            }
        }
    }

    /// Run until the next event, or until the program ends.
    fn advance(&mut self) -> Option<TraceEvent> {
        loop {
            if self.cancel.is_cancelled() {
                self.mark_cancelled();
                return None;
            }

            let body = body_at(self.program.blocks(), &self.frames);
            let Some(top) = self.frames.last_mut() else {
                self.finish();
                return None;
            };

            let Some(block) = body.get(top.next) else {
                if let Scope::Loop { remaining } = &mut top.scope {
                    if *remaining > 0 {
                        *remaining -= 1;
                        top.next = 0;
                        continue;
                    }
                }
                self.frames.pop();
                continue;
            };
            top.next += 1;
            let path = current_path(&self.frames);

            match block {
                Block::Move { direction } => {
                    return Some(self.actor.try_move(&self.world, *direction, &path));
                }
                Block::Collect => {
                    if let Some(event) = self.actor.collect(&self.world, &path) {
                        return Some(event);
                    }
                }
                Block::Wait => return Some(self.actor.wait(&path)),
                Block::Break => {
                    let event = self.actor.broke(&path);
                    self.unwind_break();
                    return Some(event);
                }
                Block::Loop { iterations, .. } => {
                    if let Some(remaining) = iterations.checked_sub(1) {
                        self.frames.push(Frame::enter(Scope::Loop { remaining }));
                    }
                }
                Block::If { condition, .. } => {
                    if self.actor.condition_holds(&self.world, *condition) {
                        self.frames.push(Frame::enter(Scope::Branch));
                    }
                }
                Block::Function { .. } => self.frames.push(Frame::enter(Scope::Branch)),
            }
        }
    }
}

impl Iterator for RunHandle {
    type Item = TraceEvent;

    fn next(&mut self) -> Option<TraceEvent> {
        if !matches!(self.state, RunState::Running) {
            return None;
        }
        self.advance()
    }
}

impl FusedIterator for RunHandle {}
