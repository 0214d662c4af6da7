//! Atomic actions shared by both engines.
//!
//! Every state change a run can make goes through [`ActorState`], so the
//! recursive interpreter and the lazy stepper cannot drift apart on what a
//! single block does.

use crate::trace::{TraceEvent, TraceEventKind};
use ruko_types::ast::{Condition, Direction};
use ruko_types::world::{CollectedSet, Pos, World};
use ruko_types::BlockPath;
use tracing::{debug, trace};

/// Mutable per-run state: actor position, collected flags and the event
/// counter. Created fresh from the world at the start of every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActorState {
    pub pos: Pos,
    pub collected: CollectedSet,
    step: u32,
}

impl ActorState {
    pub fn spawn(world: &World) -> Self {
        Self {
            pos: world.start,
            collected: world.fresh_collected(),
            step: 0,
        }
    }

    /// Move one cell, or stay put when the target is off-grid or a wall.
    pub fn try_move(&mut self, world: &World, direction: Direction, path: &BlockPath) -> TraceEvent {
        match self.pos.step(direction).filter(|&target| world.is_passable(target)) {
            Some(target) => {
                self.pos = target;
                self.emit(TraceEventKind::Moved, path)
            }
            None => {
                debug!(from = %self.pos, ?direction, block = %path, "move blocked");
                self.emit(TraceEventKind::Blocked, path)
            }
        }
    }

    /// Pick up the uncollected item on the current cell, if any. Collecting
    /// on an empty cell changes nothing and produces no event.
    pub fn collect(&mut self, world: &World, path: &BlockPath) -> Option<TraceEvent> {
        let (index, item) = world.collectible_at(self.pos, &self.collected)?;
        debug!(index, kind = ?item.kind, at = %self.pos, "collected");
        self.collected.mark(index);
        Some(self.emit(TraceEventKind::Collected, path))
    }

    pub fn wait(&mut self, path: &BlockPath) -> TraceEvent {
        self.emit(TraceEventKind::Waited, path)
    }

    pub fn broke(&mut self, path: &BlockPath) -> TraceEvent {
        self.emit(TraceEventKind::Broke, path)
    }

    /// Conditions look north only; an off-grid cell is neither a wall nor
    /// the goal.
    pub fn condition_holds(&self, world: &World, condition: Condition) -> bool {
        match condition {
            Condition::ItemHere => world.collectible_at(self.pos, &self.collected).is_some(),
            Condition::WallAhead => self.pos.north().is_some_and(|north| world.is_wall(north)),
            Condition::GoalAhead => self.pos.north() == Some(world.goal),
        }
    }

    fn emit(&mut self, kind: TraceEventKind, path: &BlockPath) -> TraceEvent {
        let event = TraceEvent {
            step: self.step,
            kind,
            actor_pos: self.pos,
            collected: self.collected.clone(),
            block: path.clone(),
        };
        self.step += 1;
        trace!(step = event.step, kind = %kind, pos = %event.actor_pos, "event");
        event
    }
}
