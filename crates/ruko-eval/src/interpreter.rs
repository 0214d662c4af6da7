//! Recursive reference interpreter.
//!
//! Walks the block tree depth-first, threading a [`BreakSignal`] back up
//! from every call. Runs to completion and records the whole trace; the
//! host-facing [`RunHandle`](crate::RunHandle) must match it event for event.

use crate::actor::ActorState;
use crate::goal::GoalPredicate;
use crate::trace::{BreakSignal, ExecutionOutcome, ExecutionReport, TraceEvent};
use ruko_types::ast::{Block, Program};
use ruko_types::world::World;
use ruko_types::BlockPath;
use tracing::debug;

pub struct Interpreter<'w> {
    world: &'w World,
    actor: ActorState,
    trace: Vec<TraceEvent>,
}

impl<'w> Interpreter<'w> {
    pub fn new(world: &'w World) -> Self {
        Self {
            world,
            actor: ActorState::spawn(world),
            trace: Vec::new(),
        }
    }

    /// Execute `program` from the world's start state and evaluate `goal`
    /// on the terminal state.
    ///
    /// The program is assumed to have passed the structural check; see
    /// [`execute`](crate::execute) for the validating entry point.
    pub fn run(mut self, program: &Program, goal: &dyn GoalPredicate) -> ExecutionReport {
        let terminated_early = self.exec_sequence(program.blocks(), &BlockPath::root()).is_broke();
        if terminated_early {
            debug!("break escaped every loop; program halted");
        }

        let verdict = goal.evaluate(self.world, self.actor.pos, &self.actor.collected);
        ExecutionReport {
            trace: self.trace,
            outcome: ExecutionOutcome {
                final_pos: self.actor.pos,
                collected: self.actor.collected,
                terminated_early,
                verdict,
            },
        }
    }

    fn exec_sequence(&mut self, blocks: &[Block], parent: &BlockPath) -> BreakSignal {
        for (i, block) in blocks.iter().enumerate() {
            if self.exec_block(block, &parent.child(i)).is_broke() {
                return BreakSignal::Broke;
            }
        }
        BreakSignal::Continue
    }

    fn exec_block(&mut self, block: &Block, path: &BlockPath) -> BreakSignal {
        match block {
            Block::Move { direction } => {
                let event = self.actor.try_move(self.world, *direction, path);
                self.trace.push(event);
            }
            Block::Collect => {
                if let Some(event) = self.actor.collect(self.world, path) {
                    self.trace.push(event);
                }
            }
            Block::Wait => {
                let event = self.actor.wait(path);
                self.trace.push(event);
            }
            Block::Break => {
                let event = self.actor.broke(path);
                self.trace.push(event);
                return BreakSignal::Broke;
            }
            Block::Loop { iterations, body } => {
                for _ in 0..*iterations {
                    if self.exec_sequence(body, path).is_broke() {
                        // Caught here: stop iterating, siblings carry on.
                        debug!(block = %path, "break absorbed by loop");
                        return BreakSignal::Continue;
                    }
                }
            }
            Block::If { condition, body } => {
                if self.actor.condition_holds(self.world, *condition) {
                    return self.exec_sequence(body, path);
                }
            }
            Block::Function { body, .. } => return self.exec_sequence(body, path),
        }
        BreakSignal::Continue
    }
}
