//! Goal evaluation: deciding whether a finished run counts as success.

use ruko_types::level::GoalRule;
use ruko_types::world::{CollectedSet, Pos, World};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a run did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    PositionMismatch { actual: Pos, expected: Pos },
    MissingCollectibles { remaining: usize },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositionMismatch { actual, expected } => {
                write!(f, "ended at {actual}, but the goal is at {expected}")
            }
            Self::MissingCollectibles { remaining } => {
                write!(f, "{remaining} item(s) still to collect")
            }
        }
    }
}

/// Result of goal evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Success,
    Failure(FailureReason),
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Success => None,
            Self::Failure(reason) => Some(reason),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure(reason) => write!(f, "failure: {reason}"),
        }
    }
}

/// Level-supplied success predicate, evaluated once on the terminal state
/// of a finished run.
pub trait GoalPredicate {
    fn evaluate(&self, world: &World, actor: Pos, collected: &CollectedSet) -> Verdict;
}

impl GoalPredicate for GoalRule {
    fn evaluate(&self, world: &World, actor: Pos, collected: &CollectedSet) -> Verdict {
        match self {
            GoalRule::ReachGoal => reach(world, actor),
            GoalRule::ReachGoalWithAllItems => {
                if !collected.all_collected() {
                    return Verdict::Failure(FailureReason::MissingCollectibles {
                        remaining: collected.remaining(),
                    });
                }
                reach(world, actor)
            }
        }
    }
}

fn reach(world: &World, actor: Pos) -> Verdict {
    if actor == world.goal {
        Verdict::Success
    } else {
        Verdict::Failure(FailureReason::PositionMismatch {
            actual: actor,
            expected: world.goal,
        })
    }
}

/// Adapts a closure into a [`GoalPredicate`].
///
/// ```
/// use ruko_eval::{GoalFn, GoalPredicate, Verdict};
/// use ruko_types::world::{CollectedSet, Pos, World};
///
/// let anywhere = GoalFn(|_: &World, _: Pos, _: &CollectedSet| Verdict::Success);
/// let world = World::new(3, Pos::new(0, 0), Pos::new(2, 2));
/// assert!(anywhere.evaluate(&world, Pos::new(1, 1), &world.fresh_collected()).is_success());
/// ```
pub struct GoalFn<F>(pub F);

impl<F> GoalPredicate for GoalFn<F>
where
    F: Fn(&World, Pos, &CollectedSet) -> Verdict,
{
    fn evaluate(&self, world: &World, actor: Pos, collected: &CollectedSet) -> Verdict {
        (self.0)(world, actor, collected)
    }
}
