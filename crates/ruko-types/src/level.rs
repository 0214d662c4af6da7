//! Level descriptions: a world, its block palette and budget, and the rule
//! that decides success.

use crate::ast::BlockKind;
use crate::world::{World, WorldError};
use serde::{Deserialize, Serialize};

/// Built-in success rules a level can choose from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalRule {
    /// The actor ends on the goal cell.
    #[default]
    ReachGoal,
    /// The actor ends on the goal cell with every item collected.
    ReachGoalWithAllItems,
}

/// One playable level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub concept: String,
    /// One-line instruction shown when the level opens.
    #[serde(default)]
    pub tutorial: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    /// Budget for top-level blocks. Nested children are not counted.
    pub max_blocks: usize,
    /// Block kinds the editor offers for this level.
    pub available_blocks: Vec<BlockKind>,
    pub world: World,
    #[serde(default)]
    pub goal: GoalRule,
}

impl Level {
    /// A level over `world` with every block kind available and the
    /// default goal rule.
    pub fn sandbox(world: World, max_blocks: usize) -> Self {
        Self {
            id: 0,
            name: "Sandbox".to_string(),
            concept: String::new(),
            tutorial: String::new(),
            hints: Vec::new(),
            max_blocks,
            available_blocks: vec![
                BlockKind::Up,
                BlockKind::Down,
                BlockKind::Left,
                BlockKind::Right,
                BlockKind::Collect,
                BlockKind::Loop,
                BlockKind::If,
                BlockKind::Function,
                BlockKind::Wait,
                BlockKind::Break,
            ],
            world,
            goal: GoalRule::ReachGoal,
        }
    }

    pub fn with_goal(mut self, goal: GoalRule) -> Self {
        self.goal = goal;
        self
    }

    pub fn allows(&self, kind: BlockKind) -> bool {
        self.available_blocks.contains(&kind)
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        self.world.validate()
    }

    /// Parse a level from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
