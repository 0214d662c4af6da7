//! Block AST for Ruko programs.
//!
//! A program is an ordered sequence of [`Block`]s. Container blocks
//! (`Loop`, `If`, `Function`) own their children outright, so the AST is
//! always a tree. There is no call-by-name construct: a `Function` is an
//! inline group and cannot reference another function, which rules out
//! recursion structurally.

use crate::BlockPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest iteration count the editor offers for a loop.
pub const MIN_LOOP_ITERATIONS: u8 = 2;

/// Largest iteration count the editor offers for a loop.
pub const MAX_LOOP_ITERATIONS: u8 = 6;

/// Label given to new function blocks by the editor.
pub const DEFAULT_FUNCTION_NAME: &str = "MyFunction";

// ══════════════════════════════════════════════════════════════════════════════
// Leaf configuration
// ══════════════════════════════════════════════════════════════════════════════

/// Movement direction on the grid. `Up` decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(dx, dy)` offset of one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The palette entry for a move in this direction.
    pub fn kind(self) -> BlockKind {
        match self {
            Direction::Up => BlockKind::Up,
            Direction::Down => BlockKind::Down,
            Direction::Left => BlockKind::Left,
            Direction::Right => BlockKind::Right,
        }
    }
}

/// Condition tested by an `If` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// An uncollected item lies on the actor's cell.
    ItemHere,
    /// The cell north of the actor (`y - 1`) is a wall.
    WallAhead,
    /// The cell north of the actor (`y - 1`) is the goal.
    GoalAhead,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemHere => write!(f, "ITEM_HERE"),
            Self::WallAhead => write!(f, "WALL_AHEAD"),
            Self::GoalAhead => write!(f, "GOAL_AHEAD"),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Blocks
// ══════════════════════════════════════════════════════════════════════════════

/// One node of a program.
///
/// Serialized with an internal `type` tag:
/// `{"type": "loop", "iterations": 3, "body": [{"type": "move", "direction": "right"}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Move {
        direction: Direction,
    },
    Collect,
    Wait,
    Break,
    Loop {
        iterations: u8,
        body: Vec<Block>,
    },
    If {
        condition: Condition,
        body: Vec<Block>,
    },
    Function {
        /// Display label only; has no effect on execution.
        #[serde(default = "default_function_name")]
        name: String,
        body: Vec<Block>,
    },
}

fn default_function_name() -> String {
    DEFAULT_FUNCTION_NAME.to_string()
}

impl Block {
    pub fn movement(direction: Direction) -> Self {
        Self::Move { direction }
    }

    pub fn up() -> Self {
        Self::movement(Direction::Up)
    }

    pub fn down() -> Self {
        Self::movement(Direction::Down)
    }

    pub fn left() -> Self {
        Self::movement(Direction::Left)
    }

    pub fn right() -> Self {
        Self::movement(Direction::Right)
    }

    /// `Loop { iterations, body }`.
    pub fn repeat(iterations: u8, body: impl IntoIterator<Item = Block>) -> Self {
        Self::Loop {
            iterations,
            body: body.into_iter().collect(),
        }
    }

    /// `If { condition, body }`.
    pub fn when(condition: Condition, body: impl IntoIterator<Item = Block>) -> Self {
        Self::If {
            condition,
            body: body.into_iter().collect(),
        }
    }

    /// A function block with the editor's default label.
    pub fn function(body: impl IntoIterator<Item = Block>) -> Self {
        Self::Function {
            name: default_function_name(),
            body: body.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Move { direction } => direction.kind(),
            Self::Collect => BlockKind::Collect,
            Self::Wait => BlockKind::Wait,
            Self::Break => BlockKind::Break,
            Self::Loop { .. } => BlockKind::Loop,
            Self::If { .. } => BlockKind::If,
            Self::Function { .. } => BlockKind::Function,
        }
    }

    /// Children of a container block, `None` for leaves.
    pub fn body(&self) -> Option<&[Block]> {
        match self {
            Self::Loop { body, .. } | Self::If { body, .. } | Self::Function { body, .. } => {
                Some(body)
            }
            Self::Move { .. } | Self::Collect | Self::Wait | Self::Break => None,
        }
    }

    /// Number of blocks in this subtree, this block included.
    pub fn size(&self) -> usize {
        1 + self
            .body()
            .map(|body| body.iter().map(Block::size).sum())
            .unwrap_or(0)
    }
}

/// Payload-free discriminant of a [`Block`].
///
/// Levels use it to describe their palette of available blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Up,
    Down,
    Left,
    Right,
    Collect,
    Loop,
    If,
    Function,
    Wait,
    Break,
}

impl BlockKind {
    /// The four movement kinds.
    pub const MOVES: [BlockKind; 4] = [BlockKind::Up, BlockKind::Down, BlockKind::Left, BlockKind::Right];
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Collect => "COLLECT",
            Self::Loop => "LOOP",
            Self::If => "IF",
            Self::Function => "FUNCTION",
            Self::Wait => "WAIT",
            Self::Break => "BREAK",
        };
        f.write_str(label)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Program
// ══════════════════════════════════════════════════════════════════════════════

/// A complete program: the ordered top-level block sequence.
///
/// Serialized as a plain JSON array of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    blocks: Vec<Block>,
}

impl Program {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of top-level blocks. This is the count a level's block
    /// budget applies to; nested children are not included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks in the whole tree, nested children included.
    pub fn total_blocks(&self) -> usize {
        self.blocks.iter().map(Block::size).sum()
    }

    /// Visit every block in pre-order together with its path.
    pub fn walk(&self, mut visit: impl FnMut(&BlockPath, &Block)) {
        fn walk_seq(
            blocks: &[Block],
            parent: &BlockPath,
            visit: &mut dyn FnMut(&BlockPath, &Block),
        ) {
            for (i, block) in blocks.iter().enumerate() {
                let path = parent.child(i);
                visit(&path, block);
                if let Some(body) = block.body() {
                    walk_seq(body, &path, visit);
                }
            }
        }
        walk_seq(&self.blocks, &BlockPath::root(), &mut visit);
    }

    /// Look up the block at `path`.
    pub fn get(&self, path: &BlockPath) -> Option<&Block> {
        let (first, rest) = path.indices().split_first()?;
        let mut block = self.blocks.get(*first)?;
        for &index in rest {
            block = block.body()?.get(index)?;
        }
        Some(block)
    }

    /// Parse a program from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl FromIterator<Block> for Program {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Block>> for Program {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Program {
        Program::new(vec![
            Block::right(),
            Block::repeat(3, [Block::down(), Block::when(Condition::ItemHere, [Block::Collect])]),
            Block::function([Block::Wait, Block::Break]),
        ])
    }

    #[test]
    fn test_top_level_len_excludes_children() {
        let program = sample();
        assert_eq!(program.len(), 3);
        assert_eq!(program.total_blocks(), 8);
    }

    #[test]
    fn test_walk_visits_in_pre_order() {
        let mut seen = Vec::new();
        sample().walk(|path, block| seen.push((path.to_string(), block.kind())));
        assert_eq!(
            seen,
            vec![
                ("0".to_string(), BlockKind::Right),
                ("1".to_string(), BlockKind::Loop),
                ("1.0".to_string(), BlockKind::Down),
                ("1.1".to_string(), BlockKind::If),
                ("1.1.0".to_string(), BlockKind::Collect),
                ("2".to_string(), BlockKind::Function),
                ("2.0".to_string(), BlockKind::Wait),
                ("2.1".to_string(), BlockKind::Break),
            ]
        );
    }

    #[test]
    fn test_get_by_path() {
        let program = sample();
        assert_eq!(program.get(&BlockPath::from(vec![1, 1, 0])), Some(&Block::Collect));
        assert_eq!(program.get(&BlockPath::from(vec![0, 0])), None);
        assert_eq!(program.get(&BlockPath::root()), None);
        assert_eq!(program.get(&BlockPath::from(vec![9])), None);
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_block_json_shape() {
        let json = serde_json::to_string(&Block::repeat(2, [Block::up()])).unwrap();
        assert_eq!(
            json,
            r#"{"type":"loop","iterations":2,"body":[{"type":"move","direction":"up"}]}"#
        );
        let collect = serde_json::to_string(&Block::Collect).unwrap();
        assert_eq!(collect, r#"{"type":"collect"}"#);
    }

    #[test]
    fn test_function_name_defaults_when_missing() {
        let program =
            Program::from_json(r#"[{"type":"function","body":[{"type":"wait"}]}]"#).unwrap();
        assert_eq!(program.blocks()[0], Block::function([Block::Wait]));
    }

    #[test]
    fn test_unknown_condition_is_rejected() {
        let result = Program::from_json(
            r#"[{"type":"if","condition":"item_there","body":[]}]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_block_kind_display() {
        assert_eq!(BlockKind::Function.to_string(), "FUNCTION");
        assert_eq!(Block::left().kind().to_string(), "LEFT");
    }
}
