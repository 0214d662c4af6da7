//! The grid world a program runs against.
//!
//! [`World`] is immutable for the lifetime of a level. The only state that
//! changes during a run is the actor position and the [`CollectedSet`],
//! both owned by the engine and created fresh for each run.

use crate::ast::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

// ══════════════════════════════════════════════════════════════════════════════
// Positions
// ══════════════════════════════════════════════════════════════════════════════

/// A grid cell. Signed so that a step off the edge is representable
/// (and then rejected by [`World::in_bounds`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `direction`, or `None` past the
    /// edge of the coordinate space.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// The cell directly north (`y - 1`).
    pub fn north(self) -> Option<Self> {
        self.step(Direction::Up)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Collectibles
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleKind {
    Coin,
    Gem,
    Key,
}

impl CollectibleKind {
    /// Kinds in the order levels hand them out.
    pub const CYCLE: [CollectibleKind; 3] =
        [CollectibleKind::Coin, CollectibleKind::Gem, CollectibleKind::Key];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Pos,
    pub kind: CollectibleKind,
}

/// Per-run collected flags, index-aligned with [`World::collectibles`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectedSet(Vec<bool>);

impl CollectedSet {
    /// All flags cleared, one per collectible.
    pub fn empty(len: usize) -> Self {
        Self(vec![false; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_collected(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Set the flag for `index`. Returns `false` if it was already set or
    /// the index is out of range.
    pub fn mark(&mut self, index: usize) -> bool {
        match self.0.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn collected_count(&self) -> usize {
        self.0.iter().filter(|&&flag| flag).count()
    }

    pub fn remaining(&self) -> usize {
        self.0.len() - self.collected_count()
    }

    /// `true` when every item is collected (vacuously for no items).
    pub fn all_collected(&self) -> bool {
        self.0.iter().all(|&flag| flag)
    }
}

impl From<Vec<bool>> for CollectedSet {
    fn from(flags: Vec<bool>) -> Self {
        Self(flags)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// World
// ══════════════════════════════════════════════════════════════════════════════

/// Which feature of the world an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Start,
    Goal,
    Collectible(usize),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Goal => write!(f, "goal"),
            Self::Collectible(index) => write!(f, "collectible #{index}"),
        }
    }
}

/// A world description that breaks the layout invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("grid size must be at least 1")]
    EmptyGrid,

    #[error("{feature} at {pos} is outside the {grid_size}x{grid_size} grid")]
    OutOfBounds {
        feature: Feature,
        pos: Pos,
        grid_size: u32,
    },

    #[error("{feature} at {pos} is on a wall")]
    OnWall { feature: Feature, pos: Pos },

    #[error("{first} and {second} share cell {pos}")]
    Overlap {
        first: Feature,
        second: Feature,
        pos: Pos,
    },
}

/// Immutable grid description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// Width and height of the square grid.
    pub grid_size: u32,
    #[serde(default)]
    pub walls: BTreeSet<Pos>,
    pub start: Pos,
    pub goal: Pos,
    #[serde(default)]
    pub collectibles: Vec<Collectible>,
}

impl World {
    /// An open grid with no walls and no collectibles.
    pub fn new(grid_size: u32, start: Pos, goal: Pos) -> Self {
        Self {
            grid_size,
            walls: BTreeSet::new(),
            start,
            goal,
            collectibles: Vec::new(),
        }
    }

    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Pos>) -> Self {
        self.walls.extend(walls);
        self
    }

    pub fn with_collectible(mut self, pos: Pos, kind: CollectibleKind) -> Self {
        self.collectibles.push(Collectible { pos, kind });
        self
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        let size = i64::from(self.grid_size);
        (0..size).contains(&i64::from(pos.x)) && (0..size).contains(&i64::from(pos.y))
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.walls.contains(&pos)
    }

    /// In the grid and not a wall.
    pub fn is_passable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.is_wall(pos)
    }

    /// The uncollected item at `pos`, with its index.
    pub fn collectible_at(
        &self,
        pos: Pos,
        collected: &CollectedSet,
    ) -> Option<(usize, &Collectible)> {
        self.collectibles
            .iter()
            .enumerate()
            .find(|(index, item)| item.pos == pos && !collected.is_collected(*index))
    }

    /// Fresh collected flags for a new run.
    pub fn fresh_collected(&self) -> CollectedSet {
        CollectedSet::empty(self.collectibles.len())
    }

    /// Check that start, goal and every collectible sit on distinct
    /// in-grid, non-wall cells. An item on the start cell is allowed.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.grid_size == 0 {
            return Err(WorldError::EmptyGrid);
        }

        let features = [(Feature::Start, self.start), (Feature::Goal, self.goal)]
            .into_iter()
            .chain(
                self.collectibles
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (Feature::Collectible(index), item.pos)),
            );

        let mut occupied: Vec<(Feature, Pos)> = Vec::new();
        for (feature, pos) in features {
            if !self.in_bounds(pos) {
                return Err(WorldError::OutOfBounds {
                    feature,
                    pos,
                    grid_size: self.grid_size,
                });
            }
            if self.is_wall(pos) {
                return Err(WorldError::OnWall { feature, pos });
            }
            // An item may sit on the start cell; everything else is exclusive.
            let clash = occupied.iter().find(|(first, other)| {
                *other == pos
                    && !matches!((first, feature), (Feature::Start, Feature::Collectible(_)))
            });
            if let Some((first, _)) = clash {
                return Err(WorldError::Overlap {
                    first: *first,
                    second: feature,
                    pos,
                });
            }
            occupied.push((feature, pos));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_world() -> World {
        World::new(5, Pos::new(0, 0), Pos::new(4, 0))
    }

    #[test]
    fn test_passable_rejects_edges_and_walls() {
        let world = open_world().with_walls([Pos::new(2, 2)]);
        assert!(world.is_passable(Pos::new(0, 0)));
        assert!(world.is_passable(Pos::new(4, 4)));
        assert!(!world.is_passable(Pos::new(-1, 0)));
        assert!(!world.is_passable(Pos::new(0, 5)));
        assert!(!world.is_passable(Pos::new(2, 2)));
    }

    #[test]
    fn test_step_stops_at_coordinate_limits() {
        assert_eq!(Pos::new(2, 2).step(Direction::Right), Some(Pos::new(3, 2)));
        assert_eq!(Pos::new(0, 0).north(), Some(Pos::new(0, -1)));
        assert_eq!(Pos::new(i32::MAX, 0).step(Direction::Right), None);
        assert_eq!(Pos::new(0, i32::MIN).north(), None);
    }

    #[test]
    fn test_huge_grid_still_validates() {
        let world = World::new(u32::MAX, Pos::new(i32::MAX, 0), Pos::new(0, 0));
        assert_eq!(world.validate(), Ok(()));
        assert!(world.in_bounds(Pos::new(i32::MAX, i32::MAX)));
    }

    #[test]
    fn test_collectible_at_skips_collected_items() {
        let world = open_world().with_collectible(Pos::new(1, 0), CollectibleKind::Gem);
        let mut collected = world.fresh_collected();
        let (index, item) = world.collectible_at(Pos::new(1, 0), &collected).unwrap();
        assert_eq!(index, 0);
        assert_eq!(item.kind, CollectibleKind::Gem);

        assert!(collected.mark(index));
        assert!(!collected.mark(index), "second mark must be a no-op");
        assert!(world.collectible_at(Pos::new(1, 0), &collected).is_none());
        assert!(world.collectible_at(Pos::new(2, 0), &collected).is_none());
    }

    #[test]
    fn test_collected_set_counts() {
        let mut set = CollectedSet::empty(3);
        assert_eq!(set.remaining(), 3);
        set.mark(1);
        assert_eq!(set.collected_count(), 1);
        assert_eq!(set.remaining(), 2);
        assert!(!set.all_collected());
        assert!(CollectedSet::empty(0).all_collected());
        assert!(!set.mark(7));
    }

    #[test]
    fn test_validate_accepts_open_world() {
        assert_eq!(open_world().validate(), Ok(()));
    }

    #[test]
    fn test_validate_allows_item_on_start() {
        let world = open_world().with_collectible(Pos::new(0, 0), CollectibleKind::Coin);
        assert_eq!(world.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_layout_errors() {
        let world = open_world().with_walls([Pos::new(4, 0)]);
        assert_eq!(
            world.validate(),
            Err(WorldError::OnWall {
                feature: Feature::Goal,
                pos: Pos::new(4, 0)
            })
        );

        let world = open_world().with_collectible(Pos::new(4, 0), CollectibleKind::Coin);
        assert_eq!(
            world.validate(),
            Err(WorldError::Overlap {
                first: Feature::Goal,
                second: Feature::Collectible(0),
                pos: Pos::new(4, 0)
            })
        );

        let world = World::new(5, Pos::new(2, 2), Pos::new(2, 2));
        assert!(matches!(world.validate(), Err(WorldError::Overlap { .. })));

        let world = World::new(5, Pos::new(0, 7), Pos::new(4, 0));
        assert!(matches!(
            world.validate(),
            Err(WorldError::OutOfBounds {
                feature: Feature::Start,
                ..
            })
        ));

        assert_eq!(
            World::new(0, Pos::new(0, 0), Pos::new(0, 0)).validate(),
            Err(WorldError::EmptyGrid)
        );
    }

    #[test]
    fn test_world_error_message() {
        let err = WorldError::OnWall {
            feature: Feature::Collectible(2),
            pos: Pos::new(3, 1),
        };
        assert_eq!(err.to_string(), "collectible #2 at (3,1) is on a wall");
    }

    #[test]
    fn test_world_json_defaults() {
        let world: World = serde_json::from_str(
            r#"{"grid_size":6,"start":{"x":0,"y":0},"goal":{"x":5,"y":5}}"#,
        )
        .unwrap();
        assert!(world.walls.is_empty());
        assert!(world.collectibles.is_empty());
        assert_eq!(world.validate(), Ok(()));
    }
}
