//! Built-in level catalog tests.
//!
//! Tests for:
//! - Catalog shape: ids, grid size, palettes, goal rules
//! - Every world validates and every feature is reachable
//! - Known solutions pass the checker and win their level

use std::collections::{BTreeSet, VecDeque};

use ruko_check::check_program;
use ruko_eval::execute;
use ruko_levels::{level, levels, LevelCatalog, LevelError, GRID_SIZE, LEVEL_COUNT};
use ruko_types::ast::{Block, BlockKind, Direction, Program};
use ruko_types::level::{GoalRule, Level};
use ruko_types::world::{CollectibleKind, Pos, World};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Cells reachable from the start by single steps through passable cells.
fn reachable(world: &World) -> BTreeSet<Pos> {
    let mut seen = BTreeSet::from([world.start]);
    let mut queue = VecDeque::from([world.start]);
    while let Some(pos) = queue.pop_front() {
        for direction in Direction::ALL {
            let Some(next) = pos.step(direction) else {
                continue;
            };
            if world.is_passable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn assert_solves(id: u32, blocks: Vec<Block>) {
    let level = level(id).unwrap();
    let program = Program::new(blocks);
    let diagnostics = check_program(&program, &level);
    assert!(
        !diagnostics.has_errors(),
        "level {id} solution rejected: {diagnostics}"
    );
    let report = execute(&program, &level).unwrap();
    assert!(
        report.outcome.is_success(),
        "level {id} solution failed: {}",
        report.outcome.verdict
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Catalog shape
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn catalog_has_fifteen_ordered_levels() {
    let all = levels();
    assert_eq!(all.len(), LEVEL_COUNT as usize);
    let ids: Vec<u32> = all.iter().map(|level| level.id).collect();
    assert_eq!(ids, (1..=LEVEL_COUNT).collect::<Vec<_>>());
    assert_eq!(LevelCatalog::new().len(), all.len());
}

#[test]
fn every_level_uses_the_standard_grid() {
    for level in levels() {
        assert_eq!(level.world.grid_size, GRID_SIZE, "level {}", level.id);
        assert!(!level.name.is_empty());
        assert!(!level.concept.is_empty());
        assert!(!level.tutorial.is_empty());
    }
}

#[test]
fn every_level_offers_all_moves() {
    for level in levels() {
        for kind in BlockKind::MOVES {
            assert!(level.allows(kind), "level {} lacks {kind}", level.id);
        }
    }
}

#[test]
fn palettes_unlock_concepts_in_order() {
    let first_with = |kind: BlockKind| {
        levels()
            .into_iter()
            .find(|level| level.allows(kind))
            .map(|level| level.id)
    };
    assert_eq!(first_with(BlockKind::Loop), Some(4));
    assert_eq!(first_with(BlockKind::Collect), Some(7));
    assert_eq!(first_with(BlockKind::If), Some(8));
    assert_eq!(first_with(BlockKind::Break), Some(10));
    assert_eq!(first_with(BlockKind::Function), Some(11));
    assert_eq!(first_with(BlockKind::Wait), Some(13));
}

#[test]
fn levels_with_items_require_collecting_them() {
    for level in levels() {
        let expected = if level.world.collectibles.is_empty() {
            GoalRule::ReachGoal
        } else {
            GoalRule::ReachGoalWithAllItems
        };
        assert_eq!(level.goal, expected, "level {}", level.id);
    }
}

#[test]
fn item_kinds_cycle_coin_gem_key() {
    let kinds: Vec<CollectibleKind> = level(15)
        .unwrap()
        .world
        .collectibles
        .iter()
        .map(|item| item.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            CollectibleKind::Coin,
            CollectibleKind::Gem,
            CollectibleKind::Key,
            CollectibleKind::Coin,
            CollectibleKind::Gem,
            CollectibleKind::Key,
        ]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Validity
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn every_world_validates() {
    for level in levels() {
        assert_eq!(level.validate(), Ok(()), "level {}", level.id);
    }
}

#[test]
fn goal_and_items_are_reachable() {
    for level in levels() {
        let reach = reachable(&level.world);
        assert!(reach.contains(&level.world.goal), "level {} goal", level.id);
        for item in &level.world.collectibles {
            assert!(reach.contains(&item.pos), "level {} item {}", level.id, item.pos);
        }
    }
}

#[test]
fn unknown_ids_are_errors() {
    assert!(matches!(level(0), Err(LevelError::UnknownLevel(0))));
    assert!(matches!(level(16), Err(LevelError::UnknownLevel(16))));
    assert_eq!(
        LevelError::UnknownLevel(99).to_string(),
        "no built-in level 99 (levels are 1..=15)"
    );
}

#[test]
fn levels_survive_json() {
    for original in levels() {
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(Level::from_json(&json).unwrap(), original);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Known solutions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn first_steps_two_moves_right() {
    assert_solves(1, vec![Block::right(), Block::right()]);
}

#[test]
fn repeat_discovery_with_one_loop() {
    assert_solves(4, vec![Block::repeat(4, [Block::right()])]);
}

#[test]
fn obstacle_course_around_both_walls() {
    assert_solves(
        6,
        vec![
            Block::repeat(3, [Block::down()]),
            Block::repeat(3, [Block::right()]),
            Block::up(),
            Block::repeat(2, [Block::right()]),
            Block::repeat(3, [Block::down()]),
        ],
    );
}

#[test]
fn collector_picks_up_everything() {
    assert_solves(
        7,
        vec![
            Block::repeat(2, [Block::right()]),
            Block::Collect,
            Block::repeat(3, [Block::down()]),
            Block::Collect,
            Block::repeat(2, [Block::right()]),
            Block::down(),
            Block::Collect,
            Block::right(),
            Block::down(),
        ],
    );
}

#[test]
fn pattern_master_climbs_the_staircase() {
    assert_solves(12, vec![Block::repeat(5, [Block::up(), Block::right()])]);
}

#[test]
fn too_many_blocks_fail_the_budget() {
    let level = level(1).unwrap();
    let program = Program::new(vec![Block::right(); 5]);
    assert!(check_program(&program, &level).has_errors());
}
