//! Program checker tests.
//!
//! Tests for:
//! - E100: loop iteration range
//! - E101: empty program
//! - E200: top-level block budget (nested children are free)
//! - E300: level palette
//! - W400 / W401: style warnings

use ruko_check::{check_program, check_structure};
use ruko_types::ast::{Block, BlockKind, Condition, Program};
use ruko_types::level::Level;
use ruko_types::world::{Pos, World};
use ruko_types::{BlockPath, CheckErrors, ErrorCode, Severity};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn level(max_blocks: usize, palette: &[BlockKind]) -> Level {
    let mut level = Level::sandbox(World::new(5, Pos::new(0, 0), Pos::new(4, 0)), max_blocks);
    level.name = "Test".to_string();
    level.available_blocks = palette.to_vec();
    level
}

fn moves_and_loops() -> Vec<BlockKind> {
    vec![
        BlockKind::Up,
        BlockKind::Down,
        BlockKind::Left,
        BlockKind::Right,
        BlockKind::Loop,
    ]
}

fn describe(errors: &CheckErrors) -> String {
    errors
        .errors
        .iter()
        .chain(&errors.warnings)
        .map(|e| format!("  [{}] {} at {}", e.code, e.message, e.path))
        .collect::<Vec<_>>()
        .join("\n")
}

fn assert_clean(errors: &CheckErrors) {
    assert!(
        !errors.has_errors() && errors.total_warnings == 0,
        "expected no diagnostics, got:\n{}",
        describe(errors)
    );
}

fn assert_code(errors: &CheckErrors, code: ErrorCode) {
    assert!(
        errors.has_code(code),
        "expected {code}, got:\n{}",
        describe(errors)
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Clean programs
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn straight_line_program_is_clean() {
    let program = Program::new(vec![Block::right(); 4]);
    assert_clean(&check_program(&program, &level(4, &BlockKind::MOVES)));
}

#[test]
fn loop_program_is_clean() {
    let program = Program::new(vec![Block::repeat(4, [Block::right()])]);
    assert_clean(&check_program(&program, &level(8, &moves_and_loops())));
}

// ══════════════════════════════════════════════════════════════════════════════
// E100: loop iteration range
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn loop_iterations_below_range_is_e100() {
    let program = Program::new(vec![Block::repeat(1, [Block::right()])]);
    let errors = check_structure(&program);
    assert_code(&errors, ErrorCode::LOOP_ITERATIONS_OUT_OF_RANGE);
    assert_eq!(errors.errors[0].path, BlockPath::from(vec![0]));
}

#[test]
fn loop_iterations_above_range_is_e100() {
    let program = Program::new(vec![Block::repeat(7, [Block::right()])]);
    assert_code(&check_structure(&program), ErrorCode::LOOP_ITERATIONS_OUT_OF_RANGE);
}

#[test]
fn loop_iteration_bounds_are_inclusive() {
    for n in [2, 6] {
        let program = Program::new(vec![Block::repeat(n, [Block::right()])]);
        assert_clean(&check_structure(&program));
    }
}

#[test]
fn nested_bad_loop_reports_nested_path() {
    let program = Program::new(vec![
        Block::up(),
        Block::function([Block::repeat(0, [Block::Wait])]),
    ]);
    let errors = check_structure(&program);
    assert_eq!(errors.total_errors, 1);
    assert_eq!(errors.errors[0].path, BlockPath::from(vec![1, 0]));
}

// ══════════════════════════════════════════════════════════════════════════════
// E101: empty program
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn empty_program_is_e101_for_levels_only() {
    let program = Program::default();
    assert_code(
        &check_program(&program, &level(4, &BlockKind::MOVES)),
        ErrorCode::EMPTY_PROGRAM,
    );
    assert_clean(&check_structure(&program));
}

// ══════════════════════════════════════════════════════════════════════════════
// E200: block budget
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn too_many_top_level_blocks_is_e200() {
    let program = Program::new(vec![Block::right(); 5]);
    let errors = check_program(&program, &level(4, &BlockKind::MOVES));
    assert_code(&errors, ErrorCode::BLOCK_BUDGET_EXCEEDED);
    assert_eq!(errors.total_errors, 1);
    assert_eq!(errors.errors[0].path, BlockPath::from(vec![4]));
}

#[test]
fn nested_children_do_not_count_against_budget() {
    // Two top-level blocks carrying twelve nested moves.
    let program = Program::new(vec![
        Block::repeat(2, vec![Block::right(); 6]),
        Block::repeat(2, vec![Block::down(); 6]),
    ]);
    assert_eq!(program.total_blocks(), 14);
    assert_clean(&check_program(&program, &level(2, &moves_and_loops())));
}

// ══════════════════════════════════════════════════════════════════════════════
// E300: palette
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn unavailable_block_is_e300() {
    let program = Program::new(vec![Block::right(), Block::Wait]);
    let errors = check_program(&program, &level(4, &BlockKind::MOVES));
    assert_code(&errors, ErrorCode::BLOCK_NOT_AVAILABLE);
    assert_eq!(errors.errors[0].path, BlockPath::from(vec![1]));
    assert!(errors.errors[0].message.contains("WAIT"));
}

#[test]
fn palette_applies_to_nested_blocks() {
    let program = Program::new(vec![Block::repeat(2, [Block::right(), Block::Collect])]);
    let errors = check_program(&program, &level(4, &moves_and_loops()));
    assert_eq!(errors.total_errors, 1);
    assert_eq!(errors.errors[0].path, BlockPath::from(vec![0, 1]));
}

#[test]
fn structure_check_ignores_palette() {
    let program = Program::new(vec![Block::Wait, Block::function([Block::Collect])]);
    assert_clean(&check_structure(&program));
}

// ══════════════════════════════════════════════════════════════════════════════
// Warnings
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn empty_container_is_w400_warning() {
    let program = Program::new(vec![Block::when(Condition::ItemHere, Vec::<Block>::new())]);
    let errors = check_structure(&program);
    assert!(!errors.has_errors());
    assert_code(&errors, ErrorCode::EMPTY_CONTAINER);
    assert_eq!(errors.warnings[0].severity, Severity::Warning);
}

#[test]
fn blocks_after_break_are_w401_once_per_sequence() {
    let program = Program::new(vec![Block::repeat(
        3,
        [Block::right(), Block::Break, Block::up(), Block::down()],
    )]);
    let errors = check_structure(&program);
    assert!(!errors.has_errors());
    assert_eq!(errors.total_warnings, 1);
    assert_eq!(errors.warnings[0].code, ErrorCode::UNREACHABLE_AFTER_BREAK);
    assert_eq!(errors.warnings[0].path, BlockPath::from(vec![0, 2]));
}

#[test]
fn break_inside_if_does_not_make_siblings_unreachable() {
    let program = Program::new(vec![Block::repeat(
        3,
        [Block::when(Condition::WallAhead, [Block::Break]), Block::up()],
    )]);
    assert_clean(&check_structure(&program));
}

#[test]
fn diagnostics_serialize_for_the_editor() {
    let program = Program::new(vec![Block::repeat(9, [Block::right()])]);
    let errors = check_structure(&program);
    let json = serde_json::to_string(&errors).unwrap();
    assert!(json.contains(r#""total_errors":1"#));
    assert!(json.contains(r#""code":100"#));
}
