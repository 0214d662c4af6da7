//! Ruko program checker.
//!
//! Validates a built program before it is handed to the engine:
//!
//! ```text
//! Editor → Program → check_program(level) → start_run / execute
//! ```
//!
//! [`check_structure`] covers what the engine itself depends on and needs no
//! level. [`check_program`] adds the level's block budget and palette, which
//! the editor enforces.

mod checker;

pub use checker::ProgramChecker;

use ruko_types::ast::Program;
use ruko_types::level::Level;
use ruko_types::CheckErrors;

/// Full editor-side check of `program` against `level`.
pub fn check_program(program: &Program, level: &Level) -> CheckErrors {
    let mut errors = CheckErrors::empty();
    ProgramChecker::new(&mut errors).with_level(level).check(program);
    tracing::debug!(
        level = level.id,
        errors = errors.total_errors,
        warnings = errors.total_warnings,
        "program checked"
    );
    errors
}

/// Structural check only: loop counts and container shape. Empty programs
/// are not flagged here; the engine reports them on its own.
pub fn check_structure(program: &Program) -> CheckErrors {
    let mut errors = CheckErrors::empty();
    ProgramChecker::new(&mut errors).check(program);
    errors
}
