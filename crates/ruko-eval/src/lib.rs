//! Ruko execution engine.
//!
//! Runs a block program against a grid world:
//!
//! ```text
//! Program + Level → validate → RunHandle (lazy) ─┬─▶ TraceEvent, TraceEvent, …
//!                                                └─▶ ExecutionOutcome (verdict)
//! ```
//!
//! Two engines share the same atomic actions:
//!
//! - [`RunHandle`]: the host-facing stepper. One event per
//!   [`Iterator::next`], cooperative cancellation through [`CancelToken`].
//! - [`Interpreter`]: a recursive reference implementation that runs to
//!   completion. [`execute`] uses it.
//!
//! Both produce the same trace and outcome for every program.
//!
//! # Break scoping
//!
//! A `Break` unwinds to the nearest enclosing `Loop`, which stops iterating;
//! the loop's siblings then run as usual. `If` and `Function` bodies let a
//! break pass through. A break with no enclosing loop halts the program and
//! the outcome reports `terminated_early`.

mod actor;
pub mod error;
pub mod goal;
pub mod interpreter;
pub mod run;
pub mod trace;

pub use error::{RunError, RunResult};
pub use goal::{FailureReason, GoalFn, GoalPredicate, Verdict};
pub use interpreter::Interpreter;
pub use run::{CancelToken, RunHandle, RunStatus};
pub use trace::{BreakSignal, ExecutionOutcome, ExecutionReport, TraceEvent, TraceEventKind};

use ruko_types::ast::Program;
use ruko_types::level::Level;
use ruko_types::world::World;
use tracing::info;

/// Prepare and begin a run of `program` on `level`.
///
/// The returned handle is already `Running`; pull events from it to
/// advance.
pub fn start_run(program: Program, level: &Level) -> RunResult<RunHandle> {
    let mut handle = RunHandle::new(program, level.world.clone(), level.goal)?;
    info!(level = level.id, name = %level.name, "starting level run");
    handle.begin()?;
    Ok(handle)
}

/// Run `program` on `level` to completion with the reference interpreter.
pub fn execute(program: &Program, level: &Level) -> RunResult<ExecutionReport> {
    validate(program, &level.world)?;
    let report = Interpreter::new(&level.world).run(program, &level.goal);
    info!(
        level = level.id,
        events = report.trace.len(),
        verdict = %report.outcome.verdict,
        "execution finished"
    );
    Ok(report)
}

/// Reject what the engine cannot run: an empty program, a malformed tree,
/// or a world that breaks its layout invariants. Budget and palette are the
/// editor's concern and are not checked here.
pub(crate) fn validate(program: &Program, world: &World) -> RunResult<()> {
    if program.is_empty() {
        return Err(RunError::EmptyProgram);
    }
    let diagnostics = ruko_check::check_structure(program);
    if diagnostics.has_errors() {
        return Err(RunError::MalformedProgram(diagnostics));
    }
    world.validate()?;
    Ok(())
}
