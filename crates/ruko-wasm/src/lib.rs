//! Ruko engine as a WASM module for browser hosts.
//!
//! Everything crosses the boundary as JSON strings: levels and programs go
//! in, reports, diagnostics and trace events come out.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run_level, Session } from 'ruko-wasm';
//!
//! await init();
//!
//! const program = JSON.stringify([{ type: "move", direction: "right" }]);
//! console.log(JSON.parse(run_level(1, program)));
//! // { success: false, outcome: { ... }, trace: [ ... ], errors: { ... }, error: null }
//!
//! // Animated playback: pull one event per frame.
//! const session = new Session(levelJson, program);
//! let event;
//! while ((event = session.next_event()) !== undefined) animate(JSON.parse(event));
//! console.log(JSON.parse(session.outcome()));
//! ```

use ruko_eval::{ExecutionOutcome, RunHandle, TraceEvent};
use ruko_types::ast::Program;
use ruko_types::level::Level;
use ruko_types::CheckErrors;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Result of a full run, as returned by [`run_program`] and [`run_level`].
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    /// The run finished and the goal was met.
    pub success: bool,
    pub outcome: Option<ExecutionOutcome>,
    pub trace: Vec<TraceEvent>,
    /// Checker diagnostics. A program with errors is not run.
    pub errors: CheckErrors,
    /// Input or engine failure that prevented the run.
    pub error: Option<String>,
}

impl RunResponse {
    fn failed(error: String) -> Self {
        Self {
            success: false,
            outcome: None,
            trace: Vec::new(),
            errors: CheckErrors::empty(),
            error: Some(error),
        }
    }
}

fn parse_level(level_json: &str) -> Result<Level, String> {
    Level::from_json(level_json).map_err(|e| format!("invalid level: {e}"))
}

fn parse_program(program_json: &str) -> Result<Program, String> {
    Program::from_json(program_json).map_err(|e| format!("invalid program: {e}"))
}

fn run_parsed(level: &Level, program_json: &str) -> RunResponse {
    let program = match parse_program(program_json) {
        Ok(program) => program,
        Err(e) => return RunResponse::failed(e),
    };

    let errors = ruko_check::check_program(&program, level);
    if errors.has_errors() {
        return RunResponse {
            errors,
            ..RunResponse::failed("program has errors".to_string())
        };
    }

    match ruko_eval::execute(&program, level) {
        Ok(report) => RunResponse {
            success: report.outcome.is_success(),
            outcome: Some(report.outcome),
            trace: report.trace,
            errors,
            error: None,
        },
        Err(e) => RunResponse::failed(e.to_string()),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "error": format!("Serialization error: {e}"),
        })
        .to_string()
    })
}

// ══════════════════════════════════════════════════════════════════════════════
// One-shot API
// ══════════════════════════════════════════════════════════════════════════════

/// Check and run a program against a level, both given as JSON.
///
/// Returns a JSON [`RunResponse`]. The level's block budget and palette are
/// enforced; a program with checker errors is reported but not run.
#[wasm_bindgen]
pub fn run_program(level_json: &str, program_json: &str) -> String {
    let response = match parse_level(level_json) {
        Ok(level) => run_parsed(&level, program_json),
        Err(e) => RunResponse::failed(e),
    };
    to_json(&response)
}

/// Like [`run_program`], with a built-in level chosen by id.
#[wasm_bindgen]
pub fn run_level(level_id: u32, program_json: &str) -> String {
    let response = match ruko_levels::level(level_id) {
        Ok(level) => run_parsed(&level, program_json),
        Err(e) => RunResponse::failed(e.to_string()),
    };
    to_json(&response)
}

/// Check a program against a level without running it.
///
/// Returns JSON `CheckErrors`. Unparseable input is reported as a single
/// error entry.
#[wasm_bindgen]
pub fn check_program(level_json: &str, program_json: &str) -> String {
    let parsed = parse_level(level_json)
        .and_then(|level| parse_program(program_json).map(|program| (level, program)));
    match parsed {
        Ok((level, program)) => to_json(&ruko_check::check_program(&program, &level)),
        Err(e) => serde_json::json!({
            "errors": [{ "message": e }],
            "warnings": [],
            "total_errors": 1,
            "total_warnings": 0,
        })
        .to_string(),
    }
}

/// Every built-in level as a JSON array.
#[wasm_bindgen]
pub fn list_levels() -> String {
    to_json(&ruko_levels::levels())
}

/// Return the engine version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ══════════════════════════════════════════════════════════════════════════════
// Step-by-step sessions
// ══════════════════════════════════════════════════════════════════════════════

/// A running program the host advances one event at a time.
///
/// Unlike [`run_program`], a session does not enforce the level's budget
/// or palette; only programs the engine cannot run are rejected.
#[wasm_bindgen]
pub struct Session {
    handle: RunHandle,
}

#[wasm_bindgen]
impl Session {
    #[wasm_bindgen(constructor)]
    pub fn new(level_json: &str, program_json: &str) -> Result<Session, String> {
        let level = parse_level(level_json)?;
        let program = parse_program(program_json)?;
        let handle = ruko_eval::start_run(program, &level).map_err(|e| e.to_string())?;
        Ok(Session { handle })
    }

    /// The next trace event as JSON, or `undefined` once the run is over.
    pub fn next_event(&mut self) -> Option<String> {
        self.handle.next().map(|event| to_json(&event))
    }

    /// Stop the run; no outcome will be produced.
    pub fn cancel(&mut self) {
        self.handle.cancel();
    }

    /// Start the same program again from the level's start state.
    pub fn restart(&mut self) -> Result<(), String> {
        self.handle.reset();
        self.handle.begin().map_err(|e| e.to_string())
    }

    /// `"idle"`, `"running"`, `"finished"` or `"cancelled"`.
    pub fn state(&self) -> String {
        self.handle.state().to_string()
    }

    /// The outcome as JSON once the run has finished.
    pub fn outcome(&self) -> Option<String> {
        self.handle.outcome().map(to_json)
    }
}
