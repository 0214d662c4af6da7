//! Program checker: walks a block tree and records diagnostics.
//!
//! Codes emitted:
//! - E100: loop iteration count outside `2..=6`
//! - E101: empty program (level checks only)
//! - E200: top-level block count over the level budget
//! - E300: block kind not in the level palette
//! - W400: container with an empty body
//! - W401: blocks after a `Break` in the same sequence never run

use ruko_types::ast::{Block, Program, MAX_LOOP_ITERATIONS, MIN_LOOP_ITERATIONS};
use ruko_types::level::Level;
use ruko_types::{BlockPath, CheckError, CheckErrors, ErrorCode};

/// Walks a [`Program`] and records diagnostics into a [`CheckErrors`].
pub struct ProgramChecker<'a> {
    errors: &'a mut CheckErrors,
    level: Option<&'a Level>,
}

impl<'a> ProgramChecker<'a> {
    /// A checker with no level: only structural diagnostics are produced.
    pub fn new(errors: &'a mut CheckErrors) -> Self {
        Self {
            errors,
            level: None,
        }
    }

    /// Also enforce `level`'s budget and palette.
    pub fn with_level(mut self, level: &'a Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn check(&mut self, program: &Program) {
        if let Some(level) = self.level {
            self.check_budget(program, level);
        }
        self.check_sequence(program.blocks(), &BlockPath::root());
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program-level
    // ══════════════════════════════════════════════════════════════════════

    fn check_budget(&mut self, program: &Program, level: &Level) {
        if program.is_empty() {
            self.report(
                CheckError::new(ErrorCode::EMPTY_PROGRAM, "nothing to run", BlockPath::root())
                    .with_suggestion("Add at least one block"),
            );
            return;
        }

        // Only the top-level sequence counts; blocks nested inside loops,
        // conditionals and functions are free.
        if program.len() > level.max_blocks {
            self.report(
                CheckError::new(
                    ErrorCode::BLOCK_BUDGET_EXCEEDED,
                    format!(
                        "program uses {} top-level blocks; level '{}' allows {}",
                        program.len(),
                        level.name,
                        level.max_blocks
                    ),
                    BlockPath::from(vec![level.max_blocks]),
                )
                .with_suggestion("Move repeated blocks into a loop or function"),
            );
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Blocks
    // ══════════════════════════════════════════════════════════════════════

    fn check_sequence(&mut self, blocks: &[Block], parent: &BlockPath) {
        let mut seen_break = false;
        let mut warned = false;
        for (i, block) in blocks.iter().enumerate() {
            let path = parent.child(i);
            // One warning per sequence is enough.
            if seen_break && !warned {
                self.report(CheckError::new(
                    ErrorCode::UNREACHABLE_AFTER_BREAK,
                    format!("{} after BREAK never runs", block.kind()),
                    path.clone(),
                ));
                warned = true;
            }
            self.check_block(block, &path);
            seen_break |= matches!(block, Block::Break);
        }
    }

    fn check_block(&mut self, block: &Block, path: &BlockPath) {
        self.check_palette(block, path);

        match block {
            Block::Loop { iterations, body } => {
                if !(MIN_LOOP_ITERATIONS..=MAX_LOOP_ITERATIONS).contains(iterations) {
                    self.report(
                        CheckError::new(
                            ErrorCode::LOOP_ITERATIONS_OUT_OF_RANGE,
                            format!(
                                "loop repeats {iterations} times; allowed range is \
                                 {MIN_LOOP_ITERATIONS}..={MAX_LOOP_ITERATIONS}"
                            ),
                            path.clone(),
                        )
                        .with_suggestion(format!(
                            "Pick a count between {MIN_LOOP_ITERATIONS} and {MAX_LOOP_ITERATIONS}"
                        )),
                    );
                }
                self.check_body(block, body, path);
            }
            Block::If { body, .. } | Block::Function { body, .. } => {
                self.check_body(block, body, path);
            }
            Block::Move { .. } | Block::Collect | Block::Wait | Block::Break => {}
        }
    }

    fn check_body(&mut self, container: &Block, body: &[Block], path: &BlockPath) {
        if body.is_empty() {
            self.report(CheckError::new(
                ErrorCode::EMPTY_CONTAINER,
                format!("{} block has an empty body", container.kind()),
                path.clone(),
            ));
            return;
        }
        self.check_sequence(body, path);
    }

    fn check_palette(&mut self, block: &Block, path: &BlockPath) {
        let Some(level) = self.level else {
            return;
        };
        let kind = block.kind();
        if !level.allows(kind) {
            self.report(CheckError::new(
                ErrorCode::BLOCK_NOT_AVAILABLE,
                format!("{kind} is not available in level '{}'", level.name),
                path.clone(),
            ));
        }
    }

    fn report(&mut self, diagnostic: CheckError) {
        tracing::trace!(code = %diagnostic.code, path = %diagnostic.path, "diagnostic");
        self.errors.push(diagnostic);
    }
}
