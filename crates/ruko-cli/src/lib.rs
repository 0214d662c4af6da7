//! Building blocks of the `ruko` command: loading levels and programs from
//! disk and rendering results for the terminal.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use ruko_eval::{ExecutionOutcome, RunError, TraceEvent};
use ruko_levels::LevelError;
use ruko_types::ast::{Block, Program};
use ruko_types::level::Level;
use ruko_types::world::{CollectedSet, CollectibleKind, Pos, World};
use ruko_types::CheckErrors;
use serde::Serialize;
use thiserror::Error;

// ══════════════════════════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported level file {} (expected .json or .toml)", .0.display())]
    UnknownFormat(PathBuf),

    #[error("invalid level file {}: {message}", .path.display())]
    LevelFile { path: PathBuf, message: String },

    #[error("invalid program {}: {source}", .path.display())]
    ProgramFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Run(#[from] RunError),
}

// ══════════════════════════════════════════════════════════════════════════════
// Loading
// ══════════════════════════════════════════════════════════════════════════════

/// Serialization format of a level file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFormat {
    Json,
    Toml,
}

impl LevelFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn parse(self, text: &str) -> Result<Level, String> {
        match self {
            Self::Json => Level::from_json(text).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a level from a `.json` or `.toml` file.
pub fn load_level_file(path: &Path) -> Result<Level, CliError> {
    let format =
        LevelFormat::from_path(path).ok_or_else(|| CliError::UnknownFormat(path.to_path_buf()))?;
    let text = read(path)?;
    let level = format.parse(&text).map_err(|message| CliError::LevelFile {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!(path = %path.display(), id = level.id, "loaded level file");
    Ok(level)
}

/// Load a JSON program.
pub fn load_program(path: &Path) -> Result<Program, CliError> {
    let text = read(path)?;
    Program::from_json(&text).map_err(|source| CliError::ProgramFile {
        path: path.to_path_buf(),
        source,
    })
}

// ══════════════════════════════════════════════════════════════════════════════
// Rendering
// ══════════════════════════════════════════════════════════════════════════════

/// One row of `ruko levels --json`.
#[derive(Debug, Clone, Serialize)]
pub struct LevelSummary<'a> {
    pub id: u32,
    pub name: &'a str,
    pub concept: &'a str,
    pub max_blocks: usize,
    pub items: usize,
    pub blocks: String,
}

impl<'a> LevelSummary<'a> {
    pub fn of(level: &'a Level) -> Self {
        Self {
            id: level.id,
            name: &level.name,
            concept: &level.concept,
            max_blocks: level.max_blocks,
            items: level.world.collectibles.len(),
            blocks: level
                .available_blocks
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

pub fn render_levels(levels: &[Level]) -> String {
    let mut out = String::new();
    for level in levels {
        let row = LevelSummary::of(level);
        let _ = writeln!(
            out,
            "{:>2}  {:<18} {:<22} max {:>2}  {}",
            row.id, row.name, row.concept, row.max_blocks, row.blocks
        );
    }
    out
}

/// Draw the grid: `#` wall, `G` goal, `R` actor, `c`/`g`/`k` uncollected
/// coin, gem and key, `.` empty.
pub fn draw_world(world: &World, actor: Pos, collected: &CollectedSet) -> String {
    let size = i32::try_from(world.grid_size).unwrap_or(i32::MAX);
    let mut out = String::new();
    for y in 0..size {
        for x in 0..size {
            let pos = Pos::new(x, y);
            let cell = if pos == actor {
                'R'
            } else if world.is_wall(pos) {
                '#'
            } else if let Some((_, item)) = world.collectible_at(pos, collected) {
                match item.kind {
                    CollectibleKind::Coin => 'c',
                    CollectibleKind::Gem => 'g',
                    CollectibleKind::Key => 'k',
                }
            } else if pos == world.goal {
                'G'
            } else {
                '.'
            };
            out.push(cell);
        }
        out.push('\n');
    }
    out
}

pub fn render_diagnostics(errors: &CheckErrors) -> String {
    let mut out = String::new();
    for diagnostic in errors.errors.iter().chain(&errors.warnings) {
        let _ = writeln!(out, "{diagnostic}");
        if let Some(suggestion) = &diagnostic.suggestion {
            let _ = writeln!(out, "    help: {suggestion}");
        }
    }
    let _ = writeln!(
        out,
        "{} error(s), {} warning(s)",
        errors.total_errors, errors.total_warnings
    );
    out
}

/// The block tree, one block per line, indented by nesting depth.
pub fn render_outline(program: &Program) -> String {
    let mut out = String::new();
    program.walk(|path, block| {
        let indent = "  ".repeat(path.depth().saturating_sub(1));
        let _ = match block {
            Block::Loop { iterations, .. } => {
                writeln!(out, "{indent}{path} {} x{iterations}", block.kind())
            }
            Block::If { condition, .. } => {
                writeln!(out, "{indent}{path} {} {condition}", block.kind())
            }
            Block::Function { name, .. } => {
                writeln!(out, "{indent}{path} {} {name}", block.kind())
            }
            _ => writeln!(out, "{indent}{path} {}", block.kind()),
        };
    });
    out
}

/// One line per event, tagged with the kind of block that produced it.
pub fn render_trace(program: &Program, trace: &[TraceEvent]) -> String {
    let mut out = String::new();
    for event in trace {
        match program.get(&event.block) {
            Some(block) => {
                let _ = writeln!(out, "{event} [{}]", block.kind());
            }
            None => {
                let _ = writeln!(out, "{event}");
            }
        }
    }
    out
}

pub fn render_outcome(world: &World, outcome: &ExecutionOutcome) -> String {
    let mut out = draw_world(world, outcome.final_pos, &outcome.collected);
    let _ = writeln!(
        out,
        "final position {}, {}/{} collected",
        outcome.final_pos,
        outcome.collected.collected_count(),
        outcome.collected.len()
    );
    if outcome.terminated_early {
        let _ = writeln!(out, "stopped early: BREAK outside any loop");
    }
    let _ = writeln!(out, "{}", outcome.verdict);
    out
}
