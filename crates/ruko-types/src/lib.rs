//! Shared types for Ruko.
//!
//! This crate defines the block AST, block paths, the grid world, level
//! descriptions and the structured diagnostics used by the checker and the
//! execution engine.

mod error;
mod path;
pub mod ast;
pub mod level;
pub mod world;

pub use error::{CheckError, CheckErrors, ErrorCategory, ErrorCode, Severity, MAX_ERRORS};
pub use path::BlockPath;
