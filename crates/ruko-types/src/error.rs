use crate::BlockPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of diagnostics stored before further ones are only counted.
pub const MAX_ERRORS: usize = 20;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic category, determined by code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Structure,
    Budget,
    Palette,
    Style,
}

/// Numeric diagnostic code (100–499).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Structure (100–199) ──
    pub const LOOP_ITERATIONS_OUT_OF_RANGE: Self = Self(100);
    pub const EMPTY_PROGRAM: Self = Self(101);

    // ── Budget (200–299) ──
    pub const BLOCK_BUDGET_EXCEEDED: Self = Self(200);

    // ── Palette (300–399) ──
    pub const BLOCK_NOT_AVAILABLE: Self = Self(300);

    // ── Style warnings (400–499) ──
    pub const EMPTY_CONTAINER: Self = Self(400);
    pub const UNREACHABLE_AFTER_BREAK: Self = Self(401);

    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Structure,
            200..=299 => ErrorCategory::Budget,
            300..=399 => ErrorCategory::Palette,
            _ => ErrorCategory::Style,
        }
    }

    /// Severity implied by the category: style codes are warnings.
    pub fn severity(self) -> Severity {
        match self.category() {
            ErrorCategory::Style => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity() {
            Severity::Error => write!(f, "E{}", self.0),
            Severity::Warning => write!(f, "W{}", self.0),
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(f, "structure"),
            Self::Budget => write!(f, "budget"),
            Self::Palette => write!(f, "palette"),
            Self::Style => write!(f, "style"),
        }
    }
}

/// A structured diagnostic about a program.
///
/// The editor renders these; it must not parse free-form strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckError {
    pub code: ErrorCode,
    pub severity: Severity,
    pub category: ErrorCategory,
    pub message: String,
    /// Offending block, or the root for whole-program diagnostics.
    pub path: BlockPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl CheckError {
    pub fn new(code: ErrorCode, message: impl Into<String>, path: BlockPath) -> Self {
        Self {
            code,
            severity: code.severity(),
            category: code.category(),
            message: message.into(),
            path,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.path, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for CheckError {}

/// All diagnostics produced for one program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckErrors {
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CheckErrors {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Record a diagnostic, routing it by severity. Errors beyond
    /// [`MAX_ERRORS`] are counted but not stored.
    pub fn push(&mut self, diagnostic: CheckError) {
        match diagnostic.severity {
            Severity::Error => {
                if self.errors.len() < MAX_ERRORS {
                    self.errors.push(diagnostic);
                }
                self.total_errors += 1;
            }
            Severity::Warning => {
                self.warnings.push(diagnostic);
                self.total_warnings += 1;
            }
        }
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .any(|diagnostic| diagnostic.code == code)
    }
}

impl fmt::Display for CheckErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s), {} warning(s)",
            self.total_errors, self.total_warnings
        )?;
        if let Some(first) = self.errors.first() {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}
