//! # Planner Error Types Module
//!
//! This module defines the errors raised while loading and cross-checking the
//! ingredient, menu and purchase tables, and the strictness policy that
//! decides whether a finding aborts the run or is demoted to a warning.

use log::debug;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the planning pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// One or more rows are missing a required field or carry an unusable value
    #[error("Invalid {kind} rows:\n{}", .rows.join("\n"))]
    Structural { kind: String, rows: Vec<String> },

    /// A name does not resolve in the ingredient catalog
    #[error("{context}: there is no ingredient named {name:?}")]
    Resolution { context: String, name: String },

    /// The same ingredient name appears more than once
    #[error("Duplicate ingredient names: {}", .names.join(", "))]
    DuplicateName { names: Vec<String> },

    /// Distinct ingredient names that contain one another
    #[error("Similar ingredient names: {}", .pairs.iter().map(|(a, b)| format!("{a:?} / {b:?}")).collect::<Vec<_>>().join(", "))]
    SimilarNames { pairs: Vec<(String, String)> },

    /// A numeric field could not be read
    #[error("Could not parse {field} {value:?} in {row}")]
    Parse {
        field: String,
        value: String,
        row: String,
    },

    /// A table was queried before it was built
    #[error("The {0} list has not yet been generated")]
    LookupNotYetBuilt(String),

    /// A meal code has no display label
    #[error("Unknown meal code {0:?}")]
    UnknownMealCode(String),

    /// The dataset provider could not deliver rows
    #[error("Could not read dataset {dataset}: {message}")]
    Dataset { dataset: String, message: String },
}

impl PlannerError {
    /// Errors that abort the run whatever the strictness setting
    pub fn is_always_fatal(&self) -> bool {
        matches!(
            self,
            PlannerError::Parse { .. }
                | PlannerError::LookupNotYetBuilt(_)
                | PlannerError::Dataset { .. }
        )
    }

    /// Short machine-friendly label used when listing warnings
    pub fn kind(&self) -> &'static str {
        match self {
            PlannerError::Structural { .. } => "structural",
            PlannerError::Resolution { .. } => "resolution",
            PlannerError::DuplicateName { .. } => "duplicate-name",
            PlannerError::SimilarNames { .. } => "similar-names",
            PlannerError::Parse { .. } => "parse",
            PlannerError::LookupNotYetBuilt(_) => "lookup-not-yet-built",
            PlannerError::UnknownMealCode(_) => "unknown-meal-code",
            PlannerError::Dataset { .. } => "dataset",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;

/// How validation findings are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Any finding aborts the run
    Strict,
    /// Findings are recorded and the offending rows are left out
    #[default]
    Warn,
}

/// A finding that was demoted to a warning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub kind: &'static str,
    pub message: String,
}

/// Collects demoted findings so they can be shown apart from the normal log
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    strictness: Strictness,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            warnings: Vec::new(),
        }
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Apply the strictness policy to a finding.
    ///
    /// Returns the error when it must abort the run, otherwise records it as a
    /// warning and returns `Ok(())` so the caller can skip the offending row.
    pub fn raise_or_warn(&mut self, error: PlannerError) -> Result<()> {
        if error.is_always_fatal() || self.strictness == Strictness::Strict {
            return Err(error);
        }

        debug!("Demoted {} finding to a warning: {}", error.kind(), error);
        self.warnings.push(Warning {
            kind: error.kind(),
            message: error.to_string(),
        });
        Ok(())
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution() -> PlannerError {
        PlannerError::Resolution {
            context: "Invalid purchase".to_string(),
            name: "unicorn".to_string(),
        }
    }

    #[test]
    fn test_warn_mode_records_finding() {
        let mut diagnostics = Diagnostics::new(Strictness::Warn);
        assert!(diagnostics.raise_or_warn(resolution()).is_ok());
        assert_eq!(diagnostics.warnings().len(), 1);
        assert_eq!(diagnostics.warnings()[0].kind, "resolution");
        assert!(diagnostics.warnings()[0].message.contains("unicorn"));
    }

    #[test]
    fn test_strict_mode_raises() {
        let mut diagnostics = Diagnostics::new(Strictness::Strict);
        assert_eq!(diagnostics.raise_or_warn(resolution()), Err(resolution()));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parse_errors_are_always_fatal() {
        let mut diagnostics = Diagnostics::new(Strictness::Warn);
        let error = PlannerError::Parse {
            field: "count".to_string(),
            value: "two".to_string(),
            row: "row 3".to_string(),
        };
        assert!(diagnostics.raise_or_warn(error).is_err());
        assert!(diagnostics
            .raise_or_warn(PlannerError::LookupNotYetBuilt("ingredients".to_string()))
            .is_err());
    }

    #[test]
    fn test_structural_message_lists_rows() {
        let error = PlannerError::Structural {
            kind: "menu item".to_string(),
            rows: vec!["row 1".to_string(), "row 2".to_string()],
        };
        assert_eq!(error.to_string(), "Invalid menu item rows:\nrow 1\nrow 2");
    }
}
