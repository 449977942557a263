//! Compilation failure kinds.

use thiserror::Error;

use crate::network::RuleError;

/// Reasons a network compilation is reported as failed.
///
/// A failure does not always mean there is nothing to look at: for
/// `MissingParameters` and `MalformedRule` the compiler still produces a
/// best-effort model (see [`crate::compiler::CompileOutcome`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Some reactions or species had blank or non-numeric parameters and were
    /// given defaults
    #[error(
        "Reaction or species parameters may be missing ({} reactions, {} species defaulted)",
        .reactions.len(),
        .species.len()
    )]
    MissingParameters {
        /// `"<reactionID>: <rule>"` entries
        reactions: Vec<String>,
        /// Species identifiers
        species: Vec<String>,
    },

    /// Two or more species share an identifier
    #[error("Duplicate species detected: {}", .0.join(", "))]
    DuplicateSpecies(Vec<String>),

    /// A reaction rule could not be parsed
    #[error("Malformed rule for reaction {reaction} ('{rule}'): {reason}")]
    MalformedRule {
        reaction: String,
        rule: String,
        reason: RuleError,
    },
}

impl CompileError {
    /// Whether a caller may still run the defaulted model
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CompileError::MissingParameters { .. })
    }

    /// Ordering used when several failures apply; lower wins
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            CompileError::DuplicateSpecies(_) => 0,
            CompileError::MalformedRule { .. } => 1,
            CompileError::MissingParameters { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CompileError::DuplicateSpecies(vec!["A".into(), "B".into()]);
        assert_eq!(err.to_string(), "Duplicate species detected: A, B");

        let err = CompileError::MissingParameters {
            reactions: vec!["r1: A => B".into()],
            species: vec![],
        };
        assert!(err.to_string().contains("1 reactions"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_precedence() {
        let dup = CompileError::DuplicateSpecies(vec![]);
        let missing = CompileError::MissingParameters {
            reactions: vec![],
            species: vec![],
        };
        assert!(dup.precedence() < missing.precedence());
        assert!(!dup.is_recoverable());
    }
}
