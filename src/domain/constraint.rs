// ==========================================
// Dryer Sequencer - Sequencing Constraints
// ==========================================
// Hard constraints the search must honor. Any candidate sequence
// violating one is rejected; an unsatisfiable set fails the run with
// InfeasibleConstraints naming the offending constraint.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// SequenceConstraint
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SequenceConstraint {
    /// `before` must occupy a strictly earlier position than `after`.
    Precedence { before: String, after: String },

    /// The job must sit at exactly this zero-based position
    /// (e.g. a batch already loaded into the dryer must run first).
    FixedPosition { job_id: String, position: usize },

    /// The two jobs must never run back to back, in either direction
    /// (incompatible changeover, mandatory cleaning cycle between them).
    MutuallyExclusive { a: String, b: String },
}

impl SequenceConstraint {
    /// Job ids referenced by this constraint.
    pub fn referenced_jobs(&self) -> Vec<&str> {
        match self {
            SequenceConstraint::Precedence { before, after } => vec![before, after],
            SequenceConstraint::FixedPosition { job_id, .. } => vec![job_id],
            SequenceConstraint::MutuallyExclusive { a, b } => vec![a, b],
        }
    }
}

impl fmt::Display for SequenceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceConstraint::Precedence { before, after } => {
                write!(f, "precedence({} before {})", before, after)
            }
            SequenceConstraint::FixedPosition { job_id, position } => {
                write!(f, "fixed_position({} at {})", job_id, position)
            }
            SequenceConstraint::MutuallyExclusive { a, b } => {
                write!(f, "mutually_exclusive({}, {})", a, b)
            }
        }
    }
}
