// ==========================================
// Dryer Sequencer - Domain Layer
// ==========================================
// Entities and value types of the optimizer core.
// Jobs are created upstream and handed in read-only; the optimizer
// never mutates them.
// ==========================================

pub mod constraint;
pub mod job;
pub mod sequence;
pub mod types;

// Re-export core types
pub use constraint::SequenceConstraint;
pub use job::{Job, JobSet};
pub use sequence::Sequence;
pub use types::{CostValue, CostWeighting, OptimizerMode, SearchOutcome};
