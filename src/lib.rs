// ==========================================
// Dryer Sequencer - Core Library
// ==========================================
// Production sequence optimizer for an industrial dryer: orders
// pending jobs to minimize energy and changeover loss. Decision
// support only; the operator keeps final control of the plan.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Cost layer - transition/intrinsic cost models and the run cache
pub mod cost;

// Engine layer - search algorithms and the run orchestrator
pub mod engine;

// Configuration layer
pub mod config;

// Input layer - optimization database loading
pub mod dataset;

// Report layer - operator-facing output
pub mod report;

// Error types
pub mod error;

// Logging
pub mod logging;

// ==========================================
// Core re-exports
// ==========================================

// Domain types
pub use domain::constraint::SequenceConstraint;
pub use domain::job::{Job, JobSet};
pub use domain::sequence::Sequence;
pub use domain::types::{CostValue, CostWeighting, OptimizerMode, SearchOutcome};

// Cost models
pub use cost::{CostCache, CostModel, ProfileCostModel, TransitionTable};

// Engine
pub use engine::{
    OptimizationRun, RunMetadata, SearchBudget, SequenceOptimizer, TransitionBreakdown,
    MAX_EXACT_JOBS,
};

// Configuration
pub use config::{OptimizerConfig, DEFAULT_EXACT_THRESHOLD};

// Dataset
pub use dataset::{DatasetError, OptimizationDatabase};

// Report
pub use report::{OptimizationReport, ReportBuilder};

// Errors
pub use error::{OptimizerError, OptimizerResult};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "dryer-sequencer";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
