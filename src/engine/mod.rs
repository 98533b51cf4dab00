// ==========================================
// Dryer Sequencer - Engine Layer
// ==========================================
// Responsibility: the sequencing search itself - budget accounting,
// compiled constraint checks, exact branch-and-bound, the greedy
// lookahead heuristic, reference orders, and the run orchestrator.
// Engines are stateless; every run starts from a fresh snapshot.
// ==========================================

pub mod baseline;
pub mod budget;
pub mod constraints;
pub mod exact;
pub mod heuristic;
pub mod orchestrator;

pub use budget::{BudgetMeter, SearchBudget};
pub use constraints::ConstraintChecker;
pub use exact::{ExactSearch, MAX_EXACT_JOBS};
pub use heuristic::HeuristicSearch;
pub use orchestrator::{
    OptimizationRun, RunMetadata, SequenceOptimizer, TransitionBreakdown,
};
