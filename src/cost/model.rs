// ==========================================
// Dryer Sequencer - Cost Model Contract
// ==========================================
// Contract (pure, deterministic within one run):
//   transition_cost(from, to) -> {energy, time}
//   intrinsic_cost(job)       -> {energy, time}
// The optimizer may query the same pair many times during search and
// relies on referential consistency for memoization.
// ==========================================

use crate::domain::job::Job;
use crate::domain::types::CostValue;
use crate::error::OptimizerResult;

// ==========================================
// CostModel - supplier seam
// ==========================================
// Backed by a precomputed table or a parametric estimate; the core is
// agnostic to the source and only requires this contract.
pub trait CostModel: Send + Sync {
    /// Extra energy/time incurred when `to` runs immediately after `from`.
    ///
    /// # Errors
    /// - `InvalidJob` if either job is outside the model's coverage
    /// - `CostModelViolation` for a self-transition (forbidden in the model)
    fn transition_cost(&self, from: &Job, to: &Job) -> OptimizerResult<CostValue>;

    /// Intrinsic processing cost of the job itself, independent of order.
    ///
    /// The default reads the cost profile carried on the job record.
    fn intrinsic_cost(&self, job: &Job) -> OptimizerResult<CostValue> {
        Ok(job.intrinsic_cost())
    }
}
