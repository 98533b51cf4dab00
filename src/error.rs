// ==========================================
// Dryer Sequencer - Core Error Types
// ==========================================
// Tooling: thiserror derive macro
// Policy: missing data is never silently substituted with a default
// cost; ambiguity always surfaces as an explicit error.
// Budget exhaustion is NOT an error - it is flagged in run metadata.
// ==========================================

use thiserror::Error;

/// Optimizer core error type (cost model + search engines + run assembly)
#[derive(Error, Debug)]
pub enum OptimizerError {
    // ===== Job set errors =====
    #[error("invalid job: {job_id} is not part of the current run's job set ({context})")]
    InvalidJob { job_id: String, context: String },

    #[error("duplicate job id in input: {job_id}")]
    DuplicateJob { job_id: String },

    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    // ===== Constraint errors =====
    #[error("infeasible constraints: {constraint} ({reason})")]
    InfeasibleConstraints { constraint: String, reason: String },

    // ===== Configuration errors =====
    #[error("invalid optimizer configuration: {0}")]
    InvalidConfig(String),

    // ===== Cost model errors =====
    #[error("cost model violation: {0}")]
    CostModelViolation(String),

    // ===== Generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OptimizerError {
    /// Shorthand used by cost model backends.
    pub fn invalid_job(job_id: impl Into<String>, context: impl Into<String>) -> Self {
        OptimizerError::InvalidJob {
            job_id: job_id.into(),
            context: context.into(),
        }
    }

    pub fn infeasible(constraint: impl ToString, reason: impl Into<String>) -> Self {
        OptimizerError::InfeasibleConstraints {
            constraint: constraint.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for the optimizer core
pub type OptimizerResult<T> = Result<T, OptimizerError>;
