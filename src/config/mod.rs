// ==========================================
// Dryer Sequencer - Configuration Layer
// ==========================================
// Responsibility: the optimizer run configuration recognized by the
// public API: mode, exact/heuristic threshold, budgets, cost
// weighting, hard constraints. Serde-loadable so callers can persist
// profiles alongside their demand data.
// ==========================================

use crate::domain::constraint::SequenceConstraint;
use crate::domain::types::{CostWeighting, OptimizerMode};
use crate::engine::budget::SearchBudget;
use crate::error::{OptimizerError, OptimizerResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default job-count cut-over between exact and heuristic in auto mode
pub const DEFAULT_EXACT_THRESHOLD: usize = 10;

// ==========================================
// OptimizerConfig
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// exact | heuristic | auto
    #[serde(default)]
    pub mode: OptimizerMode,

    /// Auto mode runs exact at or below this job count
    #[serde(default = "default_exact_threshold")]
    pub exact_threshold: usize,

    /// Wall-clock budget in milliseconds (None = unlimited)
    #[serde(default)]
    pub time_budget_ms: Option<u64>,

    /// Search-iteration budget (None = unlimited)
    #[serde(default)]
    pub iteration_budget: Option<u64>,

    /// Energy/time scalarization weights
    #[serde(default)]
    pub weighting: CostWeighting,

    /// Hard sequencing constraints
    #[serde(default)]
    pub constraints: Vec<SequenceConstraint>,
}

fn default_exact_threshold() -> usize {
    DEFAULT_EXACT_THRESHOLD
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            mode: OptimizerMode::default(),
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            time_budget_ms: None,
            iteration_budget: None,
            weighting: CostWeighting::default(),
            constraints: Vec::new(),
        }
    }
}

impl OptimizerConfig {
    /// Validate before a run.
    ///
    /// # Errors
    /// `InvalidConfig` on non-positive weighting or a zero budget
    pub fn validate(&self) -> OptimizerResult<()> {
        if !self.weighting.is_valid() {
            return Err(OptimizerError::InvalidConfig(
                "cost weighting must be non-negative and not all zero".to_string(),
            ));
        }
        if self.iteration_budget == Some(0) {
            return Err(OptimizerError::InvalidConfig(
                "iteration budget of 0 would return no result".to_string(),
            ));
        }
        Ok(())
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    pub fn search_budget(&self) -> SearchBudget {
        SearchBudget {
            time_budget: self.time_budget(),
            iteration_budget: self.iteration_budget,
        }
    }

    /// Resolve `auto` against the actual job count.
    pub fn resolve_mode(&self, job_count: usize) -> OptimizerMode {
        match self.mode {
            OptimizerMode::Auto => {
                if job_count <= self.exact_threshold {
                    OptimizerMode::Exact
                } else {
                    OptimizerMode::Heuristic
                }
            }
            fixed => fixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_auto_with_threshold_ten() {
        let config = OptimizerConfig::default();
        assert_eq!(config.mode, OptimizerMode::Auto);
        assert_eq!(config.exact_threshold, 10);
        assert!(config.validate().is_ok());
        assert!(config.search_budget().is_unlimited());
    }

    #[test]
    fn auto_mode_resolves_by_job_count() {
        let config = OptimizerConfig::default();
        assert_eq!(config.resolve_mode(10), OptimizerMode::Exact);
        assert_eq!(config.resolve_mode(11), OptimizerMode::Heuristic);

        let fixed = OptimizerConfig {
            mode: OptimizerMode::Heuristic,
            ..Default::default()
        };
        assert_eq!(fixed.resolve_mode(2), OptimizerMode::Heuristic);
    }

    #[test]
    fn zero_iteration_budget_rejected() {
        let config = OptimizerConfig {
            iteration_budget: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_all_fields_defaulted() {
        let config: OptimizerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.mode, OptimizerMode::Auto);
        assert!(config.constraints.is_empty());
    }

    #[test]
    fn round_trips_constraints() {
        let config = OptimizerConfig {
            mode: OptimizerMode::Exact,
            constraints: vec![SequenceConstraint::Precedence {
                before: "A".to_string(),
                after: "C".to_string(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: OptimizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.constraints, config.constraints);
        assert_eq!(back.mode, OptimizerMode::Exact);
    }
}
