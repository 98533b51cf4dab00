// ==========================================
// Dryer Sequencer - Report Builder
// ==========================================
// Turns a finished OptimizationRun into the operator-facing report:
// ordered job list, per-transition breakdown, savings versus the
// submitted order and the alternating worst case, and plain-language
// recommendations. All figures are rounded here so exported snapshots
// stay stable across runs.
// ==========================================

use crate::domain::job::Job;
use crate::domain::types::CostValue;
use crate::engine::orchestrator::OptimizationRun;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Transitions above this energy are flagged for review
pub const HIGH_TRANSITION_KWH: f64 = 100.0;
/// Specific energy above this marks a job as energy-intensive
pub const ENERGY_INTENSIVE_KWH_PER_M3: f64 = 100.0;
/// Weekly wagon volume above this marks a high-volume product
pub const HIGH_VOLUME_WAGONS: u32 = 100;

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ==========================================
// Report shapes
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportJob {
    pub position: usize,
    pub job_id: String,
    pub material_family: String,
    pub thickness_mm: f64,
    pub intrinsic_energy_kwh: f64,
    pub intrinsic_duration_h: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionDetail {
    pub from: String,
    pub to: String,
    pub energy_kwh: f64,
    pub time_h: f64,
    pub thickness_delta_mm: f64,
    pub family_change: bool,
    pub specific_energy_delta: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub mode: String,
    pub outcome: String,
    pub nodes_explored: u64,
    pub elapsed_ms: u64,

    pub sequence: Vec<ReportJob>,
    pub transitions: Vec<TransitionDetail>,

    pub total_cost: CostValue,
    pub transition_cost: CostValue,
    pub baseline_cost: CostValue,
    pub worst_case_cost: CostValue,

    /// None when the baseline cost is zero (nothing to save against)
    pub savings_percent: Option<f64>,
    pub worst_case_savings_percent: Option<f64>,

    pub recommendations: Vec<String>,
}

// ==========================================
// ReportBuilder
// ==========================================
pub struct ReportBuilder;

impl ReportBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, run: &OptimizationRun) -> OptimizationReport {
        let sequence: Vec<ReportJob> = run
            .best_sequence
            .job_ids()
            .iter()
            .enumerate()
            .map(|(position, id)| {
                // Sequence ids always resolve; they came from this job set
                let idx = run.job_set.index_of(id).unwrap_or(0);
                let job = run.job_set.get(idx);
                ReportJob {
                    position: position + 1,
                    job_id: job.job_id.clone(),
                    material_family: job.material_family.clone(),
                    thickness_mm: round1(job.thickness_mm),
                    intrinsic_energy_kwh: round2(job.intrinsic_energy_kwh),
                    intrinsic_duration_h: round2(job.intrinsic_duration_h),
                }
            })
            .collect();

        let transitions: Vec<TransitionDetail> = run
            .transitions
            .iter()
            .map(|t| {
                let from = self.job_by_id(run, &t.from);
                let to = self.job_by_id(run, &t.to);
                TransitionDetail {
                    from: t.from.clone(),
                    to: t.to.clone(),
                    energy_kwh: round2(t.cost.energy_kwh),
                    time_h: round2(t.cost.time_h),
                    thickness_delta_mm: round1(to.thickness_mm - from.thickness_mm),
                    family_change: from.material_family != to.material_family,
                    specific_energy_delta: match (
                        from.specific_energy_kwh_per_m3,
                        to.specific_energy_kwh_per_m3,
                    ) {
                        (Some(a), Some(b)) => Some(round2(b - a)),
                        _ => None,
                    },
                }
            })
            .collect();

        let recommendations = self.recommendations(run, &transitions);

        debug!(
            transitions = transitions.len(),
            recommendations = recommendations.len(),
            "report assembled"
        );

        OptimizationReport {
            run_id: run.metadata.run_id.clone(),
            created_at: run.metadata.created_at,
            mode: run.metadata.mode.as_str().to_string(),
            outcome: run.metadata.outcome.to_string(),
            nodes_explored: run.metadata.nodes_explored,
            elapsed_ms: run.metadata.elapsed_ms,
            sequence,
            transitions,
            total_cost: CostValue::new(
                round2(run.best_cost.energy_kwh),
                round2(run.best_cost.time_h),
            ),
            transition_cost: CostValue::new(
                round2(run.best_transition_cost.energy_kwh),
                round2(run.best_transition_cost.time_h),
            ),
            baseline_cost: CostValue::new(
                round2(run.baseline_cost.energy_kwh),
                round2(run.baseline_cost.time_h),
            ),
            worst_case_cost: CostValue::new(
                round2(run.worst_case_cost.energy_kwh),
                round2(run.worst_case_cost.time_h),
            ),
            savings_percent: savings_percent(run.baseline_cost_scalar, run.best_cost_scalar),
            worst_case_savings_percent: savings_percent(
                run.worst_case_cost_scalar,
                run.best_cost_scalar,
            ),
            recommendations,
        }
    }

    fn job_by_id<'a>(&self, run: &'a OptimizationRun, id: &str) -> &'a Job {
        let idx = run.job_set.index_of(id).unwrap_or(0);
        run.job_set.get(idx)
    }

    fn recommendations(
        &self,
        run: &OptimizationRun,
        transitions: &[TransitionDetail],
    ) -> Vec<String> {
        let mut out = Vec::new();

        for t in transitions {
            if t.energy_kwh > HIGH_TRANSITION_KWH {
                out.push(format!(
                    "High-cost transition {} -> {} ({:.1} kWh): review whether an intermediate product can bridge the changeover",
                    t.from, t.to, t.energy_kwh
                ));
            }
            if t.family_change {
                out.push(format!(
                    "Material family changes between {} and {}: schedule a cleaning cycle",
                    t.from, t.to
                ));
            }
        }

        for &idx in run.job_set.submitted_order() {
            let job = run.job_set.get(idx);
            if let Some(specific) = job.specific_energy_kwh_per_m3 {
                if specific > ENERGY_INTENSIVE_KWH_PER_M3 {
                    out.push(format!(
                        "{} is energy-intensive ({:.1} kWh/m3): prefer off-peak tariff windows",
                        job.job_id, specific
                    ));
                }
            }
            if let Some(wagons) = job.wagons {
                if wagons > HIGH_VOLUME_WAGONS {
                    out.push(format!(
                        "{} runs {} wagons this cycle: consider splitting across shifts",
                        job.job_id, wagons
                    ));
                }
            }
        }

        out
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Percentage saved against a reference cost; None when the reference
/// is zero.
pub fn savings_percent(reference: f64, achieved: f64) -> Option<f64> {
    if reference.abs() < f64::EPSILON {
        None
    } else {
        Some(round2((reference - achieved) / reference * 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_stable() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(2.006), 2.01);
        assert_eq!(round1(33.06), 33.1);
    }

    #[test]
    fn zero_reference_gives_no_savings_figure() {
        assert_eq!(savings_percent(0.0, 0.0), None);
        assert_eq!(savings_percent(0.0, 10.0), None);
    }

    #[test]
    fn savings_are_relative_to_reference() {
        assert_eq!(savings_percent(200.0, 150.0), Some(25.0));
        assert_eq!(savings_percent(100.0, 100.0), Some(0.0));
        // A worse sequence than the reference reads as negative savings
        assert_eq!(savings_percent(100.0, 110.0), Some(-10.0));
    }
}
