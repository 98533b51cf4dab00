// ==========================================
// Dryer Sequencer - Transition Cost Table
// ==========================================
// Lookup-backed cost model: a precomputed matrix of changeover costs
// keyed by ordered (from, to) product pair, typically built offline
// from historical energy/wagon data.
// ==========================================
// Policy: a missing pair is an error, never an implicit zero cost
// (an implicit zero would corrupt the optimization objective).
// ==========================================

use crate::cost::model::CostModel;
use crate::domain::job::Job;
use crate::domain::types::CostValue;
use crate::error::{OptimizerError, OptimizerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// TransitionTable
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionTable {
    // BTreeMap keeps serialization order stable for snapshot tests
    entries: BTreeMap<String, BTreeMap<String, CostValue>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert/overwrite the cost of running `to` immediately after `from`.
    ///
    /// # Errors
    /// - `CostModelViolation` on a self-pair or a negative cost
    pub fn insert(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        cost: CostValue,
    ) -> OptimizerResult<()> {
        let (from, to) = (from.into(), to.into());
        if from == to {
            return Err(OptimizerError::CostModelViolation(format!(
                "self-transition {} -> {} is not representable",
                from, to
            )));
        }
        if !cost.is_non_negative() {
            return Err(OptimizerError::CostModelViolation(format!(
                "negative transition cost for {} -> {}",
                from, to
            )));
        }
        self.entries.entry(from).or_default().insert(to, cost);
        Ok(())
    }

    /// Energy-only convenience insert (matrix entries in kWh).
    pub fn insert_energy(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        energy_kwh: f64,
    ) -> OptimizerResult<()> {
        self.insert(from, to, CostValue::energy(energy_kwh))
    }

    pub fn get(&self, from: &str, to: &str) -> Option<CostValue> {
        self.entries.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Products appearing as a row (transition source).
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Check that every ordered pair over `job_ids` is covered.
    ///
    /// # Returns
    /// The first missing pair, if any.
    pub fn missing_pair(&self, job_ids: &[String]) -> Option<(String, String)> {
        for from in job_ids {
            for to in job_ids {
                if from != to && self.get(from, to).is_none() {
                    return Some((from.clone(), to.clone()));
                }
            }
        }
        None
    }
}

impl CostModel for TransitionTable {
    fn transition_cost(&self, from: &Job, to: &Job) -> OptimizerResult<CostValue> {
        if from.job_id == to.job_id {
            return Err(OptimizerError::CostModelViolation(format!(
                "self-transition queried for job {}",
                from.job_id
            )));
        }

        match self.get(&from.job_id, &to.job_id) {
            Some(cost) => Ok(cost),
            None => {
                // Name the job the table does not know at all, if either;
                // otherwise the pair itself is the gap.
                let unknown = if !self.entries.contains_key(&from.job_id) {
                    &from.job_id
                } else {
                    &to.job_id
                };
                Err(OptimizerError::invalid_job(
                    unknown.clone(),
                    format!(
                        "no transition cost entry for {} -> {}",
                        from.job_id, to.job_id
                    ),
                ))
            }
        }
    }
}
