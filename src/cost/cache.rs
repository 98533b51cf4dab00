// ==========================================
// Dryer Sequencer - Per-Run Cost Cache
// ==========================================
// Explicitly owned memoization of the cost model over one run's job
// set: every (from, to) pair and every intrinsic cost is evaluated
// once, scalarized under the run's weighting, and stored in a dense
// n x n matrix. Lifecycle is scoped to the run that owns it - never
// an unscoped global.
// ==========================================

use crate::cost::model::CostModel;
use crate::domain::job::JobSet;
use crate::domain::types::{CostValue, CostWeighting};
use crate::error::{OptimizerError, OptimizerResult};

// ==========================================
// CostCache
// ==========================================
#[derive(Debug, Clone)]
pub struct CostCache {
    n: usize,
    weighting: CostWeighting,

    // Dense row-major n x n; the diagonal is never read.
    transition: Vec<CostValue>,
    transition_scalar: Vec<f64>,

    intrinsic: Vec<CostValue>,
    intrinsic_total: CostValue,
    intrinsic_total_scalar: f64,

    // min over i != j of scalar transition(i, j); admissible-bound input
    min_incoming: Vec<f64>,
}

impl CostCache {
    /// Evaluate the model over the whole job set.
    ///
    /// # Errors
    /// - propagates `InvalidJob` from the model
    /// - `CostModelViolation` if any evaluated cost is negative
    pub fn build(
        job_set: &JobSet,
        model: &dyn CostModel,
        weighting: CostWeighting,
    ) -> OptimizerResult<Self> {
        let n = job_set.len();
        let jobs = job_set.jobs();

        let mut intrinsic = Vec::with_capacity(n);
        let mut intrinsic_total = CostValue::ZERO;
        for job in jobs {
            let cost = model.intrinsic_cost(job)?;
            if !cost.is_non_negative() {
                return Err(OptimizerError::CostModelViolation(format!(
                    "negative intrinsic cost for job {}",
                    job.job_id
                )));
            }
            intrinsic_total += cost;
            intrinsic.push(cost);
        }

        let mut transition = vec![CostValue::ZERO; n * n];
        let mut transition_scalar = vec![0.0; n * n];
        for (i, from) in jobs.iter().enumerate() {
            for (j, to) in jobs.iter().enumerate() {
                if i == j {
                    continue;
                }
                let cost = model.transition_cost(from, to)?;
                if !cost.is_non_negative() {
                    return Err(OptimizerError::CostModelViolation(format!(
                        "negative transition cost for {} -> {}",
                        from.job_id, to.job_id
                    )));
                }
                transition[i * n + j] = cost;
                transition_scalar[i * n + j] = cost.scalar(&weighting);
            }
        }

        let mut min_incoming = vec![0.0; n];
        for j in 0..n {
            let mut min = f64::INFINITY;
            for i in 0..n {
                if i != j {
                    min = min.min(transition_scalar[i * n + j]);
                }
            }
            min_incoming[j] = if min.is_finite() { min } else { 0.0 };
        }

        let intrinsic_total_scalar = intrinsic_total.scalar(&weighting);

        Ok(Self {
            n,
            weighting,
            transition,
            transition_scalar,
            intrinsic,
            intrinsic_total,
            intrinsic_total_scalar,
            min_incoming,
        })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn weighting(&self) -> &CostWeighting {
        &self.weighting
    }

    /// Scalar transition cost from set-index `i` to set-index `j`.
    #[inline]
    pub fn transition(&self, i: usize, j: usize) -> f64 {
        debug_assert_ne!(i, j, "self-transition is not part of the model");
        self.transition_scalar[i * self.n + j]
    }

    /// Full energy/time transition cost from `i` to `j`.
    #[inline]
    pub fn transition_value(&self, i: usize, j: usize) -> CostValue {
        self.transition[i * self.n + j]
    }

    pub fn intrinsic_value(&self, i: usize) -> CostValue {
        self.intrinsic[i]
    }

    pub fn intrinsic_total(&self) -> CostValue {
        self.intrinsic_total
    }

    pub fn intrinsic_total_scalar(&self) -> f64 {
        self.intrinsic_total_scalar
    }

    /// Cheapest scalar way into job `j` from any other job.
    #[inline]
    pub fn min_incoming(&self, j: usize) -> f64 {
        self.min_incoming[j]
    }

    /// Scalar transition total of an order over set indices.
    pub fn order_transition_scalar(&self, order: &[usize]) -> f64 {
        order
            .windows(2)
            .map(|w| self.transition(w[0], w[1]))
            .sum()
    }

    /// Full energy/time transition total of an order.
    pub fn order_transition_value(&self, order: &[usize]) -> CostValue {
        let mut total = CostValue::ZERO;
        for w in order.windows(2) {
            total += self.transition_value(w[0], w[1]);
        }
        total
    }

    /// Complete sequence cost (intrinsic + transitions) of an order.
    pub fn order_cost_value(&self, order: &[usize]) -> CostValue {
        self.intrinsic_total + self.order_transition_value(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::table::TransitionTable;
    use crate::domain::job::Job;

    fn job(id: &str, energy: f64) -> Job {
        Job {
            job_id: id.to_string(),
            material_family: "L".to_string(),
            recipe_class: None,
            thickness_mm: 30.0,
            target_moisture_pct: None,
            temperature_c: None,
            intrinsic_energy_kwh: energy,
            intrinsic_duration_h: 1.0,
            specific_energy_kwh_per_m3: None,
            wagons: None,
        }
    }

    fn cache() -> CostCache {
        let set = JobSet::new(vec![job("A", 10.0), job("B", 20.0), job("C", 30.0)]).unwrap();
        let mut table = TransitionTable::new();
        for (from, to, c) in [
            ("A", "B", 1.0),
            ("B", "A", 2.0),
            ("A", "C", 3.0),
            ("C", "A", 4.0),
            ("B", "C", 5.0),
            ("C", "B", 6.0),
        ] {
            table.insert_energy(from, to, c).unwrap();
        }
        CostCache::build(&set, &table, CostWeighting::default()).unwrap()
    }

    #[test]
    fn transition_lookup_matches_table() {
        let cache = cache();
        // indices follow lexicographic id order: A=0, B=1, C=2
        assert_eq!(cache.transition(0, 1), 1.0);
        assert_eq!(cache.transition(2, 1), 6.0);
    }

    #[test]
    fn min_incoming_is_cheapest_way_in() {
        let cache = cache();
        assert_eq!(cache.min_incoming(0), 2.0); // B->A beats C->A
        assert_eq!(cache.min_incoming(2), 3.0); // A->C beats B->C
    }

    #[test]
    fn order_costs_accumulate() {
        let cache = cache();
        let order = [0, 1, 2]; // A -> B -> C
        assert_eq!(cache.order_transition_scalar(&order), 6.0);
        let full = cache.order_cost_value(&order);
        assert_eq!(full.energy_kwh, 60.0 + 6.0);
        assert_eq!(full.time_h, 3.0);
    }

    #[test]
    fn missing_table_entry_propagates_invalid_job() {
        let set = JobSet::new(vec![job("A", 0.0), job("B", 0.0)]).unwrap();
        let mut table = TransitionTable::new();
        table.insert_energy("A", "B", 1.0).unwrap();
        // B -> A missing
        let err = CostCache::build(&set, &table, CostWeighting::default()).unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidJob { .. }));
    }
}
