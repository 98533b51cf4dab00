// ==========================================
// Dryer Sequencer - Exact Search Engine
// ==========================================
// Branch-and-bound over permutations, driven by an explicit work
// stack of partial-sequence frames (remaining jobs, accumulated
// transition cost, partial order). Guarantees the global optimum for
// the given cost model when it runs to completion.
// ==========================================
// Bound: accumulated cost + sum of cheapest incoming transitions of
// the remaining jobs (admissible, never overestimates).
// Tie-break: frames are expanded in lexicographic job-id order, so the
// first incumbent among equal-cost sequences is the lexicographic
// minimum; later ties never replace it.
// ==========================================

use crate::cost::cache::CostCache;
use crate::engine::budget::BudgetMeter;
use crate::engine::constraints::ConstraintChecker;
use tracing::{debug, instrument};

// Absolute tolerance for float cost comparisons
pub(crate) const COST_EPS: f64 = 1e-9;

// Exact search encodes the remaining set as a u64 bitmask
pub const MAX_EXACT_JOBS: usize = 64;

// ==========================================
// ExactOutcome
// ==========================================
#[derive(Debug, Clone)]
pub struct ExactOutcome {
    /// Best complete order found (set indices); None if no feasible
    /// sequence was encountered.
    pub best_order: Option<Vec<usize>>,
    /// Transition-only scalar cost of the best order.
    pub best_transition_scalar: f64,
    /// Frames expanded.
    pub nodes_explored: u64,
    /// True if the budget expired before the search space was exhausted.
    pub budget_exhausted: bool,
}

// Partial-sequence state on the work stack
struct Frame {
    order: Vec<usize>,
    remaining: u64,
    transition_scalar: f64,
}

// ==========================================
// ExactSearch
// ==========================================
pub struct ExactSearch {
    // stateless engine
}

impl ExactSearch {
    pub fn new() -> Self {
        Self {}
    }

    /// Run branch-and-bound over the whole permutation space.
    ///
    /// # Arguments
    /// - `cache`: per-run cost matrix
    /// - `checker`: compiled hard constraints
    /// - `meter`: running budget; on expiry the best-so-far is returned
    /// - `first`: pin the first position to this set index (parallel
    ///   dispatch seeds one worker per feasible first job)
    #[instrument(skip(self, cache, checker, meter), fields(jobs = cache.len(), first = ?first))]
    pub fn search(
        &self,
        cache: &CostCache,
        checker: &ConstraintChecker,
        meter: &mut BudgetMeter,
        first: Option<usize>,
    ) -> ExactOutcome {
        let n = cache.len();
        debug_assert!(n <= MAX_EXACT_JOBS);

        let full: u64 = if n == 64 { u64::MAX } else { (1u64 << n) - 1 };

        let mut best_order: Option<Vec<usize>> = None;
        let mut best_cost = f64::INFINITY;
        let mut nodes: u64 = 0;

        let mut stack: Vec<Frame> = Vec::new();
        self.push_children(
            &mut stack,
            &Frame {
                order: Vec::new(),
                remaining: full,
                transition_scalar: 0.0,
            },
            cache,
            checker,
            best_cost,
            first,
        );

        while let Some(frame) = stack.pop() {
            nodes += 1;
            if meter.tick() {
                break;
            }

            if frame.remaining == 0 {
                // Complete sequence. Lex-order expansion guarantees the
                // incumbent is the lexicographic minimum among ties.
                if frame.transition_scalar + COST_EPS < best_cost {
                    best_cost = frame.transition_scalar;
                    best_order = Some(frame.order);
                }
                continue;
            }

            // Re-check the bound against the incumbent found since push
            if self.lower_bound(&frame, cache) + COST_EPS >= best_cost {
                continue;
            }

            self.push_children(&mut stack, &frame, cache, checker, best_cost, None);
        }

        debug!(
            nodes,
            best_cost,
            feasible = best_order.is_some(),
            exhausted = meter.is_exhausted(),
            "exact search finished"
        );

        ExactOutcome {
            best_order,
            best_transition_scalar: best_cost,
            nodes_explored: nodes,
            budget_exhausted: meter.is_exhausted(),
        }
    }

    // Accumulated cost plus the cheapest possible way into every
    // remaining job; admissible for non-negative transition costs.
    fn lower_bound(&self, frame: &Frame, cache: &CostCache) -> f64 {
        let mut bound = frame.transition_scalar;
        let mut remaining = frame.remaining;
        while remaining != 0 {
            let j = remaining.trailing_zeros() as usize;
            remaining &= remaining - 1;
            bound += cache.min_incoming(j);
        }
        bound
    }

    // Push all feasible one-job extensions of `frame`. Children are
    // pushed in reverse index order so the lexicographically smallest
    // extension is expanded first (LIFO stack).
    fn push_children(
        &self,
        stack: &mut Vec<Frame>,
        frame: &Frame,
        cache: &CostCache,
        checker: &ConstraintChecker,
        best_cost: f64,
        force_first: Option<usize>,
    ) {
        let position = frame.order.len();
        let last = frame.order.last().copied();
        let placed = |j: usize| frame.remaining & (1u64 << j) == 0;

        let candidates: Vec<usize> = (0..cache.len())
            .filter(|&j| frame.remaining & (1u64 << j) != 0)
            .filter(|&j| force_first.map_or(true, |f| f == j))
            .filter(|&j| checker.can_place(position, j, placed, last))
            .collect();

        for &j in candidates.iter().rev() {
            let step = match last {
                Some(i) => cache.transition(i, j),
                None => 0.0,
            };
            let cost = frame.transition_scalar + step;

            // Cheap pre-push prune with the same admissible bound
            let mut child_bound = cost;
            let mut rest = frame.remaining & !(1u64 << j);
            while rest != 0 {
                let r = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                child_bound += cache.min_incoming(r);
            }
            if child_bound + COST_EPS >= best_cost {
                continue;
            }

            let mut order = Vec::with_capacity(position + 1);
            order.extend_from_slice(&frame.order);
            order.push(j);

            stack.push(Frame {
                order,
                remaining: frame.remaining & !(1u64 << j),
                transition_scalar: cost,
            });
        }
    }
}

impl Default for ExactSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::table::TransitionTable;
    use crate::domain::job::{Job, JobSet};
    use crate::domain::types::CostWeighting;
    use crate::engine::budget::SearchBudget;

    fn job(id: &str) -> Job {
        Job {
            job_id: id.to_string(),
            material_family: "L".to_string(),
            recipe_class: None,
            thickness_mm: 30.0,
            target_moisture_pct: None,
            temperature_c: None,
            intrinsic_energy_kwh: 0.0,
            intrinsic_duration_h: 0.0,
            specific_energy_kwh_per_m3: None,
            wagons: None,
        }
    }

    /// Cycle A->B->C->D->A at cost 1, every other pair at cost 10.
    fn cycle_fixture() -> (JobSet, CostCache) {
        let set = JobSet::new(vec![job("A"), job("B"), job("C"), job("D")]).unwrap();
        let mut table = TransitionTable::new();
        let cheap = [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")];
        for from in ["A", "B", "C", "D"] {
            for to in ["A", "B", "C", "D"] {
                if from == to {
                    continue;
                }
                let cost = if cheap.contains(&(from, to)) { 1.0 } else { 10.0 };
                table.insert_energy(from, to, cost).unwrap();
            }
        }
        let cache = CostCache::build(&set, &table, CostWeighting::default()).unwrap();
        (set, cache)
    }

    #[test]
    fn recovers_cheap_cycle_rotation() {
        let (set, cache) = cycle_fixture();
        let checker = ConstraintChecker::compile(&set, &[]).unwrap();
        let mut meter = SearchBudget::unlimited().start();

        let outcome = ExactSearch::new().search(&cache, &checker, &mut meter, None);
        let order = outcome.best_order.unwrap();

        // Transition total 3 along the open path of the cheap cycle
        assert!((outcome.best_transition_scalar - 3.0).abs() < 1e-9);
        // Lexicographic tie-break: A B C D beats the other rotations
        let ids: Vec<&str> = order.iter().map(|&i| set.get(i).job_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "D"]);
        assert!(!outcome.budget_exhausted);
    }

    #[test]
    fn deterministic_across_repeated_runs() {
        let (set, cache) = cycle_fixture();
        let checker = ConstraintChecker::compile(&set, &[]).unwrap();

        let mut first_run = None;
        for _ in 0..5 {
            let mut meter = SearchBudget::unlimited().start();
            let outcome = ExactSearch::new().search(&cache, &checker, &mut meter, None);
            let order = outcome.best_order.unwrap();
            match &first_run {
                None => first_run = Some(order),
                Some(expected) => assert_eq!(&order, expected),
            }
        }
    }

    #[test]
    fn uniform_costs_yield_lexicographic_order() {
        let set = JobSet::new(vec![job("C"), job("A"), job("B")]).unwrap();
        let mut table = TransitionTable::new();
        for from in ["A", "B", "C"] {
            for to in ["A", "B", "C"] {
                if from != to {
                    table.insert_energy(from, to, 5.0).unwrap();
                }
            }
        }
        let cache = CostCache::build(&set, &table, CostWeighting::default()).unwrap();
        let checker = ConstraintChecker::compile(&set, &[]).unwrap();
        let mut meter = SearchBudget::unlimited().start();

        let outcome = ExactSearch::new().search(&cache, &checker, &mut meter, None);
        assert_eq!(outcome.best_order.unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn pinned_first_job_restricts_root() {
        let (set, cache) = cycle_fixture();
        let checker = ConstraintChecker::compile(&set, &[]).unwrap();
        let mut meter = SearchBudget::unlimited().start();

        // Force C (index 2) first: best is the rotation C D A B
        let outcome = ExactSearch::new().search(&cache, &checker, &mut meter, Some(2));
        let order = outcome.best_order.unwrap();
        assert_eq!(order[0], 2);
        assert!((outcome.best_transition_scalar - 3.0).abs() < 1e-9);
    }

    #[test]
    fn exhausted_budget_is_flagged() {
        let (set, cache) = cycle_fixture();
        let checker = ConstraintChecker::compile(&set, &[]).unwrap();
        let mut meter = SearchBudget {
            time_budget: None,
            iteration_budget: Some(2),
        }
        .start();

        let outcome = ExactSearch::new().search(&cache, &checker, &mut meter, None);
        assert!(outcome.budget_exhausted);
    }

    #[test]
    fn single_pair_exclusion_forces_detour() {
        let set = JobSet::new(vec![job("A"), job("B"), job("C")]).unwrap();
        let mut table = TransitionTable::new();
        for from in ["A", "B", "C"] {
            for to in ["A", "B", "C"] {
                if from != to {
                    table.insert_energy(from, to, 1.0).unwrap();
                }
            }
        }
        // make A->B the uniquely cheap edge, but forbid the adjacency
        table.insert_energy("A", "B", 0.1).unwrap();
        let cache = CostCache::build(&set, &table, CostWeighting::default()).unwrap();
        let checker = ConstraintChecker::compile(
            &set,
            &[crate::domain::constraint::SequenceConstraint::MutuallyExclusive {
                a: "A".to_string(),
                b: "B".to_string(),
            }],
        )
        .unwrap();
        let mut meter = SearchBudget::unlimited().start();

        let outcome = ExactSearch::new().search(&cache, &checker, &mut meter, None);
        let order = outcome.best_order.unwrap();
        // A and B never adjacent
        for w in order.windows(2) {
            assert!(!(w.contains(&0) && w.contains(&1)));
        }
    }

    #[test]
    fn two_jobs_with_mutual_exclusion_is_infeasible() {
        let set = JobSet::new(vec![job("A"), job("B")]).unwrap();
        let mut table = TransitionTable::new();
        table.insert_energy("A", "B", 1.0).unwrap();
        table.insert_energy("B", "A", 1.0).unwrap();
        let cache = CostCache::build(&set, &table, CostWeighting::default()).unwrap();
        let checker = ConstraintChecker::compile(
            &set,
            &[crate::domain::constraint::SequenceConstraint::MutuallyExclusive {
                a: "A".to_string(),
                b: "B".to_string(),
            }],
        )
        .unwrap();
        let mut meter = SearchBudget::unlimited().start();

        let outcome = ExactSearch::new().search(&cache, &checker, &mut meter, None);
        assert!(outcome.best_order.is_none());
        assert!(!outcome.budget_exhausted);
    }
}
