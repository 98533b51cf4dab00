// ==========================================
// Dryer Sequencer - Heuristic Search Engine
// ==========================================
// For job counts beyond exact range. Two phases:
// 1) Construction: nearest-neighbor append starting from the thinnest
//    product, scoring each candidate by its immediate transition cost
//    plus a dampened one-step lookahead (cheapest onward move x 0.3).
// 2) Improvement: local search over pairwise swaps and segment
//    reversals, accepting only strict cost reductions, until a full
//    pass finds no improving move or the budget expires.
// The result is a local optimum, not a proven global one; the run
// metadata marks it heuristic.
// ==========================================

use crate::cost::cache::CostCache;
use crate::domain::job::JobSet;
use crate::engine::budget::BudgetMeter;
use crate::engine::constraints::ConstraintChecker;
use crate::engine::exact::COST_EPS;
use tracing::{debug, instrument};

// Dampening on the one-step lookahead during construction
const LOOKAHEAD_FACTOR: f64 = 0.3;

// ==========================================
// HeuristicOutcome
// ==========================================
#[derive(Debug, Clone)]
pub struct HeuristicOutcome {
    /// Best order found (set indices); None if construction could not
    /// produce any constraint-feasible sequence.
    pub best_order: Option<Vec<usize>>,
    /// Transition-only scalar cost of the best order.
    pub best_transition_scalar: f64,
    /// Transition cost of the construction seed, before local search.
    pub seed_transition_scalar: f64,
    /// Moves/nodes evaluated.
    pub nodes_explored: u64,
    pub budget_exhausted: bool,
}

// ==========================================
// HeuristicSearch
// ==========================================
pub struct HeuristicSearch {
    // stateless engine
}

impl HeuristicSearch {
    pub fn new() -> Self {
        Self {}
    }

    /// Construct and improve a sequence within the budget.
    #[instrument(skip_all, fields(jobs = cache.len()))]
    pub fn search(
        &self,
        job_set: &JobSet,
        cache: &CostCache,
        checker: &ConstraintChecker,
        meter: &mut BudgetMeter,
    ) -> HeuristicOutcome {
        let Some(seed) = self.construct(job_set, cache, checker, meter) else {
            return HeuristicOutcome {
                best_order: None,
                best_transition_scalar: f64::INFINITY,
                seed_transition_scalar: f64::INFINITY,
                nodes_explored: meter.iterations(),
                budget_exhausted: meter.is_exhausted(),
            };
        };

        let seed_cost = cache.order_transition_scalar(&seed);
        let (improved, improved_cost) = self.improve(seed, seed_cost, cache, checker, meter);

        debug!(
            seed_cost,
            improved_cost,
            exhausted = meter.is_exhausted(),
            "heuristic search finished"
        );

        HeuristicOutcome {
            best_order: Some(improved),
            best_transition_scalar: improved_cost,
            seed_transition_scalar: seed_cost,
            nodes_explored: meter.iterations(),
            budget_exhausted: meter.is_exhausted(),
        }
    }

    // ==========================================
    // Phase 1: greedy construction
    // ==========================================

    /// Nearest-neighbor insertion with lookahead. Falls back to a
    /// depth-first feasibility completion when the greedy tail has no
    /// placeable job left (possible under adjacency exclusions).
    fn construct(
        &self,
        job_set: &JobSet,
        cache: &CostCache,
        checker: &ConstraintChecker,
        meter: &mut BudgetMeter,
    ) -> Option<Vec<usize>> {
        let n = cache.len();
        if n == 0 {
            return Some(Vec::new());
        }
        let mut order: Vec<usize> = Vec::with_capacity(n);
        let mut placed = vec![false; n];

        // Start with the pinned first job if any, otherwise the
        // thinnest product (gradual thickness ramp-up).
        let start = match checker.fixed_at(0) {
            Some(j) => j,
            None => self.thinnest_placeable(job_set, checker),
        };
        if !checker.can_place(0, start, |j| placed[j], None) {
            return self.complete_by_backtracking(&order, &placed, checker, meter, n);
        }
        order.push(start);
        placed[start] = true;

        while order.len() < n {
            meter.tick();
            let position = order.len();
            let current = *order.last().expect("non-empty order");

            let mut best: Option<(usize, f64)> = None;
            for next in 0..n {
                if placed[next] || !checker.can_place(position, next, |j| placed[j], Some(current))
                {
                    continue;
                }

                let immediate = cache.transition(current, next);

                // lookahead: cheapest onward move after taking `next`
                let mut future = f64::INFINITY;
                for fp in 0..n {
                    if fp != next && !placed[fp] {
                        future = future.min(cache.transition(next, fp));
                    }
                }
                let score = if future.is_finite() {
                    immediate + future * LOOKAHEAD_FACTOR
                } else {
                    immediate
                };

                let better = match best {
                    None => true,
                    Some((_, s)) => score + COST_EPS < s,
                };
                if better {
                    best = Some((next, score));
                }
            }

            match best {
                Some((next, _)) => {
                    order.push(next);
                    placed[next] = true;
                }
                None => {
                    // Greedy dead end; try to complete feasibly.
                    return self.complete_by_backtracking(&order, &placed, checker, meter, n);
                }
            }
        }

        Some(order)
    }

    // Lowest-thickness job that may legally open the sequence; ties go
    // to the smaller set index (lexicographic id).
    fn thinnest_placeable(&self, job_set: &JobSet, checker: &ConstraintChecker) -> usize {
        let mut best = 0usize;
        let mut best_thickness = f64::INFINITY;
        for (i, job) in job_set.jobs().iter().enumerate() {
            if !checker.can_place(0, i, |_| false, None) {
                continue;
            }
            if job.thickness_mm < best_thickness {
                best_thickness = job.thickness_mm;
                best = i;
            }
        }
        best
    }

    // Plain DFS completion in index order; ignores cost, only seeks
    // feasibility. Budget-bounded. If the greedy prefix itself is a
    // trap, the search restarts from an empty prefix.
    fn complete_by_backtracking(
        &self,
        prefix: &[usize],
        placed: &[bool],
        checker: &ConstraintChecker,
        meter: &mut BudgetMeter,
        n: usize,
    ) -> Option<Vec<usize>> {
        let mut order = prefix.to_vec();
        let mut placed = placed.to_vec();
        if self.dfs_complete(&mut order, &mut placed, checker, meter, n) {
            return Some(order);
        }

        if !prefix.is_empty() && !meter.is_exhausted() {
            let mut order = Vec::with_capacity(n);
            let mut placed = vec![false; n];
            if self.dfs_complete(&mut order, &mut placed, checker, meter, n) {
                return Some(order);
            }
        }
        None
    }

    fn dfs_complete(
        &self,
        order: &mut Vec<usize>,
        placed: &mut Vec<bool>,
        checker: &ConstraintChecker,
        meter: &mut BudgetMeter,
        n: usize,
    ) -> bool {
        if order.len() == n {
            return true;
        }
        if meter.tick() {
            return false;
        }

        let position = order.len();
        let last = order.last().copied();
        for j in 0..n {
            if placed[j] || !checker.can_place(position, j, |i| placed[i], last) {
                continue;
            }
            order.push(j);
            placed[j] = true;
            if self.dfs_complete(order, placed, checker, meter, n) {
                return true;
            }
            order.pop();
            placed[j] = false;
        }
        false
    }

    // ==========================================
    // Phase 2: local search
    // ==========================================

    /// Strict-improvement local search with swap and segment-reversal
    /// moves. Returns the improved order and its transition cost.
    fn improve(
        &self,
        mut order: Vec<usize>,
        mut cost: f64,
        cache: &CostCache,
        checker: &ConstraintChecker,
        meter: &mut BudgetMeter,
    ) -> (Vec<usize>, f64) {
        let n = order.len();
        if n < 3 {
            return (order, cost);
        }

        let mut improved = true;
        while improved && !meter.is_exhausted() {
            improved = false;

            'moves: for i in 0..n - 1 {
                for j in i + 1..n {
                    // pairwise swap
                    if meter.tick() {
                        break 'moves;
                    }
                    order.swap(i, j);
                    let swap_cost = cache.order_transition_scalar(&order);
                    if swap_cost + COST_EPS < cost && checker.is_order_valid(&order) {
                        cost = swap_cost;
                        improved = true;
                        continue 'moves;
                    }
                    order.swap(i, j); // undo

                    // segment reversal (2-opt)
                    if j > i + 1 {
                        if meter.tick() {
                            break 'moves;
                        }
                        order[i..=j].reverse();
                        let rev_cost = cache.order_transition_scalar(&order);
                        if rev_cost + COST_EPS < cost && checker.is_order_valid(&order) {
                            cost = rev_cost;
                            improved = true;
                            continue 'moves;
                        }
                        order[i..=j].reverse(); // undo
                    }
                }
            }
        }

        (order, cost)
    }
}

impl Default for HeuristicSearch {
    fn default() -> Self {
        Self::new()
    }
}
