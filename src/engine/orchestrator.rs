// ==========================================
// Dryer Sequencer - Run Orchestrator
// ==========================================
// Coordinates one optimization request end to end: job-set snapshot,
// cost cache build, constraint compilation, mode routing, search
// dispatch, and assembly of the immutable OptimizationRun.
// Input jobs are read-only; nothing persists across runs except what
// the caller chooses to keep.
// ==========================================

use crate::config::OptimizerConfig;
use crate::cost::cache::CostCache;
use crate::cost::model::CostModel;
use crate::domain::job::{Job, JobSet};
use crate::domain::sequence::Sequence;
use crate::domain::types::{CostValue, CostWeighting, OptimizerMode, SearchOutcome};
use crate::engine::baseline::{baseline_order, worst_case_order};
use crate::engine::budget::BudgetMeter;
use crate::engine::constraints::ConstraintChecker;
use crate::engine::exact::{ExactOutcome, ExactSearch, COST_EPS, MAX_EXACT_JOBS};
use crate::engine::heuristic::HeuristicSearch;
use crate::error::{OptimizerError, OptimizerResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// RunMetadata - search provenance
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    /// Resolved mode actually executed (never `auto`)
    pub mode: OptimizerMode,
    pub outcome: SearchOutcome,
    pub nodes_explored: u64,
    pub elapsed_ms: u64,
}

// ==========================================
// TransitionBreakdown - one changeover of the best sequence
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionBreakdown {
    pub from: String,
    pub to: String,
    pub cost: CostValue,
    pub cost_scalar: f64,
}

// ==========================================
// OptimizationRun - immutable result snapshot
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRun {
    pub metadata: RunMetadata,
    pub job_set: JobSet,
    pub weighting: CostWeighting,

    // The best sequence found
    pub best_sequence: Sequence,
    pub best_cost: CostValue,
    pub best_cost_scalar: f64,
    pub best_transition_cost: CostValue,
    pub transitions: Vec<TransitionBreakdown>,

    // Comparison references
    pub baseline_sequence: Sequence,
    pub baseline_cost: CostValue,
    pub baseline_cost_scalar: f64,
    pub worst_case_sequence: Sequence,
    pub worst_case_cost: CostValue,
    pub worst_case_cost_scalar: f64,
}

// ==========================================
// SequenceOptimizer - public entry point
// ==========================================
pub struct SequenceOptimizer {
    config: OptimizerConfig,
    exact: ExactSearch,
    heuristic: HeuristicSearch,
}

impl SequenceOptimizer {
    /// # Errors
    /// `InvalidConfig` if the configuration fails validation
    pub fn new(config: OptimizerConfig) -> OptimizerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            exact: ExactSearch::new(),
            heuristic: HeuristicSearch::new(),
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: OptimizerConfig::default(),
            exact: ExactSearch::new(),
            heuristic: HeuristicSearch::new(),
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Run one synchronous optimization request.
    ///
    /// # Arguments
    /// - `jobs`: pending jobs in their intended (baseline) order
    /// - `model`: transition/intrinsic cost supplier
    ///
    /// # Errors
    /// - `DuplicateJob` on repeated job ids
    /// - `InvalidConfig` if exact mode is forced beyond its job cap
    /// - `InfeasibleConstraints` if no feasible sequence exists
    /// - cost model errors surface unchanged
    #[instrument(skip(self, jobs, model), fields(jobs = jobs.len(), mode = %self.config.mode))]
    pub fn optimize(
        &self,
        jobs: Vec<Job>,
        model: &dyn CostModel,
    ) -> OptimizerResult<OptimizationRun> {
        let started = Instant::now();
        let (job_set, cache, checker) = self.prepare(jobs, model)?;
        let n = job_set.len();

        if n <= 1 {
            return Ok(self.assemble_trivial(job_set, cache, started));
        }

        let mode = self.config.resolve_mode(n);
        let mut meter = self.config.search_budget().start();

        let (order, outcome, nodes) = match mode {
            OptimizerMode::Exact => {
                let exact = self.exact.search(&cache, &checker, &mut meter, None);
                self.conclude_exact(exact, &job_set, &cache, &checker, &mut meter)?
            }
            OptimizerMode::Heuristic => {
                self.run_heuristic(&job_set, &cache, &checker, &mut meter)?
            }
            OptimizerMode::Auto => unreachable!("auto resolves to exact or heuristic"),
        };

        info!(
            jobs = n,
            mode = %mode,
            outcome = %outcome,
            nodes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "optimization run finished"
        );

        Ok(self.assemble(job_set, cache, order, mode, outcome, nodes, started))
    }

    /// Exact-mode variant dispatching one branch-and-bound worker per
    /// feasible first job, reduced by a minimum-by-cost fold. Workers
    /// share only read-only cost and constraint data, so the reduced
    /// result is identical to the sequential one. Heuristic-mode runs
    /// stay sequential.
    pub async fn optimize_parallel(
        &self,
        jobs: Vec<Job>,
        model: &dyn CostModel,
    ) -> OptimizerResult<OptimizationRun> {
        let started = Instant::now();
        let (job_set, cache, checker) = self.prepare(jobs, model)?;
        let n = job_set.len();

        if n <= 1 {
            return Ok(self.assemble_trivial(job_set, cache, started));
        }

        let mode = self.config.resolve_mode(n);
        if mode != OptimizerMode::Exact {
            let mut meter = self.config.search_budget().start();
            let (order, outcome, nodes) =
                self.run_heuristic(&job_set, &cache, &checker, &mut meter)?;
            return Ok(self.assemble(job_set, cache, order, mode, outcome, nodes, started));
        }

        let cache = Arc::new(cache);
        let checker = Arc::new(checker);
        let budget = self.config.search_budget();

        let firsts: Vec<usize> = (0..n)
            .filter(|&j| checker.can_place(0, j, |_| false, None))
            .collect();
        debug!(workers = firsts.len(), "dispatching exact search workers");

        let mut workers = Vec::with_capacity(firsts.len());
        for first in firsts {
            let cache = Arc::clone(&cache);
            let checker = Arc::clone(&checker);
            workers.push(tokio::task::spawn_blocking(move || {
                let mut meter = budget.start();
                let outcome = ExactSearch::new().search(&cache, &checker, &mut meter, Some(first));
                (outcome, meter)
            }));
        }

        let joined = futures::future::join_all(workers).await;

        let mut best: Option<(Vec<usize>, f64)> = None;
        let mut nodes: u64 = 0;
        let mut tally = budget.start();
        for result in joined {
            let (outcome, meter): (ExactOutcome, BudgetMeter) = result
                .map_err(|e| OptimizerError::InternalError(format!("worker panicked: {}", e)))?;
            nodes += outcome.nodes_explored;
            tally.absorb(&meter);

            if let Some(order) = outcome.best_order {
                let cost = outcome.best_transition_scalar;
                let replace = match &best {
                    None => true,
                    Some((incumbent, incumbent_cost)) => {
                        cost + COST_EPS < *incumbent_cost
                            || ((cost - incumbent_cost).abs() <= COST_EPS && order < *incumbent)
                    }
                };
                if replace {
                    best = Some((order, cost));
                }
            }
        }

        let cache = Arc::try_unwrap(cache)
            .map_err(|_| OptimizerError::InternalError("cost cache still shared".to_string()))?;

        let exhausted = tally.is_exhausted();
        let (order, outcome) = match best {
            Some((order, _)) => {
                let flag = if exhausted {
                    SearchOutcome::BudgetExhausted
                } else {
                    SearchOutcome::ExactOptimal
                };
                (order, flag)
            }
            None if exhausted => {
                warn!("parallel exact search exhausted its budget without an incumbent");
                let mut meter = self.config.search_budget().start();
                let (order, _, extra) =
                    self.run_heuristic(&job_set, &cache, &checker, &mut meter)?;
                nodes += extra;
                (order, SearchOutcome::BudgetExhausted)
            }
            None => {
                return Err(OptimizerError::infeasible(
                    checker.blame(),
                    "no permutation satisfies all constraints",
                ));
            }
        };

        info!(
            jobs = n,
            outcome = %outcome,
            nodes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "parallel optimization run finished"
        );

        Ok(self.assemble(
            job_set,
            cache,
            order,
            OptimizerMode::Exact,
            outcome,
            nodes,
            started,
        ))
    }

    // ==========================================
    // Internal steps
    // ==========================================

    fn prepare(
        &self,
        jobs: Vec<Job>,
        model: &dyn CostModel,
    ) -> OptimizerResult<(JobSet, CostCache, ConstraintChecker)> {
        let job_set =
            JobSet::new(jobs).map_err(|job_id| OptimizerError::DuplicateJob { job_id })?;

        let resolved = self.config.resolve_mode(job_set.len());
        if resolved == OptimizerMode::Exact && job_set.len() > MAX_EXACT_JOBS {
            return Err(OptimizerError::InvalidConfig(format!(
                "exact mode supports at most {} jobs, got {}",
                MAX_EXACT_JOBS,
                job_set.len()
            )));
        }

        let cache = CostCache::build(&job_set, model, self.config.weighting)?;
        let checker = ConstraintChecker::compile(&job_set, &self.config.constraints)?;

        debug!(
            jobs = job_set.len(),
            constraints = self.config.constraints.len(),
            "run prepared"
        );
        Ok((job_set, cache, checker))
    }

    fn conclude_exact(
        &self,
        exact: ExactOutcome,
        job_set: &JobSet,
        cache: &CostCache,
        checker: &ConstraintChecker,
        meter: &mut BudgetMeter,
    ) -> OptimizerResult<(Vec<usize>, SearchOutcome, u64)> {
        let mut nodes = exact.nodes_explored;
        match exact.best_order {
            Some(order) => {
                let flag = if exact.budget_exhausted {
                    SearchOutcome::BudgetExhausted
                } else {
                    SearchOutcome::ExactOptimal
                };
                Ok((order, flag, nodes))
            }
            None if exact.budget_exhausted => {
                // Budget ran out before any complete sequence appeared;
                // degrade to a feasible heuristic best-effort.
                warn!("exact search exhausted its budget without an incumbent");
                let heuristic = self.heuristic.search(job_set, cache, checker, meter);
                nodes += heuristic.nodes_explored;
                match heuristic.best_order {
                    Some(order) => Ok((order, SearchOutcome::BudgetExhausted, nodes)),
                    None => Err(OptimizerError::infeasible(
                        checker.blame(),
                        "search ended without finding a feasible sequence",
                    )),
                }
            }
            None => Err(OptimizerError::infeasible(
                checker.blame(),
                "no permutation satisfies all constraints",
            )),
        }
    }

    fn run_heuristic(
        &self,
        job_set: &JobSet,
        cache: &CostCache,
        checker: &ConstraintChecker,
        meter: &mut BudgetMeter,
    ) -> OptimizerResult<(Vec<usize>, SearchOutcome, u64)> {
        let outcome = self.heuristic.search(job_set, cache, checker, meter);
        match outcome.best_order {
            Some(order) => {
                let flag = if outcome.budget_exhausted {
                    SearchOutcome::BudgetExhausted
                } else {
                    SearchOutcome::HeuristicLocalOptimum
                };
                Ok((order, flag, outcome.nodes_explored))
            }
            None => Err(OptimizerError::infeasible(
                checker.blame(),
                "search ended without finding a feasible sequence",
            )),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        job_set: JobSet,
        cache: CostCache,
        order: Vec<usize>,
        mode: OptimizerMode,
        outcome: SearchOutcome,
        nodes_explored: u64,
        started: Instant,
    ) -> OptimizationRun {
        let transitions: Vec<TransitionBreakdown> = order
            .windows(2)
            .map(|w| TransitionBreakdown {
                from: job_set.get(w[0]).job_id.clone(),
                to: job_set.get(w[1]).job_id.clone(),
                cost: cache.transition_value(w[0], w[1]),
                cost_scalar: cache.transition(w[0], w[1]),
            })
            .collect();

        let best_transition_cost = cache.order_transition_value(&order);
        let best_cost = cache.order_cost_value(&order);
        let best_cost_scalar =
            cache.intrinsic_total_scalar() + cache.order_transition_scalar(&order);

        let base = baseline_order(&job_set);
        let baseline_cost = cache.order_cost_value(&base);
        let baseline_cost_scalar =
            cache.intrinsic_total_scalar() + cache.order_transition_scalar(&base);

        let worst = worst_case_order(&job_set);
        let worst_case_cost = cache.order_cost_value(&worst);
        let worst_case_cost_scalar =
            cache.intrinsic_total_scalar() + cache.order_transition_scalar(&worst);

        OptimizationRun {
            metadata: RunMetadata {
                run_id: Uuid::new_v4().to_string(),
                created_at: Utc::now(),
                mode,
                outcome,
                nodes_explored,
                elapsed_ms: started.elapsed().as_millis() as u64,
            },
            best_sequence: Sequence::from_indices(&order, &job_set),
            best_cost,
            best_cost_scalar,
            best_transition_cost,
            transitions,
            baseline_sequence: Sequence::from_indices(&base, &job_set),
            baseline_cost,
            baseline_cost_scalar,
            worst_case_sequence: Sequence::from_indices(&worst, &job_set),
            worst_case_cost,
            worst_case_cost_scalar,
            weighting: self.config.weighting,
            job_set,
        }
    }

    // 0 or 1 jobs: the only sequence, zero transition cost, no search.
    fn assemble_trivial(
        &self,
        job_set: JobSet,
        cache: CostCache,
        started: Instant,
    ) -> OptimizationRun {
        let n = job_set.len();
        let order: Vec<usize> = (0..n).collect();
        self.assemble(
            job_set,
            cache,
            order,
            self.config.resolve_mode(n),
            SearchOutcome::Trivial,
            0,
            started,
        )
    }
}
