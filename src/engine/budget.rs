// ==========================================
// Dryer Sequencer - Search Budget
// ==========================================
// Caller-supplied time/iteration limits for long-running searches.
// On expiry the engines return the best-so-far sequence with the run
// flagged BUDGET_EXHAUSTED instead of raising an error.
// ==========================================

use std::time::{Duration, Instant};

// How many iterations between wall-clock checks
const TIME_CHECK_INTERVAL: u64 = 256;

// ==========================================
// SearchBudget - declarative limits
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchBudget {
    pub time_budget: Option<Duration>,
    pub iteration_budget: Option<u64>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn is_unlimited(&self) -> bool {
        self.time_budget.is_none() && self.iteration_budget.is_none()
    }

    /// Start metering against these limits.
    pub fn start(&self) -> BudgetMeter {
        let now = Instant::now();
        BudgetMeter {
            deadline: self.time_budget.map(|d| now + d),
            iteration_budget: self.iteration_budget,
            started: now,
            iterations: 0,
            exhausted: false,
        }
    }
}

// ==========================================
// BudgetMeter - running consumption
// ==========================================
#[derive(Debug, Clone)]
pub struct BudgetMeter {
    deadline: Option<Instant>,
    iteration_budget: Option<u64>,
    started: Instant,
    iterations: u64,
    exhausted: bool,
}

impl BudgetMeter {
    /// Record one unit of search work (node expanded / move evaluated)
    /// and report whether the budget is now spent.
    pub fn tick(&mut self) -> bool {
        self.iterations += 1;

        if self.exhausted {
            return true;
        }

        if let Some(limit) = self.iteration_budget {
            if self.iterations >= limit {
                self.exhausted = true;
                return true;
            }
        }

        // Wall clock is only sampled periodically
        if self.iterations % TIME_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.exhausted = true;
                    return true;
                }
            }
        }

        false
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fold a worker meter into this one (parallel dispatch reduction).
    pub fn absorb(&mut self, other: &BudgetMeter) {
        self.iterations += other.iterations;
        self.exhausted = self.exhausted || other.exhausted;
    }
}
