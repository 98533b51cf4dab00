// ==========================================
// Dryer Sequencer - Domain Types
// ==========================================
// Shared value types for the optimizer core:
// search mode, search outcome, cost values and weighting.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

// ==========================================
// Optimizer Mode
// ==========================================
// `Auto` routes by job count (exact below threshold, heuristic above).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerMode {
    Exact,
    Heuristic,
    Auto,
}

impl OptimizerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizerMode::Exact => "exact",
            OptimizerMode::Heuristic => "heuristic",
            OptimizerMode::Auto => "auto",
        }
    }
}

impl Default for OptimizerMode {
    fn default() -> Self {
        OptimizerMode::Auto
    }
}

impl fmt::Display for OptimizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OptimizerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(OptimizerMode::Exact),
            "heuristic" => Ok(OptimizerMode::Heuristic),
            "auto" => Ok(OptimizerMode::Auto),
            other => Err(format!("unknown optimizer mode: {}", other)),
        }
    }
}

// ==========================================
// Search Outcome
// ==========================================
// Recorded in run metadata; `BudgetExhausted` is a warning, not an error:
// the best-so-far sequence is still returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchOutcome {
    ExactOptimal,          // proven global optimum for the given cost model
    HeuristicLocalOptimum, // local search converged, optimality not proven
    BudgetExhausted,       // time/iteration budget hit before convergence
    Trivial,               // 0 or 1 jobs, nothing to search
}

impl SearchOutcome {
    /// Whether the result is a proven optimum for the supplied cost model.
    pub fn is_proven_optimal(&self) -> bool {
        matches!(self, SearchOutcome::ExactOptimal | SearchOutcome::Trivial)
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::ExactOptimal => write!(f, "EXACT_OPTIMAL"),
            SearchOutcome::HeuristicLocalOptimum => write!(f, "HEURISTIC_LOCAL_OPTIMUM"),
            SearchOutcome::BudgetExhausted => write!(f, "BUDGET_EXHAUSTED"),
            SearchOutcome::Trivial => write!(f, "TRIVIAL"),
        }
    }
}

// ==========================================
// CostValue - energy/time cost pair
// ==========================================
// All costs in the model are non-negative; accumulation is plain f64
// addition with no rounding (rounding happens once, in the report layer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CostValue {
    pub energy_kwh: f64,
    pub time_h: f64,
}

impl CostValue {
    pub const ZERO: CostValue = CostValue {
        energy_kwh: 0.0,
        time_h: 0.0,
    };

    pub fn new(energy_kwh: f64, time_h: f64) -> Self {
        Self { energy_kwh, time_h }
    }

    /// Energy-only cost (time component zero).
    pub fn energy(energy_kwh: f64) -> Self {
        Self {
            energy_kwh,
            time_h: 0.0,
        }
    }

    /// Collapse to a single scalar under the given weighting.
    pub fn scalar(&self, weighting: &CostWeighting) -> f64 {
        self.energy_kwh * weighting.energy_weight + self.time_h * weighting.time_weight
    }

    pub fn is_non_negative(&self) -> bool {
        self.energy_kwh >= 0.0 && self.time_h >= 0.0
    }
}

impl Add for CostValue {
    type Output = CostValue;

    fn add(self, rhs: CostValue) -> CostValue {
        CostValue {
            energy_kwh: self.energy_kwh + rhs.energy_kwh,
            time_h: self.time_h + rhs.time_h,
        }
    }
}

impl AddAssign for CostValue {
    fn add_assign(&mut self, rhs: CostValue) {
        self.energy_kwh += rhs.energy_kwh;
        self.time_h += rhs.time_h;
    }
}

// ==========================================
// CostWeighting - scalarization weights
// ==========================================
// Default matches the historical optimizer: pure energy objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeighting {
    #[serde(default = "default_energy_weight")]
    pub energy_weight: f64,
    #[serde(default)]
    pub time_weight: f64,
}

fn default_energy_weight() -> f64 {
    1.0
}

impl Default for CostWeighting {
    fn default() -> Self {
        Self {
            energy_weight: 1.0,
            time_weight: 0.0,
        }
    }
}

impl CostWeighting {
    pub fn is_valid(&self) -> bool {
        self.energy_weight >= 0.0
            && self.time_weight >= 0.0
            && (self.energy_weight + self.time_weight) > 0.0
    }
}
