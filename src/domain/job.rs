// ==========================================
// Dryer Sequencer - Job Domain Model
// ==========================================
// A Job is one production batch/recipe to run through the dryer,
// with an energy/time cost profile and the grouping attributes the
// cost model uses to estimate changeover penalties.
// Jobs are read-only once submitted to a run.
// ==========================================

use crate::domain::types::CostValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Job - production batch / recipe
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    // ===== Identity =====
    pub job_id: String, // unique within a run (product code, e.g. "L36")

    // ===== Grouping attributes (changeover estimation) =====
    pub material_family: String,       // material type letter (L/N/U)
    pub recipe_class: Option<String>,  // recipe grouping, if distinct from family
    pub thickness_mm: f64,             // board thickness
    pub target_moisture_pct: Option<f64>, // target residual moisture
    pub temperature_c: Option<f64>,    // dryer temperature setpoint

    // ===== Intrinsic cost profile =====
    pub intrinsic_energy_kwh: f64, // energy to run the batch itself
    pub intrinsic_duration_h: f64, // processing duration

    // ===== Historical efficiency (report enrichment) =====
    pub specific_energy_kwh_per_m3: Option<f64>, // avg kWh/m³ from history

    // ===== Demand =====
    pub wagons: Option<u32>, // batch quantity for this run, if known
}

impl Job {
    /// Intrinsic cost of running this job, independent of its neighbors.
    pub fn intrinsic_cost(&self) -> CostValue {
        CostValue::new(self.intrinsic_energy_kwh, self.intrinsic_duration_h)
    }
}

// ==========================================
// JobSet - the pending jobs of one run
// ==========================================
// Holds jobs in lexicographic job-id order so that index order doubles
// as the deterministic tie-break order of the exact search.
// Duplicate ids are rejected at construction.
// Serialized as the plain job list in submission order; the index and
// sorted layout are rebuilt on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Job>", into = "Vec<Job>")]
pub struct JobSet {
    jobs: Vec<Job>,
    // Submission order as indices into the sorted `jobs` vector;
    // the baseline (no-optimization) sequence runs in this order.
    submitted: Vec<usize>,
    index: HashMap<String, usize>,
}

impl TryFrom<Vec<Job>> for JobSet {
    type Error = String;

    fn try_from(jobs: Vec<Job>) -> Result<Self, Self::Error> {
        JobSet::new(jobs)
    }
}

impl From<JobSet> for Vec<Job> {
    fn from(set: JobSet) -> Vec<Job> {
        set.submitted
            .iter()
            .map(|&i| set.jobs[i].clone())
            .collect()
    }
}

impl JobSet {
    /// Build a job set, sorting by job id and rejecting duplicates.
    /// The submission order is retained as the baseline order.
    ///
    /// # Returns
    /// - `Ok(JobSet)` on success
    /// - `Err(duplicate_id)` naming the first duplicate id found
    pub fn new(jobs: Vec<Job>) -> Result<Self, String> {
        let submitted_ids: Vec<String> = jobs.iter().map(|j| j.job_id.clone()).collect();

        let mut jobs = jobs;
        jobs.sort_by(|a, b| a.job_id.cmp(&b.job_id));

        let mut index = HashMap::with_capacity(jobs.len());
        for (i, job) in jobs.iter().enumerate() {
            if index.insert(job.job_id.clone(), i).is_some() {
                return Err(job.job_id.clone());
            }
        }

        let submitted = submitted_ids
            .iter()
            .map(|id| index[id])
            .collect();

        Ok(Self {
            jobs,
            submitted,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Jobs in lexicographic id order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn get(&self, idx: usize) -> &Job {
        &self.jobs[idx]
    }

    /// Index of a job id within the set, if present.
    pub fn index_of(&self, job_id: &str) -> Option<usize> {
        self.index.get(job_id).copied()
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.index.contains_key(job_id)
    }

    /// The order jobs were submitted in, as set indices (baseline order).
    pub fn submitted_order(&self) -> &[usize] {
        &self.submitted
    }

    /// Job ids in set (lexicographic) order.
    pub fn ids(&self) -> Vec<String> {
        self.jobs.iter().map(|j| j.job_id.clone()).collect()
    }

    /// Sum of all intrinsic costs; constant across permutations.
    pub fn total_intrinsic_cost(&self) -> CostValue {
        let mut total = CostValue::ZERO;
        for job in &self.jobs {
            total += job.intrinsic_cost();
        }
        total
    }
}
