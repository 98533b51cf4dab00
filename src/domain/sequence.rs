// ==========================================
// Dryer Sequencer - Sequence Domain Model
// ==========================================
// A Sequence is an ordering of all pending jobs of a run.
// Invariant: each job appears exactly once (permutation of the job set).
// ==========================================

use crate::domain::job::JobSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ==========================================
// Sequence - permutation of a job set
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    job_ids: Vec<String>,
}

impl Sequence {
    /// Build a sequence, validating the permutation invariant against the
    /// job set: no duplicates, no omissions, length equals set size.
    pub fn new(job_ids: Vec<String>, job_set: &JobSet) -> Result<Self, String> {
        if job_ids.len() != job_set.len() {
            return Err(format!(
                "sequence length {} does not match job set size {}",
                job_ids.len(),
                job_set.len()
            ));
        }

        let mut seen = HashSet::with_capacity(job_ids.len());
        for id in &job_ids {
            if !job_set.contains(id) {
                return Err(format!("job {} is not part of the job set", id));
            }
            if !seen.insert(id.as_str()) {
                return Err(format!("job {} appears more than once", id));
            }
        }

        Ok(Self { job_ids })
    }

    /// Build from set-internal indices (search-engine output). The engines
    /// guarantee the permutation invariant by construction.
    pub(crate) fn from_indices(order: &[usize], job_set: &JobSet) -> Self {
        Self {
            job_ids: order
                .iter()
                .map(|&i| job_set.get(i).job_id.clone())
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            job_ids: Vec::new(),
        }
    }

    pub fn job_ids(&self) -> &[String] {
        &self.job_ids
    }

    pub fn len(&self) -> usize {
        self.job_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.job_ids.is_empty()
    }

    /// Position of a job in the sequence.
    pub fn position_of(&self, job_id: &str) -> Option<usize> {
        self.job_ids.iter().position(|id| id == job_id)
    }

    /// Consecutive (from, to) pairs, in order.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.job_ids
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
    }
}
