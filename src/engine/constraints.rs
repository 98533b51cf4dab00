// ==========================================
// Dryer Sequencer - Constraint Checker
// ==========================================
// Compiles the run's hard constraints against the job set into
// index-based lookup structures both search engines consult while
// extending partial sequences.
// ==========================================
// Responsibility: placement gating + upfront infeasibility detection
// Output: every rejection names the offending constraint
// ==========================================

use crate::domain::constraint::SequenceConstraint;
use crate::domain::job::JobSet;
use crate::error::{OptimizerError, OptimizerResult};

// ==========================================
// ConstraintChecker
// ==========================================
#[derive(Debug, Clone)]
pub struct ConstraintChecker {
    n: usize,
    constraints: Vec<SequenceConstraint>,

    // predecessors[j] = jobs that must already be placed before j
    predecessors: Vec<Vec<usize>>,
    // fixed_at[pos] = job required at that position
    fixed_at: Vec<Option<usize>>,
    // fixed_pos[j] = position j is pinned to
    fixed_pos: Vec<Option<usize>>,
    // excluded[j] = jobs that must never be adjacent to j
    excluded: Vec<Vec<usize>>,
}

impl ConstraintChecker {
    /// Compile constraints against a job set.
    ///
    /// # Errors
    /// - `InvalidJob` if a constraint references a job outside the set
    /// - `InfeasibleConstraints` for contradictions detectable upfront
    ///   (precedence cycles, conflicting fixed positions, out-of-range
    ///   positions), naming the offending constraint
    pub fn compile(
        job_set: &JobSet,
        constraints: &[SequenceConstraint],
    ) -> OptimizerResult<Self> {
        let n = job_set.len();
        let mut checker = Self {
            n,
            constraints: constraints.to_vec(),
            predecessors: vec![Vec::new(); n],
            fixed_at: vec![None; n],
            fixed_pos: vec![None; n],
            excluded: vec![Vec::new(); n],
        };

        for constraint in constraints {
            for job_id in constraint.referenced_jobs() {
                if !job_set.contains(job_id) {
                    return Err(OptimizerError::invalid_job(
                        job_id,
                        format!("referenced by constraint {}", constraint),
                    ));
                }
            }

            match constraint {
                SequenceConstraint::Precedence { before, after } => {
                    let b = job_set.index_of(before).unwrap();
                    let a = job_set.index_of(after).unwrap();
                    if b == a {
                        return Err(OptimizerError::infeasible(
                            constraint,
                            "a job cannot precede itself",
                        ));
                    }
                    checker.predecessors[a].push(b);
                }
                SequenceConstraint::FixedPosition { job_id, position } => {
                    let j = job_set.index_of(job_id).unwrap();
                    if *position >= n {
                        return Err(OptimizerError::infeasible(
                            constraint,
                            format!("position {} exceeds job count {}", position, n),
                        ));
                    }
                    if let Some(existing) = checker.fixed_at[*position] {
                        if existing != j {
                            return Err(OptimizerError::infeasible(
                                constraint,
                                format!(
                                    "position {} already pinned to {}",
                                    position,
                                    job_set.get(existing).job_id
                                ),
                            ));
                        }
                    }
                    if let Some(existing_pos) = checker.fixed_pos[j] {
                        if existing_pos != *position {
                            return Err(OptimizerError::infeasible(
                                constraint,
                                format!("{} already pinned to position {}", job_id, existing_pos),
                            ));
                        }
                    }
                    checker.fixed_at[*position] = Some(j);
                    checker.fixed_pos[j] = Some(*position);
                }
                SequenceConstraint::MutuallyExclusive { a, b } => {
                    let ia = job_set.index_of(a).unwrap();
                    let ib = job_set.index_of(b).unwrap();
                    if ia == ib {
                        return Err(OptimizerError::infeasible(
                            constraint,
                            "a job cannot exclude itself",
                        ));
                    }
                    checker.excluded[ia].push(ib);
                    checker.excluded[ib].push(ia);
                }
            }
        }

        checker.check_precedence_cycles(job_set)?;
        checker.check_fixed_precedence_conflicts(job_set)?;

        Ok(checker)
    }

    pub fn is_trivial(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[SequenceConstraint] {
        &self.constraints
    }

    /// Job pinned to `position`, if any.
    pub fn fixed_at(&self, position: usize) -> Option<usize> {
        self.fixed_at.get(position).copied().flatten()
    }

    /// May `job` occupy `position`, given which jobs are already placed
    /// (`placed`) and which job currently sits at the tail (`last`)?
    pub fn can_place<F>(&self, position: usize, job: usize, placed: F, last: Option<usize>) -> bool
    where
        F: Fn(usize) -> bool,
    {
        if let Some(required) = self.fixed_at(position) {
            if required != job {
                return false;
            }
        }
        if let Some(pinned) = self.fixed_pos[job] {
            if pinned != position {
                return false;
            }
        }
        if !self.predecessors[job].iter().all(|&p| placed(p)) {
            return false;
        }
        if let Some(last) = last {
            if self.excluded[job].contains(&last) {
                return false;
            }
        }
        true
    }

    /// Validate a complete order (used by local-search moves).
    pub fn is_order_valid(&self, order: &[usize]) -> bool {
        if self.is_trivial() {
            return true;
        }

        let mut position = vec![usize::MAX; self.n];
        for (pos, &job) in order.iter().enumerate() {
            position[job] = pos;
        }

        for (job, preds) in self.predecessors.iter().enumerate() {
            for &p in preds {
                if position[p] >= position[job] {
                    return false;
                }
            }
        }

        for (job, pinned) in self.fixed_pos.iter().enumerate() {
            if let Some(pos) = pinned {
                if position[job] != *pos {
                    return false;
                }
            }
        }

        // adjacency exclusions over consecutive pairs
        for w in order.windows(2) {
            if self.excluded[w[0]].contains(&w[1]) {
                return false;
            }
        }
        true
    }

    /// Constraint to blame when an exhaustive search finds no feasible
    /// sequence but no single contradiction was detectable upfront
    /// (e.g. interacting adjacency exclusions).
    pub fn blame(&self) -> String {
        self.constraints
            .iter()
            .find(|c| matches!(c, SequenceConstraint::MutuallyExclusive { .. }))
            .or_else(|| self.constraints.first())
            .map(|c| c.to_string())
            .unwrap_or_else(|| "constraint set".to_string())
    }

    // ==========================================
    // Upfront feasibility checks
    // ==========================================

    // Kahn topological sort over the precedence graph; leftovers mean a
    // cycle, blamed on a precedence constraint inside it.
    fn check_precedence_cycles(&self, job_set: &JobSet) -> OptimizerResult<()> {
        let mut indegree = vec![0usize; self.n];
        for (job, preds) in self.predecessors.iter().enumerate() {
            indegree[job] = preds.len();
        }

        let mut queue: Vec<usize> = (0..self.n).filter(|&j| indegree[j] == 0).collect();
        let mut resolved = 0usize;

        // successors view of the same graph
        let mut successors = vec![Vec::new(); self.n];
        for (job, preds) in self.predecessors.iter().enumerate() {
            for &p in preds {
                successors[p].push(job);
            }
        }

        while let Some(j) = queue.pop() {
            resolved += 1;
            for &s in &successors[j] {
                indegree[s] -= 1;
                if indegree[s] == 0 {
                    queue.push(s);
                }
            }
        }

        if resolved == self.n {
            return Ok(());
        }

        // Any precedence constraint between two unresolved jobs sits on
        // (or feeds) the cycle.
        let in_cycle: Vec<bool> = indegree.iter().map(|&d| d > 0).collect();
        let offender = self
            .constraints
            .iter()
            .find(|c| match c {
                SequenceConstraint::Precedence { before, after } => {
                    let b = job_set.index_of(before).unwrap();
                    let a = job_set.index_of(after).unwrap();
                    in_cycle[b] && in_cycle[a]
                }
                _ => false,
            })
            .map(|c| c.to_string())
            .unwrap_or_else(|| "precedence constraints".to_string());

        Err(OptimizerError::InfeasibleConstraints {
            constraint: offender,
            reason: "precedence constraints form a cycle".to_string(),
        })
    }

    // A precedence pair where both ends are pinned must be pinned in order.
    fn check_fixed_precedence_conflicts(&self, job_set: &JobSet) -> OptimizerResult<()> {
        for constraint in &self.constraints {
            if let SequenceConstraint::Precedence { before, after } = constraint {
                let b = job_set.index_of(before).unwrap();
                let a = job_set.index_of(after).unwrap();
                if let (Some(pb), Some(pa)) = (self.fixed_pos[b], self.fixed_pos[a]) {
                    if pb >= pa {
                        return Err(OptimizerError::infeasible(
                            constraint,
                            format!(
                                "{} pinned to position {} but {} pinned to position {}",
                                before, pb, after, pa
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
