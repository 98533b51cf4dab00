// ==========================================
// Dryer Sequencer - Baseline & Worst-Case Orders
// ==========================================
// Yardsticks the report compares the optimized sequence against:
// - baseline: the order the jobs were submitted in (no optimization)
// - worst case: alternating thin/thick, the pattern that maximizes
//   setup churn on the dryer
// Neither is constraint-checked; they are comparison references only,
// never executed.
// ==========================================

use crate::domain::job::JobSet;

/// The submitted (input) order - the no-optimization reference.
pub fn baseline_order(job_set: &JobSet) -> Vec<usize> {
    job_set.submitted_order().to_vec()
}

/// Alternating thin/thick order: sort by thickness, then interleave the
/// thin half with the thick half (thickest first).
pub fn worst_case_order(job_set: &JobSet) -> Vec<usize> {
    let n = job_set.len();
    let mut by_thickness: Vec<usize> = (0..n).collect();
    by_thickness.sort_by(|&a, &b| {
        job_set
            .get(a)
            .thickness_mm
            .partial_cmp(&job_set.get(b).thickness_mm)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let thin: Vec<usize> = by_thickness[..n / 2].to_vec();
    let thick: Vec<usize> = by_thickness[n / 2..].iter().rev().copied().collect();

    let mut order = Vec::with_capacity(n);
    let mut thin_iter = thin.iter();
    let mut thick_iter = thick.iter();
    loop {
        match (thin_iter.next(), thick_iter.next()) {
            (None, None) => break,
            (a, b) => {
                if let Some(&x) = a {
                    order.push(x);
                }
                if let Some(&x) = b {
                    order.push(x);
                }
            }
        }
    }
    order
}
