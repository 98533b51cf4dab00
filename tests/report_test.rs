// ==========================================
// Report Builder & Export Integration Tests
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use dryer_sequencer::report::{export_all, render_text, ReportBuilder};
use dryer_sequencer::{
    Job, OptimizerConfig, OptimizerMode, SequenceOptimizer, TransitionTable,
};
use test_helpers::{job, job_in_family, ladder_table};

fn exact_run(
    jobs: Vec<Job>,
    table: &TransitionTable,
) -> dryer_sequencer::OptimizationRun {
    SequenceOptimizer::new(OptimizerConfig {
        mode: OptimizerMode::Exact,
        ..Default::default()
    })
    .unwrap()
    .optimize(jobs, table)
    .unwrap()
}

#[test]
fn report_breakdown_matches_run_totals() {
    let ids = ["A", "B", "C", "D"];
    let table = ladder_table(&ids);
    let jobs: Vec<Job> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| job(id, 10.0 * (i + 1) as f64))
        .collect();

    let run = exact_run(jobs, &table);
    let report = ReportBuilder::new().build(&run);

    assert_eq!(report.sequence.len(), 4);
    assert_eq!(report.transitions.len(), 3);
    let breakdown_sum: f64 = report.transitions.iter().map(|t| t.energy_kwh).sum();
    assert!((breakdown_sum - report.transition_cost.energy_kwh).abs() < 1e-6);
    // positions are 1-based and contiguous
    let positions: Vec<usize> = report.sequence.iter().map(|j| j.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}

#[test]
fn savings_are_reported_against_the_submitted_order() {
    let ids = ["A", "B", "C", "D"];
    let table = ladder_table(&ids);
    // Submitted in the worst interleaved order
    let jobs = vec![job("A", 10.0), job("D", 40.0), job("B", 20.0), job("C", 30.0)];

    let run = exact_run(jobs, &table);
    let report = ReportBuilder::new().build(&run);

    let saved = report.savings_percent.expect("baseline is non-zero");
    assert!(saved > 0.0);
    assert!(report.worst_case_savings_percent.is_some());
}

#[test]
fn zero_baseline_yields_sentinel_not_division_error() {
    let mut table = TransitionTable::new();
    table.insert_energy("A", "B", 0.0).unwrap();
    table.insert_energy("B", "A", 0.0).unwrap();
    let jobs = vec![
        Job {
            intrinsic_energy_kwh: 0.0,
            intrinsic_duration_h: 0.0,
            ..job("A", 10.0)
        },
        Job {
            intrinsic_energy_kwh: 0.0,
            intrinsic_duration_h: 0.0,
            ..job("B", 20.0)
        },
    ];

    let run = exact_run(jobs, &table);
    let report = ReportBuilder::new().build(&run);
    assert_eq!(report.savings_percent, None);
    // The text rendering must still work
    assert!(render_text(&report).contains("n/a"));
}

#[test]
fn recommendations_cover_the_recovered_rules() {
    let mut table = TransitionTable::new();
    for (a, b, cost) in [
        ("A", "B", 20.0),
        ("B", "A", 20.0),
        ("A", "C", 150.0),
        ("C", "A", 150.0),
        ("B", "C", 160.0),
        ("C", "B", 160.0),
    ] {
        table.insert_energy(a, b, cost).unwrap();
    }
    let jobs = vec![
        job_in_family("A", 10.0, "L"),
        job_in_family("B", 20.0, "L"),
        Job {
            specific_energy_kwh_per_m3: Some(120.0),
            wagons: Some(150),
            ..job_in_family("C", 30.0, "P")
        },
    ];

    let run = exact_run(jobs, &table);
    let report = ReportBuilder::new().build(&run);

    let all = report.recommendations.join("\n");
    assert!(all.contains("High-cost transition"));
    assert!(all.contains("cleaning cycle"));
    assert!(all.contains("energy-intensive"));
    assert!(all.contains("150 wagons"));
}

#[test]
fn export_writes_csv_and_text_artifacts() {
    let ids = ["A", "B", "C"];
    let table = ladder_table(&ids);
    let jobs: Vec<Job> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| job(id, 10.0 * (i + 1) as f64))
        .collect();

    let run = exact_run(jobs, &table);
    let report = ReportBuilder::new().build(&run);

    let dir = tempfile::tempdir().unwrap();
    export_all(&report, dir.path()).unwrap();

    let sequence = std::fs::read_to_string(dir.path().join("sequence.csv")).unwrap();
    assert!(sequence.starts_with("position,job_id,material_family"));
    assert_eq!(sequence.lines().count(), 4); // header + 3 jobs

    let transitions = std::fs::read_to_string(dir.path().join("transitions.csv")).unwrap();
    assert!(transitions.starts_with("from,to,energy_kwh"));
    assert_eq!(transitions.lines().count(), 3); // header + 2 transitions

    let plan = std::fs::read_to_string(dir.path().join("plan.txt")).unwrap();
    assert!(plan.contains("DRYER PRODUCTION SEQUENCE PLAN"));
    assert!(plan.contains("SEQUENCE"));
    assert!(plan.contains(&report.run_id));
}
