// ==========================================
// Sequencing Constraint Integration Tests
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use dryer_sequencer::{
    OptimizerConfig, OptimizerError, OptimizerMode, SequenceConstraint, SequenceOptimizer,
};
use test_helpers::{job, ladder_table};

fn optimizer_with(constraints: Vec<SequenceConstraint>) -> SequenceOptimizer {
    SequenceOptimizer::new(OptimizerConfig {
        mode: OptimizerMode::Exact,
        constraints,
        ..Default::default()
    })
    .unwrap()
}

fn four_jobs() -> Vec<dryer_sequencer::Job> {
    vec![
        job("A", 10.0),
        job("B", 20.0),
        job("C", 30.0),
        job("D", 40.0),
    ]
}

#[test]
fn precedence_is_honored_even_against_cost() {
    let table = ladder_table(&["A", "B", "C", "D"]);
    // The unconstrained optimum is A,B,C,D; force D before A
    let optimizer = optimizer_with(vec![SequenceConstraint::Precedence {
        before: "D".to_string(),
        after: "A".to_string(),
    }]);

    let run = optimizer.optimize(four_jobs(), &table).unwrap();
    let ids = run.best_sequence.job_ids();
    let pos_d = ids.iter().position(|id| id == "D").unwrap();
    let pos_a = ids.iter().position(|id| id == "A").unwrap();
    assert!(pos_d < pos_a);
}

#[test]
fn contradictory_precedence_is_infeasible() {
    let table = ladder_table(&["A", "B", "C", "D"]);
    let optimizer = optimizer_with(vec![
        SequenceConstraint::Precedence {
            before: "A".to_string(),
            after: "B".to_string(),
        },
        SequenceConstraint::Precedence {
            before: "B".to_string(),
            after: "A".to_string(),
        },
    ]);

    let err = optimizer.optimize(four_jobs(), &table).unwrap_err();
    match err {
        OptimizerError::InfeasibleConstraints { constraint, .. } => {
            assert!(constraint.contains('A') && constraint.contains('B'));
        }
        other => panic!("expected InfeasibleConstraints, got {:?}", other),
    }
}

#[test]
fn fixed_position_pins_the_job() {
    let table = ladder_table(&["A", "B", "C", "D"]);
    let optimizer = optimizer_with(vec![SequenceConstraint::FixedPosition {
        job_id: "D".to_string(),
        position: 0,
    }]);

    let run = optimizer.optimize(four_jobs(), &table).unwrap();
    assert_eq!(run.best_sequence.job_ids()[0], "D");
    // With D pinned first, the cheapest completion descends the ladder
    assert_eq!(
        run.best_sequence.job_ids(),
        ["D", "C", "B", "A"].map(String::from)
    );
}

#[test]
fn mutual_exclusion_forces_a_detour() {
    let table = ladder_table(&["A", "B", "C", "D"]);
    let optimizer = optimizer_with(vec![SequenceConstraint::MutuallyExclusive {
        a: "B".to_string(),
        b: "C".to_string(),
    }]);

    let run = optimizer.optimize(four_jobs(), &table).unwrap();
    let ids = run.best_sequence.job_ids();
    let pos_b = ids.iter().position(|id| id == "B").unwrap();
    let pos_c = ids.iter().position(|id| id == "C").unwrap();
    assert!(pos_b.abs_diff(pos_c) > 1);
    // Forced detour costs more than the free optimum of 30
    assert!(run.best_transition_cost.energy_kwh > 30.0);
}

#[test]
fn constraint_on_unknown_job_is_rejected() {
    let table = ladder_table(&["A", "B", "C", "D"]);
    let optimizer = optimizer_with(vec![SequenceConstraint::Precedence {
        before: "Z9".to_string(),
        after: "A".to_string(),
    }]);

    let err = optimizer.optimize(four_jobs(), &table).unwrap_err();
    match err {
        OptimizerError::InvalidJob { job_id, .. } => assert_eq!(job_id, "Z9"),
        other => panic!("expected InvalidJob, got {:?}", other),
    }
}

#[test]
fn out_of_range_pin_is_rejected() {
    let table = ladder_table(&["A", "B", "C", "D"]);
    let optimizer = optimizer_with(vec![SequenceConstraint::FixedPosition {
        job_id: "A".to_string(),
        position: 9,
    }]);

    let err = optimizer.optimize(four_jobs(), &table).unwrap_err();
    assert!(matches!(
        err,
        OptimizerError::InfeasibleConstraints { .. }
    ));
}
