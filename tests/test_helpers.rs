// ==========================================
// Test Helpers
// ==========================================
// Shared builders for integration tests: jobs, transition tables and
// sample database documents.
// ==========================================

#![allow(dead_code)]

use dryer_sequencer::{Job, TransitionTable};

/// A job with neutral intrinsic figures; tests that care set their own.
pub fn job(id: &str, thickness_mm: f64) -> Job {
    Job {
        job_id: id.to_string(),
        material_family: "L".to_string(),
        recipe_class: None,
        thickness_mm,
        target_moisture_pct: None,
        temperature_c: None,
        intrinsic_energy_kwh: 100.0,
        intrinsic_duration_h: 1.0,
        specific_energy_kwh_per_m3: None,
        wagons: None,
    }
}

pub fn job_in_family(id: &str, thickness_mm: f64, family: &str) -> Job {
    Job {
        material_family: family.to_string(),
        ..job(id, thickness_mm)
    }
}

/// Transition cost = |i - j| * 10 over the given id ladder, so the
/// ascending order is uniquely cheapest.
pub fn ladder_table(ids: &[&str]) -> TransitionTable {
    let mut table = TransitionTable::new();
    for (i, from) in ids.iter().enumerate() {
        for (j, to) in ids.iter().enumerate() {
            if i != j {
                table
                    .insert_energy(*from, *to, (i as f64 - j as f64).abs() * 10.0)
                    .unwrap();
            }
        }
    }
    table
}

/// Directed 4-cycle A->B->C->D->A at cost 1; every other pair costs 10.
/// The cheapest open path walks the cycle (three edges, total 3).
pub fn cycle_table(ids: &[&str; 4]) -> TransitionTable {
    let mut table = TransitionTable::new();
    for (i, from) in ids.iter().enumerate() {
        for (j, to) in ids.iter().enumerate() {
            if i != j {
                let cost = if (i + 1) % 4 == j { 1.0 } else { 10.0 };
                table.insert_energy(*from, *to, cost).unwrap();
            }
        }
    }
    table
}

/// Uniform transition table: every cross pair costs the same.
pub fn uniform_table(ids: &[&str], cost: f64) -> TransitionTable {
    let mut table = TransitionTable::new();
    for from in ids {
        for to in ids {
            if from != to {
                table.insert_energy(*from, *to, cost).unwrap();
            }
        }
    }
    table
}

/// A small optimization database document in the on-disk format.
pub fn sample_database_json() -> &'static str {
    r#"{
        "metadata": {"created": "2026-05-01T08:00:00", "source": "historical", "total_products": 3},
        "product_profiles": {
            "L28": {
                "type": "L",
                "thickness_mm": 28.0,
                "avg_kwh_per_m3": 85.0,
                "kwh_per_wagon": 410.0,
                "total_wagons_produced": 120,
                "zone_profiles": {
                    "Z2": {"kwh_per_m3": 20.0},
                    "Z3": {"kwh_per_m3": 25.0}
                }
            },
            "L36": {
                "type": "L",
                "thickness_mm": 36.0,
                "avg_kwh_per_m3": 92.0,
                "kwh_per_wagon": 530.0
            },
            "P40": {
                "type": "P",
                "thickness_mm": 40.0,
                "avg_kwh_per_m3": 110.0,
                "kwh_per_wagon": 610.0
            }
        },
        "transition_matrix": {
            "L28": {"L28": 0.0, "L36": 24.0, "P40": 106.0},
            "L36": {"L28": 24.0, "L36": 0.0, "P40": 76.4},
            "P40": {"L28": 106.0, "L36": 76.4, "P40": 0.0}
        }
    }"#
}
