// ==========================================
// Dryer Sequencer - Report Export
// ==========================================
// Writes a report to operator-consumable artifacts: two CSV tables
// (sequence and transitions) and a plain-text production plan.
// ==========================================

use crate::report::builder::OptimizationReport;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

// ==========================================
// Error type
// ==========================================
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

// ==========================================
// CSV export
// ==========================================

/// Sequence table: one row per scheduled job, in run order.
pub fn write_sequence_csv(report: &OptimizationReport, path: &Path) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "position",
        "job_id",
        "material_family",
        "thickness_mm",
        "intrinsic_energy_kwh",
        "intrinsic_duration_h",
    ])?;
    for job in &report.sequence {
        writer.write_record([
            job.position.to_string(),
            job.job_id.clone(),
            job.material_family.clone(),
            job.thickness_mm.to_string(),
            job.intrinsic_energy_kwh.to_string(),
            job.intrinsic_duration_h.to_string(),
        ])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = report.sequence.len(), "sequence csv written");
    Ok(())
}

/// Transition table: one row per changeover of the best sequence.
pub fn write_transitions_csv(report: &OptimizationReport, path: &Path) -> ExportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "from",
        "to",
        "energy_kwh",
        "time_h",
        "thickness_delta_mm",
        "family_change",
    ])?;
    for t in &report.transitions {
        writer.write_record([
            t.from.clone(),
            t.to.clone(),
            t.energy_kwh.to_string(),
            t.time_h.to_string(),
            t.thickness_delta_mm.to_string(),
            t.family_change.to_string(),
        ])?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = report.transitions.len(), "transitions csv written");
    Ok(())
}

/// Write sequence.csv, transitions.csv and plan.txt into `dir`.
pub fn export_all(report: &OptimizationReport, dir: &Path) -> ExportResult<()> {
    std::fs::create_dir_all(dir)?;
    write_sequence_csv(report, &dir.join("sequence.csv"))?;
    write_transitions_csv(report, &dir.join("transitions.csv"))?;
    std::fs::write(dir.join("plan.txt"), render_text(report))?;
    Ok(())
}

// ==========================================
// Plain-text plan
// ==========================================
pub fn render_text(report: &OptimizationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "DRYER PRODUCTION SEQUENCE PLAN");
    let _ = writeln!(out, "==============================");
    let _ = writeln!(out, "run:      {}", report.run_id);
    let _ = writeln!(out, "created:  {}", report.created_at.to_rfc3339());
    let _ = writeln!(out, "mode:     {} ({})", report.mode, report.outcome);
    let _ = writeln!(
        out,
        "searched: {} nodes in {} ms",
        report.nodes_explored, report.elapsed_ms
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "SEQUENCE");
    for job in &report.sequence {
        let _ = writeln!(
            out,
            "  {:>3}. {:<16} {:<10} {:>6.1} mm {:>10.2} kWh",
            job.position,
            job.job_id,
            job.material_family,
            job.thickness_mm,
            job.intrinsic_energy_kwh
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "TRANSITIONS");
    for t in &report.transitions {
        let _ = writeln!(
            out,
            "  {} -> {}: {:.2} kWh ({:+.1} mm{})",
            t.from,
            t.to,
            t.energy_kwh,
            t.thickness_delta_mm,
            if t.family_change { ", family change" } else { "" }
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "TOTALS");
    let _ = writeln!(out, "  total energy:      {:.2} kWh", report.total_cost.energy_kwh);
    let _ = writeln!(
        out,
        "  transition energy: {:.2} kWh",
        report.transition_cost.energy_kwh
    );
    let _ = writeln!(
        out,
        "  baseline energy:   {:.2} kWh",
        report.baseline_cost.energy_kwh
    );
    match report.savings_percent {
        Some(pct) => {
            let _ = writeln!(out, "  savings vs input:  {:.2}%", pct);
        }
        None => {
            let _ = writeln!(out, "  savings vs input:  n/a (zero baseline)");
        }
    }
    let _ = writeln!(
        out,
        "  worst case energy: {:.2} kWh",
        report.worst_case_cost.energy_kwh
    );

    if !report.recommendations.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "RECOMMENDATIONS");
        for rec in &report.recommendations {
            let _ = writeln!(out, "  - {}", rec);
        }
    }

    out
}
