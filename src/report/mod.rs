// ==========================================
// Dryer Sequencer - Report Layer
// ==========================================
// Responsibility: operator-facing output of a finished run - the
// rounded report document, recommendations, and CSV/text exports.
// ==========================================

pub mod builder;
pub mod export;

pub use builder::{OptimizationReport, ReportBuilder, TransitionDetail};
pub use export::{export_all, render_text, write_sequence_csv, write_transitions_csv, ExportError};
