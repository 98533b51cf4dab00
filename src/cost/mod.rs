// ==========================================
// Dryer Sequencer - Cost Model Layer
// ==========================================
// Supplies the changeover/intrinsic cost contract the search engines
// optimize against. Backends: measured transition table or parametric
// profile estimate. Caching is per-run and explicitly owned.
// ==========================================

pub mod cache;
pub mod model;
pub mod profile;
pub mod table;

// Re-export the cost seam
pub use cache::CostCache;
pub use model::CostModel;
pub use profile::ProfileCostModel;
pub use table::TransitionTable;
