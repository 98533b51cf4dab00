// ==========================================
// Dryer Sequencer - Optimization Database Loader
// ==========================================
// Responsibility: loading the prebuilt optimization database document
// (product profiles + transition matrix, produced offline from
// historical meter data) and turning a weekly demand map into a job
// set plus a cost model the optimizer can run against.
// ==========================================

use crate::cost::profile::ProfileCostModel;
use crate::cost::table::TransitionTable;
use crate::domain::job::Job;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Dryer takt per wagon, minutes
pub const TAKT_MINUTES: f64 = 65.0;

// ==========================================
// Error type
// ==========================================
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("io error reading database: {0}")]
    Io(#[from] std::io::Error),

    #[error("database parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown product in demand: {0}")]
    UnknownProduct(String),

    #[error("transition matrix missing pair {from} -> {to}")]
    MissingTransition { from: String, to: String },

    #[error("negative transition cost {cost} for {from} -> {to}")]
    NegativeCost { from: String, to: String, cost: f64 },

    #[error("self transition for {product} must be zero, got {cost}")]
    SelfTransition { product: String, cost: f64 },
}

pub type DatasetResult<T> = Result<T, DatasetError>;

// ==========================================
// Document shapes
// ==========================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub total_products: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneProfile {
    #[serde(default)]
    pub kwh_per_m3: f64,
    #[serde(default)]
    pub avg_energy_kwh: Option<f64>,
    #[serde(default)]
    pub total_energy_kwh: Option<f64>,
    #[serde(default)]
    pub total_hours: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductProfile {
    /// Material family ("type" in the source document)
    #[serde(rename = "type")]
    pub family: String,
    pub thickness_mm: f64,
    pub avg_kwh_per_m3: f64,
    pub kwh_per_wagon: f64,
    #[serde(default)]
    pub total_wagons_produced: Option<u32>,
    #[serde(default)]
    pub zone_profiles: BTreeMap<String, ZoneProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationDatabase {
    #[serde(default)]
    pub metadata: DatabaseMetadata,
    pub product_profiles: BTreeMap<String, ProductProfile>,
    pub transition_matrix: BTreeMap<String, BTreeMap<String, f64>>,
}

impl OptimizationDatabase {
    /// # Errors
    /// `Io` when the file cannot be read, `Parse` on malformed JSON,
    /// plus any `validate` failure
    pub fn from_path(path: &Path) -> DatasetResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let db = Self::from_str(&raw)?;
        info!(
            path = %path.display(),
            products = db.product_profiles.len(),
            "optimization database loaded"
        );
        Ok(db)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(raw: &str) -> DatasetResult<Self> {
        let db: Self = serde_json::from_str(raw)?;
        db.validate()?;
        Ok(db)
    }

    /// Structural checks on a parsed database:
    /// - every ordered profile pair appears in the matrix
    /// - costs are non-negative
    /// - self-transitions carry zero cost
    pub fn validate(&self) -> DatasetResult<()> {
        for from in self.product_profiles.keys() {
            let row = self
                .transition_matrix
                .get(from)
                .ok_or_else(|| DatasetError::MissingTransition {
                    from: from.clone(),
                    to: "*".to_string(),
                })?;
            for to in self.product_profiles.keys() {
                let cost = *row.get(to).ok_or_else(|| DatasetError::MissingTransition {
                    from: from.clone(),
                    to: to.clone(),
                })?;
                if cost < 0.0 {
                    return Err(DatasetError::NegativeCost {
                        from: from.clone(),
                        to: to.clone(),
                        cost,
                    });
                }
                if from == to && cost != 0.0 {
                    return Err(DatasetError::SelfTransition {
                        product: from.clone(),
                        cost,
                    });
                }
            }
        }
        debug!(products = self.product_profiles.len(), "database validated");
        Ok(())
    }

    /// Build the precomputed-matrix cost model. Self pairs are dropped
    /// (the optimizer never queries them).
    pub fn transition_table(&self) -> TransitionTable {
        let mut table = TransitionTable::new();
        for (from, row) in &self.transition_matrix {
            for (to, &cost) in row {
                if from != to {
                    // validate() already rejected negatives and self costs
                    let _ = table.insert_energy(from, to, cost);
                }
            }
        }
        table
    }

    /// Parametric fallback model seeded with the per-zone specific
    /// energies of the product profiles; used when a database ships
    /// profiles but no measured transition matrix.
    pub fn profile_model(&self) -> ProfileCostModel {
        let mut model = ProfileCostModel::new();
        for (product, profile) in &self.product_profiles {
            let zones: BTreeMap<String, f64> = profile
                .zone_profiles
                .iter()
                .map(|(zone, z)| (zone.clone(), z.kwh_per_m3))
                .collect();
            if !zones.is_empty() {
                model = model.with_zone_profile(product.clone(), zones);
            }
        }
        model
    }

    /// Expand a demand map (product -> wagons this cycle) into jobs.
    ///
    /// Intrinsic energy is `kwh_per_wagon x wagons`; intrinsic duration
    /// follows the dryer takt. Products with zero demand are skipped.
    ///
    /// # Errors
    /// `UnknownProduct` when the demand names a product without a profile
    pub fn jobs_for_demand(&self, demand: &BTreeMap<String, u32>) -> DatasetResult<Vec<Job>> {
        let mut jobs = Vec::with_capacity(demand.len());
        for (product, &wagons) in demand {
            if wagons == 0 {
                continue;
            }
            let profile = self
                .product_profiles
                .get(product)
                .ok_or_else(|| DatasetError::UnknownProduct(product.clone()))?;

            jobs.push(Job {
                job_id: product.clone(),
                material_family: profile.family.clone(),
                recipe_class: None,
                thickness_mm: profile.thickness_mm,
                target_moisture_pct: None,
                temperature_c: None,
                intrinsic_energy_kwh: profile.kwh_per_wagon * f64::from(wagons),
                intrinsic_duration_h: f64::from(wagons) * TAKT_MINUTES / 60.0,
                specific_energy_kwh_per_m3: Some(profile.avg_kwh_per_m3),
                wagons: Some(wagons),
            });
        }
        Ok(jobs)
    }
}
