//! Secondary-structure propensity.
//!
//! The featurizer asks a [`StructurePredictor`] for one score per residue of every sub-window
//! and uses the mean. Any per-residue predictor can be plugged in; [`HelixPropensity`] is the
//! table-based default.
use crate::residues::helix_propensity;

pub trait StructurePredictor: Send + Sync {
    /// One score per residue of `window`.
    fn predict(&self, window: &str) -> Vec<f64>;

    fn mean_score(&self, window: &str) -> f64 {
        if window.is_empty() {
            return 0.0;
        }
        self.predict(window).iter().sum::<f64>() / window.len() as f64
    }
}

/// Chou-Fasman helix propensity per residue.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelixPropensity;

impl StructurePredictor for HelixPropensity {
    fn predict(&self, window: &str) -> Vec<f64> {
        window.chars().map(helix_propensity).collect()
    }
}
