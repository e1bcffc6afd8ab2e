//! Sequence Featurizer for the activation-domain classifier
//!
//! Every fixed-length sequence is scanned with a short sub-window (5 residues, step 1) and each
//! sub-window position gets a vector of 42 property channels:
//!
//! | channels | content |
//! |----------|---------|
//! | 0-1      | kappa, omega of the whole sequence (broadcast) |
//! | 2-9      | hydropathy (KD, WW), NCPR, disorder-promoting fraction, FCR, mean net charge, fraction negative, fraction positive |
//! | 10-20    | residue-class counts (see [`ResidueClass`]) |
//! | 21       | mean secondary-structure propensity |
//! | 22-41    | per-residue counts in [`COUNT_ORDER`] |
//!
//! The output tensor has shape `(batch, positions, properties)`.
mod patterning;
mod properties;
mod structure;

pub use patterning::{kappa, omega, UNDEFINED};
pub use properties::{Aggregates, AGGREGATE_COUNT};
pub use structure::{HelixPropensity, StructurePredictor};

use crate::error::{Result, TadaError};
use crate::normalize::DEFAULT_TARGET_LENGTH;
use crate::residues::{first_invalid, ResidueClass, COUNT_ORDER};
use bon::Builder;
use ndarray::{Array3, ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_SUB_WINDOW: usize = 5;
pub const DEFAULT_STEP: usize = 1;
pub const DEFAULT_PROPERTIES: usize = 42;

pub const KAPPA: usize = 0;
pub const OMEGA: usize = 1;
pub const AGGREGATES: usize = 2;
pub const CLASS_COUNTS: usize = AGGREGATES + AGGREGATE_COUNT;
pub const STRUCTURE: usize = CLASS_COUNTS + 11;
pub const RESIDUE_COUNTS: usize = STRUCTURE + 1;
/// Number of channels actually computed; the rest of the property axis stays zero.
pub const COMPUTED_CHANNELS: usize = RESIDUE_COUNTS + COUNT_ORDER.len();

/// Where the composition / charge / hydropathy aggregates are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateScope {
    /// Once per sub-window. This is what the published scaler artifact was fitted on.
    #[default]
    PerWindow,
    /// Once per fixed-length sequence, broadcast to every position.
    PerSequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    #[builder(default = DEFAULT_SUB_WINDOW)]
    pub sub_window: usize,
    #[builder(default = DEFAULT_STEP)]
    pub step: usize,
    #[builder(default = DEFAULT_TARGET_LENGTH)]
    pub length: usize,
    #[builder(default = DEFAULT_PROPERTIES)]
    pub properties: usize,
    #[builder(default)]
    pub aggregate_scope: AggregateScope,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FeatureConfig {
    /// Sub-window positions per sequence: `(length - sub_window) / step + 1`.
    pub fn positions(&self) -> Result<usize> {
        self.validate()?;
        Ok((self.length - self.sub_window) / self.step + 1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sub_window == 0 || self.step == 0 {
            return Err(TadaError::InvalidArgument(
                "sub-window length and step must be positive".to_string(),
            ));
        }
        if self.length < self.sub_window {
            return Err(TadaError::InvalidArgument(format!(
                "sequence length {} is shorter than the sub-window {}",
                self.length, self.sub_window
            )));
        }
        if self.properties < COMPUTED_CHANNELS {
            return Err(TadaError::InvalidArgument(format!(
                "property axis must hold at least {COMPUTED_CHANNELS} channels, got {}",
                self.properties
            )));
        }
        Ok(())
    }
}

/// Human-readable name of every computed channel, in channel order.
pub fn channel_names() -> Vec<String> {
    let mut names: Vec<String> = [
        "kappa",
        "omega",
        "hydropathy",
        "hydropathy_ww",
        "ncpr",
        "disorder_promoting",
        "fcr",
        "mean_net_charge",
        "fraction_negative",
        "fraction_positive",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    names.extend(ResidueClass::all().map(|class| class.to_string()));
    names.push("helix_propensity".to_string());
    names.extend(COUNT_ORDER.iter().map(|aa| format!("count_{aa}")));
    names
}

#[derive(Clone)]
pub struct FeatureExtractor {
    config: FeatureConfig,
    structure: Arc<dyn StructurePredictor>,
}

impl fmt::Debug for FeatureExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureExtractor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            config: FeatureConfig::default(),
            structure: Arc::new(HelixPropensity),
        }
    }
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn with_structure_predictor(mut self, predictor: impl StructurePredictor + 'static) -> Self {
        self.structure = Arc::new(predictor);
        self
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Feature tensor of shape `(sequences.len(), positions, properties)`.
    pub fn extract<S: AsRef<str>>(&self, sequences: &[S]) -> Result<Array3<f64>> {
        let positions = self.config.positions()?;
        let mut features = Array3::zeros((sequences.len(), positions, self.config.properties));
        for (sequence, view) in sequences.iter().zip(features.axis_iter_mut(Axis(0))) {
            self.featurize(sequence.as_ref(), view)?;
        }
        debug!(
            batch = sequences.len(),
            positions,
            properties = self.config.properties,
            "extracted features"
        );
        Ok(features)
    }

    fn check(&self, sequence: &str) -> Result<usize> {
        let FeatureConfig {
            sub_window, step, ..
        } = self.config;
        if sequence.len() < sub_window {
            return Err(TadaError::too_short(sequence, sub_window));
        }
        if let Some((position, residue)) = first_invalid(sequence) {
            return Err(TadaError::InvalidArgument(format!(
                "non-standard residue `{residue}` at position {position} of `{sequence}`"
            )));
        }
        let capacity = self.config.positions()?;
        let positions = (sequence.len() - sub_window) / step + 1;
        if positions > capacity {
            return Err(TadaError::ShapeMismatch(format!(
                "sequence of length {} yields {positions} positions, the tensor holds {capacity}",
                sequence.len()
            )));
        }
        Ok(positions)
    }

    fn featurize(&self, sequence: &str, mut out: ArrayViewMut2<f64>) -> Result<()> {
        let positions = self.check(sequence)?;
        let FeatureConfig {
            sub_window,
            step,
            aggregate_scope,
            ..
        } = self.config;

        let kappa = kappa(sequence);
        let omega = omega(sequence);
        let whole = match aggregate_scope {
            AggregateScope::PerSequence => Some(Aggregates::compute(sequence)),
            AggregateScope::PerWindow => None,
        };

        for (position, start) in (0..positions).map(|p| (p, p * step)) {
            let window = &sequence[start..start + sub_window];
            let mut row = out.row_mut(position);
            row[KAPPA] = kappa;
            row[OMEGA] = omega;

            let aggregates = whole.unwrap_or_else(|| Aggregates::compute(window));
            for (k, value) in aggregates.to_array().into_iter().enumerate() {
                row[AGGREGATES + k] = value;
            }
            for (k, class) in ResidueClass::all().enumerate() {
                row[CLASS_COUNTS + k] = class.count(window) as f64;
            }
            row[STRUCTURE] = self.structure.mean_score(window);
            for (k, aa) in COUNT_ORDER.iter().enumerate() {
                row[RESIDUE_COUNTS + k] = window.chars().filter(|c| c == aa).count() as f64;
            }
        }
        Ok(())
    }
}
