//! The prediction pipeline.
//!
//! ```text
//! sequences -> LengthNormalizer -> SequenceMap -> flatten -> FlatBatch
//!           -> FeatureExtractor -> ScalerParameters -> Scorer -> aggregate -> ResultMap
//! ```
//!
//! The whole request runs synchronously and the scorer is called once with the full batch.
//! Any validation failure aborts the request; no partial results are returned.
use crate::batch::{aggregate, flatten, ResultMap};
use crate::config::PredictConfig;
use crate::error::{Result, TadaError};
use crate::featurize::FeatureExtractor;
use crate::residues::first_invalid;
use crate::scaler::ScalerParameters;
use ndarray::{Array2, Array3};
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// The classifier: `(batch, positions, properties)` features in, `(batch, 2)` class
/// probabilities out.
pub trait Scorer: Send + Sync {
    fn score(&self, features: &Array3<f64>) -> Result<Array2<f32>>;
}

impl<S: Scorer + ?Sized> Scorer for Arc<S> {
    fn score(&self, features: &Array3<f64>) -> Result<Array2<f32>> {
        (**self).score(features)
    }
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn score(&self, features: &Array3<f64>) -> Result<Array2<f32>> {
        (**self).score(features)
    }
}

#[derive(Debug)]
pub struct Predictor<S> {
    scorer: S,
    scaler: Arc<ScalerParameters>,
    extractor: FeatureExtractor,
}

impl<S: Scorer> Predictor<S> {
    pub fn new(scorer: S, scaler: impl Into<Arc<ScalerParameters>>) -> Result<Self> {
        Self {
            scorer,
            scaler: scaler.into(),
            extractor: FeatureExtractor::default(),
        }
        .checked()
    }

    pub fn with_extractor(self, extractor: FeatureExtractor) -> Result<Self> {
        Self { extractor, ..self }.checked()
    }

    fn checked(self) -> Result<Self> {
        let properties = self.extractor.config().properties;
        if self.scaler.n_properties() != properties {
            return Err(TadaError::ShapeMismatch(format!(
                "scaler holds {} properties, the featurizer produces {properties}",
                self.scaler.n_properties()
            )));
        }
        Ok(self)
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn scaler(&self) -> &ScalerParameters {
        &self.scaler
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Score sequences that are already at the model length.
    pub fn score_fixed<T: AsRef<str>>(&self, fixed: &[T]) -> Result<Array2<f32>> {
        let features = self.extractor.extract(fixed)?;
        let scaled = self.scaler.scale(&features)?;
        let scores = self.scorer.score(&scaled)?;
        if scores.dim() != (fixed.len(), 2) {
            return Err(TadaError::ShapeMismatch(format!(
                "scorer returned shape {:?} for a batch of {}",
                scores.shape(),
                fixed.len()
            )));
        }
        Ok(scores)
    }

    /// Predict with the padding generator described by `config.seed`.
    pub fn predict<T: AsRef<str>>(&self, sequences: &[T], config: &PredictConfig) -> Result<ResultMap> {
        self.predict_with_rng(sequences, config, &mut config.rng())
    }

    pub fn predict_with_rng<T: AsRef<str>, R: Rng + ?Sized>(
        &self,
        sequences: &[T],
        config: &PredictConfig,
        rng: &mut R,
    ) -> Result<ResultMap> {
        config.validate()?;
        let length = self.extractor.config().length;
        if config.target_length != length {
            return Err(TadaError::ShapeMismatch(format!(
                "target length {} does not match the {length} residues the featurizer expects",
                config.target_length
            )));
        }
        for sequence in sequences {
            let sequence = sequence.as_ref();
            if let Some((position, residue)) = first_invalid(sequence) {
                return Err(TadaError::InvalidArgument(format!(
                    "non-standard residue `{residue}` at position {position} of `{sequence}`"
                )));
            }
            if config.strict && sequence.len() < config.target_length {
                return Err(TadaError::too_short(sequence, config.target_length));
            }
        }

        let sequence_map = config.normalizer().normalize(sequences, rng)?;
        let batch = flatten(&sequence_map);
        if batch.is_empty() {
            return Ok(ResultMap::new());
        }
        debug!(
            sequences = sequence_map.len(),
            batch = batch.len(),
            "scoring batch"
        );
        let scores = self.score_fixed(batch.sequences())?;
        aggregate(&sequence_map, &batch, &scores)
    }
}
