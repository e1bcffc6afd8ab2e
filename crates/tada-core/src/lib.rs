//! tada-core
//!
//! Sequence normalization and featurization for the TADA transcriptional activation domain
//! classifier.
//!
//! - bring arbitrary-length protein sequences to the fixed model length (windowing / padding)
//! - featurize fixed-length sequences into `(batch, 36, 42)` tensors
//! - scale features with the stored reference statistics
//! - regroup per-window scores by input sequence
//!
//! The classifier itself is abstracted behind [`Scorer`]; see `tada-onnx-models` for the ONNX
//! Runtime implementation.
//!
//! ```ignore
//! use tada_core::{PredictConfig, Predictor, ScalerParameters};
//!
//! let scaler = ScalerParameters::from_npy("scaler_metric.npy")?;
//! let predictor = Predictor::new(my_scorer, scaler)?;
//! let results = predictor.predict(&["MDEKRGSPLLKEDAVQRSTPEEKWYHAGSLKDPEEKRSAMAA"], &PredictConfig::default())?;
//! for (sequence, windows) in results.iter() {
//!     println!("{sequence}: {:?}", windows.iter().map(|w| w.prediction.activation()).collect::<Vec<_>>());
//! }
//! ```
pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod featurize;
pub mod normalize;
pub mod predictor;
pub mod residues;
pub mod scaler;

pub use batch::{aggregate, flatten, FlatBatch, Prediction, ResultMap, ScoredSequence};
pub use cache::LazyResource;
pub use config::PredictConfig;
pub use error::{Result, TadaError};
pub use featurize::{AggregateScope, FeatureConfig, FeatureExtractor, StructurePredictor};
pub use normalize::{
    pad_sequence, sliding_window, FillMode, LengthNormalizer, Normalization, Placement,
    SequenceMap,
};
pub use predictor::{Predictor, Scorer};
pub use scaler::{ScalerParameters, SCALER_FILENAME};
