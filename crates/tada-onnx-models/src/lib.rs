//! TADA Onnx Models
//!
//! Runs the TADA activation-domain classifier through ONNX Runtime and wires it into the
//! `tada-core` pipeline.
//!
//! The loaded predictor (classifier + scaler) is cached process-wide the first time [`predict`]
//! is called. [`reset_predictor`] drops it so the next call loads again.
//!
//! ```ignore
//! std::env::set_var("TADA_MODEL_PATH", "tada.14-0.02.onnx");
//! std::env::set_var("TADA_SCALER_PATH", "scaler_metric.npy");
//! let results = tada_onnx_models::predict(&["MDEKRGSPLLKEDAVQRSTPEEKWYHAGSLKDPEEKRSAM"], &PredictConfig::default())?;
//! ```
pub mod models;
pub mod utilities;

pub use models::tada::{ModelPaths, ModelSource, TadaModel, MODEL_FILENAME, MODEL_VERSION};
pub use utilities::{features_to_f32, scores_from_output};

use std::sync::Arc;
use tada_core::{LazyResource, PredictConfig, Predictor, ResultMap, TadaError};
use tracing::info;

/// A loaded resource and the source it came from.
#[derive(Debug)]
struct Loaded<T> {
    source: ModelSource,
    value: T,
}

static PREDICTOR: LazyResource<Loaded<Predictor<TadaModel>>> = LazyResource::new();

/// Load from `source` on first use; afterwards only the same source is accepted.
fn load_from<T, F>(
    slot: &LazyResource<Loaded<T>>,
    source: &ModelSource,
    load: F,
) -> tada_core::Result<Arc<Loaded<T>>>
where
    F: FnOnce(&ModelSource) -> tada_core::Result<T>,
{
    let loaded = slot.get_or_try_init(|| {
        info!(?source, "initializing classifier");
        load(source).map(|value| Loaded {
            source: source.clone(),
            value,
        })
    })?;
    if &loaded.source != source {
        return Err(TadaError::InvalidArgument(format!(
            "classifier already loaded from {:?}; call reset_predictor before loading {:?}",
            loaded.source, source
        )));
    }
    Ok(loaded)
}

/// Predict with the process-wide classifier, loading it from [`ModelSource::from_env`] on
/// first use.
pub fn predict<T: AsRef<str>>(
    sequences: &[T],
    config: &PredictConfig,
) -> tada_core::Result<ResultMap> {
    let loaded = match PREDICTOR.get() {
        Some(loaded) => loaded,
        None => load_from(&PREDICTOR, &ModelSource::from_env()?, TadaModel::load_predictor)?,
    };
    loaded.value.predict(sequences, config)
}

/// Predict with an explicit source. The first successful load is cached; a different source
/// is rejected until [`reset_predictor`] is called.
pub fn predict_from(
    source: &ModelSource,
    sequences: &[impl AsRef<str>],
    config: &PredictConfig,
) -> tada_core::Result<ResultMap> {
    load_from(&PREDICTOR, source, TadaModel::load_predictor)?
        .value
        .predict(sequences, config)
}

pub fn is_loaded() -> bool {
    PREDICTOR.is_initialized()
}

/// Drop the cached classifier.
pub fn reset_predictor() {
    PREDICTOR.reset();
    info!("classifier cache cleared");
}
