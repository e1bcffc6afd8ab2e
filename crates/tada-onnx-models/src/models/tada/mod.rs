//! TADA Classifier. The convolution / attention / LSTM network was exported to ONNX and is run
//! through ONNX Runtime. It takes a `(batch, 36, 42)` scaled feature tensor and returns
//! `(batch, 2)` softmax probabilities; the first column is the activation-domain class.
//!
//! # Artifacts:
//! * `tada.14-0.02.onnx` - classifier weights
//! * `scaler_metric.npy` - per-channel scaling statistics fitted with the weights
//!
//! Both can be read from local paths or fetched from a HuggingFace hub repository.
use crate::utilities::{features_to_f32, scores_from_output};
use anyhow::{anyhow, Result};
use hf_hub::{api::sync::Api, Repo, RepoType};
use ndarray::{Array2, Array3};
use ort::{
    execution_providers::CUDAExecutionProvider,
    session::{builder::GraphOptimizationLevel, Session},
};
use std::path::{Path, PathBuf};
use tada_core::{Predictor, ScalerParameters, Scorer, TadaError, SCALER_FILENAME};
use tracing::{debug, info};

pub const MODEL_VERSION: &str = "tada.14-0.02";
pub const MODEL_FILENAME: &str = "tada.14-0.02.onnx";

pub const ENV_MODEL_PATH: &str = "TADA_MODEL_PATH";
pub const ENV_SCALER_PATH: &str = "TADA_SCALER_PATH";
pub const ENV_HF_REPO: &str = "TADA_HF_REPO";
pub const ENV_HF_REVISION: &str = "TADA_HF_REVISION";

/// Where the model and scaler artifacts come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Local { model: PathBuf, scaler: PathBuf },
    HuggingFace { repo: String, revision: String },
}

/// Resolved artifact paths on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl ModelSource {
    pub fn local(model: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        ModelSource::Local {
            model: model.into(),
            scaler: scaler.into(),
        }
    }

    /// Read the source from the environment.
    ///
    /// `TADA_MODEL_PATH` + `TADA_SCALER_PATH` select local files; otherwise `TADA_HF_REPO`
    /// (and optionally `TADA_HF_REVISION`, default `main`) selects a hub repository.
    pub fn from_env() -> tada_core::Result<Self> {
        let model = std::env::var_os(ENV_MODEL_PATH);
        let scaler = std::env::var_os(ENV_SCALER_PATH);
        match (model, scaler) {
            (Some(model), Some(scaler)) => Ok(Self::local(model, scaler)),
            (Some(_), None) | (None, Some(_)) => Err(TadaError::InvalidArgument(format!(
                "{ENV_MODEL_PATH} and {ENV_SCALER_PATH} must be set together"
            ))),
            (None, None) => match std::env::var(ENV_HF_REPO) {
                Ok(repo) => Ok(ModelSource::HuggingFace {
                    repo,
                    revision: std::env::var(ENV_HF_REVISION).unwrap_or_else(|_| "main".into()),
                }),
                Err(_) => Err(TadaError::InvalidArgument(format!(
                    "no model source configured: set {ENV_MODEL_PATH} and {ENV_SCALER_PATH}, or {ENV_HF_REPO}"
                ))),
            },
        }
    }

    pub fn resolve(&self) -> tada_core::Result<ModelPaths> {
        match self {
            ModelSource::Local { model, scaler } => {
                for path in [model, scaler] {
                    if !path.exists() {
                        return Err(TadaError::ResourceNotFound(path.clone()));
                    }
                }
                Ok(ModelPaths {
                    model: model.clone(),
                    scaler: scaler.clone(),
                })
            }
            ModelSource::HuggingFace { repo, revision } => {
                Self::fetch(repo, revision).map_err(|e| TadaError::Artifact(format!("{e:#}")))
            }
        }
    }

    fn fetch(repo: &str, revision: &str) -> Result<ModelPaths> {
        let api = Api::new()?;
        let repo = api.repo(Repo::with_revision(
            repo.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));
        let model = repo.get(MODEL_FILENAME)?;
        let scaler = repo.get(SCALER_FILENAME)?;
        Ok(ModelPaths { model, scaler })
    }
}

pub struct TadaModel {
    session: Session,
    input_name: String,
    output_name: String,
}

impl std::fmt::Debug for TadaModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TadaModel")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl TadaModel {
    pub fn from_file<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        ort::init()
            .with_name("TADA")
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .commit()?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level1)?
            .with_intra_threads(1)?
            .commit_from_file(model_path)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| anyhow!("model has no inputs"))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| anyhow!("model has no outputs"))?;
        info!(
            path = %model_path.display(),
            version = MODEL_VERSION,
            %input_name,
            %output_name,
            "loaded classifier"
        );

        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }

    /// Classifier plus its scaler, ready for requests.
    pub fn load_predictor(source: &ModelSource) -> tada_core::Result<Predictor<TadaModel>> {
        let paths = source.resolve()?;
        let scaler = ScalerParameters::from_npy(&paths.scaler)?;
        let model = TadaModel::from_file(&paths.model)
            .map_err(|e| TadaError::Artifact(format!("{}: {e:#}", paths.model.display())))?;
        Predictor::new(model, scaler)
    }

    /// `(batch, 36, 42)` features -> `(batch, 2)` probabilities.
    pub fn run_model(&self, features: &Array3<f64>) -> Result<Array2<f32>> {
        let batch = features.shape()[0];
        let input = ort::value::Tensor::from_array(features_to_f32(features))?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input]?)?;
        let output = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()?;
        debug!(batch, "ran classifier");
        scores_from_output(output, batch)
    }
}

impl Scorer for TadaModel {
    fn score(&self, features: &Array3<f64>) -> tada_core::Result<Array2<f32>> {
        self.run_model(features).map_err(TadaError::Scorer)
    }
}
