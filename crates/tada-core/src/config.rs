//! Request configuration.
use crate::error::{Result, TadaError};
use crate::normalize::{FillMode, LengthNormalizer, Placement, DEFAULT_OVERLAP, DEFAULT_TARGET_LENGTH};
use bon::Builder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for one prediction request.
///
/// ```ignore
/// let config = PredictConfig::builder()
///     .strict(false)
///     .fill_mode(FillMode::Random)
///     .seed(7)
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    #[builder(default = DEFAULT_TARGET_LENGTH)]
    pub target_length: usize,
    /// Residues shared by consecutive windows of long sequences.
    #[builder(default = DEFAULT_OVERLAP)]
    pub overlap: usize,
    #[builder(default)]
    pub fill_mode: FillMode,
    #[builder(default)]
    pub placement: Placement,
    /// Reject sequences shorter than `target_length` instead of padding them.
    #[builder(default = true)]
    pub strict: bool,
    /// Seed for the padding generator. Fresh entropy when unset.
    pub seed: Option<u64>,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PredictConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TadaError::InvalidArgument(format!("invalid prediction config: {e}")))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TadaError::ResourceNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)
            .map_err(|e| TadaError::Artifact(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn normalizer(&self) -> LengthNormalizer {
        LengthNormalizer::builder()
            .target_length(self.target_length)
            .overlap(self.overlap)
            .fill_mode(self.fill_mode)
            .placement(self.placement)
            .build()
    }

    pub fn validate(&self) -> Result<()> {
        self.normalizer().validate()
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
