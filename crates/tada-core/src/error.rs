//! Error type shared by every pipeline stage.
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TadaError>;

#[derive(Debug, Error)]
pub enum TadaError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("sequence `{sequence}` has length {length}, at least {required} residues are required")]
    SequenceTooShort {
        sequence: String,
        length: usize,
        required: usize,
    },
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("resource not found: {}", .0.display())]
    ResourceNotFound(PathBuf),
    #[error("malformed artifact: {0}")]
    Artifact(String),
    #[error("scorer failed: {0}")]
    Scorer(#[source] anyhow::Error),
}

impl TadaError {
    pub(crate) fn too_short(sequence: &str, required: usize) -> Self {
        TadaError::SequenceTooShort {
            sequence: sequence.to_string(),
            length: sequence.len(),
            required,
        }
    }
}
