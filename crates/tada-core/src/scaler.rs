//! Feature scaling with stored reference statistics.
//!
//! The artifact is a `(properties, >= 10)` array with one row per feature channel:
//!
//! ```text
//! [mean, var, scale, n_seen, min, data_min, data_max, scale2, n_seen2, data_range]
//! ```
//!
//! Each channel is standardized with `(x - mean) / scale` and then rescaled with
//! `(x - data_min) / data_range`. The parameters are never refitted.
use crate::error::{Result, TadaError};
use ndarray::{Array2, Array3, Axis};
use ndarray_npy::ReadNpyExt;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

pub const SCALER_COLUMNS: usize = 10;
pub const SCALER_FILENAME: &str = "scaler_metric.npy";

/// Stored parameters for one feature channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelScaler {
    pub mean: f64,
    pub var: f64,
    pub scale: f64,
    pub n_samples_seen: f64,
    pub min: f64,
    pub data_min: f64,
    pub data_max: f64,
    pub scale2: f64,
    pub n_samples_seen2: f64,
    pub data_range: f64,
}

impl ChannelScaler {
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        ((x - self.mean) / self.scale - self.data_min) / self.data_range
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalerParameters {
    channels: Vec<ChannelScaler>,
}

impl ScalerParameters {
    pub fn from_array(params: Array2<f64>) -> Result<Self> {
        if params.ncols() < SCALER_COLUMNS {
            return Err(TadaError::ShapeMismatch(format!(
                "scaler parameters need at least {SCALER_COLUMNS} columns, got shape {:?}",
                params.shape()
            )));
        }
        let channels = params
            .axis_iter(Axis(0))
            .map(|row| ChannelScaler {
                mean: row[0],
                var: row[1],
                scale: row[2],
                n_samples_seen: row[3],
                min: row[4],
                data_min: row[5],
                data_max: row[6],
                scale2: row[7],
                n_samples_seen2: row[8],
                data_range: row[9],
            })
            .collect();
        Ok(Self { channels })
    }

    /// Load a `float64` `.npy` artifact.
    pub fn from_npy<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TadaError::ResourceNotFound(path.to_path_buf()));
        }
        let file = File::open(path)
            .map_err(|e| TadaError::Artifact(format!("{}: {e}", path.display())))?;
        let params = Array2::<f64>::read_npy(file)
            .map_err(|e| TadaError::Artifact(format!("{}: {e}", path.display())))?;
        let scaler = Self::from_array(params)?;
        info!(
            path = %path.display(),
            properties = scaler.n_properties(),
            "loaded scaler parameters"
        );
        Ok(scaler)
    }

    pub fn n_properties(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, property: usize) -> Option<&ChannelScaler> {
        self.channels.get(property)
    }

    /// Scale every property channel of a `(batch, positions, properties)` tensor.
    pub fn scale(&self, features: &Array3<f64>) -> Result<Array3<f64>> {
        let properties = features.len_of(Axis(2));
        if properties != self.n_properties() {
            return Err(TadaError::ShapeMismatch(format!(
                "scaler holds {} properties, the feature tensor has {properties}",
                self.n_properties()
            )));
        }
        let mut scaled = features.clone();
        for (channel, mut lane) in self.channels.iter().zip(scaled.axis_iter_mut(Axis(2))) {
            lane.mapv_inplace(|x| channel.apply(x));
        }
        debug!(shape = ?scaled.shape(), "scaled features");
        Ok(scaled)
    }
}
