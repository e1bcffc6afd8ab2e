use anyhow::{anyhow, Result};
use ndarray::{Array2, Array3, ArrayViewD, Ix2};

/// The exported classifier takes `float32` input.
pub fn features_to_f32(features: &Array3<f64>) -> Array3<f32> {
    features.mapv(|x| x as f32)
}

/// Copy a `(batch, 2)` model output into an owned array, checking its shape.
pub fn scores_from_output(output: ArrayViewD<f32>, batch: usize) -> Result<Array2<f32>> {
    let scores = output
        .to_owned()
        .into_dimensionality::<Ix2>()
        .map_err(|e| anyhow!("expected a 2-D score tensor: {}", e))?;
    if scores.dim() != (batch, 2) {
        return Err(anyhow!(
            "expected scores of shape ({}, 2), got {:?}",
            batch,
            scores.shape()
        ));
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn test_features_to_f32() {
        let features = Array3::from_elem((2, 36, 42), 0.5f64);
        let converted = features_to_f32(&features);
        assert_eq!(converted.shape(), &[2, 36, 42]);
        assert!(converted.iter().all(|&v| v == 0.5f32));
    }

    #[test]
    fn test_scores_from_output() {
        let output = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![0.9f32, 0.1, 0.2, 0.8]).unwrap();
        let scores = scores_from_output(output.view(), 2).unwrap();
        assert_eq!(scores[[1, 1]], 0.8);
    }

    #[test]
    fn test_scores_shape_is_checked() {
        let output = ArrayD::from_shape_vec(IxDyn(&[3]), vec![0.9f32, 0.1, 0.2]).unwrap();
        assert!(scores_from_output(output.view(), 3).is_err());
        let output = ArrayD::from_shape_vec(IxDyn(&[1, 2]), vec![0.9f32, 0.1]).unwrap();
        assert!(scores_from_output(output.view(), 2).is_err());
    }
}
