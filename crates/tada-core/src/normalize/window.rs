//! Sliding-window splitting of sequences longer than the model length.
use crate::error::{Result, TadaError};

/// Number of full windows produced for a sequence of `length` residues.
pub fn window_count(length: usize, window_length: usize, overlap: usize) -> usize {
    if window_length == 0 || overlap >= window_length || length < window_length {
        return 0;
    }
    (length - window_length) / (window_length - overlap) + 1
}

/// Split `sequence` into windows of `window_length` residues where consecutive windows share
/// `overlap` residues.
///
/// Windows start at `0, step, 2 * step, ...` with `step = window_length - overlap` while a full
/// window still fits. A trailing partial window is never emitted, so residues past the last
/// full window are dropped.
pub fn sliding_window(sequence: &str, window_length: usize, overlap: usize) -> Result<Vec<String>> {
    if window_length == 0 || window_length > sequence.len() {
        return Err(TadaError::InvalidArgument(format!(
            "window length must be a positive integer no larger than the sequence length ({}), got {window_length}",
            sequence.len()
        )));
    }
    if overlap >= window_length {
        return Err(TadaError::InvalidArgument(format!(
            "overlap must be smaller than the window length ({window_length}), got {overlap}"
        )));
    }
    if !sequence.is_ascii() {
        return Err(TadaError::InvalidArgument(
            "sequences must be ASCII amino-acid codes".to_string(),
        ));
    }

    let step = window_length - overlap;
    Ok((0..=sequence.len() - window_length)
        .step_by(step)
        .map(|start| sequence[start..start + window_length].to_string())
        .collect())
}
