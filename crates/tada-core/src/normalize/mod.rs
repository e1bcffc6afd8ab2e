//! Length normalization.
//!
//! The classifier only accepts sequences of exactly `target_length` residues. Every input is
//! mapped to one or more fixed-length sequences:
//!
//! - longer inputs are split with a sliding window ([`sliding_window`])
//! - shorter inputs are padded ([`pad_sequence`])
//! - inputs of the right length pass through unchanged
//!
//! The resulting [`SequenceMap`] is keyed by the literal input sequence. Identical inputs
//! collapse onto one key (the first occurrence wins); callers that need one result per
//! occurrence must keep their own positional index.
mod padding;
mod window;

pub use padding::{pad_sequence, FillMode, Placement};
pub use window::{sliding_window, window_count};

use crate::error::{Result, TadaError};
use bon::Builder;
use rand::Rng;
use std::collections::HashMap;
use strum::Display;
use tracing::{debug, warn};

pub const DEFAULT_TARGET_LENGTH: usize = 40;
pub const DEFAULT_OVERLAP: usize = 39;

/// How an input sequence was brought to the target length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Normalization {
    Windowed,
    Padded,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceEntry {
    pub original: String,
    pub normalization: Normalization,
    pub fixed: Vec<String>,
}

/// Ordered mapping from each distinct input sequence to its fixed-length sequences.
///
/// Iteration follows the order in which keys were first inserted.
#[derive(Debug, Clone, Default)]
pub struct SequenceMap {
    entries: Vec<SequenceEntry>,
    index: HashMap<String, usize>,
}

impl SequenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key. Returns `false` and leaves the map untouched if the key already exists.
    pub fn insert(
        &mut self,
        original: impl Into<String>,
        normalization: Normalization,
        fixed: Vec<String>,
    ) -> bool {
        let original = original.into();
        if self.index.contains_key(&original) {
            return false;
        }
        self.index.insert(original.clone(), self.entries.len());
        self.entries.push(SequenceEntry {
            original,
            normalization,
            fixed,
        });
        true
    }

    pub fn contains(&self, original: &str) -> bool {
        self.index.contains_key(original)
    }

    pub fn get(&self, original: &str) -> Option<&SequenceEntry> {
        self.index.get(original).map(|&i| &self.entries[i])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.original.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequenceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of fixed-length sequences across all keys.
    pub fn fixed_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.fixed.len()).sum()
    }
}

impl<'a> IntoIterator for &'a SequenceMap {
    type Item = &'a SequenceEntry;
    type IntoIter = std::slice::Iter<'a, SequenceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Dispatches each sequence to the windower, the padder or pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct LengthNormalizer {
    #[builder(default = DEFAULT_TARGET_LENGTH)]
    target_length: usize,
    #[builder(default = DEFAULT_OVERLAP)]
    overlap: usize,
    #[builder(default)]
    fill_mode: FillMode,
    #[builder(default)]
    placement: Placement,
}

impl Default for LengthNormalizer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LengthNormalizer {
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_length == 0 {
            return Err(TadaError::InvalidArgument(
                "target length must be a positive integer".to_string(),
            ));
        }
        if self.overlap >= self.target_length {
            return Err(TadaError::InvalidArgument(format!(
                "overlap must be smaller than the target length ({}), got {}",
                self.target_length, self.overlap
            )));
        }
        Ok(())
    }

    /// Bring every sequence to `target_length`.
    ///
    /// `rng` is only drawn from for sequences that need padding.
    pub fn normalize<S: AsRef<str>, R: Rng + ?Sized>(
        &self,
        sequences: &[S],
        rng: &mut R,
    ) -> Result<SequenceMap> {
        self.validate()?;

        let off_length = sequences
            .iter()
            .filter(|s| s.as_ref().len() != self.target_length)
            .count();
        if off_length > 0 {
            warn!(
                off_length,
                target_length = self.target_length,
                "sequences differ from the model length and will be windowed or padded"
            );
        }

        let mut map = SequenceMap::new();
        for sequence in sequences {
            let sequence = sequence.as_ref();
            if map.contains(sequence) {
                continue;
            }
            let (normalization, fixed) = match sequence.len() {
                len if len > self.target_length => (
                    Normalization::Windowed,
                    sliding_window(sequence, self.target_length, self.overlap)?,
                ),
                len if len < self.target_length => (
                    Normalization::Padded,
                    vec![pad_sequence(
                        sequence,
                        self.fill_mode,
                        self.placement,
                        self.target_length,
                        rng,
                    )],
                ),
                _ => (Normalization::Unchanged, vec![sequence.to_string()]),
            };
            map.insert(sequence, normalization, fixed);
        }
        debug!(
            inputs = sequences.len(),
            keys = map.len(),
            fixed = map.fixed_count(),
            "normalized sequence lengths"
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn residues(len: usize) -> String {
        "MDEFGHIKLNPQRSTVWYAC".chars().cycle().take(len).collect()
    }

    #[test]
    fn test_exact_length_passes_through() {
        let sequence = residues(40);
        let map = LengthNormalizer::default()
            .normalize(&[sequence.clone()], &mut StdRng::seed_from_u64(0))
            .unwrap();
        let entry = map.get(&sequence).unwrap();
        assert_eq!(entry.normalization, Normalization::Unchanged);
        assert_eq!(entry.fixed, vec![sequence]);
    }

    #[test]
    fn test_classes_are_dispatched() {
        let long = residues(45);
        let short = residues(12);
        let exact = residues(40);
        let map = LengthNormalizer::default()
            .normalize(
                &[long.as_str(), short.as_str(), exact.as_str()],
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.fixed_count(), 6 + 1 + 1);
        assert_eq!(map.get(&long).unwrap().normalization, Normalization::Windowed);
        assert_eq!(map.get(&short).unwrap().normalization, Normalization::Padded);
        assert!(map
            .iter()
            .flat_map(|entry| entry.fixed.iter())
            .all(|fixed| fixed.len() == 40));
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec![long.as_str(), short.as_str(), exact.as_str()]
        );
    }

    #[test]
    fn test_duplicates_collapse_to_first_occurrence() {
        let short = residues(10);
        let other = residues(40);
        let map = LengthNormalizer::builder()
            .fill_mode(FillMode::Random)
            .build()
            .normalize(
                &[short.clone(), other.clone(), short.clone()],
                &mut StdRng::seed_from_u64(5),
            )
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec![short.as_str(), other.as_str()]);
    }

    #[test]
    fn test_custom_target_length() {
        let map = LengthNormalizer::builder()
            .target_length(4)
            .overlap(2)
            .placement(Placement::CTerminus)
            .build()
            .normalize(&["ACDEFGHIKL", "AC"], &mut StdRng::seed_from_u64(2))
            .unwrap();
        assert_eq!(
            map.get("ACDEFGHIKL").unwrap().fixed,
            vec!["ACDE", "DEFG", "FGHI", "HIKL"]
        );
        assert!(map.get("AC").unwrap().fixed[0].starts_with("AC"));
    }

    #[test]
    fn test_invalid_overlap_is_rejected() {
        let normalizer = LengthNormalizer::builder().overlap(40).build();
        let result = normalizer.normalize(&["ACDE"], &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(TadaError::InvalidArgument(_))));

        let normalizer = LengthNormalizer::builder().target_length(0).overlap(0).build();
        assert!(normalizer.validate().is_err());
    }

    #[test]
    fn test_empty_input() {
        let map = LengthNormalizer::default()
            .normalize::<&str, _>(&[], &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(map.is_empty());
        assert_eq!(map.fixed_count(), 0);
    }
}
