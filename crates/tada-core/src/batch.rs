//! Flattening a [`SequenceMap`] into one model batch and regrouping the batch scores.
//!
//! [`flatten`] walks the map in key order and assigns every fixed-length sequence a row in the
//! batch. [`aggregate`] uses the same positions to hand each key back its own rows, one entry per
//! window, without averaging or otherwise combining scores.
use crate::error::{Result, TadaError};
use crate::normalize::SequenceMap;
use ndarray::Array2;
use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// An ordered batch of fixed-length sequences plus the rows owned by each input key.
///
/// The owner position lists partition `0..len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatBatch {
    sequences: Vec<String>,
    owners: Vec<(String, Vec<usize>)>,
    lookup: HashMap<String, usize>,
}

impl FlatBatch {
    pub fn sequences(&self) -> &[String] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Batch rows derived from `original`.
    pub fn positions_of(&self, original: &str) -> Option<&[usize]> {
        self.lookup
            .get(original)
            .map(|&i| self.owners[i].1.as_slice())
    }

    /// `(original, rows)` pairs in key order.
    pub fn owners(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.owners
            .iter()
            .map(|(key, rows)| (key.as_str(), rows.as_slice()))
    }
}

pub fn flatten(sequence_map: &SequenceMap) -> FlatBatch {
    let mut batch = FlatBatch {
        sequences: Vec::with_capacity(sequence_map.fixed_count()),
        owners: Vec::with_capacity(sequence_map.len()),
        lookup: HashMap::with_capacity(sequence_map.len()),
    };
    for entry in sequence_map {
        let start = batch.sequences.len();
        batch.sequences.extend(entry.fixed.iter().cloned());
        let rows: Vec<usize> = (start..batch.sequences.len()).collect();
        batch
            .lookup
            .insert(entry.original.clone(), batch.owners.len());
        batch.owners.push((entry.original.clone(), rows));
    }
    batch
}

/// Two-class softmax output for one fixed-length sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction(pub [f32; 2]);

impl Prediction {
    /// Probability of the activation-domain class.
    pub fn activation(&self) -> f32 {
        self.0[0]
    }

    pub fn inactive(&self) -> f32 {
        self.0[1]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSequence {
    pub sequence: String,
    pub prediction: Prediction,
}

impl Serialize for ScoredSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.sequence)?;
        tuple.serialize_element(&self.prediction)?;
        tuple.end()
    }
}

/// Per-input results in input order. Each key holds one entry per fixed-length sequence, in
/// the order the windows were generated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMap {
    entries: Vec<(String, Vec<ScoredSequence>)>,
    index: HashMap<String, usize>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, original: &str) -> Option<&[ScoredSequence]> {
        self.index
            .get(original)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ScoredSequence])> {
        self.entries
            .iter()
            .map(|(key, scored)| (key.as_str(), scored.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Activation probability of every window of `original`, in window order.
    pub fn activation_scores(&self, original: &str) -> Option<Vec<f32>> {
        self.get(original).map(|scored| {
            scored
                .iter()
                .map(|s| s.prediction.activation())
                .collect()
        })
    }

    fn push(&mut self, original: String, scored: Vec<ScoredSequence>) {
        self.index.insert(original.clone(), self.entries.len());
        self.entries.push((original, scored));
    }
}

impl Serialize for ResultMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, scored) in &self.entries {
            map.serialize_entry(key, scored)?;
        }
        map.end()
    }
}

/// Regroup `(batch, 2)` scores by input key.
pub fn aggregate(
    sequence_map: &SequenceMap,
    flat_batch: &FlatBatch,
    scores: &Array2<f32>,
) -> Result<ResultMap> {
    if scores.dim() != (flat_batch.len(), 2) {
        return Err(TadaError::ShapeMismatch(format!(
            "expected scores of shape ({}, 2), got {:?}",
            flat_batch.len(),
            scores.shape()
        )));
    }

    let mut results = ResultMap::new();
    for entry in sequence_map {
        let rows = flat_batch.positions_of(&entry.original).ok_or_else(|| {
            TadaError::ShapeMismatch(format!(
                "sequence `{}` has no rows in the batch",
                entry.original
            ))
        })?;
        if rows.len() != entry.fixed.len() {
            return Err(TadaError::ShapeMismatch(format!(
                "sequence `{}` owns {} batch rows but has {} fixed-length sequences",
                entry.original,
                rows.len(),
                entry.fixed.len()
            )));
        }
        let scored = rows
            .iter()
            .map(|&row| ScoredSequence {
                sequence: flat_batch.sequences[row].clone(),
                prediction: Prediction([scores[[row, 0]], scores[[row, 1]]]),
            })
            .collect();
        results.push(entry.original.clone(), scored);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalization;

    fn example_map() -> SequenceMap {
        let mut map = SequenceMap::new();
        map.insert(
            "ABCDEFGHIJ",
            Normalization::Windowed,
            vec!["ABCD".into(), "CDEF".into(), "EFGH".into(), "GHIJ".into()],
        );
        map.insert("AC", Normalization::Padded, vec!["GACS".into()]);
        map.insert("KLMN", Normalization::Unchanged, vec!["KLMN".into()]);
        map
    }

    #[test]
    fn test_positions_partition_the_batch() {
        let map = example_map();
        let batch = flatten(&map);
        assert_eq!(batch.len(), 6);
        assert_eq!(batch.positions_of("ABCDEFGHIJ").unwrap(), &[0, 1, 2, 3]);
        assert_eq!(batch.positions_of("AC").unwrap(), &[4]);
        assert_eq!(batch.positions_of("KLMN").unwrap(), &[5]);

        let mut seen: Vec<usize> = batch.owners().flat_map(|(_, rows)| rows.to_vec()).collect();
        seen.sort();
        assert_eq!(seen, (0..batch.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_aggregate_recovers_fixed_sequences() {
        let map = example_map();
        let batch = flatten(&map);
        // any assignment of scores to rows must leave the sequences untouched
        let scores = Array2::from_shape_fn((6, 2), |(row, col)| {
            let p = (5 - row) as f32 / 10.0;
            if col == 0 {
                p
            } else {
                1.0 - p
            }
        });
        let results = aggregate(&map, &batch, &scores).unwrap();

        for entry in &map {
            let recovered: Vec<&str> = results
                .get(&entry.original)
                .unwrap()
                .iter()
                .map(|s| s.sequence.as_str())
                .collect();
            assert_eq!(recovered, entry.fixed);
        }
        assert_eq!(
            results.activation_scores("ABCDEFGHIJ").unwrap(),
            vec![0.5, 0.4, 0.3, 0.2]
        );
        assert_eq!(results.get("KLMN").unwrap()[0].prediction.inactive(), 1.0);
        assert_eq!(
            results.keys().collect::<Vec<_>>(),
            vec!["ABCDEFGHIJ", "AC", "KLMN"]
        );
    }

    #[test]
    fn test_score_shape_is_checked() {
        let map = example_map();
        let batch = flatten(&map);
        let scores = Array2::<f32>::zeros((5, 2));
        assert!(matches!(
            aggregate(&map, &batch, &scores),
            Err(TadaError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut map = SequenceMap::new();
        map.insert("KLMN", Normalization::Unchanged, vec!["KLMN".into()]);
        map.insert("AC", Normalization::Padded, vec!["GACS".into()]);
        let batch = flatten(&map);
        let scores = ndarray::array![[0.75f32, 0.25], [0.5, 0.5]];
        let results = aggregate(&map, &batch, &scores).unwrap();
        let json = serde_json::to_string(&results).unwrap();
        assert_eq!(json, r#"{"KLMN":[["KLMN",[0.75,0.25]]],"AC":[["GACS",[0.5,0.5]]]}"#);
    }
}
