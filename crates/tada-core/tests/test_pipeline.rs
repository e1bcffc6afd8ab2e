use ndarray::{Array2, Array3, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tada_core::{
    aggregate, flatten, FillMode, LengthNormalizer, Normalization, Placement, PredictConfig,
    Predictor, Result, ScalerParameters, Scorer, TadaError,
};
use tada_test_data::TestFile;

const TAD_40: &str = "MDEKRGSPLLKEDAVQRSTPEEKWYHAGSLKDPEEKRSAM";

/// Counts calls and the rows it was asked to score.
#[derive(Default)]
struct CountingScorer {
    calls: AtomicUsize,
    rows: AtomicUsize,
}

impl Scorer for CountingScorer {
    fn score(&self, features: &Array3<f64>) -> Result<Array2<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let batch = features.len_of(Axis(0));
        self.rows.fetch_add(batch, Ordering::SeqCst);
        Ok(Array2::from_shape_fn((batch, 2), |(row, col)| {
            let p = 1.0 / (row as f32 + 2.0);
            if col == 0 {
                p
            } else {
                1.0 - p
            }
        }))
    }
}

fn load_scaler(file: TestFile) -> ScalerParameters {
    let (path, _handle) = file.create_temp().unwrap();
    ScalerParameters::from_npy(&path).unwrap()
}

#[test]
fn test_scaler_fixture_loads() {
    let scaler = load_scaler(TestFile::scaler_reference());
    assert_eq!(scaler.n_properties(), 42);
    let channel = scaler.channel(10).unwrap();
    assert!((channel.mean - 5.25).abs() < 1e-12);
    assert!((channel.scale - 2.0).abs() < 1e-12);
    assert!((channel.data_range - (channel.data_max - channel.data_min)).abs() < 1e-12);
}

#[test]
fn test_scaler_fixture_idempotence() {
    let features = Array3::from_shape_fn((3, 36, 42), |(b, p, c)| ((b + p + c) % 7) as f64);

    let identity = load_scaler(TestFile::scaler_identity());
    let once = identity.scale(&features).unwrap();
    assert_eq!(once, features);
    assert_eq!(identity.scale(&once).unwrap(), once);

    let reference = load_scaler(TestFile::scaler_reference());
    let once = reference.scale(&features).unwrap();
    assert_eq!(once.shape(), features.shape());
    assert_ne!(reference.scale(&once).unwrap(), once);
}

#[test]
fn test_scaler_rejects_other_property_counts() {
    let scaler = load_scaler(TestFile::scaler_identity());
    let features = Array3::<f64>::zeros((1, 36, 41));
    assert!(matches!(
        scaler.scale(&features),
        Err(TadaError::ShapeMismatch(_))
    ));
}

#[test]
fn test_flatten_then_aggregate_recovers_every_key() {
    let long: String = TAD_40.chars().cycle().take(53).collect();
    let short = &TAD_40[..17];
    let sequences = [long.as_str(), short, TAD_40];
    let map = LengthNormalizer::builder()
        .overlap(35)
        .build()
        .normalize(&sequences, &mut StdRng::seed_from_u64(1))
        .unwrap();
    let batch = flatten(&map);
    assert_eq!(batch.len(), map.fixed_count());

    let mut probabilities: Vec<f32> = (0..batch.len()).map(|i| i as f32 / 10.0).collect();
    probabilities.shuffle(&mut StdRng::seed_from_u64(2));
    let scores = Array2::from_shape_fn((batch.len(), 2), |(row, col)| {
        if col == 0 {
            probabilities[row]
        } else {
            1.0 - probabilities[row]
        }
    });
    let results = aggregate(&map, &batch, &scores).unwrap();

    for entry in &map {
        let recovered: Vec<String> = results
            .get(&entry.original)
            .unwrap()
            .iter()
            .map(|scored| scored.sequence.clone())
            .collect();
        assert_eq!(recovered, entry.fixed);
    }
    // (53 - 40) / 5 + 1 windows
    assert_eq!(map.get(&long).unwrap().fixed.len(), 3);
}

#[test]
fn test_end_to_end_single_batch() {
    let scorer = Arc::new(CountingScorer::default());
    let scaler = load_scaler(TestFile::scaler_reference());
    let predictor = Predictor::new(Arc::clone(&scorer), scaler).unwrap();

    let long: String = TAD_40.chars().cycle().take(45).collect();
    let short = &TAD_40[..25];
    let config = PredictConfig::builder().strict(false).seed(11).build();
    let results = predictor
        .predict(&[long.as_str(), short, TAD_40], &config)
        .unwrap();

    assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(scorer.rows.load(Ordering::SeqCst), 6 + 1 + 1);
    assert_eq!(results.len(), 3);

    let windows = results.get(&long).unwrap();
    assert_eq!(windows.len(), 6);
    for (i, window) in windows.iter().enumerate() {
        assert_eq!(window.sequence, &long[i..i + 40]);
        assert_eq!(window.prediction.activation(), 1.0 / (i as f32 + 2.0));
    }

    let padded = &results.get(short).unwrap()[0].sequence;
    assert_eq!(padded.len(), 40);
    assert_eq!(&padded[7..32], short);
    assert!(padded[..7].chars().chain(padded[32..].chars()).all(|c| c == 'G' || c == 'S'));

    assert_eq!(results.get(TAD_40).unwrap()[0].sequence, TAD_40);
}

#[test]
fn test_seeded_requests_are_reproducible() {
    let scaler = Arc::new(load_scaler(TestFile::scaler_identity()));
    let predictor = Predictor::new(CountingScorer::default(), Arc::clone(&scaler)).unwrap();
    let config = PredictConfig::builder()
        .strict(false)
        .fill_mode(FillMode::Random)
        .placement(Placement::NTerminus)
        .seed(99)
        .build();
    let first = predictor.predict(&["MKVLA", "WWWWWWWW"], &config).unwrap();
    let second = predictor.predict(&["MKVLA", "WWWWWWWW"], &config).unwrap();
    assert_eq!(first, second);
    assert!(first.get("MKVLA").unwrap()[0].sequence.ends_with("MKVLA"));
}

#[test]
fn test_duplicate_inputs_share_one_result() {
    let predictor = Predictor::new(
        CountingScorer::default(),
        load_scaler(TestFile::scaler_identity()),
    )
    .unwrap();
    let results = predictor
        .predict(&[TAD_40, TAD_40, TAD_40], &PredictConfig::default())
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.get(TAD_40).unwrap().len(), 1);
    assert_eq!(predictor.scorer().rows.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_validation_never_reaches_the_scorer() {
    let predictor = Predictor::new(
        CountingScorer::default(),
        load_scaler(TestFile::scaler_identity()),
    )
    .unwrap();
    let result = predictor.predict(&[TAD_40, "ACDEF"], &PredictConfig::default());
    assert!(matches!(result, Err(TadaError::SequenceTooShort { .. })));
    assert_eq!(predictor.scorer().calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_exact_length_maps_to_itself() {
    let map = LengthNormalizer::default()
        .normalize(&[TAD_40], &mut StdRng::seed_from_u64(0))
        .unwrap();
    let entry = map.get(TAD_40).unwrap();
    assert_eq!(entry.normalization, Normalization::Unchanged);
    assert_eq!(entry.fixed, vec![TAD_40.to_string()]);
}
