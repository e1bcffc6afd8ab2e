//! Score activation domains for sequences given on the command line.
//!
//! ```text
//! TADA_MODEL_PATH=tada.14-0.02.onnx TADA_SCALER_PATH=scaler_metric.npy \
//!     cargo run --example predict -- MDEKRGSPLLKEDAVQRSTPEEKWYHAGSLKDPEEKRSAM
//! ```
//!
//! `TADA_CONFIG` may point at a JSON file with request options.
use anyhow::Result;
use tada_core::PredictConfig;
use tada_examples::init_tracing;

fn main() -> Result<()> {
    init_tracing();

    let config = match std::env::var("TADA_CONFIG") {
        Ok(path) => PredictConfig::from_json_file(path)?,
        Err(_) => PredictConfig::default(),
    };
    let sequences: Vec<String> = std::env::args().skip(1).collect();
    if sequences.is_empty() {
        anyhow::bail!("usage: predict <SEQUENCE>...");
    }

    let results = tada_onnx_models::predict(&sequences, &config)?;
    for original in results.keys() {
        let scores = results.activation_scores(original).unwrap_or_default();
        let best = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        tracing::info!(sequence = original, windows = scores.len(), best, "scored");
    }
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
