//! Padding of sequences shorter than the model length.
use crate::error::{Result, TadaError};
use crate::residues::AMINO_ACIDS;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Which residues are inserted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum FillMode {
    /// Glycine / serine linker residues.
    #[default]
    #[strum(serialize = "GS")]
    #[serde(rename = "GS")]
    Gs,
    /// Any of the 20 standard amino acids.
    #[strum(serialize = "random")]
    #[serde(rename = "random")]
    Random,
}

impl FillMode {
    pub fn parse(value: &str) -> Result<Self> {
        FillMode::from_str(value).map_err(|_| {
            TadaError::InvalidArgument(format!(
                "fill mode must be either `GS` or `random`, got `{value}`"
            ))
        })
    }

    pub fn residues(&self) -> &'static [char] {
        match self {
            FillMode::Gs => &['G', 'S'],
            FillMode::Random => &AMINO_ACIDS,
        }
    }
}

/// Where the inserted residues go.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Placement {
    /// `floor(deficit / 2)` residues before the sequence, the remainder after it.
    #[default]
    #[strum(serialize = "even")]
    #[serde(rename = "even")]
    Even,
    #[strum(to_string = "N", serialize = "n_terminus")]
    #[serde(rename = "N", alias = "n_terminus")]
    NTerminus,
    #[strum(to_string = "C", serialize = "c_terminus")]
    #[serde(rename = "C", alias = "c_terminus")]
    CTerminus,
}

impl Placement {
    pub fn parse(value: &str) -> Result<Self> {
        Placement::from_str(value).map_err(|_| {
            TadaError::InvalidArgument(format!(
                "placement must be one of `even`, `N` or `C`, got `{value}`"
            ))
        })
    }

    /// Number of residues placed before and after the sequence.
    pub fn split(&self, deficit: usize) -> (usize, usize) {
        match self {
            Placement::Even => {
                let n_term = deficit / 2;
                (n_term, deficit - n_term)
            }
            Placement::NTerminus => (deficit, 0),
            Placement::CTerminus => (0, deficit),
        }
    }
}

/// Extend `sequence` to `target_length` residues.
///
/// Sequences already at or above `target_length` are returned unchanged. Each fill residue is
/// drawn independently from `rng`, so pass a seeded generator for reproducible output.
pub fn pad_sequence<R: Rng + ?Sized>(
    sequence: &str,
    fill_mode: FillMode,
    placement: Placement,
    target_length: usize,
    rng: &mut R,
) -> String {
    if sequence.len() >= target_length {
        return sequence.to_string();
    }
    let deficit = target_length - sequence.len();
    let residues = fill_mode.residues();
    let padding: String = (0..deficit)
        .map(|_| residues[rng.gen_range(0..residues.len())])
        .collect();

    let (n_term, _) = placement.split(deficit);
    let mut padded = String::with_capacity(target_length);
    padded.push_str(&padding[..n_term]);
    padded.push_str(sequence);
    padded.push_str(&padding[n_term..]);
    padded
}
