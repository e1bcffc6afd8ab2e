//! # Residues
//!
//! Lookup tables for the 20 standard amino acids:
//!
//! - the alphabet used for validation and random padding
//! - physicochemical residue classes counted by the featurizer
//! - per-residue hydropathy scales (Kyte-Doolittle, Wimley-White)
//! - charge and disorder-promoting membership
//!
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The 20 standard amino acids in alphabetical order.
pub const AMINO_ACIDS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W',
    'Y',
];

/// Order of the per-residue count channels in the feature tensor.
pub const COUNT_ORDER: [char; 20] = [
    'R', 'K', 'D', 'E', 'Q', 'N', 'H', 'S', 'T', 'Y', 'C', 'W', 'M', 'A', 'I', 'L', 'F', 'V', 'P',
    'G',
];

pub fn is_standard(aa: char) -> bool {
    AMINO_ACIDS.contains(&aa)
}

/// Position of the first non-standard residue, if any.
pub fn first_invalid(sequence: &str) -> Option<(usize, char)> {
    sequence.chars().enumerate().find(|(_, aa)| !is_standard(*aa))
}

/// Overlapping physicochemical classes. Iteration order is the channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ResidueClass {
    Aliphatic,
    Aromatic,
    Branched,
    Charged,
    Negative,
    Phosphorylatable,
    Polar,
    Hydrophobic,
    Positive,
    SulfurContaining,
    Tiny,
}

impl ResidueClass {
    #[rustfmt::skip]
    pub const fn members(&self) -> &'static [char] {
        match self {
            Self::Aliphatic        => &['I', 'V', 'L', 'A'],
            Self::Aromatic         => &['W', 'F', 'Y'],
            Self::Branched         => &['V', 'I', 'T'],
            Self::Charged          => &['K', 'R', 'H', 'D', 'E'],
            Self::Negative         => &['D', 'E'],
            Self::Phosphorylatable => &['S', 'T', 'Y'],
            Self::Polar            => &['R', 'K', 'D', 'E', 'Q', 'N', 'Y'],
            Self::Hydrophobic      => &['W', 'F', 'L', 'V', 'I', 'C', 'M'],
            Self::Positive         => &['K', 'R', 'H'],
            Self::SulfurContaining => &['M', 'C'],
            Self::Tiny             => &['G', 'A', 'S', 'P'],
        }
    }

    pub fn contains(&self, aa: char) -> bool {
        self.members().contains(&aa)
    }

    pub fn count(&self, residues: &str) -> usize {
        residues.chars().filter(|&aa| self.contains(aa)).count()
    }

    pub fn all() -> impl Iterator<Item = ResidueClass> {
        ResidueClass::iter()
    }
}

#[rustfmt::skip]
/// Kyte-Doolittle hydropathy shifted by +4.5 so every residue lies in `[0, 9]`.
pub fn kyte_doolittle(aa: char) -> f64 {
    let kd = match aa {
        'A' =>  1.8, 'R' => -4.5, 'N' => -3.5, 'D' => -3.5,
        'C' =>  2.5, 'Q' => -3.5, 'E' => -3.5, 'G' => -0.4,
        'H' => -3.2, 'I' =>  4.5, 'L' =>  3.8, 'K' => -3.9,
        'M' =>  1.9, 'F' =>  2.8, 'P' => -1.6, 'S' => -0.8,
        'T' => -0.7, 'W' => -0.9, 'Y' => -1.3, 'V' =>  4.2,
        _   =>  0.0,
    };
    kd + 4.5
}

#[rustfmt::skip]
/// Wimley-White whole-residue octanol scale (kcal/mol).
pub fn wimley_white(aa: char) -> f64 {
    match aa {
        'A' =>  0.50, 'R' =>  1.81, 'N' =>  0.85, 'D' =>  3.64,
        'C' => -0.02, 'Q' =>  0.77, 'E' =>  3.63, 'G' =>  1.15,
        'H' =>  2.33, 'I' => -1.12, 'L' => -1.25, 'K' =>  2.80,
        'M' => -0.67, 'F' => -1.71, 'P' =>  0.14, 'S' =>  0.46,
        'T' =>  0.25, 'W' => -2.09, 'Y' => -0.71, 'V' => -0.46,
        _   =>  0.0,
    }
}

#[rustfmt::skip]
/// Chou-Fasman alpha-helix propensity.
pub fn helix_propensity(aa: char) -> f64 {
    match aa {
        'A' => 1.42, 'R' => 0.98, 'N' => 0.67, 'D' => 1.01,
        'C' => 0.70, 'Q' => 1.11, 'E' => 1.51, 'G' => 0.57,
        'H' => 1.00, 'I' => 1.08, 'L' => 1.21, 'K' => 1.16,
        'M' => 1.45, 'F' => 1.13, 'P' => 0.57, 'S' => 0.77,
        'T' => 0.83, 'W' => 1.08, 'Y' => 0.69, 'V' => 1.06,
        _   => 0.0,
    }
}

/// Residues counted as charged by the patterning and charge metrics (His excluded).
pub fn is_positive(aa: char) -> bool {
    matches!(aa, 'K' | 'R')
}

pub fn is_negative(aa: char) -> bool {
    matches!(aa, 'D' | 'E')
}

pub fn is_disorder_promoting(aa: char) -> bool {
    matches!(
        aa,
        'T' | 'A' | 'G' | 'R' | 'D' | 'H' | 'Q' | 'K' | 'S' | 'E' | 'P'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_alphabets_cover_the_same_residues() {
        let mut sorted = COUNT_ORDER;
        sorted.sort();
        assert_eq!(sorted, AMINO_ACIDS);
    }

    #[test]
    fn test_class_counts() {
        let window = "KRDEG";
        assert_eq!(ResidueClass::Charged.count(window), 4);
        assert_eq!(ResidueClass::Negative.count(window), 2);
        assert_eq!(ResidueClass::Positive.count(window), 2);
        assert_eq!(ResidueClass::Tiny.count(window), 1);
        assert_eq!(ResidueClass::Aromatic.count(window), 0);
        assert_eq!(ResidueClass::all().count(), 11);
    }

    #[test]
    fn test_class_names() {
        assert_eq!(ResidueClass::SulfurContaining.to_string(), "sulfur_containing");
        assert_eq!(
            ResidueClass::from_str("phosphorylatable").unwrap(),
            ResidueClass::Phosphorylatable
        );
    }

    #[test]
    fn test_hydropathy_is_shifted() {
        assert_eq!(kyte_doolittle('R'), 0.0);
        assert_eq!(kyte_doolittle('I'), 9.0);
        assert!(AMINO_ACIDS.iter().all(|&aa| (0.0..=9.0).contains(&kyte_doolittle(aa))));
    }

    #[test]
    fn test_first_invalid() {
        assert_eq!(first_invalid("ACDEFGHIKLMNPQRSTVWY"), None);
        assert_eq!(first_invalid("ACXD"), Some((2, 'X')));
        assert_eq!(first_invalid("acd"), Some((0, 'a')));
    }
}
