//! Composition, charge and hydropathy aggregates over a stretch of residues.
use crate::residues::{
    is_disorder_promoting, is_negative, is_positive, kyte_doolittle, wimley_white,
};

pub const AGGREGATE_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregates {
    /// Mean Kyte-Doolittle hydropathy on the shifted `[0, 9]` scale.
    pub hydropathy: f64,
    /// Mean Wimley-White hydropathy.
    pub hydropathy_ww: f64,
    /// Net charge per residue.
    pub ncpr: f64,
    pub disorder_promoting: f64,
    /// Fraction of charged residues.
    pub fcr: f64,
    /// `|ncpr|`
    pub mean_net_charge: f64,
    pub fraction_negative: f64,
    pub fraction_positive: f64,
}

impl Aggregates {
    pub fn compute(residues: &str) -> Self {
        let n = residues.len();
        if n == 0 {
            return Self::default();
        }
        let len = n as f64;
        let mut positives = 0usize;
        let mut negatives = 0usize;
        let mut promoting = 0usize;
        let mut kd = 0.0;
        let mut ww = 0.0;
        for aa in residues.chars() {
            positives += is_positive(aa) as usize;
            negatives += is_negative(aa) as usize;
            promoting += is_disorder_promoting(aa) as usize;
            kd += kyte_doolittle(aa);
            ww += wimley_white(aa);
        }
        let fraction_positive = positives as f64 / len;
        let fraction_negative = negatives as f64 / len;
        let ncpr = fraction_positive - fraction_negative;
        Self {
            hydropathy: kd / len,
            hydropathy_ww: ww / len,
            ncpr,
            disorder_promoting: promoting as f64 / len,
            fcr: fraction_positive + fraction_negative,
            mean_net_charge: ncpr.abs(),
            fraction_negative,
            fraction_positive,
        }
    }

    /// Channel order used in the feature tensor.
    pub fn to_array(&self) -> [f64; AGGREGATE_COUNT] {
        [
            self.hydropathy,
            self.hydropathy_ww,
            self.ncpr,
            self.disorder_promoting,
            self.fcr,
            self.mean_net_charge,
            self.fraction_negative,
            self.fraction_positive,
        ]
    }
}
