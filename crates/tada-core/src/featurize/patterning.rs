//! Sequence patterning metrics.
//!
//! Both metrics compare the local asymmetry of two residue groups inside short blobs against the
//! asymmetry of the whole sequence:
//!
//! ```text
//! sigma = (f_a - f_b)^2 / (f_a + f_b)
//! delta = mean over blobs (sigma_blob - sigma_sequence)^2
//! ```
//!
//! `delta` is averaged over blob sizes 5 and 6 and divided by the largest `delta` reachable by
//! rearranging the same composition into segregated blocks.
//!
//! - `kappa`: positive (K, R) against negative (D, E) residues.
//! - `omega`: charged residues plus proline against everything else.
use crate::residues::{is_negative, is_positive};
use itertools::iproduct;

const BLOB_SIZES: [usize; 2] = [5, 6];

/// Reported when a metric is undefined for the composition.
pub const UNDEFINED: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    A,
    B,
    Neither,
}

fn sigma(groups: &[Group]) -> f64 {
    let (a, b) = groups.iter().fold((0usize, 0usize), |(a, b), g| match g {
        Group::A => (a + 1, b),
        Group::B => (a, b + 1),
        Group::Neither => (a, b),
    });
    if a + b == 0 {
        return 0.0;
    }
    let len = groups.len() as f64;
    let (fa, fb) = (a as f64 / len, b as f64 / len);
    (fa - fb).powi(2) / (fa + fb)
}

fn delta_for_blob(groups: &[Group], blob: usize) -> f64 {
    let blob = blob.min(groups.len());
    let overall = sigma(groups);
    let blobs = groups.len() - blob + 1;
    groups
        .windows(blob)
        .map(|w| (sigma(w) - overall).powi(2))
        .sum::<f64>()
        / blobs as f64
}

fn delta(groups: &[Group]) -> f64 {
    BLOB_SIZES
        .iter()
        .map(|&blob| delta_for_blob(groups, blob))
        .sum::<f64>()
        / BLOB_SIZES.len() as f64
}

/// Largest `delta` over arrangements `N^x A^a N^y B^b N^z` with `x + y + z` neutral residues.
fn delta_max(a: usize, b: usize, neither: usize) -> f64 {
    let mut arrangement = Vec::with_capacity(a + b + neither);
    iproduct!(0..=neither, 0..=neither)
        .filter(|(lead, mid)| lead + mid <= neither)
        .map(|(lead, mid)| {
            let tail = neither - lead - mid;
            arrangement.clear();
            arrangement.extend(std::iter::repeat(Group::Neither).take(lead));
            arrangement.extend(std::iter::repeat(Group::A).take(a));
            arrangement.extend(std::iter::repeat(Group::Neither).take(mid));
            arrangement.extend(std::iter::repeat(Group::B).take(b));
            arrangement.extend(std::iter::repeat(Group::Neither).take(tail));
            delta(&arrangement)
        })
        .fold(0.0, f64::max)
}

fn patterning(groups: &[Group]) -> f64 {
    let count = |target: Group| groups.iter().filter(|&&g| g == target).count();
    let (a, b, neither) = (count(Group::A), count(Group::B), count(Group::Neither));
    if a + b == 0 {
        return UNDEFINED;
    }
    let max = delta_max(a, b, neither);
    if max <= 0.0 {
        return 0.0;
    }
    delta(groups) / max
}

/// Charge patterning. `-1` when the sequence carries no K, R, D or E.
pub fn kappa(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return UNDEFINED;
    }
    let groups: Vec<Group> = sequence
        .chars()
        .map(|aa| {
            if is_positive(aa) {
                Group::A
            } else if is_negative(aa) {
                Group::B
            } else {
                Group::Neither
            }
        })
        .collect();
    patterning(&groups)
}

/// Patterning of charged residues and prolines against all other residues. `-1` when either
/// group is absent.
pub fn omega(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return UNDEFINED;
    }
    let groups: Vec<Group> = sequence
        .chars()
        .map(|aa| {
            if is_positive(aa) || is_negative(aa) || aa == 'P' {
                Group::A
            } else {
                Group::B
            }
        })
        .collect();
    if !groups.contains(&Group::A) || !groups.contains(&Group::B) {
        return UNDEFINED;
    }
    patterning(&groups)
}
