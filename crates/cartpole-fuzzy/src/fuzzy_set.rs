//! Sampled fuzzy set, aligned to the sample points of one domain.

use ndarray::{Array1, Zip};

/// Membership degrees per domain sample. Transient, one per cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzySet {
    degrees: Array1<f64>,
}

impl FuzzySet {
    /// Empty set (all degrees 0) over `len` samples.
    pub fn zeros(len: usize) -> Self {
        FuzzySet {
            degrees: Array1::zeros(len),
        }
    }

    pub fn from_samples(degrees: impl IntoIterator<Item = f64>) -> Self {
        FuzzySet {
            degrees: degrees.into_iter().collect(),
        }
    }

    pub fn degrees(&self) -> &Array1<f64> {
        &self.degrees
    }

    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Mamdani implication: truncate every degree at `level`.
    pub fn clipped(mut self, level: f64) -> Self {
        let level = level.clamp(0.0, 1.0);
        self.degrees.mapv_inplace(|mu| mu.min(level));
        self
    }

    /// In-place pointwise max (fuzzy union). Both sets share a domain.
    pub fn union_with(&mut self, other: &FuzzySet) {
        debug_assert_eq!(self.len(), other.len(), "sets sampled on different domains");
        Zip::from(&mut self.degrees)
            .and(&other.degrees)
            .for_each(|a, &b| *a = a.max(b));
    }

    /// Sum of all degrees.
    pub fn total(&self) -> f64 {
        self.degrees.sum()
    }

    pub fn max_degree(&self) -> f64 {
        self.degrees.fold(0.0, |acc: f64, &mu| acc.max(mu))
    }

    /// Every degree multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        FuzzySet {
            degrees: &self.degrees * factor,
        }
    }
}
