//! Distribution utilities
use ndarray::{Array1, ArrayView1};
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Distributions with a known mean.
pub trait Mean {
    /// The expected value of a sample.
    fn mean(&self) -> f64;
}

impl Mean for Normal<f64> {
    fn mean(&self) -> f64 {
        Normal::mean(self)
    }
}

/// A determistic distribution.
///
/// Always produces the same value when sampled.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deterministic<T>(T);

impl<T> Deterministic<T> {
    pub const fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T: Copy> Distribution<T> for Deterministic<T> {
    fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> T {
        self.0
    }
}

impl Mean for Deterministic<f64> {
    fn mean(&self) -> f64 {
        self.0
    }
}

/// Normalized exponential of a vector of logits.
///
/// The maximum logit is subtracted before exponentiating so that no overflow occurs
/// for any finite input.
/// The result is empty if `logits` is empty.
pub fn softmax(logits: ArrayView1<f64>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
    let mut exps = logits.mapv(|x| (x - max).exp());
    let total = exps.sum();
    exps /= total;
    exps
}

/// Sample an index from a categorical distribution.
///
/// `probs` must be a probability vector. Entries with zero probability are never selected.
/// Returns `None` if `probs` is empty, has no non-zero entry, or has a negative or NaN entry.
pub fn sample_categorical<R: Rng + ?Sized>(probs: ArrayView1<f64>, rng: &mut R) -> Option<usize> {
    WeightedIndex::new(probs.iter())
        .ok()
        .map(|categorical| categorical.sample(rng))
}
