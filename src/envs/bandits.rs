use super::{BuildEnv, BuildEnvError, Environment};
use crate::utils::distributions::{Deterministic, Mean};
use crate::utils::iter::ArgMaxBy;
use crate::Prng;
use rand::distributions::Distribution;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A multi-armed bandit
///
/// The distribution of each arm is sampled when it is pulled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bandit<D> {
    distributions: Vec<D>,
}

impl<D> Bandit<D> {
    /// Create a new bandit with one arm per distribution.
    ///
    /// # Errors
    /// If `distributions` is empty.
    pub fn new(distributions: Vec<D>) -> Result<Self, BuildEnvError> {
        if distributions.is_empty() {
            return Err(BuildEnvError::EmptyActionSpace);
        }
        Ok(Self { distributions })
    }

    /// The arm reward distributions.
    pub fn distributions(&self) -> &[D] {
        &self.distributions
    }
}

impl<D: Mean> Bandit<D> {
    /// The expected reward of each arm.
    pub fn means(&self) -> Vec<f64> {
        self.distributions.iter().map(Mean::mean).collect()
    }
}

impl<D: Distribution<f64> + Mean> Environment for Bandit<D> {
    fn size(&self) -> usize {
        self.distributions.len()
    }

    fn step(&self, action: usize, rng: &mut Prng) -> f64 {
        self.distributions[action].sample(rng)
    }

    fn optimal_action(&self) -> Option<usize> {
        self.distributions
            .iter()
            .map(Mean::mean)
            .argmax_by(|a, b| a.total_cmp(b))
    }
}

/// A bandit with unit-variance Gaussian arm rewards.
pub type GaussianBandit = Bandit<Normal<f64>>;

impl GaussianBandit {
    /// Create a Gaussian bandit from the arm means.
    ///
    /// Each reward is sampled from `N(mean, 1)`.
    ///
    /// # Errors
    /// If there are no means or any mean is not finite.
    pub fn from_means<I: IntoIterator<Item = f64>>(means: I) -> Result<Self, BuildEnvError> {
        let distributions = means
            .into_iter()
            .map(|mean| {
                let mean = check_finite("mean", mean)?;
                Normal::new(mean, 1.0).map_err(BuildEnvError::from)
            })
            .collect::<Result<_, _>>()?;
        Self::new(distributions)
    }
}

impl fmt::Display for GaussianBandit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GaussianBandit({:?})", self.means())
    }
}

/// A bandit whose arms always return the same reward.
pub type DeterministicBandit = Bandit<Deterministic<f64>>;

impl DeterministicBandit {
    /// Create a deterministic bandit from the arm rewards.
    ///
    /// # Errors
    /// If there are no values or any value is not finite.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Result<Self, BuildEnvError> {
        let distributions = values
            .into_iter()
            .map(|value| check_finite("value", value).map(Deterministic::new))
            .collect::<Result<_, _>>()?;
        Self::new(distributions)
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<f64, BuildEnvError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BuildEnvError::InvalidParameter {
            name,
            value,
            expected: "a finite value",
        })
    }
}

impl fmt::Display for DeterministicBandit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DeterministicBandit({:?})", self.means())
    }
}

/// Configuration of the k-armed Gaussian testbed.
///
/// The true mean of each arm is drawn from `N(mean_offset, mean_stddev)`
/// and each reward from `N(true_mean, 1)`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestbedConfig {
    /// Number of arms
    pub num_arms: usize,
    /// Mean of the distribution of arm means
    pub mean_offset: f64,
    /// Standard deviation of the distribution of arm means
    pub mean_stddev: f64,
}

impl TestbedConfig {
    pub const fn new(num_arms: usize, mean_offset: f64, mean_stddev: f64) -> Self {
        Self {
            num_arms,
            mean_offset,
            mean_stddev,
        }
    }
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self::new(10, 0.0, 1.0)
    }
}

impl BuildEnv for TestbedConfig {
    type Environment = GaussianBandit;

    fn build_env(&self, rng: &mut Prng) -> Result<Self::Environment, BuildEnvError> {
        if self.num_arms == 0 {
            return Err(BuildEnvError::EmptyActionSpace);
        }
        check_finite("mean_offset", self.mean_offset)?;
        if !(self.mean_stddev.is_finite() && self.mean_stddev >= 0.0) {
            return Err(BuildEnvError::InvalidParameter {
                name: "mean_stddev",
                value: self.mean_stddev,
                expected: "a finite value >= 0",
            });
        }
        let prior = Normal::new(self.mean_offset, self.mean_stddev)?;
        GaussianBandit::from_means(prior.sample_iter(rng).take(self.num_arms))
    }
}

/// Configuration of a Gaussian bandit with fixed arm means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedMeansBanditConfig {
    pub means: Vec<f64>,
}

impl FixedMeansBanditConfig {
    pub const fn new(means: Vec<f64>) -> Self {
        Self { means }
    }
}

impl Default for FixedMeansBanditConfig {
    fn default() -> Self {
        Self::new(vec![0.0, 1.0])
    }
}

impl BuildEnv for FixedMeansBanditConfig {
    type Environment = GaussianBandit;

    fn build_env(&self, _rng: &mut Prng) -> Result<Self::Environment, BuildEnvError> {
        GaussianBandit::from_means(self.means.iter().copied())
    }
}
