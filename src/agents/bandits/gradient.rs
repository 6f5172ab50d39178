//! Gradient bandit agent.
use super::super::{Agent, BuildAgent, BuildAgentError};
use crate::logging::{Event, Logger};
use crate::utils::distributions::{sample_categorical, softmax};
use crate::utils::stats::OnlineMeanVariance;
use crate::Prng;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a [`GradientBanditAgent`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientBanditAgentConfig {
    /// Preference update step size (`alpha`).
    pub step_size: f64,
    /// Whether to subtract the running mean reward from each reward.
    pub baseline: bool,
}

impl GradientBanditAgentConfig {
    pub const fn new(step_size: f64, baseline: bool) -> Self {
        Self {
            step_size,
            baseline,
        }
    }
}

impl Default for GradientBanditAgentConfig {
    fn default() -> Self {
        Self::new(0.1, true)
    }
}

impl BuildAgent for GradientBanditAgentConfig {
    type Agent = GradientBanditAgent;

    fn build_agent(&self, num_actions: usize) -> Result<Self::Agent, BuildAgentError> {
        GradientBanditAgent::new(num_actions, self.step_size, self.baseline)
    }
}

/// Gradient bandit agent.
///
/// Learns a preference `H(a)` for each action and samples actions from the
/// softmax policy `π = softmax(H)`.
/// After observing reward `R` for action `A`, every preference is updated from the same `π`:
///
/// ```text
/// H(A) += alpha * (R - R̄) * (1 - π(A))
/// H(a) -= alpha * (R - R̄) * π(a)        for a != A
/// ```
///
/// where the baseline `R̄` is the mean of all previous rewards, or zero when disabled.
/// This is stochastic gradient ascent on the expected reward.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBanditAgent {
    /// Preference update step size.
    step_size: f64,
    /// Whether the running mean reward is used as a baseline.
    use_baseline: bool,

    /// Action preferences
    preferences: Array1<f64>,
    /// Running statistics of observed rewards; only updated when the baseline is enabled.
    reward_stats: OnlineMeanVariance<f64>,
}

impl GradientBanditAgent {
    /// Create a new gradient bandit agent.
    ///
    /// # Errors
    /// If `num_actions` is zero or `step_size` is not finite and positive.
    pub fn new(
        num_actions: usize,
        step_size: f64,
        baseline: bool,
    ) -> Result<Self, BuildAgentError> {
        if num_actions == 0 {
            return Err(BuildAgentError::EmptyActionSpace);
        }
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(BuildAgentError::InvalidParameter {
                name: "step_size",
                value: step_size,
                expected: "a finite value > 0",
            });
        }
        Ok(Self {
            step_size,
            use_baseline: baseline,
            preferences: Array1::zeros(num_actions),
            reward_stats: OnlineMeanVariance::default(),
        })
    }

    /// Action preferences `H`.
    pub const fn preferences(&self) -> &Array1<f64> {
        &self.preferences
    }

    /// Action selection probabilities; softmax of the preferences.
    pub fn policy(&self) -> Array1<f64> {
        softmax(self.preferences.view())
    }

    /// Current reward baseline `R̄`.
    ///
    /// Always zero if the baseline is disabled.
    pub fn baseline(&self) -> f64 {
        self.reward_stats.mean()
    }

    /// Number of rewards absorbed into the baseline.
    pub fn baseline_count(&self) -> u64 {
        self.reward_stats.count()
    }
}

impl fmt::Display for GradientBanditAgent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GradientBanditAgent(α={}", self.step_size)?;
        if self.use_baseline {
            write!(f, ", baseline")?;
        }
        write!(f, ")")
    }
}

impl Agent for GradientBanditAgent {
    fn num_actions(&self) -> usize {
        self.preferences.len()
    }

    fn act(&mut self, rng: &mut Prng) -> usize {
        sample_categorical(self.policy().view(), rng).expect("Empty action space")
    }

    fn update(&mut self, action: usize, reward: f64, logger: &mut dyn Logger) {
        assert!(action < self.preferences.len(), "action out of range");
        // All preferences are updated from this one snapshot.
        let policy = self.policy();
        let baseline = self.baseline();
        let scale = self.step_size * (reward - baseline);
        for (a, (preference, &prob)) in self.preferences.iter_mut().zip(&policy).enumerate() {
            if a == action {
                *preference += scale * (1.0 - prob);
            } else {
                *preference -= scale * prob;
            }
        }

        if self.use_baseline {
            self.reward_stats.push(reward);
            logger
                .log(Event::Step, "baseline", self.reward_stats.mean().into())
                .unwrap();
        }
    }
}
