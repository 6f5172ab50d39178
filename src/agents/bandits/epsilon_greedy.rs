//! Epsilon-greedy bandit agent.
use super::super::{Agent, BuildAgent, BuildAgentError};
use crate::logging::{Event, Loggable, Logger};
use crate::utils::iter::rand_argmax;
use crate::Prng;
use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for an [`EpsilonGreedyAgent`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonGreedyAgentConfig {
    /// Probability of taking a uniform random action.
    pub epsilon: f64,
    /// Initial value estimate of every action.
    ///
    /// Values above the achievable reward encourage early exploration.
    pub initial_value: f64,
    /// Constant value update step size.
    ///
    /// Values are sample averages if `None`.
    pub step_size: Option<f64>,
}

impl EpsilonGreedyAgentConfig {
    pub const fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            initial_value: 0.0,
            step_size: None,
        }
    }

    /// Set the initial value estimate.
    #[must_use]
    pub fn with_initial_value(mut self, initial_value: f64) -> Self {
        self.initial_value = initial_value;
        self
    }

    /// Set a constant step size.
    #[must_use]
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = Some(step_size);
        self
    }
}

impl Default for EpsilonGreedyAgentConfig {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl BuildAgent for EpsilonGreedyAgentConfig {
    type Agent = EpsilonGreedyAgent;

    fn build_agent(&self, num_actions: usize) -> Result<Self::Agent, BuildAgentError> {
        EpsilonGreedyAgent::new(num_actions, *self)
    }
}

/// Epsilon-greedy agent.
///
/// Takes a uniform random action with probability `epsilon`,
/// otherwise an action of maximal estimated value (ties broken uniformly at random).
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedyAgent {
    config: EpsilonGreedyAgentConfig,
    values: Array1<f64>,
    counts: Array1<u64>,
    /// Whether the most recent action was exploratory.
    explored: bool,
}

impl EpsilonGreedyAgent {
    /// Create a new epsilon-greedy agent.
    ///
    /// # Errors
    /// If `num_actions` is zero or any configuration parameter is out of range.
    pub fn new(
        num_actions: usize,
        config: EpsilonGreedyAgentConfig,
    ) -> Result<Self, BuildAgentError> {
        if num_actions == 0 {
            return Err(BuildAgentError::EmptyActionSpace);
        }
        if !(0.0..=1.0).contains(&config.epsilon) {
            return Err(BuildAgentError::InvalidParameter {
                name: "epsilon",
                value: config.epsilon,
                expected: "a probability in [0, 1]",
            });
        }
        if !config.initial_value.is_finite() {
            return Err(BuildAgentError::InvalidParameter {
                name: "initial_value",
                value: config.initial_value,
                expected: "a finite value",
            });
        }
        if let Some(step_size) = config.step_size {
            if !(step_size > 0.0 && step_size <= 1.0) {
                return Err(BuildAgentError::InvalidParameter {
                    name: "step_size",
                    value: step_size,
                    expected: "a value in (0, 1]",
                });
            }
        }
        Ok(Self {
            config,
            values: Array1::from_elem(num_actions, config.initial_value),
            counts: Array1::zeros(num_actions),
            explored: false,
        })
    }

    /// Estimated value of each action.
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of times each action has been taken.
    pub const fn counts(&self) -> &Array1<u64> {
        &self.counts
    }
}

impl fmt::Display for EpsilonGreedyAgent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EpsilonGreedyAgent(ε={}", self.config.epsilon)?;
        if self.config.initial_value != 0.0 {
            write!(f, ", Q0={}", self.config.initial_value)?;
        }
        if let Some(step_size) = self.config.step_size {
            write!(f, ", α={}", step_size)?;
        }
        write!(f, ")")
    }
}

impl Agent for EpsilonGreedyAgent {
    fn num_actions(&self) -> usize {
        self.values.len()
    }

    fn act(&mut self, rng: &mut Prng) -> usize {
        self.explored = rng.gen_bool(self.config.epsilon);
        if self.explored {
            rng.gen_range(0..self.values.len())
        } else {
            rand_argmax(&self.values, rng).expect("Empty action space or NaN action value")
        }
    }

    fn update(&mut self, action: usize, reward: f64, logger: &mut dyn Logger) {
        let count = &mut self.counts[action];
        *count += 1;
        let step_size = self
            .config
            .step_size
            .unwrap_or_else(|| (*count as f64).recip());
        let value = &mut self.values[action];
        *value += (reward - *value) * step_size;

        logger
            .log(
                Event::Step,
                "explore",
                Loggable::IndexSample {
                    value: self.explored.into(),
                    size: 2,
                },
            )
            .unwrap();
    }
}
