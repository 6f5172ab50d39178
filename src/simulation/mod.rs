//! Simulating agent-environment interaction
mod experiment;
mod serial;

pub use experiment::{run_experiment, ExperimentConfig, ExperimentSummary};
pub use serial::run_agent;

use crate::agents::BuildAgentError;
use crate::envs::BuildEnvError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error initializing or running a simulation.
///
/// All configuration errors are detected before the first step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("the number of steps must be positive")]
    NoSteps,
    #[error("{num_steps} steps is too few; the agent requires at least {required}")]
    TooFewSteps { num_steps: u64, required: u64 },
    #[error("environment has {env} actions but the agent has {agent}")]
    ActionSpaceMismatch { env: usize, agent: usize },
    #[error("the number of trials must be positive")]
    NoTrials,
    #[error("error building agent")]
    BuildAgent(#[from] BuildAgentError),
    #[error("error building environment")]
    BuildEnv(#[from] BuildEnvError),
}

/// Actions taken and rewards received in a single run.
///
/// `actions[i]` and `rewards[i]` describe step `i`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub actions: Vec<usize>,
    pub rewards: Vec<f64>,
}

impl History {
    /// Create an empty history with space for `capacity` steps.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            actions: Vec::with_capacity(capacity),
            rewards: Vec::with_capacity(capacity),
        }
    }

    /// Record a step.
    pub fn push(&mut self, action: usize, reward: f64) {
        self.actions.push(action);
        self.rewards.push(reward);
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Mean reward over all steps; `None` if empty.
    pub fn mean_reward(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.rewards.iter().sum::<f64>() / self.rewards.len() as f64)
        }
    }
}
