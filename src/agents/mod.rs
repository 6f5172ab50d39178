//! Bandit agents
pub mod bandits;
mod builder;
#[cfg(test)]
pub mod testing;

pub use bandits::{
    EpsilonGreedyAgent, EpsilonGreedyAgentConfig, GradientBanditAgent, GradientBanditAgentConfig,
    UcbAgent, UcbAgentConfig,
};
pub use builder::{BuildAgent, BuildAgentError};

use crate::logging::Logger;
use crate::Prng;

/// A learning agent for a multi-armed bandit.
///
/// Selects actions in `0 .. num_actions()` and learns from the resulting rewards.
/// Calls to [`Agent::act`] and [`Agent::update`] must alternate,
/// each update reporting the reward for the preceding action.
pub trait Agent {
    /// Number of actions the agent chooses among.
    fn num_actions(&self) -> usize;

    /// Choose an action.
    ///
    /// # Args
    /// * `rng` - Random number generator for exploration and tie-breaking.
    fn act(&mut self, rng: &mut Prng) -> usize;

    /// Update the agent with the reward observed for an action.
    ///
    /// # Args
    /// * `action` - The action taken.
    /// * `reward` - The reward observed for `action`.
    /// * `logger` - Logger for agent statistics.
    fn update(&mut self, action: usize, reward: f64, logger: &mut dyn Logger);

    /// Minimum number of steps in a valid run of this agent.
    fn min_steps(&self) -> u64 {
        1
    }
}

impl<T: Agent + ?Sized> Agent for Box<T> {
    fn num_actions(&self) -> usize {
        T::num_actions(self)
    }
    fn act(&mut self, rng: &mut Prng) -> usize {
        T::act(self, rng)
    }
    fn update(&mut self, action: usize, reward: f64, logger: &mut dyn Logger) {
        T::update(self, action, reward, logger)
    }
    fn min_steps(&self) -> u64 {
        T::min_steps(self)
    }
}
