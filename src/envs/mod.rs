//! Bandit environments
mod bandits;
mod builder;
#[cfg(test)]
pub mod testing;

pub use bandits::{
    Bandit, DeterministicBandit, FixedMeansBanditConfig, GaussianBandit, TestbedConfig,
};
pub use builder::{BuildEnv, BuildEnvError};

use crate::Prng;

/// A multi-armed bandit environment.
///
/// Has a fixed set of actions `0 .. size()`.
/// Each step yields a reward sampled independently from a per-action distribution
/// that is hidden from the agent.
pub trait Environment {
    /// Number of available actions. At least 1.
    fn size(&self) -> usize;

    /// Sample the reward for taking an action.
    ///
    /// May panic if `action >= self.size()`.
    ///
    /// # Args
    /// * `action` - The action to take.
    /// * `rng` - Random number generator for sampling the reward.
    fn step(&self, action: usize, rng: &mut Prng) -> f64;

    /// The action with the largest expected reward, if known.
    ///
    /// Only used for evaluation statistics; not visible to agents.
    fn optimal_action(&self) -> Option<usize> {
        None
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn size(&self) -> usize {
        E::size(self)
    }

    fn step(&self, action: usize, rng: &mut Prng) -> f64 {
        E::step(self, action, rng)
    }

    fn optimal_action(&self) -> Option<usize> {
        E::optimal_action(self)
    }
}
