//! Upper confidence bound bandit agent.
use super::super::{Agent, BuildAgent, BuildAgentError};
use crate::logging::Logger;
use crate::utils::iter::rand_argmax;
use crate::Prng;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a [`UcbAgent`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UcbAgentConfig {
    /// Scale factor on the confidence bound; controls the exploration rate.
    ///
    /// Sutton & Barto use 2 in their UCB figure (2.4).
    pub exploration_rate: f64,
}

impl UcbAgentConfig {
    pub const fn new(exploration_rate: f64) -> Self {
        Self { exploration_rate }
    }
}

impl Default for UcbAgentConfig {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl BuildAgent for UcbAgentConfig {
    type Agent = UcbAgent;

    fn build_agent(&self, num_actions: usize) -> Result<Self::Agent, BuildAgentError> {
        UcbAgent::new(num_actions, self.exploration_rate)
    }
}

/// Upper confidence bound (UCB) agent.
///
/// Tries each action once in index order then selects
/// `argmax_a Q(a) + c * sqrt(ln(t) / N(a))`
/// where `t` is the number of steps taken so far and `N(a)` the number of times `a` was taken.
/// Ties are broken uniformly at random.
#[derive(Debug, Clone, PartialEq)]
pub struct UcbAgent {
    /// Scale factor on the confidence bound (`c`).
    exploration_rate: f64,

    /// Sample mean reward of each action
    values: Array1<f64>,
    /// Selection count of each action
    counts: Array1<u64>,
    /// Total number of updates
    num_steps: u64,
}

impl UcbAgent {
    /// Create a new UCB agent
    ///
    /// # Errors
    /// If `num_actions` is zero or `exploration_rate` is negative or not finite.
    pub fn new(num_actions: usize, exploration_rate: f64) -> Result<Self, BuildAgentError> {
        if num_actions == 0 {
            return Err(BuildAgentError::EmptyActionSpace);
        }
        if !(exploration_rate.is_finite() && exploration_rate >= 0.0) {
            return Err(BuildAgentError::InvalidParameter {
                name: "exploration_rate",
                value: exploration_rate,
                expected: "a finite value >= 0",
            });
        }
        Ok(Self {
            exploration_rate,
            values: Array1::zeros(num_actions),
            counts: Array1::zeros(num_actions),
            num_steps: 0,
        })
    }

    /// Estimated value (sample mean reward) of each action.
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of times each action has been taken.
    pub const fn counts(&self) -> &Array1<u64> {
        &self.counts
    }

    /// Total number of steps taken.
    pub const fn num_steps(&self) -> u64 {
        self.num_steps
    }

    /// Upper confidence bound of each action.
    ///
    /// Only meaningful once every action has been taken.
    pub fn upper_bounds(&self) -> Array1<f64> {
        let log_steps = (self.num_steps as f64).ln();
        let c = self.exploration_rate;
        ndarray::Zip::from(&self.values)
            .and(&self.counts)
            .map_collect(|&q, &n| q + c * (log_steps / n as f64).sqrt())
    }
}

impl fmt::Display for UcbAgent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UcbAgent(c={})", self.exploration_rate)
    }
}

impl Agent for UcbAgent {
    fn num_actions(&self) -> usize {
        self.values.len()
    }

    fn act(&mut self, rng: &mut Prng) -> usize {
        // Warm-up: each action is taken once in index order.
        if let Some(untried) = self.counts.iter().position(|&n| n == 0) {
            return untried;
        }
        rand_argmax(&self.upper_bounds(), rng).expect("Empty action space or NaN action value")
    }

    fn update(&mut self, action: usize, reward: f64, _logger: &mut dyn Logger) {
        self.num_steps += 1;
        let count = &mut self.counts[action];
        *count += 1;
        let value = &mut self.values[action];
        *value += (reward - *value) / (*count as f64);
    }

    /// Every action must be tried once.
    fn min_steps(&self) -> u64 {
        self.values.len() as u64
    }
}

#[cfg(test)]
mod ucb_agent {
    use super::super::super::testing;
    use super::*;
    use crate::envs::DeterministicBandit;
    use crate::simulation::run_agent;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    #[test]
    fn learns_deterministic_bandit() {
        testing::train_deterministic_bandit(&UcbAgentConfig::default(), 1000, 0.9);
    }

    #[test]
    fn warm_up_in_index_order() {
        let mut agent = UcbAgent::new(5, 2.0).unwrap();
        let mut rng = Prng::seed_from_u64(0);
        let rewards = [0.3, -1.2, 2.5, 0.0, 0.7];
        for (i, &reward) in rewards.iter().enumerate() {
            let action = agent.act(&mut rng);
            assert_eq!(action, i);
            agent.update(action, reward, &mut ());
        }
        assert_eq!(agent.counts(), &Array1::from_elem(5, 1));
        assert_eq!(agent.values(), &Array1::from(rewards.to_vec()));
        assert_eq!(agent.num_steps(), 5);
    }

    #[test]
    fn values_are_sample_means() {
        let num_actions = 4;
        let mut agent = UcbAgent::new(num_actions, 1.0).unwrap();
        let mut rng = Prng::seed_from_u64(1);
        let mut observed = vec![Vec::new(); num_actions];
        for _ in 0..500 {
            let action = agent.act(&mut rng);
            let reward: f64 = rng.gen_range(-2.0..2.0) + action as f64;
            observed[action].push(reward);
            agent.update(action, reward, &mut ());
        }
        for (a, rewards) in observed.iter().enumerate() {
            let mean = rewards.iter().sum::<f64>() / rewards.len() as f64;
            assert!((agent.values()[a] - mean).abs() < 1e-9);
            assert_eq!(agent.counts()[a], rewards.len() as u64);
        }
        assert_eq!(agent.counts().sum(), 500);
    }

    #[test]
    fn two_arm_scenario() {
        let env = DeterministicBandit::from_values([1.0, 0.0]).unwrap();
        let mut agent = UcbAgent::new(2, 2.0).unwrap();
        let mut rng_env = Prng::seed_from_u64(0);
        let mut rng_agent = Prng::seed_from_u64(1);
        let history = run_agent(&env, &mut agent, 10, &mut rng_env, &mut rng_agent, &mut ()).unwrap();
        // Arm 1 is re-explored once its bonus outgrows arm 0's advantage
        assert_eq!(history.actions, vec![0, 1, 0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(agent.values(), &Array1::from(vec![1.0, 0.0]));
        assert_eq!(agent.counts(), &Array1::from(vec![8, 2]));
    }

    #[test]
    fn zero_exploration_is_greedy_after_warm_up() {
        let env = DeterministicBandit::from_values([0.0, 1.0, 0.5]).unwrap();
        let mut agent = UcbAgent::new(3, 0.0).unwrap();
        let mut rng_env = Prng::seed_from_u64(0);
        let mut rng_agent = Prng::seed_from_u64(1);
        let history = run_agent(&env, &mut agent, 20, &mut rng_env, &mut rng_agent, &mut ()).unwrap();
        assert_eq!(&history.actions[..3], &[0, 1, 2]);
        assert!(history.actions[3..].iter().all(|&a| a == 1));
    }

    #[test]
    fn ties_broken_randomly() {
        // All arms equal: after warm-up every bound is tied.
        let mut seen = [false; 3];
        for seed in 0..50 {
            let mut agent = UcbAgent::new(3, 1.0).unwrap();
            let mut rng = Prng::seed_from_u64(seed);
            for _ in 0..3 {
                let action = agent.act(&mut rng);
                agent.update(action, 0.5, &mut ());
            }
            seen[agent.act(&mut rng)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn min_steps_is_num_actions() {
        assert_eq!(UcbAgent::new(7, 1.0).unwrap().min_steps(), 7);
    }

    #[test]
    fn empty_action_space() {
        assert_eq!(UcbAgent::new(0, 1.0), Err(BuildAgentError::EmptyActionSpace));
    }

    #[rstest]
    #[case(-0.1)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn invalid_exploration_rate(#[case] c: f64) {
        assert!(matches!(
            UcbAgentConfig::new(c).build_agent(3),
            Err(BuildAgentError::InvalidParameter {
                name: "exploration_rate",
                ..
            })
        ));
    }

    #[test]
    fn config_serde() {
        let config = UcbAgentConfig::new(0.5);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<UcbAgentConfig>(&json).unwrap(), config);
    }
}
