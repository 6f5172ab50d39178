//! Multi-armed bandit agents.
//!
//! These agents learn a value or preference for each action independently.
mod epsilon_greedy;
mod gradient;
mod ucb;

pub use epsilon_greedy::{EpsilonGreedyAgent, EpsilonGreedyAgentConfig};
pub use gradient::{GradientBanditAgent, GradientBanditAgentConfig};
pub use ucb::{UcbAgent, UcbAgentConfig};
