//! Multi-armed bandit agents and testbed experiments.
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)]
pub mod agents;
pub mod envs;
mod error;
pub mod logging;
pub mod simulation;
pub mod utils;

pub use agents::{Agent, BuildAgent, BuildAgentError};
pub use envs::{BuildEnv, BuildEnvError, Environment};
pub use error::BanditError;
pub use simulation::{run_agent, run_experiment, History, SimulationError};

/// Pseudo-random number generator used throughout the crate.
///
/// Every source of randomness is an explicit, caller-supplied instance.
pub type Prng = rand_chacha::ChaCha8Rng;
