//! Error type
use crate::agents::BuildAgentError;
use crate::envs::BuildEnvError;
use crate::simulation::SimulationError;
use thiserror::Error;

/// Error from the bandit crate.
#[derive(Error, Debug)]
pub enum BanditError {
    #[error("error building agent")]
    BuildAgent(#[from] BuildAgentError),
    #[error("error building environment")]
    BuildEnv(#[from] BuildEnvError),
    #[error("error running simulation")]
    Simulation(#[from] SimulationError),
}
