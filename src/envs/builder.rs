use crate::Prng;
use rand_distr::NormalError;
use thiserror::Error;

/// Build an environment instance.
pub trait BuildEnv {
    type Environment: super::Environment;

    /// Build an environment instance.
    ///
    /// # Args
    /// * `rng` - Random number generator used to sample the environment structure
    ///           (for example, the true action means).
    fn build_env(&self, rng: &mut Prng) -> Result<Self::Environment, BuildEnvError>;
}

/// Error building an environment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildEnvError {
    #[error("the environment must have at least one action")]
    EmptyActionSpace,
    #[error("invalid {name} = {value}; expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error(transparent)]
    Normal(#[from] NormalError),
}
