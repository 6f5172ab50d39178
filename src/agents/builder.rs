use thiserror::Error;

/// Build an agent instance.
pub trait BuildAgent {
    type Agent: super::Agent;

    /// Build an agent for an environment with the given number of actions.
    ///
    /// # Errors
    /// If there are no actions or the configuration has an invalid parameter.
    fn build_agent(&self, num_actions: usize) -> Result<Self::Agent, BuildAgentError>;
}

/// Error building an agent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildAgentError {
    #[error("the action space must contain at least one action")]
    EmptyActionSpace,
    #[error("invalid {name} = {value}; expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}
