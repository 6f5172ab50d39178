//! Serial (single-thread) simulation.
use super::{History, SimulationError};
use crate::agents::Agent;
use crate::envs::Environment;
use crate::logging::{Event, Loggable, Logger};
use crate::Prng;

/// Run an agent in an environment for a fixed number of steps.
///
/// The configuration is checked before any step is taken:
/// either all `num_steps` steps are run or none are.
///
/// # Args
/// * `environment` - The environment to simulate.
/// * `agent` - The agent to simulate. Updated after every step.
/// * `num_steps` - Number of steps to run.
/// * `rng_env` - Random number generator for environment rewards.
/// * `rng_agent` - Random number generator for agent action selection.
/// * `logger` - The logger to use.
///
/// # Errors
/// If `num_steps` is zero or less than [`Agent::min_steps`],
/// or if the agent and environment have different numbers of actions.
pub fn run_agent<E, A>(
    environment: &E,
    agent: &mut A,
    num_steps: u64,
    rng_env: &mut Prng,
    rng_agent: &mut Prng,
    logger: &mut dyn Logger,
) -> Result<History, SimulationError>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    check_run(environment, agent, num_steps)?;

    let size = environment.size();
    #[allow(clippy::cast_possible_truncation)]
    let mut history = History::with_capacity(num_steps as usize);
    for _ in 0..num_steps {
        let action = agent.act(rng_agent);
        debug_assert!(action < size, "agent action out of range");
        let reward = environment.step(action, rng_env);
        agent.update(action, reward, logger);

        logger.log(Event::Step, "reward", reward.into()).unwrap();
        logger
            .log(
                Event::Step,
                "action",
                Loggable::IndexSample {
                    value: action,
                    size,
                },
            )
            .unwrap();
        logger.done(Event::Step);

        history.push(action, reward);
    }
    Ok(history)
}

/// Check that an agent can be run in an environment for `num_steps`.
pub(super) fn check_run<E, A>(
    environment: &E,
    agent: &A,
    num_steps: u64,
) -> Result<(), SimulationError>
where
    E: Environment + ?Sized,
    A: Agent + ?Sized,
{
    if num_steps == 0 {
        return Err(SimulationError::NoSteps);
    }
    let (env_size, agent_size) = (environment.size(), agent.num_actions());
    if env_size != agent_size {
        return Err(SimulationError::ActionSpaceMismatch {
            env: env_size,
            agent: agent_size,
        });
    }
    let required = agent.min_steps();
    if num_steps < required {
        return Err(SimulationError::TooFewSteps {
            num_steps,
            required,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{
        BuildAgent, EpsilonGreedyAgentConfig, GradientBanditAgentConfig, UcbAgent, UcbAgentConfig,
    };
    use crate::envs::{DeterministicBandit, GaussianBandit};
    use crate::logging::LogError;
    use rand::SeedableRng;
    use rstest::rstest;

    fn rngs() -> (Prng, Prng) {
        (Prng::seed_from_u64(10), Prng::seed_from_u64(11))
    }

    #[rstest]
    #[case(5)]
    #[case(10)]
    #[case(1000)]
    fn ucb_history_lengths(#[case] num_steps: u64) {
        let env = GaussianBandit::from_means([0.0, 0.5, -0.3, 1.0, 0.2]).unwrap();
        let mut agent = UcbAgentConfig::default().build_agent(5).unwrap();
        let (mut rng_env, mut rng_agent) = rngs();
        let history =
            run_agent(&env, &mut agent, num_steps, &mut rng_env, &mut rng_agent, &mut ()).unwrap();
        assert_eq!(history.actions.len() as u64, num_steps);
        assert_eq!(history.rewards.len() as u64, num_steps);
        assert_eq!(agent.counts().sum(), num_steps);
        assert_eq!(agent.num_steps(), num_steps);
    }

    #[test]
    fn gradient_history_lengths() {
        let env = GaussianBandit::from_means([4.0, 4.5, 3.0]).unwrap();
        let mut agent = GradientBanditAgentConfig::default().build_agent(3).unwrap();
        let (mut rng_env, mut rng_agent) = rngs();
        let history =
            run_agent(&env, &mut agent, 250, &mut rng_env, &mut rng_agent, &mut ()).unwrap();
        assert_eq!(history.len(), 250);
        assert!(history.actions.iter().all(|&a| a < 3));
    }

    #[test]
    fn epsilon_greedy_counts_match_history() {
        let env = GaussianBandit::from_means([0.0, 1.0]).unwrap();
        let mut agent = EpsilonGreedyAgentConfig::default().build_agent(2).unwrap();
        let (mut rng_env, mut rng_agent) = rngs();
        let history =
            run_agent(&env, &mut agent, 300, &mut rng_env, &mut rng_agent, &mut ()).unwrap();
        for a in 0..2 {
            let n = history.actions.iter().filter(|&&x| x == a).count() as u64;
            assert_eq!(agent.counts()[a], n);
        }
    }

    #[test]
    fn warm_up_values_are_first_rewards() {
        let env = DeterministicBandit::from_values([0.25, -1.0, 3.0]).unwrap();
        let mut agent = UcbAgent::new(3, 2.0).unwrap();
        let (mut rng_env, mut rng_agent) = rngs();
        let history =
            run_agent(&env, &mut agent, 3, &mut rng_env, &mut rng_agent, &mut ()).unwrap();
        assert_eq!(history.actions, vec![0, 1, 2]);
        assert_eq!(agent.values().to_vec(), history.rewards);
    }

    #[test]
    fn reproducible() {
        let env = GaussianBandit::from_means([0.0, 0.3, 0.6]).unwrap();
        let config = GradientBanditAgentConfig::default();
        let run = || {
            let mut agent = config.build_agent(3).unwrap();
            let (mut rng_env, mut rng_agent) = rngs();
            run_agent(&env, &mut agent, 100, &mut rng_env, &mut rng_agent, &mut ()).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn boxed_matches_concrete() {
        let env = GaussianBandit::from_means([0.0, 0.3, 0.6]).unwrap();
        let mut agent = UcbAgent::new(3, 2.0).unwrap();
        let (mut rng_env, mut rng_agent) = rngs();
        let expected =
            run_agent(&env, &mut agent, 50, &mut rng_env, &mut rng_agent, &mut ()).unwrap();

        let boxed_env: Box<dyn Environment> = Box::new(env);
        let mut boxed_agent: Box<dyn Agent> = Box::new(UcbAgent::new(3, 2.0).unwrap());
        assert_eq!(boxed_agent.min_steps(), 3);
        let (mut rng_env, mut rng_agent) = rngs();
        let history = run_agent(
            &boxed_env,
            &mut boxed_agent,
            50,
            &mut rng_env,
            &mut rng_agent,
            &mut (),
        )
        .unwrap();
        assert_eq!(history, expected);
    }

    #[test]
    fn zero_steps() {
        let env = DeterministicBandit::from_values([0.0]).unwrap();
        let mut agent = UcbAgent::new(1, 1.0).unwrap();
        let (mut rng_env, mut rng_agent) = rngs();
        assert_eq!(
            run_agent(&env, &mut agent, 0, &mut rng_env, &mut rng_agent, &mut ()),
            Err(SimulationError::NoSteps)
        );
    }

    #[test]
    fn ucb_too_few_steps() {
        let env = DeterministicBandit::from_values([0.0; 4]).unwrap();
        let mut agent = UcbAgent::new(4, 1.0).unwrap();
        let (mut rng_env, mut rng_agent) = rngs();
        assert_eq!(
            run_agent(&env, &mut agent, 3, &mut rng_env, &mut rng_agent, &mut ()),
            Err(SimulationError::TooFewSteps {
                num_steps: 3,
                required: 4
            })
        );
        // No partial run
        assert_eq!(agent.num_steps(), 0);
    }

    #[test]
    fn action_space_mismatch() {
        let env = DeterministicBandit::from_values([0.0, 1.0]).unwrap();
        let mut agent = UcbAgent::new(3, 1.0).unwrap();
        let (mut rng_env, mut rng_agent) = rngs();
        assert_eq!(
            run_agent(&env, &mut agent, 10, &mut rng_env, &mut rng_agent, &mut ()),
            Err(SimulationError::ActionSpaceMismatch { env: 2, agent: 3 })
        );
    }

    /// Counts logged events.
    #[derive(Debug, Default)]
    struct CountingLogger {
        rewards: usize,
        actions: usize,
        steps: usize,
    }

    impl Logger for CountingLogger {
        fn log<'a>(
            &mut self,
            event: Event,
            name: &'a str,
            _value: Loggable,
        ) -> Result<(), LogError<'a>> {
            if event == Event::Step {
                match name {
                    "reward" => self.rewards += 1,
                    "action" => self.actions += 1,
                    _ => {}
                }
            }
            Ok(())
        }

        fn done(&mut self, event: Event) {
            if event == Event::Step {
                self.steps += 1;
            }
        }
    }

    #[test]
    fn logs_every_step() {
        let env = DeterministicBandit::from_values([0.0, 1.0]).unwrap();
        let mut agent = UcbAgent::new(2, 1.0).unwrap();
        let (mut rng_env, mut rng_agent) = rngs();
        let mut logger = CountingLogger::default();
        run_agent(&env, &mut agent, 17, &mut rng_env, &mut rng_agent, &mut logger).unwrap();
        assert_eq!(logger.rewards, 17);
        assert_eq!(logger.actions, 17);
        assert_eq!(logger.steps, 17);
    }
}
