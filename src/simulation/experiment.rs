//! Averaging independent trials.
use super::serial::{check_run, run_agent};
use super::SimulationError;
use crate::agents::BuildAgent;
use crate::envs::{BuildEnv, Environment};
use crate::logging::{Event, Logger};
use crate::Prng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic;

/// Configuration for [`run_experiment`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Number of independent trials, each with a new environment and agent.
    pub num_trials: usize,
    /// Number of steps per trial.
    pub num_steps: u64,
    /// Number of simulation threads.
    pub num_threads: usize,
}

impl ExperimentConfig {
    pub const fn new(num_trials: usize, num_steps: u64, num_threads: usize) -> Self {
        Self {
            num_trials,
            num_steps,
            num_threads,
        }
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::new(2000, 1000, 1)
    }
}

/// Per-step statistics averaged over trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    /// Number of trials averaged.
    pub num_trials: usize,
    /// Mean reward at each step.
    pub mean_rewards: Vec<f64>,
    /// Fraction of trials taking an optimal action at each step.
    ///
    /// `None` unless every environment reports its optimal action.
    pub optimal_action_rates: Option<Vec<f64>>,
}

impl ExperimentSummary {
    /// Number of steps per trial.
    pub fn num_steps(&self) -> usize {
        self.mean_rewards.len()
    }

    /// Mean reward over all steps and trials.
    pub fn overall_mean_reward(&self) -> f64 {
        self.mean_rewards.iter().sum::<f64>() / self.mean_rewards.len() as f64
    }
}

impl fmt::Display for ExperimentSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "num_trials: {}", self.num_trials)?;
        writeln!(f, "num_steps: {}", self.num_steps())?;
        writeln!(f, "step_reward_mean:  {:.4}", self.overall_mean_reward())?;
        if let Some(reward) = self.mean_rewards.last() {
            writeln!(f, "final_reward_mean: {:.4}", reward)?;
        }
        if let Some(rate) = self
            .optimal_action_rates
            .as_ref()
            .and_then(|rates| rates.last())
        {
            writeln!(f, "final_optimal_pct: {:.2}", rate * 100.0)?;
        }
        Ok(())
    }
}

/// Run many independent trials and average the per-step results.
///
/// Each trial builds a new environment and agent then runs for `config.num_steps` steps.
/// Trials may run in parallel on `config.num_threads` threads.
/// All random seeds are drawn from `rng` before any trial starts
/// so the results do not depend on the number of threads.
/// The logger is only used by the first thread.
///
/// # Errors
/// If there are no trials or any environment, agent, or run configuration is invalid.
/// All errors are detected before any trial is run.
pub fn run_experiment<EC, AC>(
    env_config: &EC,
    agent_config: &AC,
    config: &ExperimentConfig,
    rng: &mut Prng,
    logger: &mut dyn Logger,
) -> Result<ExperimentSummary, SimulationError>
where
    EC: BuildEnv + ?Sized,
    EC::Environment: Send,
    AC: BuildAgent + ?Sized,
    AC::Agent: Send,
{
    if config.num_trials == 0 {
        return Err(SimulationError::NoTrials);
    }

    let mut trials = Vec::with_capacity(config.num_trials);
    for _ in 0..config.num_trials {
        let mut rng_env = Prng::from_rng(&mut *rng).expect("Prng should be infallible");
        let rng_agent = Prng::from_rng(&mut *rng).expect("Prng should be infallible");
        let env = env_config.build_env(&mut rng_env)?;
        let agent = agent_config.build_agent(env.size())?;
        check_run(&env, &agent, config.num_steps)?;
        trials.push(Trial {
            env,
            agent,
            rng_env,
            rng_agent,
        });
    }

    let num_threads = config.num_threads.clamp(1, config.num_trials);
    let chunk_size = (config.num_trials + num_threads - 1) / num_threads;
    let num_steps = config.num_steps;

    let mut send_logger = Some(logger);
    let results: Vec<Result<StepTotals, SimulationError>> = crossbeam::scope(|scope| {
        let threads: Vec<_> = trials
            .chunks_mut(chunk_size)
            .map(|chunk| {
                let thread_logger = send_logger.take();
                scope.spawn(move |_scope| {
                    run_trials(chunk, num_steps, thread_logger.unwrap_or(&mut ()))
                })
            })
            .collect();
        threads
            .into_iter()
            .map(|t| t.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    })
    .unwrap_or_else(|e| panic::resume_unwind(e));

    let mut totals = StepTotals::new(num_steps);
    for chunk_totals in results {
        totals.merge(&chunk_totals?);
    }
    Ok(totals.into_summary())
}

/// A single trial ready to run.
struct Trial<E, A> {
    env: E,
    agent: A,
    rng_env: Prng,
    rng_agent: Prng,
}

/// Run a sequence of trials and accumulate their per-step totals.
fn run_trials<E, A>(
    trials: &mut [Trial<E, A>],
    num_steps: u64,
    logger: &mut dyn Logger,
) -> Result<StepTotals, SimulationError>
where
    E: Environment,
    A: crate::agents::Agent,
{
    let mut totals = StepTotals::new(num_steps);
    for trial in trials {
        let history = run_agent(
            &trial.env,
            &mut trial.agent,
            num_steps,
            &mut trial.rng_env,
            &mut trial.rng_agent,
            logger,
        )?;
        let optimal_action = trial.env.optimal_action();
        totals.push(&history.rewards, &history.actions, optimal_action);

        if let Some(reward_mean) = history.mean_reward() {
            logger
                .log(Event::Trial, "reward_mean", reward_mean.into())
                .unwrap();
        }
        if let Some(optimal) = optimal_action {
            let num_optimal = history.actions.iter().filter(|&&a| a == optimal).count();
            logger
                .log(
                    Event::Trial,
                    "optimal_rate",
                    (num_optimal as f64 / history.len() as f64).into(),
                )
                .unwrap();
        }
        logger.done(Event::Trial);
    }
    Ok(totals)
}

/// Per-step sums over a set of trials.
#[derive(Debug, Clone, PartialEq)]
struct StepTotals {
    num_trials: usize,
    reward_sums: Vec<f64>,
    optimal_counts: Vec<u64>,
    /// Whether every trial reported an optimal action.
    optimal_known: bool,
}

impl StepTotals {
    #[allow(clippy::cast_possible_truncation)]
    fn new(num_steps: u64) -> Self {
        Self {
            num_trials: 0,
            reward_sums: vec![0.0; num_steps as usize],
            optimal_counts: vec![0; num_steps as usize],
            optimal_known: true,
        }
    }

    fn push(&mut self, rewards: &[f64], actions: &[usize], optimal_action: Option<usize>) {
        self.num_trials += 1;
        for (sum, reward) in self.reward_sums.iter_mut().zip(rewards) {
            *sum += reward;
        }
        match optimal_action {
            Some(optimal) => {
                for (count, &action) in self.optimal_counts.iter_mut().zip(actions) {
                    if action == optimal {
                        *count += 1;
                    }
                }
            }
            None => self.optimal_known = false,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.num_trials += other.num_trials;
        for (sum, other_sum) in self.reward_sums.iter_mut().zip(&other.reward_sums) {
            *sum += other_sum;
        }
        for (count, other_count) in self.optimal_counts.iter_mut().zip(&other.optimal_counts) {
            *count += other_count;
        }
        self.optimal_known &= other.optimal_known;
    }

    fn into_summary(self) -> ExperimentSummary {
        let n = self.num_trials as f64;
        let optimal_action_rates = if self.optimal_known {
            Some(
                self.optimal_counts
                    .iter()
                    .map(|&count| count as f64 / n)
                    .collect(),
            )
        } else {
            None
        };
        ExperimentSummary {
            num_trials: self.num_trials,
            mean_rewards: self.reward_sums.iter().map(|sum| sum / n).collect(),
            optimal_action_rates,
        }
    }
}
