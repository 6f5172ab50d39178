use clap::{ArgEnum, Parser};
use kbandit::agents::{
    BuildAgent, EpsilonGreedyAgentConfig, GradientBanditAgentConfig, UcbAgentConfig,
};
use kbandit::envs::TestbedConfig;
use kbandit::logging::{CLILogger, Logger};
use kbandit::simulation::{run_experiment, ExperimentConfig, ExperimentSummary};
use kbandit::{BanditError, Prng};
use rand::SeedableRng;
use std::time::Duration;
use yansi::Paint;

#[derive(Parser, Debug, Clone, PartialEq)]
#[clap(
    name = "ten-armed-testbed",
    author,
    about = "Average bandit agent performance over random k-armed testbeds"
)]
pub struct Args {
    /// Agent type
    #[clap(short, long, arg_enum, default_value_t = AgentType::Ucb)]
    pub agent: AgentType,

    /// Number of bandit arms
    #[clap(short = 'k', long, default_value_t = 10)]
    pub num_arms: usize,

    /// Number of steps per trial
    #[clap(short = 'n', long, default_value_t = 1000)]
    pub num_steps: u64,

    /// Number of independent trials
    #[clap(long, default_value_t = 2000)]
    pub num_trials: usize,

    /// Number of simulation threads; 0 uses all cores
    #[clap(long, default_value_t = 1)]
    pub threads: usize,

    /// UCB exploration rate (c)
    #[clap(long, default_value_t = 2.0)]
    pub exploration_rate: f64,

    /// Epsilon-greedy random action probability
    #[clap(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Epsilon-greedy initial action value
    #[clap(long, default_value_t = 0.0)]
    pub initial_value: f64,

    /// Step size; gradient preference step or constant epsilon-greedy value step
    #[clap(long)]
    pub step_size: Option<f64>,

    /// Disable the gradient bandit reward baseline
    #[clap(long)]
    pub no_baseline: bool,

    /// Mean of the distribution of true arm means
    #[clap(long, default_value_t = 0.0)]
    pub mean_offset: f64,

    /// Random seed
    #[clap(long, default_value_t = 1)]
    pub seed: u64,

    /// Print every n-th step of the averaged curves
    #[clap(long, default_value_t = 50)]
    pub report_every: usize,

    /// Display per-step and per-trial statistics while running
    #[clap(short, long)]
    pub verbose: bool,
}

/// Agent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ArgEnum)]
pub enum AgentType {
    /// Upper confidence bound
    Ucb,
    /// Epsilon-greedy
    EpsGreedy,
    /// Gradient bandit
    Gradient,
}

impl Args {
    fn experiment_config(&self) -> ExperimentConfig {
        let num_threads = if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        };
        ExperimentConfig::new(self.num_trials, self.num_steps, num_threads)
    }

    fn run(&self, logger: &mut dyn Logger) -> Result<ExperimentSummary, BanditError> {
        let env_config = TestbedConfig::new(self.num_arms, self.mean_offset, 1.0);
        let config = self.experiment_config();
        let mut rng = Prng::seed_from_u64(self.seed);

        match self.agent {
            AgentType::Ucb => {
                let agent_config = UcbAgentConfig::new(self.exploration_rate);
                run_with_config(&env_config, &agent_config, &config, &mut rng, logger)
            }
            AgentType::EpsGreedy => {
                let mut agent_config = EpsilonGreedyAgentConfig::new(self.epsilon)
                    .with_initial_value(self.initial_value);
                agent_config.step_size = self.step_size;
                run_with_config(&env_config, &agent_config, &config, &mut rng, logger)
            }
            AgentType::Gradient => {
                let step_size = self
                    .step_size
                    .unwrap_or(GradientBanditAgentConfig::default().step_size);
                let agent_config = GradientBanditAgentConfig::new(step_size, !self.no_baseline);
                run_with_config(&env_config, &agent_config, &config, &mut rng, logger)
            }
        }
    }
}

fn run_with_config<AC>(
    env_config: &TestbedConfig,
    agent_config: &AC,
    config: &ExperimentConfig,
    rng: &mut Prng,
    logger: &mut dyn Logger,
) -> Result<ExperimentSummary, BanditError>
where
    AC: BuildAgent + std::fmt::Debug,
    AC::Agent: Send,
{
    println!("{:?}", agent_config);
    println!("{:?}", config);
    Ok(run_experiment(env_config, agent_config, config, rng, logger)?)
}

fn print_curves(summary: &ExperimentSummary, report_every: usize) {
    println!(
        "{:>8}  {:>12}  {:>10}",
        Paint::fixed(35, "step"),
        Paint::fixed(35, "mean_reward"),
        Paint::fixed(35, "optimal_%")
    );
    let every = report_every.max(1);
    let last = summary.num_steps() - 1;
    for (step, reward) in summary.mean_rewards.iter().enumerate() {
        if (step + 1) % every != 0 && step != 0 && step != last {
            continue;
        }
        match &summary.optimal_action_rates {
            Some(rates) => println!(
                "{:>8}  {:>12.4}  {:>10.2}",
                step + 1,
                reward,
                rates[step] * 100.0
            ),
            None => println!("{:>8}  {:>12.4}", step + 1, reward),
        }
    }
}

fn main() -> Result<(), BanditError> {
    let args = Args::parse();
    if args.verbose {
        println!("{:#?}", args);
    }

    let summary = if args.verbose {
        let mut logger = CLILogger::new(Duration::from_secs(1));
        args.run(&mut logger)?
    } else {
        args.run(&mut ())?
    };

    print_curves(&summary, args.report_every);
    println!();
    print!("{}", summary);
    Ok(())
}
