//! Agent testing utilities
use super::{Agent, BuildAgent};
use crate::envs::{DeterministicBandit, Environment};
use crate::Prng;
use rand::SeedableRng;

/// Check that the agent can be trained to perform well on a trivial bandit environment.
///
/// The environment is a deterministic multi-armed bandit with two arms:
/// the first arm always gives 0 reward and the second 1.
/// After `num_train_steps`, the agent must choose the second arm in at least
/// `threshold` of the following evaluation steps.
pub fn train_deterministic_bandit<C: BuildAgent>(
    config: &C,
    num_train_steps: u64,
    threshold: f64,
) {
    let env = DeterministicBandit::from_values([0.0, 1.0]).unwrap();
    let mut agent = config.build_agent(env.size()).unwrap();
    let mut rng_env = Prng::seed_from_u64(0);
    let mut rng_agent = Prng::seed_from_u64(1);

    for _ in 0..num_train_steps {
        let action = agent.act(&mut rng_agent);
        let reward = env.step(action, &mut rng_env);
        agent.update(action, reward, &mut ());
    }

    eval_deterministic_bandit(&mut agent, &env, &mut rng_env, &mut rng_agent, threshold);
}

/// Evaluate a trained agent on the 0-1 deterministic bandit environment.
#[allow(clippy::cast_possible_truncation)]
pub fn eval_deterministic_bandit<A: Agent + ?Sized>(
    agent: &mut A,
    env: &DeterministicBandit,
    rng_env: &mut Prng,
    rng_agent: &mut Prng,
    threshold: f64,
) {
    let num_eval_steps = 1000;
    let mut action_1_count = 0;
    for _ in 0..num_eval_steps {
        let action = agent.act(rng_agent);
        if action == 1 {
            action_1_count += 1;
        }
        let reward = env.step(action, rng_env);
        agent.update(action, reward, &mut ());
    }
    assert!(
        action_1_count >= ((num_eval_steps as f64) * threshold) as u64,
        "{} / {} optimal actions",
        action_1_count,
        num_eval_steps
    );
}
