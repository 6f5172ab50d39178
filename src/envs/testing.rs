//! Environment testing utilities
use super::Environment;
use crate::Prng;
use rand::{Rng, SeedableRng};

/// Take uniform random actions in an environment and check that invariants are satisfied.
pub fn check_structured_env<E: Environment + ?Sized>(env: &E, num_steps: u64, seed: u64) {
    let size = env.size();
    assert!(size >= 1);
    if let Some(optimal) = env.optimal_action() {
        assert!(optimal < size);
    }

    let mut rng = Prng::seed_from_u64(seed);
    for _ in 0..num_steps {
        let action = rng.gen_range(0..size);
        let reward = env.step(action, &mut rng);
        assert!(reward.is_finite());
    }
}
