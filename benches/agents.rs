//! Benchmark `Agent::act` and `Agent::update` for the bandit agents.
use criterion::{criterion_group, criterion_main, measurement::Measurement, BenchmarkGroup, Criterion};
use kbandit::agents::{
    Agent, BuildAgent, EpsilonGreedyAgentConfig, GradientBanditAgentConfig, UcbAgentConfig,
};
use kbandit::envs::{BuildEnv, Environment, TestbedConfig};
use kbandit::Prng;
use rand::SeedableRng;

fn bench_agent<M, C>(group: &mut BenchmarkGroup<M>, name: &str, config: &C)
where
    M: Measurement,
    C: BuildAgent,
{
    let mut rng_env = Prng::seed_from_u64(0);
    let mut rng_agent = Prng::seed_from_u64(1);
    let env = TestbedConfig::default().build_env(&mut rng_env).unwrap();
    let mut agent = config.build_agent(env.size()).unwrap();
    group.bench_function(name, |b| {
        b.iter(|| {
            let action = agent.act(&mut rng_agent);
            let reward = env.step(action, &mut rng_env);
            agent.update(action, reward, &mut ());
        })
    });
}

fn agents_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("agent_step");
    bench_agent(&mut group, "ucb", &UcbAgentConfig::default());
    bench_agent(&mut group, "epsilon_greedy", &EpsilonGreedyAgentConfig::default());
    bench_agent(&mut group, "gradient", &GradientBanditAgentConfig::default());
    group.finish();
}

criterion_group!(benches, agents_step);
criterion_main!(benches);
