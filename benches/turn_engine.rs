//! Benchmarks for turn resolution and floor generation.
//!
//! Run with: cargo bench --bench turn_engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use delve::{
    Agent, Behavior, Direction, DungeonGenerator, Faction, GameState, GenerationConfig, Generator,
    Job, PlayerAction,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A run on floor 1 with `num_agents` extra chasers spread over the floor.
fn create_test_state(num_agents: usize) -> GameState {
    let mut state = GameState::new(42, Job::Warrior).expect("floor 1 generates");
    let spots: Vec<_> = state
        .map
        .passable_positions()
        .into_iter()
        .filter(|p| *p != state.player.position && state.roster.agent_at(*p).is_none())
        .collect();
    for pos in spots.into_iter().rev().take(num_agents) {
        state.roster.push(Agent::new(
            "goblin",
            "Goblin",
            pos,
            10_000,
            1,
            0,
            Behavior::Chase,
            Faction::Hostile,
        ));
    }
    state
}

fn bench_turns(c: &mut Criterion) {
    let mut group = c.benchmark_group("take_turn");

    for num_agents in [0, 10, 50].iter() {
        let state = create_test_state(*num_agents);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_agents", num_agents)),
            num_agents,
            |b, _| {
                b.iter_batched(
                    || state.clone(),
                    |mut state| {
                        for i in 0..10 {
                            let action = PlayerAction::Move(Direction::all()[i % 4]);
                            let _ = black_box(state.take_turn(action));
                        }
                        state
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_floor_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_floor");
    let generator = DungeonGenerator::new(GenerationConfig::new(42));

    for floor in [1u32, 5].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(floor), floor, |b, &floor| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(generator.generate(floor, &mut rng)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_turns, bench_floor_generation);
criterion_main!(benches);
