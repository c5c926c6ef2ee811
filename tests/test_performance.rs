//! Performance tests for turn resolution and floor generation

use delve::{
    AutoexploreState, DelveResult, DungeonGenerator, GameState, GenerationConfig, Generator, Job,
    PlayerAction,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

#[test]
fn test_turn_throughput() -> DelveResult<()> {
    let mut game_state = GameState::new(12345, Job::Warrior)?;
    let mut autopilot = AutoexploreState::new();

    let start = Instant::now();
    let mut turns = 0u32;
    while turns < 300 {
        let Some(action) = autopilot.next_action(&game_state) else {
            break;
        };
        if game_state.take_turn(action).is_err() {
            autopilot.current_path.clear();
            game_state.take_turn(PlayerAction::Wait)?;
        }
        turns += 1;
    }

    let elapsed = start.elapsed();
    let avg_turn_time = elapsed / turns.max(1);

    println!("Average turn time: {:?} over {} turns", avg_turn_time, turns);

    assert!(
        avg_turn_time.as_millis() < 20,
        "Turn resolution too slow: {:?}",
        avg_turn_time
    );

    Ok(())
}

#[test]
fn test_floor_generation_performance() -> DelveResult<()> {
    let generator = DungeonGenerator::new(GenerationConfig::new(12345));
    let mut rng = StdRng::seed_from_u64(12345);

    let start = Instant::now();
    let iterations = 50;

    for floor in 1..=iterations {
        generator.generate(floor, &mut rng)?;
    }

    let elapsed = start.elapsed();
    let avg_floor_time = elapsed / iterations;

    println!("Average floor generation time: {:?}", avg_floor_time);

    assert!(
        avg_floor_time.as_millis() < 100,
        "Floor generation too slow: {:?}",
        avg_floor_time
    );

    Ok(())
}
