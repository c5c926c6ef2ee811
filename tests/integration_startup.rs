//! Integration test to ensure a run can start up without errors.

use delve::{
    DelveResult, GameState, GenerationConfig, InputHandler, Job, PlayerInput, SaveSnapshot,
    TileType,
};

#[test]
fn test_basic_startup() -> DelveResult<()> {
    for job in Job::all() {
        let game_state = GameState::new(12345, job)?;

        // Verify the game state is properly initialized
        assert_eq!(game_state.turn_number, 0);
        assert_eq!(game_state.floor, 1);
        assert!(game_state.player.is_alive());
        assert_eq!(game_state.character.job, job);

        // Verify the player is in a valid position
        assert_eq!(
            game_state.map.tile(game_state.player.position),
            Some(TileType::Floor)
        );
        assert!(game_state
            .roster
            .iter()
            .all(|a| a.position != game_state.player.position));
    }

    Ok(())
}

#[test]
fn test_player_stats_come_from_character() -> DelveResult<()> {
    let game_state = GameState::new(7, Job::Mage)?;
    let stats = game_state.character.final_stats();

    assert_eq!(game_state.player.max_hp, stats.max_hp);
    assert_eq!(game_state.player.attack, stats.attack);
    assert_eq!(game_state.player.max_resource as i32, stats.max_mp);
    assert_eq!(game_state.player.resource, game_state.player.max_resource);
    Ok(())
}

#[test]
fn test_render_shows_player() -> DelveResult<()> {
    let game_state = GameState::with_config(GenerationConfig::for_testing(3), Job::Rogue)?;
    let view = game_state.render();
    assert_eq!(view.matches('@').count(), 1);
    assert_eq!(view.lines().count(), game_state.map.height as usize);
    Ok(())
}

#[test]
fn test_scripted_commands_play_turns() -> DelveResult<()> {
    let mut game_state = GameState::with_config(GenerationConfig::for_testing(3), Job::Warrior)?;
    let handler = InputHandler::new();

    for line in ["wait", "n", "s", "e", "w", "help"] {
        let input = handler.parse(line)?.expect("command");
        if input == PlayerInput::Help {
            continue;
        }
        if let Some(action) = handler.input_to_action(&input, &game_state)? {
            // Walls reject moves without advancing the turn
            let _ = game_state.take_turn(action);
        }
    }
    assert!(game_state.turn_number >= 1);

    let json = game_state.snapshot(1).to_json()?;
    assert_eq!(SaveSnapshot::from_json(&json)?.floor, game_state.floor);
    Ok(())
}

#[test]
fn test_snapshot_survives_storage() -> DelveResult<()> {
    let mut game_state = GameState::with_config(GenerationConfig::for_testing(8), Job::Mage)?;
    game_state.inventory.add_gold(250);
    game_state.completed_quests.push("first_steps".to_string());

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("save.json");
    std::fs::write(&path, game_state.snapshot(1_700_000_000).to_json()?)?;

    let stored = std::fs::read_to_string(&path)?;
    let loaded = delve::load_or_fresh(Some(&stored), Job::Warrior, 0);
    assert_eq!(loaded.job, Job::Mage);
    assert_eq!(loaded.gold, 250);
    assert_eq!(loaded.completed_quests, vec!["first_steps".to_string()]);

    // A truncated record is discarded rather than repaired
    std::fs::write(&path, &stored[..stored.len() / 2])?;
    let stored = std::fs::read_to_string(&path)?;
    let fresh = delve::load_or_fresh(Some(&stored), Job::Warrior, 0);
    assert_eq!(fresh.job, Job::Warrior);
    assert_eq!(fresh.gold, 0);
    Ok(())
}
