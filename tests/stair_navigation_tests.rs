//! Integration tests for stairs and floor transitions.

use delve::{
    Behavior, Direction, Faction, GameEvent, GameState, GenerationConfig, Job, PlayerAction,
    Position, Roster, TileType,
};

/// Puts the player next to the stairs and returns the step onto them.
fn stand_next_to_stairs(state: &mut GameState) -> Direction {
    let stairs = state.map.stairs;
    let (direction, from) = Direction::all()
        .into_iter()
        .map(|d| (d, stairs.step(d)))
        .find(|(_, p)| state.map.tile(*p) == Some(TileType::Floor))
        .expect("stairs have a floor neighbour");
    state.player.position = from;
    Direction::from_delta(stairs - from).unwrap_or(direction)
}

fn quiet_state(seed: u64) -> GameState {
    let mut state = GameState::with_config(GenerationConfig::for_testing(seed), Job::Warrior)
        .expect("floor 1 generates");
    state.roster = Roster::new();
    state
}

#[test]
fn test_stairs_lead_to_next_floor() {
    let mut state = quiet_state(98765);
    let step = stand_next_to_stairs(&mut state);

    let events = state.take_turn(PlayerAction::Move(step)).unwrap();
    assert!(events.contains(&GameEvent::FloorTransition { floor: 2 }));
    assert_eq!(state.floor, 2);
    assert_eq!(state.map.floor, 2);
    assert_eq!(state.player.position, state.map.start);
    assert_eq!(state.statistics.max_depth_reached, 2);
}

#[test]
fn test_floor_four_stairs_produce_arena() {
    let mut state = quiet_state(4242);
    state.floor = 4;
    let step = stand_next_to_stairs(&mut state);

    state.take_turn(PlayerAction::Move(step)).unwrap();
    assert_eq!(state.floor, 5);
    assert!(state.map.is_arena);
    assert_eq!(state.map.rooms.len(), 1);
    let room = state.map.rooms[0];
    assert_eq!(room.width, room.height);
    assert_eq!(state.player.position, room.center());

    let bosses: Vec<_> = state
        .roster
        .iter()
        .filter(|a| a.faction == Faction::Hostile)
        .collect();
    assert_eq!(bosses.len(), 1);
    assert_eq!(bosses[0].behavior, Behavior::BossChase);
}

#[test]
fn test_arena_is_followed_by_regular_floor() {
    let mut state = quiet_state(11);
    state.floor = 5;
    let step = stand_next_to_stairs(&mut state);

    state.take_turn(PlayerAction::Move(step)).unwrap();
    assert_eq!(state.floor, 6);
    assert!(!state.map.is_arena);
    assert!(state.map.is_reachable(state.map.start, state.map.stairs));
}

#[test]
fn test_allies_follow_player_down() {
    let mut state = quiet_state(2024);
    let ally = state.recruit_ally("hound").unwrap();
    let step = stand_next_to_stairs(&mut state);
    // Keep the ally out of the way of the stairs step
    let clear = state
        .map
        .passable_positions()
        .into_iter()
        .find(|p| {
            *p != state.player.position
                && *p != state.map.stairs
                && p.manhattan_distance(state.player.position) > 1
        })
        .unwrap_or(Position::new(0, 0));
    if let Some(agent) = state.roster.get_mut(ally) {
        agent.position = clear;
    }

    let events = state.take_turn(PlayerAction::Move(step)).unwrap();
    assert!(events.contains(&GameEvent::FloorTransition { floor: 2 }));
    let hound = state.roster.get(ally).expect("ally carried over");
    assert_eq!(hound.faction, Faction::Ally);
    assert!(state.map.is_walkable(hound.position));
    assert_ne!(hound.position, state.player.position);
}

#[test]
fn test_new_floor_agents_wait_a_turn() {
    let mut state = quiet_state(31337);
    let step = stand_next_to_stairs(&mut state);
    let events = state.take_turn(PlayerAction::Move(step)).unwrap();

    let new_ids: Vec<_> = state.roster.ids();
    assert!(!events.iter().any(|e| matches!(
        e,
        GameEvent::Moved { agent_id, .. } if new_ids.contains(agent_id)
    )));
}
