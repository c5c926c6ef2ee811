//! # Autoexplore Module
//!
//! Autopilot for the headless runner: fights whatever is adjacent, drinks a
//! potion when badly hurt, and otherwise walks to the stairs.

use crate::game::{Direction, DungeonMap, Faction, GameState, PlayerAction, Position};
use crate::items::ConsumableEffect;
use log::debug;
use pathfinding::prelude::astar;

/// Fraction of maximum HP below which the autopilot drinks a healing potion.
const HEAL_THRESHOLD_PCT: i32 = 35;

/// Autoexplore state and functionality.
#[derive(Debug, Clone, Default)]
pub struct AutoexploreState {
    /// Whether autoexplore is currently enabled
    pub enabled: bool,
    /// Current path being followed, next step first
    pub current_path: Vec<Position>,
    /// Current target position
    pub target: Option<Position>,
}

impl AutoexploreState {
    /// Creates a new, enabled autopilot.
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Toggles autoexplore on/off.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.current_path.clear();
            self.target = None;
        }
        self.enabled
    }

    /// Picks the player's next action, or `None` when there is nothing useful
    /// to do.
    pub fn next_action(&mut self, state: &GameState) -> Option<PlayerAction> {
        if !self.enabled || state.is_encounter_over() {
            return None;
        }
        let player = &state.player;

        // Adjacent hostile: bump it
        if let Some(direction) = Direction::all().into_iter().find(|d| {
            state
                .roster
                .agent_at(player.position.step(*d))
                .map_or(false, |a| a.faction == Faction::Hostile)
        }) {
            self.current_path.clear();
            return Some(PlayerAction::Move(direction));
        }

        if player.hp * 100 < player.max_hp * HEAL_THRESHOLD_PCT {
            if let Some(potion) = state
                .inventory
                .items()
                .iter()
                .find(|item| matches!(item.consumable(), Some(ConsumableEffect::Heal(_))))
            {
                return Some(PlayerAction::UseItem(potion.id));
            }
        }

        let stairs = state.map.stairs;
        if self.target != Some(stairs) || !self.path_is_open(state) {
            self.current_path = find_path(state, player.position, stairs).unwrap_or_default();
            self.target = Some(stairs);
            debug!("autopilot planned {} step(s) to {}", self.current_path.len(), stairs);
        }

        if self.current_path.is_empty() {
            return Some(PlayerAction::Wait);
        }
        let next = self.current_path.remove(0);
        match Direction::from_delta(next - player.position) {
            Some(direction) => Some(PlayerAction::Move(direction)),
            None => {
                self.current_path.clear();
                Some(PlayerAction::Wait)
            }
        }
    }

    /// Whether the next planned step is still adjacent and free of hostiles.
    fn path_is_open(&self, state: &GameState) -> bool {
        match self.current_path.first() {
            Some(next) => {
                next.manhattan_distance(state.player.position) == 1
                    && state
                        .roster
                        .agent_at(*next)
                        .map_or(true, |a| a.faction != Faction::Hostile)
            }
            None => false,
        }
    }
}

/// A* search from `start` to `goal` over walkable tiles.
///
/// Hostiles block every tile except the goal; allies are walked through since
/// moving into them swaps places. The returned path excludes `start`.
pub fn find_path(state: &GameState, start: Position, goal: Position) -> Option<Vec<Position>> {
    let map: &DungeonMap = &state.map;
    let successors = |pos: &Position| -> Vec<(Position, u32)> {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|next| map.is_walkable(*next))
            .filter(|next| {
                *next == goal
                    || state
                        .roster
                        .agent_at(*next)
                        .map_or(true, |a| a.faction != Faction::Hostile)
            })
            .map(|next| (next, 1))
            .collect()
    };

    astar(&start, successors, |pos| pos.manhattan_distance(goal), |pos| *pos == goal)
        .map(|(path, _)| path.into_iter().skip(1).collect())
}
