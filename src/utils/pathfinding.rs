//! # Grid Movement
//!
//! Single-step movement helpers and a breadth-first search for free floor.
//! Multi-step routing for the autopilot lives in `game::autoexplore`.

use crate::game::{DungeonMap, Position, TileType};
use std::collections::{HashSet, VecDeque};

/// Cardinal neighbours of `from` that are inside the map and walkable.
pub fn walkable_neighbours(map: &DungeonMap, from: Position) -> Vec<Position> {
    from.cardinal_adjacent_positions()
        .into_iter()
        .filter(|p| map.is_walkable(*p))
        .collect()
}

/// The candidate closest to `goal`; ties keep the earlier candidate.
pub fn closest_to(candidates: &[Position], goal: Position) -> Option<Position> {
    let mut best: Option<(Position, u32)> = None;
    for &candidate in candidates {
        let distance = candidate.manhattan_distance(goal);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(p, _)| p)
}

/// Nearest floor tile to `origin` (excluding `origin` itself) that is not in
/// `occupied`, searching outward over walkable tiles.
pub fn nearest_free(map: &DungeonMap, occupied: &[Position], origin: Position) -> Option<Position> {
    let mut visited = HashSet::from([origin]);
    let mut queue = VecDeque::from([origin]);
    while let Some(pos) = queue.pop_front() {
        if pos != origin && map.tile(pos) == Some(TileType::Floor) && !occupied.contains(&pos) {
            return Some(pos);
        }
        for next in walkable_neighbours(map, pos) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    None
}
