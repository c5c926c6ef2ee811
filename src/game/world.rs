//! # World Representation
//!
//! Tile grid and the immutable per-floor `DungeonMap`.

use crate::generation::Room;
use crate::{DelveError, DelveResult, Position};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Kind of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Wall,
    Floor,
    Stairs,
}

impl TileType {
    /// Whether agents can stand on this tile.
    pub fn is_passable(self) -> bool {
        matches!(self, TileType::Floor | TileType::Stairs)
    }

    /// Glyph used by the headless renderer.
    pub fn glyph(self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
            TileType::Stairs => '>',
        }
    }
}

/// One generated floor.
///
/// A map is built once by the dungeon generator and then only read. Floor
/// transitions replace it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonMap {
    /// Floor number this map was generated for (1-based)
    pub floor: u32,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Row-major tile grid, `tiles[y][x]`
    pub tiles: Vec<Vec<TileType>>,
    /// Rooms in placement order
    pub rooms: Vec<Room>,
    /// Player start position
    pub start: Position,
    /// Stairs position
    pub stairs: Position,
    /// Whether this floor is the single-room arena variant
    pub is_arena: bool,
}

impl DungeonMap {
    /// Creates a solid map (all walls) with no rooms.
    ///
    /// Used by the generator as the carving canvas and by tests.
    pub fn filled(floor: u32, width: u32, height: u32) -> Self {
        Self {
            floor,
            width,
            height,
            tiles: vec![vec![TileType::Wall; width as usize]; height as usize],
            rooms: Vec::new(),
            start: Position::new(0, 0),
            stairs: Position::new(0, 0),
            is_arena: false,
        }
    }

    /// Checks whether a position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Returns the tile at a position, or None when out of bounds.
    pub fn tile(&self, pos: Position) -> Option<TileType> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tiles[pos.y as usize][pos.x as usize])
    }

    /// Whether an agent could stand on this position, ignoring occupants.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).map(TileType::is_passable).unwrap_or(false)
    }

    /// Sets a tile. Out-of-bounds writes are rejected.
    pub fn set_tile(&mut self, pos: Position, tile: TileType) -> DelveResult<()> {
        if !self.in_bounds(pos) {
            return Err(DelveError::InvalidState(format!(
                "Tile write outside map at {}",
                pos
            )));
        }
        self.tiles[pos.y as usize][pos.x as usize] = tile;
        Ok(())
    }

    /// All passable positions in row-major order.
    pub fn passable_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if tile.is_passable() {
                    positions.push(Position::new(x as i32, y as i32));
                }
            }
        }
        positions
    }

    /// Flood-fills passable tiles from `origin` using cardinal steps.
    pub fn reachable_from(&self, origin: Position) -> HashSet<Position> {
        let mut visited = HashSet::new();
        if !self.is_walkable(origin) {
            return visited;
        }

        let mut queue = VecDeque::new();
        visited.insert(origin);
        queue.push_back(origin);

        while let Some(pos) = queue.pop_front() {
            for next in pos.cardinal_adjacent_positions() {
                if !visited.contains(&next) && self.is_walkable(next) {
                    visited.insert(next);
                    queue.push_back(next);
                }
            }
        }

        visited
    }

    /// Whether `to` can be reached from `from` over passable tiles.
    pub fn is_reachable(&self, from: Position, to: Position) -> bool {
        self.reachable_from(from).contains(&to)
    }

    /// Renders the tile grid as text, one line per row.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for row in &self.tiles {
            out.extend(row.iter().map(|tile| tile.glyph()));
            out.push('\n');
        }
        out
    }
}
