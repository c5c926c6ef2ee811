//! # Generation Module
//!
//! Procedural content generation for floors, loot and floor population.
//!
//! Every generator draws from a caller-provided seeded RNG, so the same seed
//! and the same sequence of calls always produce the same content.

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::config;
use crate::game::{DungeonMap, Position, TileType};
use crate::{DelveError, DelveResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls map dimensions, room sizes, the placement attempt budget, arena
/// cadence and how many hostiles populate a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Minimum room side (interior)
    pub min_room_size: u32,
    /// Maximum room side (interior)
    pub max_room_size: u32,
    /// Stop placing rooms once this many exist
    pub max_rooms: u32,
    /// Room proposals per attempt
    pub room_attempt_budget: u32,
    /// Whole-floor attempts before the single-room fallback
    pub generation_retries: u32,
    /// Every n-th floor is an arena
    pub arena_interval: u32,
    /// Side of the square arena room
    pub arena_size: u32,
    /// Hostiles on floor 1
    pub base_hostiles: u32,
    /// Extra hostiles per floor of depth
    pub hostiles_per_floor: f64,
    /// Hard cap on hostiles per regular floor
    pub max_hostiles: usize,
}

impl GenerationConfig {
    /// Creates the standard generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert!(config.min_room_size >= 3);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_DUNGEON_WIDTH,
            height: config::DEFAULT_DUNGEON_HEIGHT,
            min_room_size: 4,
            max_room_size: 10,
            max_rooms: 9,
            room_attempt_budget: config::ROOM_ATTEMPT_BUDGET,
            generation_retries: config::GENERATION_RETRIES,
            arena_interval: config::ARENA_INTERVAL,
            arena_size: config::ARENA_SIZE,
            base_hostiles: 3,
            hostiles_per_floor: 1.0,
            max_hostiles: config::MAX_HOSTILES_PER_FLOOR,
        }
    }

    /// Creates a configuration for testing with smaller, simpler floors.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 30,
            height: 20,
            min_room_size: 3,
            max_room_size: 6,
            max_rooms: 5,
            room_attempt_budget: 40,
            generation_retries: 2,
            arena_interval: config::ARENA_INTERVAL,
            arena_size: 11,
            base_hostiles: 2,
            hostiles_per_floor: 0.5,
            max_hostiles: 6,
        }
    }

    /// Whether `floor` produces the arena variant.
    pub fn is_arena_floor(&self, floor: u32) -> bool {
        self.arena_interval > 0 && floor > 0 && floor % self.arena_interval == 0
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Rectangle of carved floor.
///
/// `x`, `y` is the top-left floor tile; every tile inside the rectangle is
/// floor once the room is carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Room {
    /// Creates a new room.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Room;
    ///
    /// let room = Room::new(5, 5, 10, 8);
    /// assert_eq!(room.area(), 80);
    /// ```
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.x + self.width as i32 - 1,
            self.y + self.height as i32 - 1,
        )
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.y >= self.y
            && pos.x < self.x + self.width as i32
            && pos.y < self.y + self.height as i32
    }

    /// Whether the rooms overlap or touch (one tile of wall must separate them).
    pub fn overlaps(&self, other: &Room) -> bool {
        !(self.x > other.x + other.width as i32
            || other.x > self.x + self.width as i32
            || self.y > other.y + other.height as i32
            || other.y > self.y + self.height as i32)
    }

    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.area() as usize);
        for y in self.y..self.y + self.height as i32 {
            for x in self.x..self.x + self.width as i32 {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }
}

/// Trait for procedural generators.
pub trait Generator {
    /// Input describing what to generate
    type Request;
    /// Generated content
    type Output;

    /// Generates content for a request using the provided RNG.
    fn generate(&self, request: Self::Request, rng: &mut StdRng) -> DelveResult<Self::Output>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Checks the structural guarantees every floor must satisfy.
    pub fn validate_map(map: &DungeonMap) -> DelveResult<()> {
        if map.rooms.is_empty() {
            return Err(DelveError::InvalidState(format!(
                "floor {} has no rooms",
                map.floor
            )));
        }
        if !map.is_walkable(map.start) {
            return Err(DelveError::InvalidState(format!(
                "start {} is not walkable",
                map.start
            )));
        }
        if map.tile(map.stairs) != Some(TileType::Stairs) {
            return Err(DelveError::InvalidState(format!(
                "no stairs at {}",
                map.stairs
            )));
        }
        if !map.is_reachable(map.start, map.stairs) {
            return Err(DelveError::InvalidState(
                "stairs are unreachable from the start".to_string(),
            ));
        }
        Ok(())
    }
}
