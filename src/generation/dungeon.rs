//! # Dungeon Generation
//!
//! Room-and-corridor floors, with a single-room arena every few floors.
//!
//! Regular floors are built by repeatedly proposing a room of random size,
//! discarding proposals that overlap an existing room, and otherwise carving
//! the room and an L-shaped corridor (horizontal, then vertical) back to the
//! previous room's center. Start is the first room's center and the stairs
//! sit at the last room's center.

use super::{utils, GenerationConfig, Generator, Room};
use crate::game::{DungeonMap, Position, TileType};
use crate::{DelveError, DelveResult};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;

/// Floor generator.
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    pub config: GenerationConfig,
}

impl DungeonGenerator {
    /// Creates a generator for the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{DungeonGenerator, GenerationConfig, Generator};
    /// use rand::SeedableRng;
    ///
    /// let generator = DungeonGenerator::new(GenerationConfig::new(1));
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    /// let map = generator.generate(5, &mut rng).unwrap();
    /// assert!(map.is_arena);
    /// ```
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Generates the map for `floor`.
    ///
    /// Regular floors get `generation_retries` full attempts; if every one
    /// ends with zero rooms, a minimal centered room is used instead.
    pub fn generate_floor(&self, floor: u32, rng: &mut StdRng) -> DelveResult<DungeonMap> {
        let map = if self.config.is_arena_floor(floor) {
            self.generate_arena(floor)?
        } else {
            let mut generated = None;
            for attempt in 0..self.config.generation_retries.max(1) {
                if let Some(map) = self.try_rooms(floor, rng)? {
                    generated = Some(map);
                    break;
                }
                warn!("floor {floor}: attempt {attempt} placed no rooms");
            }
            match generated {
                Some(map) => map,
                None => {
                    warn!("floor {floor}: falling back to a single room");
                    self.generate_fallback(floor)?
                }
            }
        };

        utils::validate_map(&map)?;
        debug!(
            "floor {} generated with {} room(s), arena: {}",
            floor,
            map.rooms.len(),
            map.is_arena
        );
        Ok(map)
    }

    /// One attempt at iterative room placement. `None` when no room fit.
    fn try_rooms(&self, floor: u32, rng: &mut StdRng) -> DelveResult<Option<DungeonMap>> {
        let config = &self.config;
        let mut map = DungeonMap::filled(floor, config.width, config.height);
        let mut rooms: Vec<Room> = Vec::new();

        for _ in 0..config.room_attempt_budget {
            if rooms.len() as u32 >= config.max_rooms {
                break;
            }
            let Some(candidate) = self.propose_room(rng) else {
                continue;
            };
            if rooms.iter().any(|room| room.overlaps(&candidate)) {
                continue;
            }

            carve_room(&mut map, &candidate)?;
            if let Some(previous) = rooms.last() {
                carve_corridor(&mut map, previous.center(), candidate.center())?;
            }
            rooms.push(candidate);
        }

        let (Some(first), Some(last)) = (rooms.first().copied(), rooms.last().copied()) else {
            return Ok(None);
        };
        map.start = first.center();
        map.stairs = if rooms.len() == 1 {
            // A lone room keeps start and stairs apart
            first.bottom_right()
        } else {
            last.center()
        };
        map.set_tile(map.stairs, TileType::Stairs)?;
        map.rooms = rooms;
        Ok(Some(map))
    }

    /// Random room that fits inside the map border, if the map is big enough.
    fn propose_room(&self, rng: &mut StdRng) -> Option<Room> {
        let config = &self.config;
        let width = rng.gen_range(config.min_room_size..=config.max_room_size);
        let height = rng.gen_range(config.min_room_size..=config.max_room_size);
        if width + 2 > config.width || height + 2 > config.height {
            return None;
        }
        let x = rng.gen_range(1..=(config.width - width - 1)) as i32;
        let y = rng.gen_range(1..=(config.height - height - 1)) as i32;
        Some(Room::new(x, y, width, height))
    }

    /// Single square room centered on the map, stairs on its top edge.
    fn generate_arena(&self, floor: u32) -> DelveResult<DungeonMap> {
        let config = &self.config;
        let size = config
            .arena_size
            .min(config.width.saturating_sub(2))
            .min(config.height.saturating_sub(2));
        if size < 3 {
            return Err(DelveError::GenerationExhausted {
                floor,
                attempts: 0,
            });
        }

        let room = Room::new(
            ((config.width - size) / 2) as i32,
            ((config.height - size) / 2) as i32,
            size,
            size,
        );
        let mut map = DungeonMap::filled(floor, config.width, config.height);
        carve_room(&mut map, &room)?;
        map.start = room.center();
        map.stairs = Position::new(room.center().x, room.y);
        map.set_tile(map.stairs, TileType::Stairs)?;
        map.rooms = vec![room];
        map.is_arena = true;
        Ok(map)
    }

    /// Smallest playable layout: one room centered on the map.
    fn generate_fallback(&self, floor: u32) -> DelveResult<DungeonMap> {
        let config = &self.config;
        let size = config
            .min_room_size
            .max(3)
            .min(config.width.saturating_sub(2))
            .min(config.height.saturating_sub(2));
        if size < 2 {
            return Err(DelveError::GenerationExhausted {
                floor,
                attempts: config.room_attempt_budget * config.generation_retries.max(1),
            });
        }

        let room = Room::new(
            ((config.width - size) / 2) as i32,
            ((config.height - size) / 2) as i32,
            size,
            size,
        );
        let mut map = DungeonMap::filled(floor, config.width, config.height);
        carve_room(&mut map, &room)?;
        map.start = room.center();
        map.stairs = room.bottom_right();
        if map.stairs == map.start {
            map.stairs = Position::new(room.x, room.y);
        }
        map.set_tile(map.stairs, TileType::Stairs)?;
        map.rooms = vec![room];
        Ok(map)
    }
}

impl Generator for DungeonGenerator {
    type Request = u32;
    type Output = DungeonMap;

    fn generate(&self, floor: u32, rng: &mut StdRng) -> DelveResult<DungeonMap> {
        self.generate_floor(floor, rng)
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

impl Default for DungeonGenerator {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

fn carve_room(map: &mut DungeonMap, room: &Room) -> DelveResult<()> {
    for pos in room.floor_positions() {
        map.set_tile(pos, TileType::Floor)?;
    }
    Ok(())
}

/// Horizontal segment along `start.y`, then vertical along `end.x`.
fn carve_corridor(map: &mut DungeonMap, start: Position, end: Position) -> DelveResult<()> {
    for x in start.x.min(end.x)..=start.x.max(end.x) {
        map.set_tile(Position::new(x, start.y), TileType::Floor)?;
    }
    for y in start.y.min(end.y)..=start.y.max(end.y) {
        map.set_tile(Position::new(end.x, y), TileType::Floor)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn generator() -> DungeonGenerator {
        DungeonGenerator::new(GenerationConfig::for_testing(12345))
    }

    #[test]
    fn test_regular_floor_is_connected() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(12345);
        for floor in [1, 2, 3, 4, 6] {
            let map = generator.generate(floor, &mut rng).unwrap();
            assert!(!map.is_arena);
            assert!(!map.rooms.is_empty());
            assert!(map.is_reachable(map.start, map.stairs));
            assert_eq!(map.start, map.rooms[0].center());
        }
    }

    #[test]
    fn test_rooms_never_overlap() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(7);
        let map = generator.generate(1, &mut rng).unwrap();
        for (i, a) in map.rooms.iter().enumerate() {
            for b in &map.rooms[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn test_arena_floor() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(1);
        let map = generator.generate(5, &mut rng).unwrap();

        assert!(map.is_arena);
        assert_eq!(map.rooms.len(), 1);
        let room = map.rooms[0];
        assert_eq!(room.width, room.height);
        assert_eq!(room.center(), Position::new(14, 9));
        assert_eq!(map.start, room.center());
        assert_eq!(map.stairs.y, room.y);
    }

    #[test]
    fn test_arena_consumes_no_randomness() {
        let generator = generator();
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        generator.generate(10, &mut a).unwrap();
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }

    #[test]
    fn test_fallback_when_rooms_cannot_fit() {
        let mut config = GenerationConfig::for_testing(1);
        config.min_room_size = 30;
        config.max_room_size = 30;
        let generator = DungeonGenerator::new(config);
        let mut rng = StdRng::seed_from_u64(1);

        let map = generator.generate(2, &mut rng).unwrap();
        assert_eq!(map.rooms.len(), 1);
        assert!(map.is_reachable(map.start, map.stairs));
        assert_ne!(map.start, map.stairs);
    }

    #[test]
    fn test_tiny_map_is_exhausted() {
        let mut config = GenerationConfig::for_testing(1);
        config.width = 3;
        config.height = 3;
        let generator = DungeonGenerator::new(config);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(
            generator.generate(1, &mut rng),
            Err(DelveError::GenerationExhausted { floor: 1, .. })
        ));
    }

    #[test]
    fn test_corridor_carving() {
        let mut map = DungeonMap::filled(1, 20, 20);
        carve_corridor(&mut map, Position::new(2, 2), Position::new(10, 8)).unwrap();
        assert_eq!(map.tile(Position::new(10, 2)), Some(TileType::Floor));
        assert_eq!(map.tile(Position::new(10, 8)), Some(TileType::Floor));
        assert_eq!(map.tile(Position::new(2, 8)), Some(TileType::Wall));
    }
}
