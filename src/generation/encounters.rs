//! # Encounter Generation
//!
//! Monster templates and floor population.
//!
//! Regular floors get a depth-scaled number of hostiles spread over every
//! room except the first. Arena floors get exactly one boss, placed well away
//! from the start.

use super::GenerationConfig;
use crate::game::{seeded_entity_id, Agent, Behavior, DungeonMap, Faction, Position};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Minimum distance between the start and any spawned hostile.
const SAFE_RADIUS: u32 = 4;

/// Static monster definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub attack_range: u32,
    pub behavior: Behavior,
    /// Experience granted on defeat
    pub xp: u32,
    /// Gold dropped on defeat, inclusive range
    pub gold: (u32, u32),
}

const fn monster(
    id: &'static str,
    name: &'static str,
    max_hp: i32,
    attack: i32,
    defense: i32,
    attack_range: u32,
    behavior: Behavior,
    xp: u32,
    gold: (u32, u32),
) -> MonsterTemplate {
    MonsterTemplate {
        id,
        name,
        max_hp,
        attack,
        defense,
        attack_range,
        behavior,
        xp,
        gold,
    }
}

pub static MONSTER_TEMPLATES: &[MonsterTemplate] = &[
    monster("rat", "Giant Rat", 12, 4, 0, 1, Behavior::Chase, 10, (1, 4)),
    monster("goblin", "Goblin", 20, 6, 1, 1, Behavior::Chase, 20, (3, 8)),
    monster("archer", "Goblin Archer", 16, 5, 0, 3, Behavior::Ranged, 25, (4, 10)),
    monster("bat", "Cave Bat", 8, 3, 0, 1, Behavior::Random, 8, (0, 3)),
    monster("mold", "Creeping Mold", 25, 5, 2, 1, Behavior::Stationary, 15, (0, 2)),
];

pub static BOSS_TEMPLATES: &[MonsterTemplate] = &[
    monster("ogre", "Ogre Warlord", 90, 12, 3, 1, Behavior::BossChase, 150, (40, 80)),
    monster("golem", "Stone Golem", 140, 16, 6, 1, Behavior::BossLumbering, 200, (60, 120)),
];

pub static ALLY_TEMPLATES: &[MonsterTemplate] = &[
    monster("sellsword", "Sellsword", 40, 7, 2, 1, Behavior::Chase, 0, (0, 0)),
    monster("hound", "War Hound", 28, 6, 1, 1, Behavior::Chase, 0, (0, 0)),
];

/// Looks up any monster, boss or ally template by id.
pub fn monster_template(id: &str) -> Option<&'static MonsterTemplate> {
    MONSTER_TEMPLATES
        .iter()
        .chain(BOSS_TEMPLATES)
        .chain(ALLY_TEMPLATES)
        .find(|t| t.id == id)
}

impl MonsterTemplate {
    /// Builds an agent scaled to `floor`, drawing its id from `rng`.
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        floor: u32,
        position: Position,
        faction: Faction,
        rng: &mut R,
    ) -> Agent {
        let depth = floor.saturating_sub(1) as i32;
        let max_hp = self.max_hp * (100 + 15 * depth) / 100;
        Agent::new(
            self.id,
            self.name,
            position,
            max_hp,
            self.attack + depth / 2,
            self.defense + depth / 3,
            self.behavior,
            faction,
        )
        .with_range(self.attack_range)
        .with_id(seeded_entity_id(rng))
    }
}

/// Places hostiles on a freshly generated floor.
#[derive(Debug, Clone)]
pub struct EncounterGenerator {
    pub config: GenerationConfig,
}

impl EncounterGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Number of hostiles on a regular floor.
    pub fn hostile_count(&self, floor: u32) -> usize {
        let extra = (self.config.hostiles_per_floor * floor.saturating_sub(1) as f64).floor() as usize;
        (self.config.base_hostiles as usize + extra).min(self.config.max_hostiles)
    }

    /// Boss for an arena floor, alternating between the boss variants.
    pub fn boss_for_floor(&self, floor: u32) -> &'static MonsterTemplate {
        let interval = self.config.arena_interval.max(1);
        let index = (floor / interval).saturating_sub(1) as usize % BOSS_TEMPLATES.len();
        &BOSS_TEMPLATES[index]
    }

    /// Spawns the hostiles for `map`, avoiding `occupied` tiles.
    pub fn populate(&self, map: &DungeonMap, occupied: &[Position], rng: &mut StdRng) -> Vec<Agent> {
        let mut spots: Vec<Position> = spawn_spots(map, occupied);

        let agents: Vec<Agent> = if map.is_arena {
            // Farthest spot from the start, ties broken by scan order
            let boss = self.boss_for_floor(map.floor);
            spots
                .iter()
                .copied()
                .max_by_key(|p| (p.manhattan_distance(map.start), std::cmp::Reverse(*p)))
                .map(|pos| boss.spawn(map.floor, pos, Faction::Hostile, rng))
                .into_iter()
                .collect()
        } else {
            spots.shuffle(rng);
            let count = self.hostile_count(map.floor).min(spots.len());
            spots[..count]
                .iter()
                .map(|&pos| {
                    let template = &MONSTER_TEMPLATES[rng.gen_range(0..MONSTER_TEMPLATES.len())];
                    template.spawn(map.floor, pos, Faction::Hostile, rng)
                })
                .collect()
        };

        debug!("floor {}: spawned {} hostile(s)", map.floor, agents.len());
        agents
    }
}

/// Free floor tiles far enough from the start, in row-major order.
///
/// On maps with several rooms the first room is kept clear entirely.
fn spawn_spots(map: &DungeonMap, occupied: &[Position]) -> Vec<Position> {
    let first_room = if map.rooms.len() > 1 {
        map.rooms.first().copied()
    } else {
        None
    };
    map.rooms
        .iter()
        .flat_map(|room| room.floor_positions())
        .filter(|p| first_room.map_or(true, |room| !room.contains(*p)))
        .filter(|p| p.manhattan_distance(map.start) >= SAFE_RADIUS)
        .filter(|p| *p != map.stairs && map.is_walkable(*p))
        .filter(|p| !occupied.contains(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{DungeonGenerator, Generator};
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn setup() -> (DungeonGenerator, EncounterGenerator, StdRng) {
        let config = GenerationConfig::for_testing(3);
        (
            DungeonGenerator::new(config.clone()),
            EncounterGenerator::new(config),
            StdRng::seed_from_u64(3),
        )
    }

    #[test]
    fn test_regular_population() {
        let (dungeon, encounters, mut rng) = setup();
        let map = dungeon.generate(3, &mut rng).unwrap();
        let agents = encounters.populate(&map, &[], &mut rng);

        assert!(agents.len() <= encounters.hostile_count(3));
        let positions: HashSet<_> = agents.iter().map(|a| a.position).collect();
        assert_eq!(positions.len(), agents.len());
        for agent in &agents {
            assert_eq!(agent.faction, Faction::Hostile);
            assert!(map.is_walkable(agent.position));
            assert!(agent.position.manhattan_distance(map.start) >= SAFE_RADIUS);
        }
    }

    #[test]
    fn test_arena_has_single_boss() {
        let (dungeon, encounters, mut rng) = setup();
        let map = dungeon.generate(5, &mut rng).unwrap();
        let agents = encounters.populate(&map, &[], &mut rng);

        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].behavior, Behavior::BossChase);
        assert!(agents[0].position.manhattan_distance(map.start) >= SAFE_RADIUS);

        let next = dungeon.generate(10, &mut rng).unwrap();
        let agents = encounters.populate(&next, &[], &mut rng);
        assert_eq!(agents[0].behavior, Behavior::BossLumbering);
    }

    #[test]
    fn test_hostile_count_grows_and_caps() {
        let (_, encounters, _) = setup();
        assert!(encounters.hostile_count(1) <= encounters.hostile_count(4));
        assert_eq!(encounters.hostile_count(500), encounters.config.max_hostiles);
    }

    #[test]
    fn test_spawn_scales_with_floor() {
        let rat = monster_template("rat").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let shallow = rat.spawn(1, Position::new(0, 0), Faction::Hostile, &mut rng);
        let deep = rat.spawn(9, Position::new(0, 0), Faction::Hostile, &mut rng);
        assert_ne!(shallow.id, deep.id);
        assert!(deep.max_hp > shallow.max_hp);
        assert!(deep.attack > shallow.attack);
        assert_eq!(shallow.hp, shallow.max_hp);
    }
}
