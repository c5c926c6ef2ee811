//! # AI Module
//!
//! Per-agent decisions for non-player agents.
//!
//! An agent sees the whole roster, the player and the floor, but reasons only
//! about its own four neighbouring tiles. Attacking always preempts movement:
//! if an opposing agent is within reach the nearest one is attacked, and only
//! otherwise does the behavior tag pick a move.

pub mod behaviors;

pub use behaviors::*;

use crate::game::{AgentDecision, Agent, DungeonMap, Faction, Position, Roster};
use log::debug;
use rand::rngs::StdRng;

/// Allies engage hostiles within this distance, otherwise they follow the player.
pub const ALLY_ENGAGE_RADIUS: u32 = 8;

/// Everything an agent may look at while deciding.
#[derive(Debug, Clone, Copy)]
pub struct Perception<'a> {
    pub agent: &'a Agent,
    pub roster: &'a Roster,
    pub player: &'a Agent,
    pub map: &'a DungeonMap,
}

impl<'a> Perception<'a> {
    pub fn new(agent: &'a Agent, roster: &'a Roster, player: &'a Agent, map: &'a DungeonMap) -> Self {
        Self {
            agent,
            roster,
            player,
            map,
        }
    }

    /// Whether the agent could step onto `pos` right now.
    pub fn is_free(&self, pos: Position) -> bool {
        self.map.is_walkable(pos)
            && pos != self.player.position
            && self
                .roster
                .agent_at(pos)
                .map_or(true, |other| other.id == self.agent.id)
    }

    /// Free cardinal neighbours in N, W, E, S order.
    pub fn candidates(&self) -> Vec<Position> {
        self.agent
            .position
            .cardinal_adjacent_positions()
            .into_iter()
            .filter(|p| self.is_free(*p))
            .collect()
    }

    /// Live agents (player included) opposed to this agent, player first.
    pub fn opponents(&self) -> impl Iterator<Item = &'a Agent> + 'a {
        let faction = self.agent.faction;
        let own_id = self.agent.id;
        std::iter::once(self.player)
            .chain(self.roster.iter())
            .filter(move |other| {
                other.is_alive() && other.id != own_id && faction.is_opposed_to(other.faction)
            })
    }

    /// Nearest opponent; ties go to the player, then to roster order.
    pub fn nearest_opponent(&self) -> Option<&'a Agent> {
        let origin = self.agent.position;
        let mut best: Option<(&Agent, u32)> = None;
        for other in self.opponents() {
            let distance = origin.manhattan_distance(other.position);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((other, distance));
            }
        }
        best.map(|(a, _)| a)
    }

    /// Position the agent moves relative to.
    ///
    /// Hostiles always track the player. Allies close in on the nearest
    /// hostile nearby, and otherwise follow the player.
    pub fn goal(&self) -> Position {
        if self.agent.faction == Faction::Hostile {
            return self.player.position;
        }
        self.nearest_opponent()
            .filter(|o| o.position.manhattan_distance(self.agent.position) <= ALLY_ENGAGE_RADIUS)
            .map_or(self.player.position, |o| o.position)
    }
}

/// Decides what `agent` does this turn.
///
/// Disabled agents stay idle regardless of their behavior tag.
pub fn decide(
    agent: &Agent,
    roster: &Roster,
    player: &Agent,
    map: &DungeonMap,
    rng: &mut StdRng,
) -> AgentDecision {
    if !agent.is_alive() || agent.is_disabled() {
        return AgentDecision::Idle;
    }

    let view = Perception::new(agent, roster, player, map);

    if let Some(target) = view.nearest_opponent() {
        if agent.position.manhattan_distance(target.position) <= agent.attack_range {
            return AgentDecision::Attack(target.id);
        }
    }

    // Allies with nothing to fight stay beside the player
    if agent.faction == Faction::Ally
        && view.goal() == player.position
        && agent.position.manhattan_distance(player.position) <= 1
    {
        return AgentDecision::Idle;
    }

    let decision = strategy_for(agent.behavior)(&view, rng);
    debug!("{} ({:?}) decides {:?}", agent.name, agent.behavior, decision);
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Behavior, StatusEffect, StatusKind, TileType};
    use rand::SeedableRng;

    fn open_map() -> DungeonMap {
        let mut map = DungeonMap::filled(1, 12, 12);
        for y in 1..11 {
            for x in 1..11 {
                map.set_tile(Position::new(x, y), TileType::Floor).unwrap();
            }
        }
        map
    }

    fn player_at(x: i32, y: i32) -> Agent {
        Agent::new("player", "Hero", Position::new(x, y), 50, 5, 0, Behavior::Stationary, Faction::Player)
    }

    fn hostile(behavior: Behavior, x: i32, y: i32) -> Agent {
        Agent::new("rat", "Rat", Position::new(x, y), 10, 3, 0, behavior, Faction::Hostile)
    }

    #[test]
    fn test_attack_preempts_movement() {
        let map = open_map();
        let player = player_at(5, 5);
        let agent = hostile(Behavior::Random, 5, 6);
        let roster = Roster::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            decide(&agent, &roster, &player, &map, &mut rng),
            AgentDecision::Attack(player.id)
        );
    }

    #[test]
    fn test_stationary_never_moves() {
        let map = open_map();
        let player = player_at(2, 2);
        let agent = hostile(Behavior::Stationary, 8, 8);
        let roster = Roster::new();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            assert_eq!(decide(&agent, &roster, &player, &map, &mut rng), AgentDecision::Idle);
        }
    }

    #[test]
    fn test_disabled_agent_is_idle() {
        let map = open_map();
        let player = player_at(5, 5);
        let mut agent = hostile(Behavior::Chase, 5, 6);
        agent.statuses.apply(StatusEffect::timed(StatusKind::Stun, 1, 0, None));
        let roster = Roster::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(decide(&agent, &roster, &player, &map, &mut rng), AgentDecision::Idle);
    }

    #[test]
    fn test_hostile_attacks_adjacent_ally_first_when_closer() {
        let map = open_map();
        let player = player_at(1, 1);
        let mut roster = Roster::new();
        let ally = roster.push(Agent::new(
            "sellsword",
            "Sellsword",
            Position::new(6, 5),
            30,
            5,
            0,
            Behavior::Chase,
            Faction::Ally,
        ));
        let agent = hostile(Behavior::Chase, 5, 5);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            decide(&agent, &roster, &player, &map, &mut rng),
            AgentDecision::Attack(ally)
        );
    }

    #[test]
    fn test_ally_follows_player() {
        let map = open_map();
        let player = player_at(5, 5);
        let roster = Roster::new();
        let mut rng = StdRng::seed_from_u64(1);

        let beside = Agent::new("hound", "Hound", Position::new(5, 6), 20, 4, 0, Behavior::Chase, Faction::Ally);
        assert_eq!(decide(&beside, &roster, &player, &map, &mut rng), AgentDecision::Idle);

        let far = Agent::new("hound", "Hound", Position::new(5, 9), 20, 4, 0, Behavior::Chase, Faction::Ally);
        assert_eq!(
            decide(&far, &roster, &player, &map, &mut rng),
            AgentDecision::MoveTo(Position::new(5, 8))
        );
    }
}
