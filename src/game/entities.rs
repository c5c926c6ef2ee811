//! # Agents and the Roster
//!
//! Every turn-taking entity, player included, is an [`Agent`]. Non-player
//! agents live in a [`Roster`]: a vector kept in turn order plus an id index
//! for constant-time lookup.

use crate::game::status::{StatusEffects, StatusKind};
use crate::skills::SkillId;
use crate::{new_entity_id, EntityId, Position};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Side an agent fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Faction {
    Player,
    Ally,
    Hostile,
}

impl Faction {
    /// Whether two factions fight each other.
    pub fn is_opposed_to(self, other: Faction) -> bool {
        match (self, other) {
            (Faction::Hostile, Faction::Hostile) => false,
            (Faction::Hostile, _) | (_, Faction::Hostile) => true,
            _ => false,
        }
    }
}

/// Behavior tag driving an agent's movement when nothing is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Behavior {
    Chase,
    Ranged,
    Random,
    Stationary,
    /// Boss that always closes in
    BossChase,
    /// Heavy boss that only moves some turns
    BossLumbering,
}

/// A live entity on the current floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Agent {
    pub id: EntityId,
    /// Template this agent was spawned from, reported on defeat
    pub template_id: String,
    pub name: String,
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    /// Manhattan reach of its basic attack
    pub attack_range: u32,
    pub behavior: Behavior,
    pub faction: Faction,
    pub statuses: StatusEffects,
    /// Remaining cooldown per skill; zero entries are dropped
    pub cooldowns: BTreeMap<SkillId, u32>,
    /// Skill resource pool
    pub resource: u32,
    pub max_resource: u32,
}

impl Agent {
    /// Creates a full-health agent.
    pub fn new(
        template_id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        max_hp: i32,
        attack: i32,
        defense: i32,
        behavior: Behavior,
        faction: Faction,
    ) -> Self {
        Self {
            id: new_entity_id(),
            template_id: template_id.into(),
            name: name.into(),
            position,
            hp: max_hp,
            max_hp,
            attack,
            defense,
            attack_range: 1,
            behavior,
            faction,
            statuses: StatusEffects::new(),
            cooldowns: BTreeMap::new(),
            resource: 0,
            max_resource: 0,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    /// Sets the basic attack reach.
    pub fn with_range(mut self, range: u32) -> Self {
        self.attack_range = range;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_disabled(&self) -> bool {
        self.statuses.is_disabled()
    }

    /// Attack including active buffs.
    pub fn effective_attack(&self) -> i32 {
        self.attack + self.statuses.buff_total(StatusKind::AttackUp)
    }

    /// Defense including active buffs.
    pub fn effective_defense(&self) -> i32 {
        self.defense + self.statuses.buff_total(StatusKind::DefenseUp)
    }

    /// Removes hit points, returning the amount actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).max(0);
        before - self.hp
    }

    /// Restores hit points up to the maximum, returning the amount gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    /// Remaining cooldown of a skill.
    pub fn cooldown(&self, skill: SkillId) -> u32 {
        self.cooldowns.get(skill).copied().unwrap_or(0)
    }

    pub fn set_cooldown(&mut self, skill: SkillId, turns: u32) {
        if turns == 0 {
            self.cooldowns.remove(skill);
        } else {
            self.cooldowns.insert(skill, turns);
        }
    }

    /// Decrements every nonzero cooldown by one and drops finished ones.
    pub fn decay_cooldowns(&mut self) {
        for turns in self.cooldowns.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.cooldowns.retain(|_, turns| *turns > 0);
    }
}

/// Turn-ordered collection of non-player agents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    agents: Vec<Agent>,
    index: HashMap<EntityId, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster preserving the given order.
    pub fn from_agents(agents: Vec<Agent>) -> Self {
        let mut roster = Self::new();
        for agent in agents {
            roster.push(agent);
        }
        roster
    }

    /// Appends an agent at the end of the turn order.
    pub fn push(&mut self, agent: Agent) -> EntityId {
        let id = agent.id;
        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Agent> {
        self.index.get(&id).map(|&i| &self.agents[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Agent> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.agents[i]),
            None => None,
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Live agent standing on a position.
    pub fn agent_at(&self, pos: Position) -> Option<&Agent> {
        self.agents
            .iter()
            .find(|a| a.is_alive() && a.position == pos)
    }

    /// Ids in turn order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.agents.iter().map(|a| a.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Removes every agent with no hit points left, preserving order.
    pub fn remove_dead(&mut self) -> Vec<Agent> {
        let (dead, alive): (Vec<Agent>, Vec<Agent>) =
            self.agents.drain(..).partition(|a| !a.is_alive());
        self.agents = alive;
        self.reindex();
        dead
    }

    /// Removes and returns every agent matching the predicate.
    pub fn extract(&mut self, predicate: impl Fn(&Agent) -> bool) -> Vec<Agent> {
        let (taken, kept): (Vec<Agent>, Vec<Agent>) =
            self.agents.drain(..).partition(|a| predicate(a));
        self.agents = kept;
        self.reindex();
        taken
    }

    fn reindex(&mut self) {
        self.index = self
            .agents
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id, i))
            .collect();
    }
}
