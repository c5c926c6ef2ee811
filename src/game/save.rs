//! Persistence surface.
//!
//! [`SaveSnapshot`] is the flat record handed to whatever stores progress.
//! The simulation never performs I/O itself; it only produces and validates
//! the JSON text.

use crate::config::INVENTORY_CAPACITY;
use crate::game::{Character, EntityId, GameState, Job};
use crate::skills::skill_def;
use crate::stats::{Attributes, FinalStats};
use crate::{DelveError, DelveResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Snapshot format written by this version.
pub const SAVE_VERSION: u32 = 1;

/// Flat snapshot of the player's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub version: u32,
    pub name: String,
    pub job: Job,
    pub level: u32,
    pub xp: u32,
    pub skill_points: u32,
    pub base_attributes: Attributes,
    /// Derived stats at the time of saving
    pub stats: FinalStats,
    pub current_hp: i32,
    pub current_mp: u32,
    pub gold: u32,
    pub floor: u32,
    /// Carried item ids, in inventory order
    pub inventory: Vec<EntityId>,
    pub learned_skills: BTreeMap<String, u32>,
    pub completed_quests: Vec<String>,
    pub active_quests: Vec<String>,
    /// Caller-supplied save time
    pub timestamp: u64,
}

impl SaveSnapshot {
    /// Captures the current run.
    pub fn from_state(state: &GameState, timestamp: u64) -> Self {
        let mut snapshot = Self::from_character(&state.character, state.floor, timestamp);
        snapshot.current_hp = state.player.hp;
        snapshot.current_mp = state.player.resource;
        snapshot.gold = state.inventory.gold;
        snapshot.inventory = state.inventory.items().iter().map(|item| item.id).collect();
        snapshot.completed_quests = state.completed_quests.clone();
        snapshot.active_quests = state.active_quests.clone();
        snapshot
    }

    /// Snapshot of a brand new character on floor 1.
    pub fn fresh(job: Job, timestamp: u64) -> Self {
        Self::from_character(&Character::new("Adventurer", job), 1, timestamp)
    }

    fn from_character(character: &Character, floor: u32, timestamp: u64) -> Self {
        Self {
            version: SAVE_VERSION,
            name: character.name.clone(),
            job: character.job,
            level: character.level,
            xp: character.xp,
            skill_points: character.skill_points,
            base_attributes: character.base_attributes,
            stats: character.final_stats(),
            current_hp: character.current_hp,
            current_mp: character.current_mp,
            gold: 0,
            floor,
            inventory: Vec::new(),
            learned_skills: character
                .learned_skills
                .iter()
                .map(|(id, level)| (id.to_string(), *level))
                .collect(),
            completed_quests: Vec::new(),
            active_quests: Vec::new(),
            timestamp,
        }
    }

    pub fn to_json(&self) -> DelveResult<String> {
        serde_json::to_string_pretty(self).map_err(DelveError::from)
    }

    /// Parses and validates a snapshot.
    ///
    /// Both malformed JSON and structurally invalid records are reported as
    /// `CorruptedSaveState`.
    pub fn from_json(json: &str) -> DelveResult<Self> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| DelveError::CorruptedSaveState(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks the structural guarantees of a loaded record.
    pub fn validate(&self) -> DelveResult<()> {
        let corrupt = |reason: String| Err(DelveError::CorruptedSaveState(reason));

        if self.version != SAVE_VERSION {
            return corrupt(format!("unsupported version {}", self.version));
        }
        if self.level == 0 || self.floor == 0 {
            return corrupt("level and floor start at 1".to_string());
        }
        if self.stats.max_hp <= 0 || self.current_hp > self.stats.max_hp {
            return corrupt(format!(
                "hit points {}/{} are out of range",
                self.current_hp, self.stats.max_hp
            ));
        }
        if self.inventory.len() > INVENTORY_CAPACITY {
            return corrupt(format!("{} items exceed capacity", self.inventory.len()));
        }
        let mut seen = HashSet::new();
        if !self.inventory.iter().all(|id| seen.insert(*id)) {
            return corrupt("duplicate item id in inventory".to_string());
        }
        for (skill, level) in &self.learned_skills {
            match skill_def(skill) {
                Some(def) if *level >= 1 && *level <= def.max_level => {}
                Some(_) => return corrupt(format!("{skill} has invalid level {level}")),
                None => return corrupt(format!("unknown skill {skill}")),
            }
        }
        if self
            .active_quests
            .iter()
            .chain(&self.completed_quests)
            .any(|q| q.is_empty())
        {
            return corrupt("quest with an empty name".to_string());
        }
        if let Some(quest) = self
            .active_quests
            .iter()
            .find(|q| self.completed_quests.contains(q))
        {
            return corrupt(format!("quest '{quest}' is both active and completed"));
        }
        Ok(())
    }
}

/// Loads a stored record, or starts fresh when there is none or it is corrupt.
pub fn load_or_fresh(json: Option<&str>, job: Job, timestamp: u64) -> SaveSnapshot {
    match json.map(SaveSnapshot::from_json) {
        Some(Ok(snapshot)) => snapshot,
        Some(Err(e)) => {
            warn!("discarding save record: {}", e);
            SaveSnapshot::fresh(job, timestamp)
        }
        None => SaveSnapshot::fresh(job, timestamp),
    }
}
