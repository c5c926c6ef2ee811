//! Character progression: job, level, learned skills and equipment.

use crate::config::{MASTERY_LEVEL_STEP, XP_PER_LEVEL};
use crate::items::{ItemInstance, Slot};
use crate::skills::{skill_def, SkillCategory, SkillId};
use crate::stats::{aggregate, Attributes, FinalStats};
use crate::{DelveError, DelveResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Character class; each job owns one skill tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Job {
    Warrior,
    Mage,
    Rogue,
}

impl Job {
    pub fn all() -> [Job; 3] {
        [Job::Warrior, Job::Mage, Job::Rogue]
    }

    pub fn name(self) -> &'static str {
        match self {
            Job::Warrior => "warrior",
            Job::Mage => "mage",
            Job::Rogue => "rogue",
        }
    }

    pub fn from_name(name: &str) -> Option<Job> {
        Job::all()
            .into_iter()
            .find(|job| job.name().eq_ignore_ascii_case(name))
    }

    /// Starting attributes (STR, DEX, INT, VIT, LUK).
    pub fn base_attributes(self) -> Attributes {
        match self {
            Job::Warrior => Attributes::new(8, 5, 3, 7, 4),
            Job::Mage => Attributes::new(3, 5, 9, 4, 5),
            Job::Rogue => Attributes::new(5, 8, 4, 5, 7),
        }
    }

    /// Skill every new character of this job knows.
    pub fn starting_skill(self) -> SkillId {
        match self {
            Job::Warrior => "power_strike",
            Job::Mage => "fireball",
            Job::Rogue => "backstab",
        }
    }

    fn raise_primary(self, attributes: &mut Attributes) {
        match self {
            Job::Warrior => attributes.strength += 1,
            Job::Mage => attributes.intelligence += 1,
            Job::Rogue => attributes.dexterity += 1,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The player's persistent progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub name: String,
    pub job: Job,
    pub level: u32,
    /// Experience towards the next level
    pub xp: u32,
    pub skill_points: u32,
    /// Mastery tier per job
    pub mastery: BTreeMap<Job, u32>,
    pub base_attributes: Attributes,
    pub equipment: BTreeMap<Slot, ItemInstance>,
    /// Learned level per skill
    pub learned_skills: BTreeMap<SkillId, u32>,
    pub current_hp: i32,
    pub current_mp: u32,
}

impl Character {
    /// Creates a level 1 character at full health and resource.
    pub fn new(name: impl Into<String>, job: Job) -> Self {
        let mut character = Self {
            name: name.into(),
            job,
            level: 1,
            xp: 0,
            skill_points: 0,
            mastery: BTreeMap::from([(job, 1)]),
            base_attributes: job.base_attributes(),
            equipment: BTreeMap::new(),
            learned_skills: BTreeMap::from([(job.starting_skill(), 1)]),
            current_hp: 0,
            current_mp: 0,
        };
        let stats = character.final_stats();
        character.current_hp = stats.max_hp;
        character.current_mp = stats.max_mp.max(0) as u32;
        character
    }

    pub fn final_stats(&self) -> FinalStats {
        aggregate(self)
    }

    pub fn mastery_tier(&self, job: Job) -> u32 {
        self.mastery.get(&job).copied().unwrap_or(0)
    }

    pub fn skill_level(&self, skill: &str) -> u32 {
        self.learned_skills.get(skill).copied().unwrap_or(0)
    }

    /// Spends a skill point to learn or raise a skill, returning its new level.
    ///
    /// Fails with `SkillLocked` when the job's mastery tier is too low, the
    /// skill is at its maximum level, a modifier's parent is not learned, or
    /// no skill point is available.
    pub fn learn_skill(&mut self, skill: &str) -> DelveResult<u32> {
        let def = skill_def(skill).ok_or_else(|| DelveError::UnknownSkill(skill.to_string()))?;
        let current = self.skill_level(def.id);

        if self.mastery_tier(def.job) < def.required_tier {
            return Err(DelveError::SkillLocked(format!(
                "{} needs {} mastery tier {}",
                def.name, def.job, def.required_tier
            )));
        }
        if current >= def.max_level {
            return Err(DelveError::SkillLocked(format!(
                "{} is already at level {}",
                def.name, def.max_level
            )));
        }
        if def.category == SkillCategory::Modifier {
            if let Some(parent) = def.parent {
                if self.skill_level(parent) == 0 {
                    return Err(DelveError::SkillLocked(format!(
                        "{} modifies {}, which is not learned",
                        def.name, parent
                    )));
                }
            }
        }
        if self.skill_points == 0 {
            return Err(DelveError::SkillLocked("no skill points left".to_string()));
        }

        self.skill_points -= 1;
        self.learned_skills.insert(def.id, current + 1);
        Ok(current + 1)
    }

    /// Experience needed to leave the current level.
    pub fn xp_to_next_level(&self) -> u32 {
        XP_PER_LEVEL * self.level
    }

    /// Adds experience, returning how many levels were gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= self.xp_to_next_level() {
            self.xp -= self.xp_to_next_level();
            self.level += 1;
            self.skill_points += 1;
            self.job.raise_primary(&mut self.base_attributes);
            self.base_attributes.vitality += 1;
            if self.level % MASTERY_LEVEL_STEP == 0 {
                *self.mastery.entry(self.job).or_insert(0) += 1;
            }
            gained += 1;
            info!("{} reached level {}", self.name, self.level);
        }
        gained
    }

    /// Number of equipped pieces per item set.
    pub fn equipped_set_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for set_id in self.equipment.values().filter_map(|item| item.set_id()) {
            *counts.entry(set_id).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Puts an item in its slot, returning whatever was there before.
    pub fn equip(&mut self, item: ItemInstance) -> DelveResult<Option<ItemInstance>> {
        let slot = item
            .slot
            .ok_or_else(|| DelveError::InvalidAction(format!("{} cannot be equipped", item.name)))?;
        let previous = self.equipment.insert(slot, item);
        self.clamp_pools();
        Ok(previous)
    }

    pub fn unequip(&mut self, slot: Slot) -> Option<ItemInstance> {
        let item = self.equipment.remove(&slot);
        self.clamp_pools();
        item
    }

    /// Keeps current pools within the maxima of the current equipment.
    pub fn clamp_pools(&mut self) {
        let stats = self.final_stats();
        self.current_hp = self.current_hp.min(stats.max_hp);
        self.current_mp = self.current_mp.min(stats.max_mp.max(0) as u32);
    }
}
