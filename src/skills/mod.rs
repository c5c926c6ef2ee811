//! # Skills
//!
//! Static skill definitions, modifier composition and cast resolution.
//!
//! Skill definitions never change at runtime. A character's progress is a
//! separate `skill id → learned level` map. When a skill is cast, its
//! definition is first composed with every learned modifier that names it as
//! parent ([`compose`]), and the composed value is what the resolver
//! validates and applies ([`resolver`]).

pub mod compose;
pub mod resolver;
pub mod table;

pub use compose::*;
pub use resolver::*;
pub use table::*;

use crate::game::{Job, StatusKind};
use crate::stats::StatKey;

/// Skill identifier, as listed in the skill table.
pub type SkillId = &'static str;

/// How a skill participates in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCategory {
    /// Castable on its own
    Active,
    /// Always-on stat contribution
    Passive,
    /// Rewrites its parent skill when both are learned
    Modifier,
    /// Switchable stance; at most one of its group is active
    ExclusiveToggle,
}

/// Where a skill lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    /// The caster only
    SelfOnly,
    /// One enemy within `range`
    Single { range: u32 },
    /// Every valid target within `radius` of a center within `range`
    Area { range: u32, radius: u32 },
    /// No target at all
    None,
}

/// What the skill does to its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Damage,
    Heal,
    Buff,
}

/// Status attached by a skill. Duration and magnitude are fixed by the skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflictedStatus {
    pub kind: StatusKind,
    pub duration: u32,
    pub magnitude: i32,
}

/// Effect descriptor of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillEffect {
    pub kind: EffectKind,
    /// Attack multiplier in thousandths (1500 is x1.5)
    pub multiplier_permille: u32,
    pub inflicts: Option<InflictedStatus>,
}

/// Rewrite a modifier skill performs on its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierTransform {
    /// Turns a single-target attack into an area attack, scaling its
    /// multiplier by `scale_pct` percent
    Splash { radius: u32, scale_pct: u32 },
    /// Strengthens an attack: wider area, higher multiplier and cost, extra status
    Amplify {
        extra_radius: u32,
        bonus_permille: u32,
        extra_cost: u32,
        inflicts: Option<InflictedStatus>,
    },
}

/// Static skill definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillDef {
    pub id: SkillId,
    pub name: &'static str,
    pub job: Job,
    pub category: SkillCategory,
    pub max_level: u32,
    /// Mastery tier the character needs in `job`
    pub required_tier: u32,
    pub cost: u32,
    pub cooldown: u32,
    pub target: TargetShape,
    pub effect: SkillEffect,
    /// Parent skill rewritten by a modifier
    pub parent: Option<SkillId>,
    /// Transform applied to the parent
    pub transform: Option<ModifierTransform>,
    /// Mutually exclusive toggles, this skill included
    pub exclusive_group: &'static [SkillId],
    /// Stat granted per learned level by a passive
    pub passive: Option<(StatKey, i32)>,
}

impl SkillDef {
    pub fn is_castable(&self) -> bool {
        matches!(
            self.category,
            SkillCategory::Active | SkillCategory::ExclusiveToggle
        )
    }
}
