//! # Status Effects
//!
//! Temporary (or toggled) conditions attached to a single agent.
//!
//! Timed effects count down once per turn and are removed when they reach
//! zero, regardless of how they were applied. Toggle effects created by
//! exclusive-toggle skills carry no duration and stay until switched off.

use crate::skills::SkillId;
use crate::EntityId;
use serde::Serialize;

/// Concrete status identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StatusKind {
    Poison,
    Burn,
    Bleed,
    Regeneration,
    Stun,
    Freeze,
    AttackUp,
    DefenseUp,
}

/// Broad behavior class of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusCategory {
    /// Loses `magnitude` hit points per tick
    DamageOverTime,
    /// Gains `magnitude` hit points per tick
    Regeneration,
    /// Skips the affected agent's action
    Disabling,
    /// Adds `magnitude` to a combat stat while active
    Buff,
}

impl StatusKind {
    pub fn category(self) -> StatusCategory {
        match self {
            StatusKind::Poison | StatusKind::Burn | StatusKind::Bleed => {
                StatusCategory::DamageOverTime
            }
            StatusKind::Regeneration => StatusCategory::Regeneration,
            StatusKind::Stun | StatusKind::Freeze => StatusCategory::Disabling,
            StatusKind::AttackUp | StatusKind::DefenseUp => StatusCategory::Buff,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusKind::Poison => "poison",
            StatusKind::Burn => "burn",
            StatusKind::Bleed => "bleed",
            StatusKind::Regeneration => "regeneration",
            StatusKind::Stun => "stun",
            StatusKind::Freeze => "freeze",
            StatusKind::AttackUp => "attack up",
            StatusKind::DefenseUp => "defense up",
        }
    }
}

/// A status attached to one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Turns left; `None` for toggle effects that never expire on their own
    pub remaining: Option<u32>,
    pub magnitude: i32,
    /// Agent that applied the effect
    pub source: Option<EntityId>,
    /// Toggle skill that owns this effect
    pub toggle: Option<SkillId>,
}

impl StatusEffect {
    /// Creates a timed effect.
    pub fn timed(kind: StatusKind, duration: u32, magnitude: i32, source: Option<EntityId>) -> Self {
        Self {
            kind,
            remaining: Some(duration),
            magnitude,
            source,
            toggle: None,
        }
    }

    /// Creates a toggle effect owned by an exclusive-toggle skill.
    pub fn toggled(kind: StatusKind, magnitude: i32, skill: SkillId, source: EntityId) -> Self {
        Self {
            kind,
            remaining: None,
            magnitude,
            source: Some(source),
            toggle: Some(skill),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// Outcome of ticking one agent's statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTick {
    /// Total damage from damage-over-time effects, with the source of each hit
    pub damage: Vec<(Option<EntityId>, StatusKind, i32)>,
    /// Total healing from regeneration effects
    pub healing: i32,
    /// Kinds removed because they ran out
    pub expired: Vec<StatusKind>,
}

/// The set of statuses active on an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a timed effect.
    ///
    /// Re-applying a kind that is already timed refreshes it to the longer
    /// duration and stronger magnitude instead of stacking a second copy.
    pub fn apply(&mut self, effect: StatusEffect) {
        if effect.toggle.is_none() {
            if let Some(existing) = self
                .effects
                .iter_mut()
                .find(|e| e.kind == effect.kind && e.toggle.is_none())
            {
                existing.remaining = existing.remaining.max(effect.remaining);
                existing.magnitude = existing.magnitude.max(effect.magnitude);
                existing.source = effect.source.or(existing.source);
                return;
            }
        }
        self.effects.push(effect);
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Whether any disabling effect is active.
    pub fn is_disabled(&self) -> bool {
        self.effects
            .iter()
            .any(|e| e.kind.category() == StatusCategory::Disabling)
    }

    /// Sum of buff magnitudes of one kind.
    pub fn buff_total(&self, kind: StatusKind) -> i32 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.magnitude)
            .sum()
    }

    /// Whether the toggle owned by `skill` is active.
    pub fn has_toggle(&self, skill: SkillId) -> bool {
        self.effects.iter().any(|e| e.toggle == Some(skill))
    }

    /// Removes the effects owned by a toggle skill, returning their kinds.
    pub fn remove_toggle(&mut self, skill: SkillId) -> Vec<StatusKind> {
        let removed = self
            .effects
            .iter()
            .filter(|e| e.toggle == Some(skill))
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| e.toggle != Some(skill));
        removed
    }

    /// Advances every timed effect by one turn.
    ///
    /// Damage and healing are reported, not applied, so the caller owns the
    /// hit point bookkeeping. Expired effects are removed.
    pub fn tick(&mut self) -> StatusTick {
        let mut outcome = StatusTick::default();

        for effect in &mut self.effects {
            match effect.kind.category() {
                StatusCategory::DamageOverTime => {
                    outcome
                        .damage
                        .push((effect.source, effect.kind, effect.magnitude));
                }
                StatusCategory::Regeneration => outcome.healing += effect.magnitude,
                StatusCategory::Disabling | StatusCategory::Buff => {}
            }
            if let Some(remaining) = effect.remaining.as_mut() {
                *remaining = remaining.saturating_sub(1);
            }
        }

        outcome.expired = self
            .effects
            .iter()
            .filter(|e| e.is_expired())
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| !e.is_expired());

        outcome
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
