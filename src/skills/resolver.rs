//! # Skill Resolver
//!
//! Validates a cast and computes its effects without touching game state.
//!
//! The resolver returns a [`StateDelta`] that the turn engine applies. Every
//! rejection happens before randomness is consumed, so a failed cast leaves
//! the caller's state and RNG stream untouched.

use super::{compose, skill_def, ComposedSkill, EffectKind, SkillCategory, SkillId, TargetShape};
use crate::game::{Agent, Position, Roster, StatusEffect};
use crate::utils::{mitigate, roll_with_variance, scaled_floor};
use crate::{DelveError, DelveResult, EntityId};
use log::debug;
use rand::Rng;
use std::collections::BTreeMap;

/// Explicit target chosen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetHint {
    Agent(EntityId),
    Tile(Position),
}

/// Everything a successful cast changes.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDelta {
    pub caster: EntityId,
    pub skill: SkillId,
    pub resource_spent: u32,
    /// Cooldown to set on the caster; `None` leaves it untouched
    pub cooldown: Option<u32>,
    /// Center of an area cast
    pub center: Option<Position>,
    /// Final damage per target, after defense
    pub damage: Vec<(EntityId, i32)>,
    pub healing: Vec<(EntityId, i32)>,
    pub statuses: Vec<(EntityId, StatusEffect)>,
    /// Toggle skills switched off by this cast
    pub removed_toggles: Vec<SkillId>,
}

impl StateDelta {
    fn empty(caster: EntityId, skill: SkillId) -> Self {
        Self {
            caster,
            skill,
            resource_spent: 0,
            cooldown: None,
            center: None,
            damage: Vec::new(),
            healing: Vec::new(),
            statuses: Vec::new(),
            removed_toggles: Vec::new(),
        }
    }

    /// A toggle switched off without anything else happening.
    pub fn is_deactivation(&self) -> bool {
        self.removed_toggles.contains(&self.skill) && self.statuses.is_empty()
    }
}

/// Resolves a cast of `skill_id` by `caster`.
///
/// `roster` holds the other agents; the caster itself is never a damage
/// target. Steps: composition, toggle-off shortcut, cooldown and resource
/// gating, exclusivity, targeting and finally the effect roll.
pub fn cast<R: Rng + ?Sized>(
    skill_id: &str,
    caster: &Agent,
    learned: &BTreeMap<SkillId, u32>,
    roster: &Roster,
    target_hint: Option<TargetHint>,
    rng: &mut R,
) -> DelveResult<StateDelta> {
    let def = skill_def(skill_id).ok_or_else(|| DelveError::UnknownSkill(skill_id.to_string()))?;
    if learned.get(def.id).copied().unwrap_or(0) == 0 {
        return Err(DelveError::SkillLocked(format!("{} has not been learned", def.name)));
    }
    if !def.is_castable() {
        return Err(DelveError::InvalidAction(format!("{} cannot be cast", def.name)));
    }

    let skill = compose(def, learned);

    if skill.category == SkillCategory::ExclusiveToggle && caster.statuses.has_toggle(skill.id) {
        let mut delta = StateDelta::empty(caster.id, skill.id);
        delta.removed_toggles.push(skill.id);
        debug!("{} switches off {}", caster.name, skill.name);
        return Ok(delta);
    }

    let remaining = caster.cooldown(skill.id);
    if remaining > 0 {
        return Err(DelveError::OnCooldown {
            skill: skill.id.to_string(),
            remaining,
        });
    }
    if caster.resource < skill.cost {
        return Err(DelveError::InsufficientResource {
            needed: skill.cost,
            available: caster.resource,
        });
    }

    let mut delta = StateDelta::empty(caster.id, skill.id);
    delta.resource_spent = skill.cost;
    delta.cooldown = Some(skill.cooldown);

    if skill.category == SkillCategory::ExclusiveToggle {
        delta.removed_toggles = skill
            .exclusive_group
            .iter()
            .copied()
            .filter(|sibling| *sibling != skill.id && caster.statuses.has_toggle(*sibling))
            .collect();
    }

    let targets = select_targets(&skill, caster, roster, target_hint, &mut delta)?;
    apply_effect(&skill, caster, roster, &targets, rng, &mut delta);

    debug!(
        "{} casts {} on {} target(s)",
        caster.name,
        skill.name,
        targets.len()
    );
    Ok(delta)
}

fn is_enemy(caster: &Agent, other: &Agent) -> bool {
    other.is_alive() && other.id != caster.id && caster.faction.is_opposed_to(other.faction)
}

fn nearest_enemy<'a>(caster: &Agent, roster: &'a Roster, range: u32) -> Option<&'a Agent> {
    let mut best: Option<(&Agent, u32)> = None;
    for other in roster.iter().filter(|a| is_enemy(caster, a)) {
        let distance = caster.position.manhattan_distance(other.position);
        if distance <= range && best.map_or(true, |(_, d)| distance < d) {
            best = Some((other, distance));
        }
    }
    best.map(|(a, _)| a)
}

fn hinted_agent<'a>(roster: &'a Roster, hint: TargetHint) -> Option<&'a Agent> {
    match hint {
        TargetHint::Agent(id) => roster.get(id),
        TargetHint::Tile(pos) => roster.agent_at(pos),
    }
}

fn select_targets(
    skill: &ComposedSkill,
    caster: &Agent,
    roster: &Roster,
    hint: Option<TargetHint>,
    delta: &mut StateDelta,
) -> DelveResult<Vec<EntityId>> {
    match skill.target {
        TargetShape::SelfOnly => Ok(vec![caster.id]),
        TargetShape::None => Ok(Vec::new()),
        TargetShape::Single { range } => {
            let target = match hint {
                Some(hint) => hinted_agent(roster, hint).filter(|a| {
                    is_enemy(caster, a) && caster.position.manhattan_distance(a.position) <= range
                }),
                None => nearest_enemy(caster, roster, range),
            };
            target
                .map(|a| vec![a.id])
                .ok_or_else(|| DelveError::InvalidTarget(format!("no enemy in range for {}", skill.name)))
        }
        TargetShape::Area { range, radius } => {
            let center = match hint {
                Some(TargetHint::Tile(pos)) => pos,
                Some(hint @ TargetHint::Agent(_)) => hinted_agent(roster, hint)
                    .map(|a| a.position)
                    .ok_or_else(|| DelveError::InvalidTarget("target is gone".to_string()))?,
                None if range == 0 => caster.position,
                None => nearest_enemy(caster, roster, range)
                    .map(|a| a.position)
                    .unwrap_or(caster.position),
            };
            if caster.position.manhattan_distance(center) > range {
                return Err(DelveError::InvalidTarget(format!(
                    "{} is out of range for {}",
                    center, skill.name
                )));
            }
            delta.center = Some(center);
            Ok(roster
                .iter()
                .filter(|a| is_enemy(caster, a) && a.position.manhattan_distance(center) <= radius)
                .map(|a| a.id)
                .collect())
        }
    }
}

fn apply_effect<R: Rng + ?Sized>(
    skill: &ComposedSkill,
    caster: &Agent,
    roster: &Roster,
    targets: &[EntityId],
    rng: &mut R,
    delta: &mut StateDelta,
) {
    let effect = skill.effect;
    match effect.kind {
        EffectKind::Damage => {
            if targets.is_empty() {
                return;
            }
            // One roll per cast, then each target's own defense
            let raw = roll_with_variance(scaled_floor(caster.effective_attack(), effect.multiplier_permille), rng);
            for &id in targets {
                let defense = roster.get(id).map_or(0, |a| a.effective_defense());
                delta.damage.push((id, mitigate(raw, defense)));
            }
        }
        EffectKind::Heal => {
            let amount = scaled_floor(caster.effective_attack(), effect.multiplier_permille);
            for &id in targets {
                delta.healing.push((id, amount));
            }
        }
        EffectKind::Buff => {}
    }

    if let Some(inflicted) = effect.inflicts {
        for &id in targets {
            let status = if skill.category == SkillCategory::ExclusiveToggle {
                StatusEffect::toggled(inflicted.kind, inflicted.magnitude, skill.id, caster.id)
            } else {
                StatusEffect::timed(
                    inflicted.kind,
                    inflicted.duration,
                    inflicted.magnitude,
                    Some(caster.id),
                )
            };
            delta.statuses.push((id, status));
        }
    }
}
