//! Modifier composition.
//!
//! A cast never reads the table entry directly. It reads the value returned by
//! [`compose`], which starts from the base definition and folds every learned
//! modifier of that skill over it in table order.

use super::{
    modifiers_of, ModifierTransform, SkillCategory, SkillDef, SkillEffect, SkillId, TargetShape,
};
use crate::game::Job;
use std::collections::BTreeMap;

/// Multiplier gained per learned level above the first, in thousandths.
pub const LEVEL_MULTIPLIER_STEP: u32 = 100;

/// A skill definition after modifiers and level scaling were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSkill {
    pub id: SkillId,
    pub name: &'static str,
    pub job: Job,
    pub category: SkillCategory,
    pub cost: u32,
    pub cooldown: u32,
    pub target: TargetShape,
    pub effect: SkillEffect,
    pub exclusive_group: &'static [SkillId],
    /// Modifiers folded into this skill, in application order
    pub modifiers: Vec<SkillId>,
}

impl ComposedSkill {
    fn from_def(def: &'static SkillDef) -> Self {
        Self {
            id: def.id,
            name: def.name,
            job: def.job,
            category: def.category,
            cost: def.cost,
            cooldown: def.cooldown,
            target: def.target,
            effect: def.effect,
            exclusive_group: def.exclusive_group,
            modifiers: Vec::new(),
        }
    }

    fn apply(&mut self, modifier: SkillId, transform: ModifierTransform) {
        if self.modifiers.contains(&modifier) {
            return;
        }
        match transform {
            ModifierTransform::Splash { radius, scale_pct } => {
                // Only a single-target attack can be turned into a splash
                if let TargetShape::Single { range } = self.target {
                    self.target = TargetShape::Area { range, radius };
                    self.effect.multiplier_permille =
                        self.effect.multiplier_permille * scale_pct / 100;
                }
            }
            ModifierTransform::Amplify {
                extra_radius,
                bonus_permille,
                extra_cost,
                inflicts,
            } => {
                self.target = match self.target {
                    TargetShape::Area { range, radius } => TargetShape::Area {
                        range,
                        radius: radius + extra_radius,
                    },
                    TargetShape::Single { range } if extra_radius > 0 => TargetShape::Area {
                        range,
                        radius: extra_radius,
                    },
                    other => other,
                };
                self.effect.multiplier_permille += bonus_permille;
                self.cost += extra_cost;
                if inflicts.is_some() {
                    self.effect.inflicts = inflicts;
                }
            }
        }
        self.modifiers.push(modifier);
    }
}

/// Composes `base` with every learned modifier naming it as parent.
///
/// Each modifier is applied at most once, so composing an already composed
/// skill's modifiers again changes nothing.
pub fn compose(base: &'static SkillDef, learned: &BTreeMap<SkillId, u32>) -> ComposedSkill {
    let mut skill = ComposedSkill::from_def(base);

    let level = learned.get(base.id).copied().unwrap_or(1).max(1);
    skill.effect.multiplier_permille += LEVEL_MULTIPLIER_STEP * (level - 1);

    for modifier in modifiers_of(base.id) {
        if learned.get(modifier.id).copied().unwrap_or(0) == 0 {
            continue;
        }
        if let Some(transform) = modifier.transform {
            skill.apply(modifier.id, transform);
        }
    }

    skill
}
