//! Skill data table.

use super::{
    EffectKind, InflictedStatus, ModifierTransform, SkillCategory, SkillDef, SkillEffect, SkillId,
    TargetShape,
};
use crate::game::{Job, StatusKind};
use crate::stats::StatKey;

const NO_EFFECT: SkillEffect = SkillEffect {
    kind: EffectKind::Buff,
    multiplier_permille: 0,
    inflicts: None,
};

const fn damage(multiplier_permille: u32, inflicts: Option<InflictedStatus>) -> SkillEffect {
    SkillEffect {
        kind: EffectKind::Damage,
        multiplier_permille,
        inflicts,
    }
}

const fn status(kind: StatusKind, duration: u32, magnitude: i32) -> Option<InflictedStatus> {
    Some(InflictedStatus {
        kind,
        duration,
        magnitude,
    })
}

const fn active(
    id: SkillId,
    name: &'static str,
    job: Job,
    required_tier: u32,
    cost: u32,
    cooldown: u32,
    target: TargetShape,
    effect: SkillEffect,
) -> SkillDef {
    SkillDef {
        id,
        name,
        job,
        category: SkillCategory::Active,
        max_level: 5,
        required_tier,
        cost,
        cooldown,
        target,
        effect,
        parent: None,
        transform: None,
        exclusive_group: &[],
        passive: None,
    }
}

const fn modifier(
    id: SkillId,
    name: &'static str,
    job: Job,
    required_tier: u32,
    parent: SkillId,
    transform: ModifierTransform,
) -> SkillDef {
    SkillDef {
        id,
        name,
        job,
        category: SkillCategory::Modifier,
        max_level: 1,
        required_tier,
        cost: 0,
        cooldown: 0,
        target: TargetShape::None,
        effect: NO_EFFECT,
        parent: Some(parent),
        transform: Some(transform),
        exclusive_group: &[],
        passive: None,
    }
}

const fn toggle(
    id: SkillId,
    name: &'static str,
    job: Job,
    cost: u32,
    buff: StatusKind,
    magnitude: i32,
    group: &'static [SkillId],
) -> SkillDef {
    SkillDef {
        id,
        name,
        job,
        category: SkillCategory::ExclusiveToggle,
        max_level: 1,
        required_tier: 1,
        cost,
        cooldown: 0,
        target: TargetShape::SelfOnly,
        effect: SkillEffect {
            kind: EffectKind::Buff,
            multiplier_permille: 0,
            inflicts: status(buff, 0, magnitude),
        },
        parent: None,
        transform: None,
        exclusive_group: group,
        passive: None,
    }
}

const fn passive(
    id: SkillId,
    name: &'static str,
    job: Job,
    required_tier: u32,
    stat: StatKey,
    per_level: i32,
) -> SkillDef {
    SkillDef {
        id,
        name,
        job,
        category: SkillCategory::Passive,
        max_level: 5,
        required_tier,
        cost: 0,
        cooldown: 0,
        target: TargetShape::None,
        effect: NO_EFFECT,
        parent: None,
        transform: None,
        exclusive_group: &[],
        passive: Some((stat, per_level)),
    }
}

const WARRIOR_STANCES: &[SkillId] = &["berserk", "bulwark"];
const ROGUE_STANCES: &[SkillId] = &["assassin_stance", "shadow_stance"];

pub static SKILL_TABLE: &[SkillDef] = &[
    // Warrior
    active("power_strike", "Power Strike", Job::Warrior, 1, 5, 2, TargetShape::Single { range: 1 }, damage(1500, None)),
    modifier("cleave", "Cleave", Job::Warrior, 2, "power_strike", ModifierTransform::Splash { radius: 1, scale_pct: 80 }),
    active("shockwave", "Shockwave", Job::Warrior, 2, 10, 4, TargetShape::Area { range: 0, radius: 2 }, damage(1200, status(StatusKind::Stun, 1, 0))),
    active(
        "second_wind",
        "Second Wind",
        Job::Warrior,
        1,
        8,
        6,
        TargetShape::SelfOnly,
        SkillEffect { kind: EffectKind::Heal, multiplier_permille: 2000, inflicts: status(StatusKind::Regeneration, 3, 2) },
    ),
    toggle("berserk", "Berserk", Job::Warrior, 5, StatusKind::AttackUp, 5, WARRIOR_STANCES),
    toggle("bulwark", "Bulwark", Job::Warrior, 5, StatusKind::DefenseUp, 5, WARRIOR_STANCES),
    passive("toughness", "Toughness", Job::Warrior, 1, StatKey::MaxHp, 10),
    // Mage
    active("fireball", "Fireball", Job::Mage, 1, 8, 3, TargetShape::Area { range: 5, radius: 1 }, damage(1400, status(StatusKind::Burn, 3, 2))),
    modifier(
        "inferno",
        "Inferno",
        Job::Mage,
        2,
        "fireball",
        ModifierTransform::Amplify { extra_radius: 1, bonus_permille: 300, extra_cost: 4, inflicts: status(StatusKind::Burn, 4, 3) },
    ),
    active("frost_bolt", "Frost Bolt", Job::Mage, 1, 5, 1, TargetShape::Single { range: 6 }, damage(1200, status(StatusKind::Freeze, 1, 0))),
    modifier("frost_nova", "Frost Nova", Job::Mage, 3, "frost_bolt", ModifierTransform::Splash { radius: 1, scale_pct: 75 }),
    passive("meditation", "Meditation", Job::Mage, 1, StatKey::MaxMp, 10),
    // Rogue
    active("backstab", "Backstab", Job::Rogue, 1, 6, 3, TargetShape::Single { range: 1 }, damage(2000, status(StatusKind::Bleed, 3, 2))),
    modifier(
        "poison_blade",
        "Poison Blade",
        Job::Rogue,
        2,
        "backstab",
        ModifierTransform::Amplify { extra_radius: 0, bonus_permille: 200, extra_cost: 2, inflicts: status(StatusKind::Poison, 4, 3) },
    ),
    active("throwing_knife", "Throwing Knife", Job::Rogue, 1, 3, 1, TargetShape::Single { range: 4 }, damage(1000, None)),
    toggle("assassin_stance", "Assassin Stance", Job::Rogue, 4, StatusKind::AttackUp, 4, ROGUE_STANCES),
    toggle("shadow_stance", "Shadow Stance", Job::Rogue, 4, StatusKind::DefenseUp, 4, ROGUE_STANCES),
    passive("agility", "Agility", Job::Rogue, 1, StatKey::Dexterity, 2),
];

pub fn skill_def(id: &str) -> Option<&'static SkillDef> {
    SKILL_TABLE.iter().find(|s| s.id == id)
}

/// Modifiers that rewrite `parent`, in table order.
pub fn modifiers_of(parent: &str) -> impl Iterator<Item = &'static SkillDef> + '_ {
    SKILL_TABLE
        .iter()
        .filter(move |s| s.category == SkillCategory::Modifier && s.parent == Some(parent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_ids_are_unique() {
        for (i, a) in SKILL_TABLE.iter().enumerate() {
            for b in &SKILL_TABLE[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_modifiers_reference_existing_parents() {
        for skill in SKILL_TABLE.iter().filter(|s| s.category == SkillCategory::Modifier) {
            let parent = skill.parent.and_then(skill_def);
            assert!(parent.is_some(), "{} has no parent", skill.id);
            assert!(skill.transform.is_some());
        }
    }

    #[test]
    fn test_exclusive_groups_are_symmetric() {
        for skill in SKILL_TABLE
            .iter()
            .filter(|s| s.category == SkillCategory::ExclusiveToggle)
        {
            assert!(skill.exclusive_group.contains(&skill.id));
            for sibling in skill.exclusive_group {
                let sibling = skill_def(sibling).unwrap();
                assert_eq!(sibling.exclusive_group, skill.exclusive_group);
            }
        }
    }

    #[test]
    fn test_modifiers_of() {
        let ids: Vec<_> = modifiers_of("fireball").map(|s| s.id).collect();
        assert_eq!(ids, vec!["inferno"]);
        assert_eq!(modifiers_of("second_wind").count(), 0);
    }
}
