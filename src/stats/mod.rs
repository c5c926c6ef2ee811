//! # Stats
//!
//! Stat keys, additive stat blocks and the stat aggregator that turns a
//! character's attributes, equipment, set pieces and passives into the final
//! combat numbers.
//!
//! Aggregation order:
//! 1. base attributes
//! 2. equipped item stats and rolled enchantments
//! 3. set bonus tiers whose piece count is met
//! 4. learned passive skills
//! 5. "all attributes" redistributed into each attribute
//! 6. derived combat stats from fixed linear formulas
//! 7. percentage modifiers applied on the flat totals
//! 8. conditional unique-item effects
//!
//! Flat and percentage bonuses to the same stat use distinct keys
//! (`Attack` vs `AttackPct`) so one never counts as the other.

use crate::game::Character;
use crate::items::{set_bonus, UniqueEffect};
use crate::skills::skill_def;
use crate::utils::ratio_pct;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every stat an item, enchant, set or passive can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKey {
    Strength,
    Dexterity,
    Intelligence,
    Vitality,
    Luck,
    AllAttributes,
    Attack,
    AttackPct,
    Defense,
    DefensePct,
    MagicAttack,
    MagicAttackPct,
    MagicDefense,
    MaxHp,
    MaxHpPct,
    MaxMp,
    Speed,
    Evasion,
    Crit,
    Hit,
}

impl StatKey {
    pub fn is_percentage(self) -> bool {
        matches!(
            self,
            StatKey::AttackPct | StatKey::DefensePct | StatKey::MagicAttackPct | StatKey::MaxHpPct
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            StatKey::Strength => "STR",
            StatKey::Dexterity => "DEX",
            StatKey::Intelligence => "INT",
            StatKey::Vitality => "VIT",
            StatKey::Luck => "LUK",
            StatKey::AllAttributes => "All Attributes",
            StatKey::Attack => "Attack",
            StatKey::AttackPct => "Attack%",
            StatKey::Defense => "Defense",
            StatKey::DefensePct => "Defense%",
            StatKey::MagicAttack => "Magic Attack",
            StatKey::MagicAttackPct => "Magic Attack%",
            StatKey::MagicDefense => "Magic Defense",
            StatKey::MaxHp => "Max HP",
            StatKey::MaxHpPct => "Max HP%",
            StatKey::MaxMp => "Max MP",
            StatKey::Speed => "Speed",
            StatKey::Evasion => "Evasion",
            StatKey::Crit => "Crit",
            StatKey::Hit => "Hit",
        }
    }
}

/// Additive bag of stat contributions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    values: BTreeMap<StatKey, i32>,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a block from `(key, value)` pairs, summing duplicates.
    pub fn from_pairs(pairs: &[(StatKey, i32)]) -> Self {
        let mut block = Self::new();
        for &(key, value) in pairs {
            block.add(key, value);
        }
        block
    }

    pub fn add(&mut self, key: StatKey, value: i32) {
        if value != 0 {
            *self.values.entry(key).or_insert(0) += value;
        }
    }

    pub fn get(&self, key: StatKey) -> i32 {
        self.values.get(&key).copied().unwrap_or(0)
    }

    pub fn merge(&mut self, other: &StatBlock) {
        for (&key, &value) in &other.values {
            self.add(key, value);
        }
    }

    /// Scales every value by a percentage, rounding down.
    pub fn scaled(&self, percent: i32) -> StatBlock {
        let mut block = StatBlock::new();
        for (&key, &value) in &self.values {
            block.add(key, value * percent / 100);
        }
        block
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKey, i32)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The five raw attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub vitality: i32,
    pub luck: i32,
}

impl Attributes {
    pub fn new(strength: i32, dexterity: i32, intelligence: i32, vitality: i32, luck: i32) -> Self {
        Self {
            strength,
            dexterity,
            intelligence,
            vitality,
            luck,
        }
    }
}

/// Final derived stats for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinalStats {
    pub attributes: Attributes,
    pub attack: i32,
    pub defense: i32,
    pub magic_attack: i32,
    pub magic_defense: i32,
    pub max_hp: i32,
    pub max_mp: i32,
    pub speed: i32,
    pub evasion: i32,
    pub crit: i32,
    pub hit: i32,
}

fn apply_pct(value: i32, pct: i32) -> i32 {
    (value as i64 * (100 + pct as i64) / 100) as i32
}

/// Computes final stats for a character.
///
/// Pure: the result depends only on the character, so it can be recomputed
/// after every equipment change.
pub fn aggregate(character: &Character) -> FinalStats {
    let mut totals = StatBlock::new();

    for item in character.equipment.values() {
        totals.merge(&item.total_stats());
    }

    for (set_id, pieces) in character.equipped_set_counts() {
        if let Some(set) = set_bonus(set_id) {
            for tier in set.tiers.iter().filter(|t| pieces >= t.pieces) {
                totals.merge(&StatBlock::from_pairs(tier.stats));
            }
        }
    }

    for (&skill_id, &level) in &character.learned_skills {
        if let Some((key, per_level)) = skill_def(skill_id).and_then(|def| def.passive) {
            totals.add(key, per_level * level as i32);
        }
    }

    let all = totals.get(StatKey::AllAttributes);
    let base = character.base_attributes;
    let attributes = Attributes {
        strength: base.strength + totals.get(StatKey::Strength) + all,
        dexterity: base.dexterity + totals.get(StatKey::Dexterity) + all,
        intelligence: base.intelligence + totals.get(StatKey::Intelligence) + all,
        vitality: base.vitality + totals.get(StatKey::Vitality) + all,
        luck: base.luck + totals.get(StatKey::Luck) + all,
    };

    let attack = attributes.strength * 2 + attributes.dexterity / 2 + totals.get(StatKey::Attack);
    let defense = attributes.vitality + attributes.strength / 4 + totals.get(StatKey::Defense);
    let magic_attack = attributes.intelligence * 2 + totals.get(StatKey::MagicAttack);
    let magic_defense =
        attributes.intelligence + attributes.vitality / 2 + totals.get(StatKey::MagicDefense);
    let max_hp = 50 + attributes.vitality * 10 + totals.get(StatKey::MaxHp);
    let max_mp = 20 + attributes.intelligence * 5 + totals.get(StatKey::MaxMp);
    let speed = 100 + attributes.dexterity + totals.get(StatKey::Speed);
    let evasion = attributes.dexterity / 2 + attributes.luck / 4 + totals.get(StatKey::Evasion);
    let crit = 5 + attributes.luck / 2 + totals.get(StatKey::Crit);
    let hit = 90 + attributes.dexterity / 4 + totals.get(StatKey::Hit);

    let mut stats = FinalStats {
        attributes,
        attack: apply_pct(attack, totals.get(StatKey::AttackPct)),
        defense: apply_pct(defense, totals.get(StatKey::DefensePct)),
        magic_attack: apply_pct(magic_attack, totals.get(StatKey::MagicAttackPct)),
        magic_defense,
        max_hp: apply_pct(max_hp, totals.get(StatKey::MaxHpPct)).max(1),
        max_mp: max_mp.max(0),
        speed,
        evasion,
        crit,
        hit,
    };

    for item in character.equipment.values() {
        if let Some(effect) = item.unique_effect() {
            apply_unique(&mut stats, effect, character);
        }
    }

    stats
}

fn apply_unique(stats: &mut FinalStats, effect: UniqueEffect, character: &Character) {
    match effect {
        UniqueEffect::ArcaneConduit { max_bonus_pct } => {
            // Full mana pool grants the whole bonus
            let full_pct = ratio_pct(character.current_mp as i64, stats.max_mp as i64);
            stats.magic_attack = apply_pct(stats.magic_attack, max_bonus_pct * full_pct / 100);
        }
        UniqueEffect::LastStand { max_bonus_pct } => {
            // Bonus grows as health drops
            let missing_pct = if stats.max_hp > 0 {
                100 - ratio_pct(character.current_hp as i64, stats.max_hp as i64)
            } else {
                0
            };
            stats.attack = apply_pct(stats.attack, max_bonus_pct * missing_pct / 100);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Character, Job};
    use crate::items::{item_template, EnchantInstance, ItemInstance};

    fn warrior() -> Character {
        Character::new("Tester", Job::Warrior)
    }

    #[test]
    fn test_stat_block_add_and_merge() {
        let mut a = StatBlock::from_pairs(&[(StatKey::Attack, 3), (StatKey::Attack, 2)]);
        assert_eq!(a.get(StatKey::Attack), 5);
        let b = StatBlock::from_pairs(&[(StatKey::Attack, 1), (StatKey::Luck, 4)]);
        a.merge(&b);
        assert_eq!(a.get(StatKey::Attack), 6);
        assert_eq!(a.get(StatKey::Luck), 4);
        assert_eq!(a.get(StatKey::Hit), 0);
    }

    #[test]
    fn test_base_derivation() {
        let character = warrior();
        let attrs = character.base_attributes;
        let stats = aggregate(&character);

        assert_eq!(stats.attributes, attrs);
        assert_eq!(stats.attack, attrs.strength * 2 + attrs.dexterity / 2);
        assert_eq!(stats.max_hp, 50 + attrs.vitality * 10);
        assert_eq!(stats.max_mp, 20 + attrs.intelligence * 5);
    }

    #[test]
    fn test_all_attributes_redistribution() {
        let mut character = warrior();
        let before = aggregate(&character);

        let mut ring = ItemInstance::plain(item_template("iron_ring").unwrap());
        ring.enchants.push(EnchantInstance {
            def_id: "of_the_sage".to_string(),
            stat: StatKey::AllAttributes,
            roll: 100,
            value: 3,
        });
        character.equipment.insert(ring.slot.unwrap(), ring);

        let after = aggregate(&character);
        assert_eq!(after.attributes.strength, before.attributes.strength + 3);
        assert_eq!(after.attributes.dexterity, before.attributes.dexterity + 3);
        assert_eq!(after.attributes.intelligence, before.attributes.intelligence + 3);
        assert_eq!(after.attributes.vitality, before.attributes.vitality + 3);
        assert_eq!(after.attributes.luck, before.attributes.luck + 3);
    }

    #[test]
    fn test_flat_and_percentage_keys_are_distinct() {
        let mut character = warrior();
        let base = aggregate(&character).attack;

        let mut sword = ItemInstance::plain(item_template("short_sword").unwrap());
        let sword_attack = sword.total_stats().get(StatKey::Attack);
        sword.enchants.push(EnchantInstance {
            def_id: "brutal".to_string(),
            stat: StatKey::AttackPct,
            roll: 100,
            value: 10,
        });
        character.equipment.insert(sword.slot.unwrap(), sword);

        let stats = aggregate(&character);
        assert_eq!(stats.attack, (base + sword_attack) * 110 / 100);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let mut character = warrior();
        let helm = ItemInstance::plain(item_template("guardian_helm").unwrap());
        character.equipment.insert(helm.slot.unwrap(), helm);

        assert_eq!(aggregate(&character), aggregate(&character));
    }

    #[test]
    fn test_set_bonus_requires_piece_count() {
        let mut character = warrior();
        let helm = ItemInstance::plain(item_template("guardian_helm").unwrap());
        let plate = ItemInstance::plain(item_template("guardian_plate").unwrap());

        character.equipment.insert(helm.slot.unwrap(), helm.clone());
        let one_piece = aggregate(&character);

        character.equipment.insert(plate.slot.unwrap(), plate.clone());
        let two_pieces = aggregate(&character);

        let plate_defense = plate.total_stats().get(StatKey::Defense);
        let set = set_bonus("guardian").unwrap();
        let two_piece_defense: i32 = set
            .tiers
            .iter()
            .filter(|t| t.pieces <= 2)
            .flat_map(|t| t.stats.iter())
            .filter(|(k, _)| *k == StatKey::Defense)
            .map(|(_, v)| *v)
            .sum();

        assert_eq!(
            two_pieces.defense,
            one_piece.defense + plate_defense + two_piece_defense
        );
    }

    #[test]
    fn test_last_stand_scales_with_missing_health() {
        let mut character = warrior();
        let axe = ItemInstance::plain(item_template("berserkers_edge").unwrap());
        character.equipment.insert(axe.slot.unwrap(), axe);

        let max_hp = aggregate(&character).max_hp;
        character.current_hp = max_hp;
        let healthy = aggregate(&character).attack;
        character.current_hp = max_hp / 4;
        let wounded = aggregate(&character).attack;

        assert!(wounded > healthy);
    }
}
