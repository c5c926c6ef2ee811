//! # Items
//!
//! Static item templates, generated item instances and enchantments.
//!
//! Templates and enchant definitions are data tables (see [`tables`]).
//! Instances are produced by the loot generator and never change after
//! their enchantments have been rolled.

pub mod tables;

pub use tables::*;

use crate::stats::{StatBlock, StatKey};
use crate::{new_entity_id, EntityId};
use serde::{Deserialize, Serialize};

/// Equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    Weapon,
    Head,
    Body,
    Hands,
    Feet,
    Ring,
    Amulet,
}

/// Broad item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Accessory,
    Consumable,
}

/// Rarity label, derived from the number of enchantments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl Rarity {
    /// 0 → common, 1 → uncommon, 2 → rare, 3 or more → epic.
    pub fn from_enchant_count(count: usize) -> Self {
        match count {
            0 => Rarity::Common,
            1 => Rarity::Uncommon,
            2 => Rarity::Rare,
            _ => Rarity::Epic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
        }
    }
}

/// Effect of using a consumable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumableEffect {
    Heal(i32),
    RestoreResource(u32),
}

/// Conditional effect carried by a hand-authored unique item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniqueEffect {
    /// Magic attack bonus proportional to the current resource ratio
    ArcaneConduit { max_bonus_pct: i32 },
    /// Attack bonus proportional to missing health
    LastStand { max_bonus_pct: i32 },
}

/// Static item definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ItemKind,
    pub slot: Option<Slot>,
    pub base_stats: &'static [(StatKey, i32)],
    pub base_rarity: Rarity,
    pub set_id: Option<&'static str>,
    pub unique: Option<UniqueEffect>,
    pub consumable: Option<ConsumableEffect>,
    /// Base gold value
    pub value: u32,
}

impl ItemTemplate {
    /// Hand-authored uniques never come out of random loot.
    pub fn is_unique(&self) -> bool {
        self.unique.is_some()
    }
}

/// Enchantment table a definition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnchantCategory {
    Offense,
    Defense,
    Utility,
}

impl EnchantCategory {
    pub fn all() -> [EnchantCategory; 3] {
        [
            EnchantCategory::Offense,
            EnchantCategory::Defense,
            EnchantCategory::Utility,
        ]
    }
}

/// Static enchantment definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EnchantDef {
    pub id: &'static str,
    pub name: &'static str,
    pub stat: StatKey,
    pub min: i32,
    pub max: i32,
    /// Whether the value is a percentage rather than a flat amount
    pub percent: bool,
    pub category: EnchantCategory,
}

impl EnchantDef {
    /// Linearly interpolates `[min, max]` by a 1-100 roll.
    ///
    /// Rolls outside 1-100 are clamped, so the result always lies in range
    /// and never decreases as the roll grows.
    pub fn value_for_roll(&self, roll: u8) -> i32 {
        let roll = roll.clamp(1, 100) as i32;
        self.min + (self.max - self.min) * (roll - 1) / 99
    }

    /// Rolls an instance of this definition.
    pub fn instantiate(&self, roll: u8) -> EnchantInstance {
        EnchantInstance {
            def_id: self.id.to_string(),
            stat: self.stat,
            roll: roll.clamp(1, 100),
            value: self.value_for_roll(roll),
        }
    }
}

/// A rolled enchantment on a generated item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnchantInstance {
    pub def_id: String,
    pub stat: StatKey,
    pub roll: u8,
    pub value: i32,
}

/// Multiplier (in percent) applied to base stats at each tier.
pub fn tier_multiplier_pct(tier: u8) -> i32 {
    match tier {
        0 | 1 => 100,
        2 => 125,
        _ => 150,
    }
}

/// Display prefix for a tier.
pub fn tier_prefix(tier: u8) -> Option<&'static str> {
    match tier {
        0 | 1 => None,
        2 => Some("Superior"),
        _ => Some("Exalted"),
    }
}

/// A concrete item owned by a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub id: EntityId,
    pub template_id: String,
    pub name: String,
    pub kind: ItemKind,
    pub slot: Option<Slot>,
    pub tier: u8,
    pub rarity: Rarity,
    /// Template stats already scaled by the tier multiplier
    pub base_stats: StatBlock,
    pub enchants: Vec<EnchantInstance>,
    pub sell_value: u32,
}

impl ItemInstance {
    /// Creates a tier-1, unenchanted instance of a template.
    pub fn plain(template: &ItemTemplate) -> Self {
        Self {
            id: new_entity_id(),
            template_id: template.id.to_string(),
            name: template.name.to_string(),
            kind: template.kind,
            slot: template.slot,
            tier: 1,
            rarity: template.base_rarity,
            base_stats: StatBlock::from_pairs(template.base_stats),
            enchants: Vec::new(),
            sell_value: template.value,
        }
    }

    /// Base stats plus every rolled enchantment.
    pub fn total_stats(&self) -> StatBlock {
        let mut stats = self.base_stats.clone();
        for enchant in &self.enchants {
            stats.add(enchant.stat, enchant.value);
        }
        stats
    }

    pub fn template(&self) -> Option<&'static ItemTemplate> {
        item_template(&self.template_id)
    }

    pub fn unique_effect(&self) -> Option<UniqueEffect> {
        self.template().and_then(|t| t.unique)
    }

    pub fn set_id(&self) -> Option<&'static str> {
        self.template().and_then(|t| t.set_id)
    }

    pub fn consumable(&self) -> Option<ConsumableEffect> {
        self.template().and_then(|t| t.consumable)
    }

    pub fn is_equipment(&self) -> bool {
        self.slot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_def() -> EnchantDef {
        EnchantDef {
            id: "test",
            name: "Test",
            stat: StatKey::Attack,
            min: 2,
            max: 12,
            percent: false,
            category: EnchantCategory::Offense,
        }
    }

    #[test]
    fn test_roll_interpolation_endpoints() {
        let def = sample_def();
        assert_eq!(def.value_for_roll(1), 2);
        assert_eq!(def.value_for_roll(100), 12);
        assert_eq!(def.value_for_roll(0), 2);
        assert_eq!(def.value_for_roll(255), 12);
    }

    #[test]
    fn test_roll_interpolation_is_monotonic() {
        let def = sample_def();
        let mut previous = def.value_for_roll(1);
        for roll in 2..=100u8 {
            let value = def.value_for_roll(roll);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_rarity_from_enchant_count() {
        assert_eq!(Rarity::from_enchant_count(0), Rarity::Common);
        assert_eq!(Rarity::from_enchant_count(1), Rarity::Uncommon);
        assert_eq!(Rarity::from_enchant_count(2), Rarity::Rare);
        assert_eq!(Rarity::from_enchant_count(5), Rarity::Epic);
    }

    #[test]
    fn test_total_stats_include_enchants() {
        let template = item_template("short_sword").unwrap();
        let mut item = ItemInstance::plain(template);
        let base_attack = item.total_stats().get(StatKey::Attack);
        item.enchants.push(sample_def().instantiate(100));
        assert_eq!(item.total_stats().get(StatKey::Attack), base_attack + 12);
    }

    #[test]
    fn test_tier_tables() {
        assert_eq!(tier_multiplier_pct(1), 100);
        assert!(tier_multiplier_pct(2) < tier_multiplier_pct(3));
        assert_eq!(tier_prefix(1), None);
        assert!(tier_prefix(3).is_some());
    }
}
