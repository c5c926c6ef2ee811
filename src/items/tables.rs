//! Item, enchantment and set data tables.

use super::{
    ConsumableEffect, EnchantCategory, EnchantDef, ItemKind, ItemTemplate, Rarity, Slot,
    UniqueEffect,
};
use crate::stats::StatKey;

/// A set bonus tier unlocked at a piece count.
#[derive(Debug, Clone, PartialEq)]
pub struct SetTier {
    pub pieces: usize,
    pub stats: &'static [(StatKey, i32)],
}

/// Bonuses granted for wearing several pieces of one set.
#[derive(Debug, Clone, PartialEq)]
pub struct SetBonusDef {
    pub id: &'static str,
    pub name: &'static str,
    pub tiers: &'static [SetTier],
}

const fn equipment(
    id: &'static str,
    name: &'static str,
    kind: ItemKind,
    slot: Slot,
    base_stats: &'static [(StatKey, i32)],
    value: u32,
) -> ItemTemplate {
    ItemTemplate {
        id,
        name,
        kind,
        slot: Some(slot),
        base_stats,
        base_rarity: Rarity::Common,
        set_id: None,
        unique: None,
        consumable: None,
        value,
    }
}

const fn set_piece(
    id: &'static str,
    name: &'static str,
    slot: Slot,
    base_stats: &'static [(StatKey, i32)],
    set_id: &'static str,
    value: u32,
) -> ItemTemplate {
    ItemTemplate {
        id,
        name,
        kind: ItemKind::Armor,
        slot: Some(slot),
        base_stats,
        base_rarity: Rarity::Common,
        set_id: Some(set_id),
        unique: None,
        consumable: None,
        value,
    }
}

const fn unique(
    id: &'static str,
    name: &'static str,
    kind: ItemKind,
    slot: Slot,
    base_stats: &'static [(StatKey, i32)],
    effect: UniqueEffect,
    value: u32,
) -> ItemTemplate {
    ItemTemplate {
        id,
        name,
        kind,
        slot: Some(slot),
        base_stats,
        base_rarity: Rarity::Epic,
        set_id: None,
        unique: Some(effect),
        consumable: None,
        value,
    }
}

const fn consumable(
    id: &'static str,
    name: &'static str,
    effect: ConsumableEffect,
    value: u32,
) -> ItemTemplate {
    ItemTemplate {
        id,
        name,
        kind: ItemKind::Consumable,
        slot: None,
        base_stats: &[],
        base_rarity: Rarity::Common,
        set_id: None,
        unique: None,
        consumable: Some(effect),
        value,
    }
}

pub static ITEM_TEMPLATES: &[ItemTemplate] = &[
    // Weapons
    equipment("short_sword", "Short Sword", ItemKind::Weapon, Slot::Weapon, &[(StatKey::Attack, 5)], 20),
    equipment("war_axe", "War Axe", ItemKind::Weapon, Slot::Weapon, &[(StatKey::Attack, 8), (StatKey::Speed, -5)], 35),
    equipment("oak_staff", "Oak Staff", ItemKind::Weapon, Slot::Weapon, &[(StatKey::MagicAttack, 6), (StatKey::Intelligence, 1)], 30),
    equipment("hunting_bow", "Hunting Bow", ItemKind::Weapon, Slot::Weapon, &[(StatKey::Attack, 4), (StatKey::Hit, 5)], 28),
    equipment("dagger", "Dagger", ItemKind::Weapon, Slot::Weapon, &[(StatKey::Attack, 3), (StatKey::Crit, 5)], 18),
    // Armor
    equipment("leather_cap", "Leather Cap", ItemKind::Armor, Slot::Head, &[(StatKey::Defense, 1), (StatKey::Evasion, 1)], 10),
    equipment("leather_vest", "Leather Vest", ItemKind::Armor, Slot::Body, &[(StatKey::Defense, 3)], 18),
    equipment("work_gloves", "Work Gloves", ItemKind::Armor, Slot::Hands, &[(StatKey::Defense, 1), (StatKey::Hit, 2)], 8),
    equipment("travel_boots", "Travel Boots", ItemKind::Armor, Slot::Feet, &[(StatKey::Defense, 1), (StatKey::Speed, 3)], 10),
    // Accessories
    equipment("iron_ring", "Iron Ring", ItemKind::Accessory, Slot::Ring, &[(StatKey::Strength, 1)], 25),
    equipment("jade_amulet", "Jade Amulet", ItemKind::Accessory, Slot::Amulet, &[(StatKey::MaxMp, 10)], 30),
    // Guardian set
    set_piece("guardian_helm", "Guardian Helm", Slot::Head, &[(StatKey::Defense, 3)], "guardian", 40),
    set_piece("guardian_plate", "Guardian Plate", Slot::Body, &[(StatKey::Defense, 8), (StatKey::MaxHp, 10)], "guardian", 60),
    set_piece("guardian_greaves", "Guardian Greaves", Slot::Feet, &[(StatKey::Defense, 2), (StatKey::MaxHp, 5)], "guardian", 35),
    // Consumables
    consumable("healing_potion", "Healing Potion", ConsumableEffect::Heal(30), 15),
    consumable("mana_potion", "Mana Potion", ConsumableEffect::RestoreResource(20), 15),
    // Hand-authored uniques
    unique("berserkers_edge", "Berserker's Edge", ItemKind::Weapon, Slot::Weapon, &[(StatKey::Attack, 10)], UniqueEffect::LastStand { max_bonus_pct: 40 }, 200),
    unique("conduit_orb", "Conduit Orb", ItemKind::Accessory, Slot::Amulet, &[(StatKey::MagicAttack, 4)], UniqueEffect::ArcaneConduit { max_bonus_pct: 30 }, 200),
];

const fn enchant(
    id: &'static str,
    name: &'static str,
    stat: StatKey,
    min: i32,
    max: i32,
    percent: bool,
    category: EnchantCategory,
) -> EnchantDef {
    EnchantDef {
        id,
        name,
        stat,
        min,
        max,
        percent,
        category,
    }
}

pub static ENCHANT_DEFS: &[EnchantDef] = &[
    // Offense
    enchant("keen", "Keen", StatKey::Attack, 1, 6, false, EnchantCategory::Offense),
    enchant("brutal", "Brutal", StatKey::AttackPct, 3, 10, true, EnchantCategory::Offense),
    enchant("arcane", "Arcane", StatKey::MagicAttack, 2, 8, false, EnchantCategory::Offense),
    enchant("precise", "Precise", StatKey::Crit, 1, 5, false, EnchantCategory::Offense),
    enchant("accurate", "Accurate", StatKey::Hit, 2, 8, false, EnchantCategory::Offense),
    enchant("mighty", "Mighty", StatKey::Strength, 1, 4, false, EnchantCategory::Offense),
    // Defense
    enchant("sturdy", "Sturdy", StatKey::Defense, 1, 5, false, EnchantCategory::Defense),
    enchant("fortified", "Fortified", StatKey::DefensePct, 3, 10, true, EnchantCategory::Defense),
    enchant("vital", "Vital", StatKey::MaxHp, 5, 30, false, EnchantCategory::Defense),
    enchant("hale", "Hale", StatKey::MaxHpPct, 2, 8, true, EnchantCategory::Defense),
    enchant("tough", "Tough", StatKey::Vitality, 1, 4, false, EnchantCategory::Defense),
    // Utility
    enchant("swift", "Swift", StatKey::Speed, 2, 10, false, EnchantCategory::Utility),
    enchant("evasive", "Evasive", StatKey::Evasion, 1, 5, false, EnchantCategory::Utility),
    enchant("lucky", "Lucky", StatKey::Luck, 1, 4, false, EnchantCategory::Utility),
    enchant("wise", "Wise", StatKey::Intelligence, 1, 4, false, EnchantCategory::Utility),
    enchant("of_the_sage", "of the Sage", StatKey::AllAttributes, 1, 3, false, EnchantCategory::Utility),
    enchant("deep_mind", "Deep Mind", StatKey::MaxMp, 5, 25, false, EnchantCategory::Utility),
];

pub static SET_BONUSES: &[SetBonusDef] = &[SetBonusDef {
    id: "guardian",
    name: "Guardian's Resolve",
    tiers: &[
        SetTier {
            pieces: 2,
            stats: &[(StatKey::Defense, 5)],
        },
        SetTier {
            pieces: 3,
            stats: &[(StatKey::MaxHp, 30), (StatKey::DefensePct, 10)],
        },
    ],
}];

pub fn item_template(id: &str) -> Option<&'static ItemTemplate> {
    ITEM_TEMPLATES.iter().find(|t| t.id == id)
}

pub fn enchant_def(id: &str) -> Option<&'static EnchantDef> {
    ENCHANT_DEFS.iter().find(|e| e.id == id)
}

pub fn enchants_in(category: EnchantCategory) -> impl Iterator<Item = &'static EnchantDef> {
    ENCHANT_DEFS.iter().filter(move |e| e.category == category)
}

pub fn set_bonus(id: &str) -> Option<&'static SetBonusDef> {
    SET_BONUSES.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_ids_are_unique() {
        for (i, a) in ITEM_TEMPLATES.iter().enumerate() {
            for b in &ITEM_TEMPLATES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_enchant_ranges_are_ordered() {
        for def in ENCHANT_DEFS {
            assert!(def.min <= def.max, "{} has an inverted range", def.id);
            assert_eq!(def.percent, def.stat.is_percentage(), "{}", def.id);
        }
    }

    #[test]
    fn test_every_category_has_enchants() {
        for category in EnchantCategory::all() {
            assert!(enchants_in(category).count() >= 3);
        }
    }

    #[test]
    fn test_set_pieces_reference_known_sets() {
        for template in ITEM_TEMPLATES {
            if let Some(set_id) = template.set_id {
                assert!(set_bonus(set_id).is_some());
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(item_template("war_axe").unwrap().name, "War Axe");
        assert!(item_template("missing").is_none());
        assert_eq!(enchant_def("keen").unwrap().stat, StatKey::Attack);
    }
}
