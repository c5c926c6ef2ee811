//! # Item Generation
//!
//! Rolls loot: template, tier, enchantment count and enchantment values.

use super::Generator;
use crate::config::{ENCHANT_CHANCES, ENCHANT_LEVEL_BONUS, MAX_ENCHANTS, TIER_2_LEVEL, TIER_3_LEVEL};
use crate::items::{
    enchants_in, tier_multiplier_pct, tier_prefix, EnchantCategory, EnchantDef, EnchantInstance,
    ItemInstance, ItemKind, ItemTemplate, Rarity, Slot, ENCHANT_DEFS, ITEM_TEMPLATES,
};
use crate::stats::StatBlock;
use crate::{new_entity_id, seeded_entity_id, DelveResult};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// What to roll loot for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LootRequest {
    /// Character level, at least 1
    pub level: u32,
    /// Only templates for this slot are eligible
    pub slot: Option<Slot>,
}

/// Generator for random item instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct LootGenerator;

impl LootGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Rolls one item, or `None` when no template matches the slot filter.
    pub fn generate_item(
        &self,
        level: u32,
        slot: Option<Slot>,
        rng: &mut StdRng,
    ) -> Option<ItemInstance> {
        let candidates: Vec<&'static ItemTemplate> = ITEM_TEMPLATES
            .iter()
            .filter(|t| !t.is_unique())
            .filter(|t| slot.map_or(true, |s| t.slot == Some(s)))
            .collect();
        let template = *candidates.choose(rng)?;

        let mut item = if template.kind == ItemKind::Consumable {
            ItemInstance::plain(template)
        } else {
            let tier = tier_for_level(level);
            let count = roll_enchant_count(level, tier, rng);
            let enchants = roll_enchants(count, rng);
            build_instance(template, tier, enchants)
        };
        item.id = seeded_entity_id(rng);

        debug!(
            "rolled {} ({}, tier {}, {} enchant(s))",
            item.name,
            item.rarity.name(),
            item.tier,
            item.enchants.len()
        );
        Some(item)
    }
}

impl Generator for LootGenerator {
    type Request = LootRequest;
    type Output = Option<ItemInstance>;

    fn generate(&self, request: LootRequest, rng: &mut StdRng) -> DelveResult<Option<ItemInstance>> {
        Ok(self.generate_item(request.level, request.slot, rng))
    }

    fn generator_type(&self) -> &'static str {
        "LootGenerator"
    }
}

/// Tier from the two level breakpoints.
pub fn tier_for_level(level: u32) -> u8 {
    if level >= TIER_3_LEVEL {
        3
    } else if level >= TIER_2_LEVEL {
        2
    } else {
        1
    }
}

/// Minimum enchantments guaranteed by a tier.
pub fn tier_enchant_floor(tier: u8) -> usize {
    match tier {
        0 | 1 => 0,
        2 => 1,
        _ => 2,
    }
}

/// Number of enchantments for a new item.
///
/// One independent roll per count (one, two, three), each with its base
/// chance plus a per-level bonus; the highest success wins. The tier floor
/// is then applied and the result capped.
pub fn roll_enchant_count(level: u32, tier: u8, rng: &mut StdRng) -> usize {
    let bonus = level as f64 * ENCHANT_LEVEL_BONUS;
    let mut count = 0;
    for (i, chance) in ENCHANT_CHANCES.iter().enumerate() {
        if rng.gen_bool((chance + bonus).clamp(0.0, 1.0)) {
            count = i + 1;
        }
    }
    count.max(tier_enchant_floor(tier)).min(MAX_ENCHANTS)
}

/// Rolls `count` distinct enchantments.
pub fn roll_enchants(count: usize, rng: &mut StdRng) -> Vec<EnchantInstance> {
    let mut used: Vec<&'static str> = Vec::with_capacity(count);
    let mut enchants = Vec::with_capacity(count);

    for _ in 0..count {
        let categories = EnchantCategory::all();
        let category = categories[rng.gen_range(0..categories.len())];
        let mut pool: Vec<&'static EnchantDef> =
            enchants_in(category).filter(|d| !used.contains(&d.id)).collect();
        if pool.is_empty() {
            pool = ENCHANT_DEFS.iter().filter(|d| !used.contains(&d.id)).collect();
        }
        let Some(def) = pool.choose(rng).copied() else {
            break;
        };
        let roll: u8 = rng.gen_range(1..=100);
        used.push(def.id);
        enchants.push(def.instantiate(roll));
    }

    enchants
}

/// Gold value scaled by tier and enchantment count.
pub fn sell_value(base: u32, tier: u8, enchant_count: usize) -> u32 {
    let tiered = base as u64 * tier_multiplier_pct(tier) as u64 / 100;
    (tiered * (2 + enchant_count as u64) / 2) as u32
}

fn build_instance(template: &ItemTemplate, tier: u8, enchants: Vec<EnchantInstance>) -> ItemInstance {
    let name = match tier_prefix(tier) {
        Some(prefix) => format!("{} {}", prefix, template.name),
        None => template.name.to_string(),
    };
    ItemInstance {
        id: new_entity_id(),
        template_id: template.id.to_string(),
        name,
        kind: template.kind,
        slot: template.slot,
        tier,
        rarity: Rarity::from_enchant_count(enchants.len()),
        base_stats: StatBlock::from_pairs(template.base_stats).scaled(tier_multiplier_pct(tier)),
        sell_value: sell_value(template.value, tier, enchants.len()),
        enchants,
    }
}
