//! Property tests for loot rolling and stat aggregation.

use delve::config::MAX_ENCHANTS;
use delve::{
    aggregate, enchant_def, roll_enchant_count, sell_value, tier_enchant_floor, tier_for_level,
    Character, Job, LootGenerator, Rarity, Slot, ENCHANT_DEFS,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn slot_strategy() -> impl Strategy<Value = Option<Slot>> {
    prop_oneof![
        Just(None),
        Just(Some(Slot::Weapon)),
        Just(Some(Slot::Head)),
        Just(Some(Slot::Body)),
        Just(Some(Slot::Ring)),
        Just(Some(Slot::Amulet)),
    ]
}

proptest! {
    #[test]
    fn prop_enchant_values_within_bounds(def_index in 0..ENCHANT_DEFS.len(), roll in any::<u8>()) {
        let def = &ENCHANT_DEFS[def_index];
        let instance = def.instantiate(roll);
        prop_assert!(def.min <= instance.value && instance.value <= def.max);
        prop_assert!((1..=100).contains(&instance.roll));
    }

    #[test]
    fn prop_enchant_values_monotonic_in_roll(def_index in 0..ENCHANT_DEFS.len(), a in 1u8..=100, b in 1u8..=100) {
        let def = &ENCHANT_DEFS[def_index];
        let (low, high) = (a.min(b), a.max(b));
        prop_assert!(def.value_for_roll(low) <= def.value_for_roll(high));
    }

    #[test]
    fn prop_generated_items_are_consistent(seed in any::<u64>(), level in 1u32..40, slot in slot_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let Some(item) = LootGenerator::new().generate_item(level, slot, &mut rng) else {
            return Ok(());
        };

        prop_assert!(item.enchants.len() <= MAX_ENCHANTS);
        prop_assert_eq!(item.rarity, Rarity::from_enchant_count(item.enchants.len()));
        if item.is_equipment() {
            prop_assert_eq!(item.tier, tier_for_level(level));
            prop_assert!(item.enchants.len() >= tier_enchant_floor(item.tier));
            prop_assert_eq!(item.sell_value, sell_value(item.template().unwrap().value, item.tier, item.enchants.len()));
        }
        for enchant in &item.enchants {
            let def = enchant_def(&enchant.def_id).unwrap();
            prop_assert!(def.min <= enchant.value && enchant.value <= def.max);
        }
    }

    #[test]
    fn prop_enchant_count_respects_tier_floor(seed in any::<u64>(), level in 1u32..60) {
        let mut rng = StdRng::seed_from_u64(seed);
        let tier = tier_for_level(level);
        let count = roll_enchant_count(level, tier, &mut rng);
        prop_assert!(count >= tier_enchant_floor(tier));
        prop_assert!(count <= MAX_ENCHANTS);
    }

    #[test]
    fn prop_stat_aggregation_is_idempotent(seed in any::<u64>(), level in 1u32..30, picks in 0usize..6) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut character = Character::new("Tester", Job::all()[seed as usize % 3]);
        let generator = LootGenerator::new();
        for slot in [Slot::Weapon, Slot::Head, Slot::Body, Slot::Ring, Slot::Amulet].into_iter().take(picks) {
            if let Some(item) = generator.generate_item(level, Some(slot), &mut rng) {
                character.equip(item).unwrap();
            }
        }

        let first = aggregate(&character);
        let second = aggregate(&character);
        prop_assert_eq!(first, second);
        prop_assert!(first.max_hp >= 1);
    }
}
