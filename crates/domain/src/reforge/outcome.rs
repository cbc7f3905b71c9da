use crate::entities::ItemSnapshot;
use crate::types::ModifierCatalog;
use crate::value_objects::FailChance;

use super::ReforgeRng;

/// The fail roll is a draw in `[0, FAIL_ROLL_SIDES)` compared to the fail chance.
pub const FAIL_ROLL_SIDES: u32 = 100;

/// Modifier draws on success. Doubled for pristine items.
pub const SUCCESS_ATTEMPTS: u32 = 50;

/// Upper bound (exclusive) of the wear multiplier drawn on failure.
const WEAR_MULTIPLIER_SIDES: u32 = 5;

/// Margin subtracted from max wear before drawing the clamped failure wear.
const WEAR_CLAMP_MARGIN: u32 = 25;

/// Result of processing one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReforgeOutcome {
    pub item: ItemSnapshot,
    pub succeeded: bool,
}

/// Computes the post-reforge state of an item.
///
/// Stateless apart from the catalog it draws modifiers from. The same item,
/// fail chance, and random sequence always produce the same outcome.
pub struct OutcomeEngine<'a> {
    catalog: &'a dyn ModifierCatalog,
}

impl<'a> OutcomeEngine<'a> {
    pub fn new(catalog: &'a dyn ModifierCatalog) -> Self {
        Self { catalog }
    }

    pub fn process(
        &self,
        mut item: ItemSnapshot,
        fail_chance: FailChance,
        rng: &mut dyn ReforgeRng,
    ) -> ReforgeOutcome {
        if rng.below(FAIL_ROLL_SIDES) < u32::from(fail_chance.percent()) {
            degrade(&mut item, rng);
            ReforgeOutcome {
                item,
                succeeded: false,
            }
        } else {
            self.enrich(&mut item, rng);
            ReforgeOutcome {
                item,
                succeeded: true,
            }
        }
    }

    fn enrich(&self, item: &mut ItemSnapshot, rng: &mut dyn ReforgeRng) {
        let mut attempts = SUCCESS_ATTEMPTS;
        if item.wear() == 0 {
            attempts *= 2;
        } else {
            item.set_wear(0);
        }

        for _ in 0..attempts {
            let id = rng.below(self.catalog.id_space());
            let Some(kind) = self.catalog.lookup(id) else {
                continue;
            };
            if !self.catalog.accepts(kind, item.item_type()) {
                continue;
            }
            let max_level = u32::from(self.catalog.max_level(kind).max(1));
            let level = rng.below(max_level) + 1;
            // max_level fits in u8, so the drawn level does too
            item.set_modifier(kind, u8::try_from(level).unwrap_or(u8::MAX));
        }
    }
}

/// Failure branch: strip or flatten modifiers, then damage the item.
fn degrade(item: &mut ItemSnapshot, rng: &mut dyn ReforgeRng) {
    let existing: Vec<_> = item.modifiers().collect();
    for (kind, level) in existing {
        if rng.coin() {
            item.remove_modifier(kind);
        } else if level > 1 {
            item.set_modifier(kind, 1);
        }
    }

    let wear = item.wear();
    let max = item.max_wear();
    let computed = wear.saturating_add(wear.saturating_mul(rng.below(WEAR_MULTIPLIER_SIDES)));
    let new_wear = if computed == 0 {
        max / 3
    } else if wear.saturating_add(computed) > max {
        // below(0) yields 0, so items under the margin land at max wear
        max.saturating_sub(rng.below(max.saturating_sub(WEAR_CLAMP_MARGIN)))
    } else {
        computed
    };
    item.set_wear(new_wear);
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::types::{ItemType, ModifierKind, StandardCatalog};

    /// Replays scripted draws; falls back to 0 / false once exhausted.
    struct ScriptedRng {
        ints: VecDeque<u32>,
        coins: VecDeque<bool>,
        int_bounds: Vec<u32>,
    }

    impl ScriptedRng {
        fn new(ints: &[u32], coins: &[bool]) -> Self {
            Self {
                ints: ints.iter().copied().collect(),
                coins: coins.iter().copied().collect(),
                int_bounds: Vec::new(),
            }
        }
    }

    impl ReforgeRng for ScriptedRng {
        fn below(&mut self, bound: u32) -> u32 {
            self.int_bounds.push(bound);
            if bound == 0 {
                return 0;
            }
            self.ints.pop_front().unwrap_or(0).min(bound - 1)
        }

        fn coin(&mut self) -> bool {
            self.coins.pop_front().unwrap_or(false)
        }
    }

    /// Cheap deterministic generator for sweeping many sequences.
    struct Lcg(u64);

    impl ReforgeRng for Lcg {
        fn below(&mut self, bound: u32) -> u32 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            if bound == 0 {
                0
            } else {
                ((self.0 >> 33) % u64::from(bound)) as u32
            }
        }

        fn coin(&mut self) -> bool {
            self.below(2) == 1
        }
    }

    fn enchanted_sword(wear: u32) -> ItemSnapshot {
        ItemSnapshot::new(ItemType::DiamondSword)
            .with_wear(wear)
            .unwrap()
            .with_modifier(ModifierKind::Sharpness, 4)
            .unwrap()
            .with_modifier(ModifierKind::Knockback, 1)
            .unwrap()
            .with_modifier(ModifierKind::Looting, 3)
            .unwrap()
    }

    #[test]
    fn fail_branch_removes_or_flattens_modifiers() {
        // roll 5 < 10 fails; coins apply in kind order: sharpness, knockback, looting
        let mut rng = ScriptedRng::new(&[5, 1], &[false, false, true]);
        let engine = OutcomeEngine::new(&StandardCatalog);
        let outcome = engine.process(enchanted_sword(100), FailChance::new(10).unwrap(), &mut rng);

        assert!(!outcome.succeeded);
        assert_eq!(outcome.item.level_of(ModifierKind::Sharpness), Some(1));
        assert_eq!(outcome.item.level_of(ModifierKind::Knockback), Some(1));
        assert_eq!(outcome.item.level_of(ModifierKind::Looting), None);
        // 100 + 100 * 1
        assert_eq!(outcome.item.wear(), 200);
    }

    #[test]
    fn fail_branch_pristine_item_gets_a_third_of_max_wear() {
        let mut rng = ScriptedRng::new(&[0, 4], &[]);
        let engine = OutcomeEngine::new(&StandardCatalog);
        let outcome = engine.process(
            ItemSnapshot::new(ItemType::IronSword),
            FailChance::ALWAYS,
            &mut rng,
        );
        assert_eq!(outcome.item.wear(), 250 / 3);
    }

    #[test]
    fn fail_branch_clamps_runaway_wear() {
        // 200 + 200 * 4 = 1000; 200 + 1000 > 250 so wear = 250 - draw(225)
        let mut rng = ScriptedRng::new(&[0, 4, 20], &[]);
        let engine = OutcomeEngine::new(&StandardCatalog);
        let item = ItemSnapshot::new(ItemType::IronSword).with_wear(200).unwrap();
        let outcome = engine.process(item, FailChance::ALWAYS, &mut rng);

        assert_eq!(outcome.item.wear(), 230);
        assert_eq!(rng.int_bounds, vec![100, 5, 225]);
    }

    #[test]
    fn fail_branch_clamp_on_low_durability_item() {
        // golden sword: 20 + 20 * 3 = 80 overshoots 32, draw range is 32 - 25 = 7
        let mut rng = ScriptedRng::new(&[0, 3, 6], &[]);
        let engine = OutcomeEngine::new(&StandardCatalog);
        let item = ItemSnapshot::new(ItemType::GoldenSword).with_wear(20).unwrap();
        let outcome = engine.process(item, FailChance::ALWAYS, &mut rng);

        assert_eq!(outcome.item.wear(), 26);
        assert_eq!(rng.int_bounds, vec![100, 5, 7]);
    }

    #[test]
    fn fail_branch_on_item_without_durability_stays_at_zero() {
        let mut rng = ScriptedRng::new(&[0, 4], &[]);
        let engine = OutcomeEngine::new(&StandardCatalog);
        let outcome = engine.process(
            ItemSnapshot::new(ItemType::Stick),
            FailChance::ALWAYS,
            &mut rng,
        );
        assert_eq!(outcome.item.wear(), 0);
    }

    #[test]
    fn success_branch_resets_wear_and_spends_fifty_attempts() {
        let mut rng = ScriptedRng::new(&[99], &[]);
        let engine = OutcomeEngine::new(&StandardCatalog);
        let item = ItemSnapshot::new(ItemType::IronPickaxe).with_wear(120).unwrap();
        let outcome = engine.process(item, FailChance::NEVER, &mut rng);

        assert!(outcome.succeeded);
        assert_eq!(outcome.item.wear(), 0);
        // fail roll plus one id draw per attempt; id 0 never fits a pickaxe
        assert_eq!(rng.int_bounds.len(), 1 + 50);
    }

    #[test]
    fn success_branch_doubles_attempts_for_pristine_items() {
        let mut rng = ScriptedRng::new(&[99], &[]);
        let engine = OutcomeEngine::new(&StandardCatalog);
        let outcome = engine.process(
            ItemSnapshot::new(ItemType::IronPickaxe),
            FailChance::NEVER,
            &mut rng,
        );
        assert_eq!(outcome.item.wear(), 0);
        assert_eq!(rng.int_bounds.len(), 1 + 100);
    }

    #[test]
    fn success_branch_last_draw_for_a_kind_wins() {
        // fail roll 50, then sharpness (16) at level 5, then sharpness at level 2
        let mut rng = ScriptedRng::new(&[50, 16, 4, 16, 1], &[]);
        let engine = OutcomeEngine::new(&StandardCatalog);
        let item = ItemSnapshot::new(ItemType::IronSword).with_wear(1).unwrap();
        let outcome = engine.process(item, FailChance::new(50).unwrap(), &mut rng);

        assert!(outcome.succeeded);
        assert_eq!(outcome.item.level_of(ModifierKind::Sharpness), Some(2));
    }

    #[test]
    fn fail_roll_boundary_is_strict() {
        let engine = OutcomeEngine::new(&StandardCatalog);
        let mut rng = ScriptedRng::new(&[30], &[]);
        let outcome = engine.process(
            ItemSnapshot::new(ItemType::IronSword),
            FailChance::new(30).unwrap(),
            &mut rng,
        );
        assert!(outcome.succeeded);

        let mut rng = ScriptedRng::new(&[29], &[]);
        let outcome = engine.process(
            ItemSnapshot::new(ItemType::IronSword),
            FailChance::new(30).unwrap(),
            &mut rng,
        );
        assert!(!outcome.succeeded);
    }

    #[test]
    fn fail_branch_never_raises_levels_and_keeps_wear_in_range() {
        let engine = OutcomeEngine::new(&StandardCatalog);
        for seed in 0..500u64 {
            for wear in [0, 1, 30, 700, 1561] {
                let input = enchanted_sword(wear);
                let outcome = engine.process(input.clone(), FailChance::ALWAYS, &mut Lcg(seed));
                assert!(!outcome.succeeded);
                for (kind, level) in outcome.item.modifiers() {
                    let before = input.level_of(kind).unwrap();
                    assert!(level == 1 || level == before);
                    assert!(level <= before);
                }
                assert!(outcome.item.wear() <= outcome.item.max_wear());
            }
        }
    }

    #[test]
    fn success_branch_only_adds_applicable_modifiers() {
        let engine = OutcomeEngine::new(&StandardCatalog);
        for seed in 0..200u64 {
            for item_type in [ItemType::Bow, ItemType::DiamondHelmet, ItemType::IronShovel] {
                let outcome =
                    engine.process(ItemSnapshot::new(item_type), FailChance::NEVER, &mut Lcg(seed));
                assert!(outcome.succeeded);
                assert_eq!(outcome.item.wear(), 0);
                for (kind, level) in outcome.item.modifiers() {
                    assert!(kind.can_apply_to(item_type), "{} on {}", kind, item_type);
                    assert!((1..=kind.max_level()).contains(&level));
                }
            }
        }
    }

    #[test]
    fn same_sequence_same_outcome() {
        let engine = OutcomeEngine::new(&StandardCatalog);
        let a = engine.process(enchanted_sword(40), FailChance::new(50).unwrap(), &mut Lcg(7));
        let b = engine.process(enchanted_sword(40), FailChance::new(50).unwrap(), &mut Lcg(7));
        assert_eq!(a, b);
    }
}
