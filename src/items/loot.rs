//! Loot generation system
//!
//! The drop roll contract the drop pipeline consumes, and a default
//! table-driven implementation backed by the item catalog.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;

use super::catalog::{ItemCatalog, ItemTemplate};
use super::item::{Item, ItemCategory, Quality, Rarity};

/// Inclusive gold range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoldRange {
    pub min: u32,
    pub max: u32,
}

impl GoldRange {
    pub fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// A range that yields no gold
    pub fn none() -> Self {
        Self { min: 0, max: 0 }
    }

    /// Uniformly sample one amount
    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Decides which items and how much gold a defeated enemy yields
pub trait DropRollProvider {
    /// Items dropped by a regular enemy of the given level
    fn roll_for_loot(&mut self, level: u32) -> Vec<Item>;

    /// Items dropped by a boss. Defaults to the regular roll.
    fn roll_boss_loot(&mut self, level: u32) -> Vec<Item> {
        self.roll_for_loot(level)
    }

    /// Gold range for an enemy of the given level
    fn gold_range(&self, level: u32, boss: bool) -> GoldRange;
}

/// Level band used by the rarity tables
fn level_tier(level: u32) -> usize {
    match level {
        0..=5 => 0,
        6..=10 => 1,
        11..=15 => 2,
        16..=20 => 3,
        21..=30 => 4,
        _ => 5, // deep endgame
    }
}

/// Roll a rarity for an enemy level, out of 1000
pub fn roll_rarity(level: u32, rng: &mut impl Rng) -> Rarity {
    // Thresholds per tier: Artifact, Legendary, Epic, Rare, Uncommon
    const THRESHOLDS: [[u32; 5]; 6] = [
        [1000, 1000, 995, 950, 750],
        [1000, 998, 985, 920, 700],
        [1000, 995, 970, 880, 650],
        [999, 990, 950, 850, 600],
        [997, 980, 930, 800, 550],
        [995, 970, 910, 750, 500],
    ];

    let roll = rng.gen_range(0..1000);
    let [artifact, legendary, epic, rare, uncommon] = THRESHOLDS[level_tier(level)];

    if roll >= artifact {
        Rarity::Artifact
    } else if roll >= legendary {
        Rarity::Legendary
    } else if roll >= epic {
        Rarity::Epic
    } else if roll >= rare {
        Rarity::Rare
    } else if roll >= uncommon {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

/// Minimum rarity a level band guarantees
pub fn minimum_rarity_for_level(level: u32) -> Rarity {
    match level {
        0..=4 => Rarity::Common,
        5..=9 => Rarity::Uncommon,
        10..=14 => Rarity::Rare,
        _ => Rarity::Epic,
    }
}

/// Roll rarity with a minimum threshold (for bosses)
pub fn roll_rarity_with_minimum(level: u32, min_rarity: Rarity, rng: &mut impl Rng) -> Rarity {
    roll_rarity(level, rng).max(min_rarity)
}

pub fn roll_quality(rng: &mut impl Rng) -> Quality {
    match rng.gen_range(0..100) {
        0..=9 => Quality::Poor,
        10..=59 => Quality::Normal,
        60..=84 => Quality::Good,
        85..=96 => Quality::Excellent,
        _ => Quality::Perfect,
    }
}

/// What kind of drop to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropKind {
    Consumable,
    Material,
    Weapon,
    Armor,
}

impl DropKind {
    fn matches(&self, template: &ItemTemplate) -> bool {
        match self {
            DropKind::Consumable => template.category() == ItemCategory::Consumable,
            DropKind::Material => template.category() == ItemCategory::Material,
            DropKind::Weapon => template.category() == ItemCategory::Weapon,
            DropKind::Armor => matches!(template.category(), ItemCategory::Armor | ItemCategory::Jewelry),
        }
    }

    fn is_equipment(&self) -> bool {
        matches!(self, DropKind::Weapon | DropKind::Armor)
    }
}

/// Default drop table: catalog templates weighted per category
pub struct TableDropRoller {
    catalog: ItemCatalog,
    rng: StdRng,
    /// Chance that a regular enemy drops anything at all
    drop_chance: f64,
}

impl TableDropRoller {
    pub fn new(catalog: ItemCatalog, seed: u64) -> Self {
        Self {
            catalog,
            rng: StdRng::seed_from_u64(seed),
            drop_chance: 0.30,
        }
    }

    pub fn with_drop_chance(mut self, chance: f64) -> Self {
        self.drop_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    fn pick_template(&mut self, kind: DropKind) -> Option<ItemTemplate> {
        let candidates: Vec<&ItemTemplate> = self
            .catalog
            .templates()
            .iter()
            .filter(|t| kind.matches(t))
            .collect();
        let weights = WeightedIndex::new(candidates.iter().map(|t| t.weight)).ok()?;
        Some(candidates[weights.sample(&mut self.rng)].clone())
    }

    /// Build one item. Equipment rolls rarity and quality; everything else
    /// drops as plain Common/Normal so it stacks with what the player holds.
    fn generate(&mut self, kind: DropKind, level: u32, min_rarity: Rarity) -> Option<Item> {
        let template = self.pick_template(kind)?;
        let item = if kind.is_equipment() {
            let rarity = roll_rarity_with_minimum(level, min_rarity, &mut self.rng);
            let quality = roll_quality(&mut self.rng);
            template.instantiate(level, rarity, quality)
        } else {
            template.instantiate(level, Rarity::Common, Quality::Normal)
        };
        Some(item)
    }

    fn roll_equipment_kind(&mut self) -> DropKind {
        if self.rng.gen_bool(0.5) {
            DropKind::Weapon
        } else {
            DropKind::Armor
        }
    }
}

impl DropRollProvider for TableDropRoller {
    fn roll_for_loot(&mut self, level: u32) -> Vec<Item> {
        if !self.rng.gen_bool(self.drop_chance) {
            return Vec::new();
        }

        let kind = match self.rng.gen_range(0..100) {
            0..=39 => DropKind::Consumable,
            40..=54 => DropKind::Material,
            55..=79 => DropKind::Weapon,
            _ => DropKind::Armor,
        };

        self.generate(kind, level, Rarity::Common).into_iter().collect()
    }

    /// Bosses always drop one equipment piece one tier above the level
    /// band's minimum, one consumable, and maybe a second piece.
    fn roll_boss_loot(&mut self, level: u32) -> Vec<Item> {
        let boss_min = minimum_rarity_for_level(level).next();
        let mut loot = Vec::new();

        let kind = self.roll_equipment_kind();
        loot.extend(self.generate(kind, level, boss_min));
        loot.extend(self.generate(DropKind::Consumable, level, Rarity::Common));

        if self.rng.gen_bool(0.5) {
            let kind = self.roll_equipment_kind();
            loot.extend(self.generate(kind, level, boss_min));
        }

        loot
    }

    fn gold_range(&self, level: u32, boss: bool) -> GoldRange {
        let base = if boss {
            level.saturating_mul(20).saturating_add(50)
        } else {
            level.saturating_mul(3).saturating_add(5)
        };
        GoldRange::new(base, base.saturating_add(base / 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::catalog::default_templates;

    fn roller(seed: u64) -> TableDropRoller {
        TableDropRoller::new(ItemCatalog::default(), seed)
    }

    #[test]
    fn test_early_levels_never_roll_legendary() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5000 {
            assert!(roll_rarity(3, &mut rng) < Rarity::Legendary);
        }
    }

    #[test]
    fn test_minimum_rarity_respected() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            assert!(roll_rarity_with_minimum(1, Rarity::Rare, &mut rng) >= Rarity::Rare);
        }
    }

    #[test]
    fn test_boss_loot_guarantees() {
        let mut roller = roller(3);
        for _ in 0..50 {
            let loot = roller.roll_boss_loot(12);
            assert!(loot.len() >= 2);
            assert!(loot.iter().any(|i| i.category() == ItemCategory::Consumable));
            for item in loot.iter().filter(|i| i.category().is_equipment()) {
                assert!(item.rarity >= Rarity::Epic);
                assert_eq!(item.level, 12);
            }
        }
    }

    #[test]
    fn test_drop_chance_zero_and_one() {
        let mut never = roller(1).with_drop_chance(0.0);
        assert!(never.roll_for_loot(5).is_empty());

        let mut always = roller(1).with_drop_chance(1.0);
        for _ in 0..20 {
            let loot = always.roll_for_loot(5);
            assert_eq!(loot.len(), 1);
            assert!(loot[0].is_valid());
        }
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let mut a = roller(42).with_drop_chance(1.0);
        let mut b = roller(42).with_drop_chance(1.0);
        for _ in 0..20 {
            let ka: Vec<_> = a.roll_for_loot(8).into_iter().map(|i| (i.kind, i.rarity)).collect();
            let kb: Vec<_> = b.roll_for_loot(8).into_iter().map(|i| (i.kind, i.rarity)).collect();
            assert_eq!(ka, kb);
        }
    }

    #[test]
    fn test_stackable_drops_are_plain() {
        let mut roller = roller(9).with_drop_chance(1.0);
        for _ in 0..100 {
            for item in roller.roll_for_loot(20) {
                if item.is_stackable() {
                    assert_eq!(item.rarity, Rarity::Common);
                    assert_eq!(item.quality, Quality::Normal);
                }
            }
        }
    }

    #[test]
    fn test_missing_category_yields_nothing() {
        let only_weapons: Vec<_> = default_templates()
            .into_iter()
            .filter(|t| t.category() == ItemCategory::Weapon)
            .collect();
        let catalog = ItemCatalog::from_templates(only_weapons).unwrap();
        let mut roller = TableDropRoller::new(catalog, 5);
        let loot = roller.roll_boss_loot(1);
        assert!(loot.iter().all(|i| i.category() == ItemCategory::Weapon));
    }

    #[test]
    fn test_gold_range() {
        let roller = roller(0);
        assert_eq!(roller.gold_range(1, false), GoldRange { min: 8, max: 12 });
        assert_eq!(roller.gold_range(1, true), GoldRange { min: 70, max: 105 });
        assert_eq!(roller.gold_range(u32::MAX, true), GoldRange { min: u32::MAX, max: u32::MAX });
        assert_eq!(roller.gold_range(u32::MAX / 3, false).max, u32::MAX);

        let mut rng = StdRng::seed_from_u64(2);
        let range = GoldRange::new(10, 4);
        for _ in 0..100 {
            let gold = range.sample(&mut rng);
            assert!((4..=10).contains(&gold));
        }
    }
}
