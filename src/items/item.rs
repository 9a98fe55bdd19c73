//! Item definitions
//!
//! Core item types, rarities, qualities, and the economy math that lives on
//! a single item: value, requirement checks, stacking and splitting.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Counter for minting unique item IDs
static NEXT_ITEM_SEQ: AtomicU64 = AtomicU64::new(1);

/// Unique item instance ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Mint a fresh, process-unique ID
    pub fn mint() -> Self {
        let seq = NEXT_ITEM_SEQ.fetch_add(1, AtomicOrdering::Relaxed);
        let salt: u32 = rand::thread_rng().gen();
        Self(format!("itm-{:08x}-{:x}", salt, seq))
    }

    /// Wrap an existing ID string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an item *is*, shared by every unit of the same commodity.
///
/// Stacks merge by kind: two potions of the same kind occupy one slot even
/// though each instance carries its own [`ItemId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKind(String);

impl ItemKind {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemKind {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Item rarity tiers, ordered from least to most rare
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Artifact,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Artifact,
    ];

    /// Get display color RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Rarity::Common => (200, 200, 200),
            Rarity::Uncommon => (100, 255, 100),
            Rarity::Rare => (100, 150, 255),
            Rarity::Epic => (200, 100, 255),
            Rarity::Legendary => (255, 180, 50),
            Rarity::Artifact => (230, 80, 60),
        }
    }

    /// Get rarity name
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Artifact => "Artifact",
        }
    }

    /// Tier index (higher = rarer)
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Value multiplier, doubling per tier
    pub fn value_multiplier(&self) -> f64 {
        f64::from(1u32 << self.ordinal())
    }

    /// One tier up, saturating at Artifact
    pub fn next(&self) -> Rarity {
        Rarity::ALL[(self.ordinal() as usize + 1).min(Rarity::ALL.len() - 1)]
    }
}

/// Craftsmanship quality, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quality {
    Poor,
    Normal,
    Good,
    Excellent,
    Perfect,
}

impl Quality {
    pub fn name(&self) -> &'static str {
        match self {
            Quality::Poor => "Poor",
            Quality::Normal => "Normal",
            Quality::Good => "Good",
            Quality::Excellent => "Excellent",
            Quality::Perfect => "Perfect",
        }
    }

    pub fn value_multiplier(&self) -> f64 {
        match self {
            Quality::Poor => 0.5,
            Quality::Normal => 1.0,
            Quality::Good => 1.5,
            Quality::Excellent => 2.0,
            Quality::Perfect => 3.0,
        }
    }
}

/// Main item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Jewelry,
    Consumable,
    Material,
    Quest,
}

impl ItemCategory {
    /// Check if this is an equipment category
    pub fn is_equipment(&self) -> bool {
        matches!(self, ItemCategory::Weapon | ItemCategory::Armor | ItemCategory::Jewelry)
    }
}

/// Concrete item type, including the armor slot it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Helmet,
    Chest,
    Legs,
    Boots,
    Gloves,
    Shield,
    Ring,
    Amulet,
    Consumable,
    Material,
    Quest,
}

impl ItemType {
    pub fn category(&self) -> ItemCategory {
        match self {
            ItemType::Weapon => ItemCategory::Weapon,
            ItemType::Helmet
            | ItemType::Chest
            | ItemType::Legs
            | ItemType::Boots
            | ItemType::Gloves
            | ItemType::Shield => ItemCategory::Armor,
            ItemType::Ring | ItemType::Amulet => ItemCategory::Jewelry,
            ItemType::Consumable => ItemCategory::Consumable,
            ItemType::Material => ItemCategory::Material,
            ItemType::Quest => ItemCategory::Quest,
        }
    }

    /// Gold value contributed per item level
    fn value_per_level(&self) -> u32 {
        match self {
            ItemType::Weapon => 12,
            ItemType::Chest => 10,
            ItemType::Shield | ItemType::Legs => 8,
            ItemType::Helmet | ItemType::Boots | ItemType::Gloves => 6,
            ItemType::Ring | ItemType::Amulet => 15,
            ItemType::Consumable => 5,
            ItemType::Material => 2,
            ItemType::Quest => 1,
        }
    }

    /// Base value for a freshly created item of this type
    pub fn base_value_for_level(&self, level: u32) -> u32 {
        self.value_per_level().saturating_mul(level.max(1))
    }

    /// Stack capacity for a freshly created item of this type
    pub fn default_stack_size(&self) -> u32 {
        match self {
            ItemType::Consumable => 20,
            ItemType::Material => 99,
            _ => 1,
        }
    }
}

/// The attributes a character brings to a requirement check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub strength: i32,
    pub intelligence: i32,
    pub dexterity: i32,
    pub vitality: i32,
}

/// Minimum level and attribute thresholds for using an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    pub level: u32,
    pub strength: i32,
    pub intelligence: i32,
    pub dexterity: i32,
    pub vitality: i32,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            level: 1,
            strength: 0,
            intelligence: 0,
            dexterity: 0,
            vitality: 0,
        }
    }
}

impl Requirements {
    pub fn met_by(&self, stats: &PlayerStats) -> bool {
        stats.level >= self.level
            && stats.strength >= self.strength
            && stats.intelligence >= self.intelligence
            && stats.dexterity >= self.dexterity
            && stats.vitality >= self.vitality
    }
}

/// Additive attribute bonuses granted while equipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeModifiers {
    pub strength: i32,
    pub intelligence: i32,
    pub dexterity: i32,
    pub vitality: i32,
    pub health: i32,
    pub mana: i32,
}

/// Damage and defense payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatStats {
    pub physical_damage: i32,
    pub fire_damage: i32,
    pub ice_damage: i32,
    pub lightning_damage: i32,
    pub poison_damage: i32,
    pub armor: i32,
    pub fire_resist: i32,
    pub ice_resist: i32,
    pub lightning_resist: i32,
    pub poison_resist: i32,
}

impl CombatStats {
    pub fn total(&self) -> i64 {
        [
            self.physical_damage,
            self.fire_damage,
            self.ice_damage,
            self.lightning_damage,
            self.poison_damage,
            self.armor,
            self.fire_resist,
            self.ice_resist,
            self.lightning_resist,
            self.poison_resist,
        ]
        .iter()
        .map(|v| i64::from(*v))
        .sum()
    }

    /// Scale every field by a factor, rounding to the nearest point
    pub fn scaled(&self, factor: f32) -> Self {
        let s = |v: i32| (v as f32 * factor).round() as i32;
        Self {
            physical_damage: s(self.physical_damage),
            fire_damage: s(self.fire_damage),
            ice_damage: s(self.ice_damage),
            lightning_damage: s(self.lightning_damage),
            poison_damage: s(self.poison_damage),
            armor: s(self.armor),
            fire_resist: s(self.fire_resist),
            ice_resist: s(self.ice_resist),
            lightning_resist: s(self.lightning_resist),
            poison_resist: s(self.poison_resist),
        }
    }
}

/// Resources restored when a consumable is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Restoration {
    pub health: i32,
    pub mana: i32,
}

impl Restoration {
    pub fn is_empty(&self) -> bool {
        self.health == 0 && self.mana == 0
    }
}

/// A named effect; `duration` in seconds, `None` for permanent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEffect {
    pub name: String,
    pub magnitude: i32,
    #[serde(default)]
    pub duration: Option<f32>,
}

impl ItemEffect {
    pub fn permanent(name: impl Into<String>, magnitude: i32) -> Self {
        Self { name: name.into(), magnitude, duration: None }
    }

    pub fn timed(name: impl Into<String>, magnitude: i32, seconds: f32) -> Self {
        Self { name: name.into(), magnitude, duration: Some(seconds) }
    }

    pub fn is_permanent(&self) -> bool {
        self.duration.is_none()
    }
}

/// Result of moving units from one stack into another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackTransfer {
    /// Units actually moved
    pub moved: u32,
    /// Units left behind on the source; 0 means the source can be discarded
    pub leftover: u32,
}

/// Compact description of an item, carried by events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: String,
    pub rarity: Rarity,
    pub quality: Quality,
    pub stack: u32,
    pub value: u32,
}

/// The main Item struct
#[derive(Debug, Serialize, Deserialize)]
pub struct Item {
    /// Unique instance ID
    pub id: ItemId,
    /// Commodity key used for stacking
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub item_type: ItemType,
    pub rarity: Rarity,
    pub quality: Quality,
    pub level: u32,
    /// Max stack size
    pub stack_size: u32,
    /// Units currently in this stack
    pub current_stack: u32,
    /// Gold value before quality/rarity/level scaling
    pub base_value: u32,
    pub tradeable: bool,
    pub droppable: bool,
    pub destroyable: bool,
    pub requirements: Requirements,
    pub modifiers: AttributeModifiers,
    pub combat: CombatStats,
    pub restore: Restoration,
    pub effects: Vec<ItemEffect>,
}

impl Item {
    /// Create a new item with a freshly minted ID
    pub fn new(kind: impl Into<ItemKind>, name: impl Into<String>, item_type: ItemType, level: u32) -> Self {
        let level = level.max(1);
        let stack_size = item_type.default_stack_size();
        Self {
            id: ItemId::mint(),
            kind: kind.into(),
            name: name.into(),
            description: String::new(),
            item_type,
            rarity: Rarity::Common,
            quality: Quality::Normal,
            level,
            stack_size,
            current_stack: 1,
            base_value: item_type.base_value_for_level(level),
            tradeable: item_type != ItemType::Quest,
            droppable: item_type != ItemType::Quest,
            destroyable: item_type != ItemType::Quest,
            requirements: Requirements { level, ..Requirements::default() },
            modifiers: AttributeModifiers::default(),
            combat: CombatStats::default(),
            restore: Restoration::default(),
            effects: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_base_value(mut self, base_value: u32) -> Self {
        self.base_value = base_value;
        self
    }

    pub fn with_stack(mut self, stack_size: u32, current_stack: u32) -> Self {
        self.stack_size = stack_size;
        self.current_stack = current_stack;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(&self) -> ItemCategory {
        self.item_type.category()
    }

    /// Check if item can stack
    pub fn is_stackable(&self) -> bool {
        self.stack_size > 1
    }

    pub fn is_full_stack(&self) -> bool {
        self.current_stack >= self.stack_size
    }

    /// Units that can still be added to this stack
    pub fn free_space(&self) -> u32 {
        self.stack_size.saturating_sub(self.current_stack)
    }

    /// Check if `other` belongs in the same stack as this item.
    /// Level, rarity and quality feed the value, so they must match too.
    pub fn stacks_with(&self, other: &Item) -> bool {
        self.kind == other.kind
            && self.level == other.level
            && self.rarity == other.rarity
            && self.quality == other.quality
    }

    /// Gold value of a single unit:
    /// `round(base × quality × rarity × (1 + level × 0.1))`, never below 1.
    pub fn current_value(&self) -> u32 {
        let raw = f64::from(self.base_value)
            * self.quality.value_multiplier()
            * self.rarity.value_multiplier()
            * (1.0 + f64::from(self.level) * 0.1);
        (raw.round() as u32).max(1)
    }

    /// Gold value of the whole stack
    pub fn stack_value(&self) -> u32 {
        self.current_value().saturating_mul(self.current_stack)
    }

    /// Check every requirement against the given stats; no stats means no.
    pub fn can_player_use(&self, stats: Option<&PlayerStats>) -> bool {
        stats.is_some_and(|s| self.requirements.met_by(s))
    }

    /// Move as many units as fit from `other` into this stack.
    ///
    /// Returns `None` when the items do not share a stack or this stack is
    /// already full.
    pub fn try_stack(&mut self, other: &mut Item) -> Option<StackTransfer> {
        if !self.stacks_with(other) || self.is_full_stack() || other.current_stack == 0 {
            return None;
        }

        let moved = other.current_stack.min(self.free_space());
        self.current_stack += moved;
        other.current_stack -= moved;

        Some(StackTransfer { moved, leftover: other.current_stack })
    }

    /// Split `amount` units off into a new item (with its own ID).
    pub fn split(&mut self, amount: u32) -> Option<Item> {
        if !self.is_stackable() || amount == 0 || amount >= self.current_stack {
            return None;
        }

        let mut part = self.clone();
        part.current_stack = amount;
        self.current_stack -= amount;
        Some(part)
    }

    /// Sum of every numeric combat and restore field
    pub fn power_score(&self) -> i64 {
        self.combat.total() + i64::from(self.restore.health) + i64::from(self.restore.mana)
    }

    /// Upgrade check used for highlighting: a different type always counts
    /// as better, otherwise rarity, quality, level and power decide.
    pub fn is_better_than(&self, other: &Item) -> bool {
        if self.item_type != other.item_type {
            return true;
        }

        let ranking = self
            .rarity
            .cmp(&other.rarity)
            .then(self.quality.cmp(&other.quality))
            .then(self.level.cmp(&other.level));

        match ranking {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.power_score() > other.power_score(),
        }
    }

    /// Display ordering: rarity, then level, then case-insensitive name
    pub fn display_order(&self, other: &Item) -> Ordering {
        self.rarity
            .cmp(&other.rarity)
            .then(self.level.cmp(&other.level))
            .then_with(|| self.name.to_lowercase().cmp(&other.name.to_lowercase()))
    }

    /// Check the structural invariants; malformed items are never trusted
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && self.level >= 1
            && self.stack_size >= 1
            && (1..=self.stack_size).contains(&self.current_stack)
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id.clone(),
            kind: self.kind.clone(),
            name: self.name.clone(),
            rarity: self.rarity,
            quality: self.quality,
            stack: self.current_stack,
            value: self.current_value(),
        }
    }

    /// Display name with stack count
    pub fn display_name(&self) -> String {
        if self.current_stack > 1 {
            format!("{} x{}", self.name, self.current_stack)
        } else {
            self.name.clone()
        }
    }
}

impl Clone for Item {
    /// A clone is a distinct economic entity and gets its own ID.
    fn clone(&self) -> Self {
        Self {
            id: ItemId::mint(),
            kind: self.kind.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            item_type: self.item_type,
            rarity: self.rarity,
            quality: self.quality,
            level: self.level,
            stack_size: self.stack_size,
            current_stack: self.current_stack,
            base_value: self.base_value,
            tradeable: self.tradeable,
            droppable: self.droppable,
            destroyable: self.destroyable,
            requirements: self.requirements,
            modifiers: self.modifiers,
            combat: self.combat,
            restore: self.restore,
            effects: self.effects.clone(),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potion(current: u32) -> Item {
        Item::new("X", "Potion", ItemType::Consumable, 1).with_stack(10, current)
    }

    #[test]
    fn test_value_formula_scenario() {
        let item = Item::new("blade", "Blade", ItemType::Weapon, 5)
            .with_base_value(20)
            .with_rarity(Rarity::Rare)
            .with_quality(Quality::Good);
        assert_eq!(item.current_value(), 180);
    }

    #[test]
    fn test_value_never_below_one() {
        let item = Item::new("dust", "Dust", ItemType::Material, 1)
            .with_base_value(0)
            .with_quality(Quality::Poor);
        assert_eq!(item.current_value(), 1);
    }

    #[test]
    fn test_value_monotonic_in_rarity_and_quality() {
        let qualities = [Quality::Poor, Quality::Normal, Quality::Good, Quality::Excellent, Quality::Perfect];
        for quality in qualities {
            let mut last = 0;
            for rarity in Rarity::ALL {
                let value = Item::new("k", "K", ItemType::Weapon, 3)
                    .with_rarity(rarity)
                    .with_quality(quality)
                    .current_value();
                assert!(value >= last);
                last = value;
            }
        }
        for rarity in Rarity::ALL {
            let mut last = 0;
            for quality in qualities {
                let value = Item::new("k", "K", ItemType::Ring, 7)
                    .with_rarity(rarity)
                    .with_quality(quality)
                    .current_value();
                assert!(value >= last);
                last = value;
            }
        }
    }

    #[test]
    fn test_base_value_from_level_and_type() {
        let item = Item::new("sword", "Sword", ItemType::Weapon, 4);
        assert_eq!(item.base_value, 48);
        assert_eq!(Item::new("ore", "Ore", ItemType::Material, 0).level, 1);
    }

    #[test]
    fn test_stacking_scenario() {
        let mut a = potion(7);
        let mut b = potion(5);

        let transfer = a.try_stack(&mut b).unwrap();
        assert_eq!(transfer.moved, 3);
        assert_eq!(transfer.leftover, 2);
        assert_eq!(a.current_stack, 10);
        assert_eq!(b.current_stack, 2);
    }

    #[test]
    fn test_stacking_conserves_units() {
        for (before_a, before_b) in [(1, 1), (3, 9), (9, 1), (5, 5)] {
            let mut a = potion(before_a);
            let mut b = potion(before_b);
            let transfer = a.try_stack(&mut b).unwrap();
            assert_eq!(a.current_stack + transfer.leftover, before_a + before_b);
            assert!(a.current_stack <= a.stack_size);
        }
    }

    #[test]
    fn test_stacking_rejects_full_or_foreign() {
        let mut full = potion(10);
        let mut other = potion(2);
        assert!(full.try_stack(&mut other).is_none());
        assert_eq!(other.current_stack, 2);

        let mut a = potion(2);
        let mut foreign = Item::new("Y", "Other", ItemType::Consumable, 1).with_stack(10, 2);
        assert!(a.try_stack(&mut foreign).is_none());

        let mut stronger = Item::new("X", "Potion", ItemType::Consumable, 9).with_stack(10, 2);
        assert!(a.try_stack(&mut stronger).is_none());
        assert_eq!(stronger.current_stack, 2);
    }

    #[test]
    fn test_split_boundaries() {
        let mut item = potion(6);
        assert!(item.split(0).is_none());
        assert!(item.split(6).is_none());
        assert_eq!(item.current_stack, 6);

        let part = item.split(5).unwrap();
        assert_eq!(part.current_stack, 5);
        assert_eq!(item.current_stack, 1);
        assert_ne!(part.id, item.id);
    }

    #[test]
    fn test_split_non_stackable_fails() {
        let mut sword = Item::new("sword", "Sword", ItemType::Weapon, 1);
        assert!(sword.split(1).is_none());
    }

    #[test]
    fn test_split_then_restack_round_trip() {
        let mut a = potion(8);
        let mut b = a.split(3).unwrap();
        assert_eq!(a.current_stack, 5);

        let transfer = a.try_stack(&mut b).unwrap();
        assert_eq!(transfer.leftover, 0);
        assert_eq!(a.current_stack, 8);
    }

    #[test]
    fn test_clone_mints_new_id() {
        let item = Item::new("ring", "Ring", ItemType::Ring, 2);
        let copy = item.clone();
        assert_ne!(item, copy);
        assert_eq!(item.kind, copy.kind);
        assert_eq!(item.name, copy.name);
    }

    #[test]
    fn test_equality_is_identity() {
        let a = potion(3);
        let mut b = potion(3).with_id(a.id.clone());
        b.current_stack = 9;
        b.name = "Renamed".to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn test_can_player_use() {
        let mut item = Item::new("axe", "Axe", ItemType::Weapon, 5);
        item.requirements.strength = 12;

        let weak = PlayerStats { level: 5, strength: 10, ..PlayerStats::default() };
        let strong = PlayerStats { level: 5, strength: 12, ..PlayerStats::default() };
        let low = PlayerStats { level: 4, strength: 20, ..PlayerStats::default() };

        assert!(!item.can_player_use(None));
        assert!(!item.can_player_use(Some(&weak)));
        assert!(!item.can_player_use(Some(&low)));
        assert!(item.can_player_use(Some(&strong)));
    }

    #[test]
    fn test_is_better_than_chain() {
        let base = Item::new("helm", "Helm", ItemType::Helmet, 3);
        let boots = Item::new("boots", "Boots", ItemType::Boots, 1);
        assert!(boots.is_better_than(&base));

        let rarer = Item::new("helm", "Helm", ItemType::Helmet, 1).with_rarity(Rarity::Uncommon);
        assert!(rarer.is_better_than(&base));
        assert!(!base.is_better_than(&rarer));

        let finer = Item::new("helm", "Helm", ItemType::Helmet, 1).with_quality(Quality::Good);
        let higher = Item::new("helm", "Helm", ItemType::Helmet, 9);
        assert!(finer.is_better_than(&higher));

        let mut armored = Item::new("helm", "Helm", ItemType::Helmet, 3);
        armored.combat.armor = 4;
        assert!(armored.is_better_than(&base));
        assert!(!base.is_better_than(&armored));
    }

    #[test]
    fn test_display_order() {
        let mut items = vec![
            Item::new("b", "beta", ItemType::Ring, 2),
            Item::new("a", "Alpha", ItemType::Ring, 2),
            Item::new("c", "Zed", ItemType::Ring, 1),
            Item::new("d", "Epic", ItemType::Ring, 1).with_rarity(Rarity::Epic),
        ];
        items.sort_by(|a, b| a.display_order(b));
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Alpha", "beta", "Epic"]);
    }

    #[test]
    fn test_validation() {
        assert!(potion(1).is_valid());
        assert!(!potion(11).is_valid());

        let mut empty_stack = potion(1);
        empty_stack.current_stack = 0;
        assert!(!empty_stack.is_valid());

        assert!(!potion(1).with_id(ItemId::new("  ")).is_valid());

        let mut zero_level = potion(1);
        zero_level.level = 0;
        assert!(!zero_level.is_valid());
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Legendary < Rarity::Artifact);
        assert_eq!(Rarity::Artifact.value_multiplier(), 32.0);
        assert_eq!(Rarity::Legendary.next(), Rarity::Artifact);
        assert_eq!(Rarity::Artifact.next(), Rarity::Artifact);
    }
}
