//! Inventory system
//!
//! The `ItemStore` contract the collection transaction depends on, and the
//! slot-based player inventory that implements it.

use super::consumable::{Consumable, Consumption};
use super::item::{Item, ItemCategory, ItemId};

/// Default number of inventory slots
pub const DEFAULT_SLOTS: usize = 30;

/// The three-part contract a container offers to the collection transaction.
pub trait ItemStore {
    /// Check if at least one empty slot is available
    fn has_space(&self) -> bool;

    /// Total number of slots
    fn capacity(&self) -> usize;

    /// Look up a stored item by instance ID
    fn find_item_by_id(&self, id: &ItemId) -> Option<&Item>;

    /// Find the stored stack `item` would merge into, preferring one with room
    fn find_stack_for(&self, item: &Item) -> Option<&Item>;

    /// Insert an item. On failure the item is handed back untouched and the
    /// store is unchanged.
    fn add_item(&mut self, item: Item) -> Result<(), Item>;
}

/// Player inventory: a fixed number of slots plus a gold purse
#[derive(Debug)]
pub struct Inventory {
    slots: Vec<Item>,
    max_slots: usize,
    gold: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_SLOTS)
    }
}

impl Inventory {
    /// Create a new inventory
    pub fn new(max_slots: usize) -> Self {
        Self {
            slots: Vec::with_capacity(max_slots),
            max_slots,
            gold: 0,
        }
    }

    /// Get current number of occupied slots
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.max_slots
    }

    /// Units of `item` the existing stacks could still absorb
    fn stack_room_for(&self, item: &Item) -> u32 {
        if !item.is_stackable() {
            return 0;
        }
        self.slots
            .iter()
            .filter(|slot| slot.stacks_with(item))
            .map(Item::free_space)
            .sum()
    }

    /// Check if a specific item can fit, by merging or by taking a slot
    pub fn can_fit(&self, item: &Item) -> bool {
        !self.is_full() || self.stack_room_for(item) >= item.current_stack
    }

    /// Remove an item by ID
    pub fn remove_by_id(&mut self, id: &ItemId) -> Option<Item> {
        let index = self.slots.iter().position(|i| &i.id == id)?;
        Some(self.slots.remove(index))
    }

    /// Get item by ID
    pub fn get_by_id(&self, id: &ItemId) -> Option<&Item> {
        self.slots.iter().find(|i| &i.id == id)
    }

    /// Get all items
    pub fn items(&self) -> &[Item] {
        &self.slots
    }

    /// Get items of a specific category
    pub fn items_of_category(&self, category: ItemCategory) -> Vec<&Item> {
        self.slots.iter().filter(|i| i.category() == category).collect()
    }

    /// Total units held of a kind, across all stacks
    pub fn units_of(&self, kind: &str) -> u32 {
        self.slots
            .iter()
            .filter(|i| i.kind.as_str() == kind)
            .map(|i| i.current_stack)
            .sum()
    }

    /// Use one unit of a consumable; empty stacks are removed
    pub fn consume(&mut self, id: &ItemId) -> Option<Consumption> {
        let index = self.slots.iter().position(|i| &i.id == id)?;
        let used = self.slots[index].consume_one()?;
        if used.remaining == 0 {
            self.slots.remove(index);
        }
        Some(used)
    }

    /// Get current gold
    pub fn gold(&self) -> u32 {
        self.gold
    }

    /// Add gold
    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Spend gold, returns false if not enough
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if self.gold >= amount {
            self.gold -= amount;
            true
        } else {
            false
        }
    }

    /// Sort items for display (rarity, level, name)
    pub fn sort(&mut self) {
        self.slots.sort_by(|a, b| a.display_order(b));
    }

    /// Combined gold value of everything carried
    pub fn total_value(&self) -> u64 {
        self.slots.iter().map(|i| u64::from(i.stack_value())).sum()
    }
}

impl ItemStore for Inventory {
    fn has_space(&self) -> bool {
        !self.is_full()
    }

    fn capacity(&self) -> usize {
        self.max_slots
    }

    fn find_item_by_id(&self, id: &ItemId) -> Option<&Item> {
        self.get_by_id(id)
    }

    fn find_stack_for(&self, item: &Item) -> Option<&Item> {
        if !item.is_stackable() {
            return None;
        }
        let mut stacks = self.slots.iter().filter(|slot| slot.stacks_with(item));
        let first = stacks.clone().next();
        stacks.find(|slot| !slot.is_full_stack()).or(first)
    }

    fn add_item(&mut self, mut item: Item) -> Result<(), Item> {
        if !item.is_valid() {
            log::warn!("Refusing malformed item {} ({})", item.name, item.id);
            return Err(item);
        }
        if !self.can_fit(&item) {
            return Err(item);
        }

        if item.is_stackable() {
            for slot in self.slots.iter_mut() {
                if let Some(transfer) = slot.try_stack(&mut item) {
                    if transfer.leftover == 0 {
                        return Ok(());
                    }
                }
            }
        }

        self.slots.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::{ItemType, Quality, Rarity};
    use crate::items::ItemCatalog;

    fn sword() -> Item {
        Item::new("sword", "Sword", ItemType::Weapon, 1)
    }

    fn ore(count: u32) -> Item {
        Item::new("ore", "Iron Ore", ItemType::Material, 1).with_stack(10, count)
    }

    #[test]
    fn test_add_until_full() {
        let mut inv = Inventory::new(2);
        assert!(inv.add_item(sword()).is_ok());
        assert!(inv.add_item(sword()).is_ok());
        assert!(!inv.has_space());

        let rejected = inv.add_item(sword()).unwrap_err();
        assert_eq!(rejected.name, "Sword");
        assert_eq!(inv.count(), 2);
    }

    #[test]
    fn test_merges_into_existing_stack() {
        let mut inv = Inventory::new(1);
        inv.add_item(ore(4)).unwrap();
        inv.add_item(ore(6)).unwrap();

        assert_eq!(inv.count(), 1);
        assert_eq!(inv.units_of("ore"), 10);
    }

    #[test]
    fn test_overflowing_stack_takes_new_slot() {
        let mut inv = Inventory::new(2);
        inv.add_item(ore(8)).unwrap();
        inv.add_item(ore(5)).unwrap();

        assert_eq!(inv.count(), 2);
        assert_eq!(inv.units_of("ore"), 13);
    }

    #[test]
    fn test_failed_insert_leaves_inventory_untouched() {
        let mut inv = Inventory::new(1);
        inv.add_item(ore(8)).unwrap();

        let rejected = inv.add_item(ore(5)).unwrap_err();
        assert_eq!(rejected.current_stack, 5);
        assert_eq!(inv.units_of("ore"), 8);
    }

    #[test]
    fn test_find_stack_prefers_room() {
        let mut inv = Inventory::new(3);
        inv.add_item(ore(10)).unwrap();
        inv.add_item(ore(3)).unwrap();

        let stack = inv.find_stack_for(&ore(1)).unwrap();
        assert_eq!(stack.current_stack, 3);
        assert!(inv.find_stack_for(&sword()).is_none());
    }

    #[test]
    fn test_same_kind_at_other_level_keeps_own_slot() {
        let catalog = ItemCatalog::default();
        let template = catalog.get("health_potion").unwrap();
        let low = template.instantiate(1, Rarity::Common, Quality::Normal);
        let high = template.instantiate(20, Rarity::Common, Quality::Normal);
        let expected = u64::from(low.stack_value()) + u64::from(high.stack_value());

        let mut inv = Inventory::new(4);
        inv.add_item(low).unwrap();
        inv.add_item(high).unwrap();

        assert_eq!(inv.count(), 2);
        assert_eq!(inv.units_of("health_potion"), 2);
        assert_eq!(inv.total_value(), expected);
        assert!(inv.items().iter().any(|i| i.level == 20 && i.requirements.level == 20));
    }

    #[test]
    fn test_rarity_and_quality_split_stacks() {
        let mut inv = Inventory::new(4);
        inv.add_item(ore(2)).unwrap();
        inv.add_item(ore(2).with_rarity(Rarity::Rare)).unwrap();
        inv.add_item(ore(2).with_quality(Quality::Excellent)).unwrap();
        inv.add_item(ore(2)).unwrap();

        assert_eq!(inv.count(), 3);
        assert_eq!(inv.units_of("ore"), 8);
        assert!(inv.find_stack_for(&ore(1).with_rarity(Rarity::Epic)).is_none());
    }

    #[test]
    fn test_consume_removes_empty_stack() {
        let mut inv = Inventory::default();
        let mut potion = Item::new("hp", "Health Potion", ItemType::Consumable, 1).with_stack(5, 1);
        potion.restore.health = 25;
        let id = potion.id.clone();
        inv.add_item(potion).unwrap();

        let used = inv.consume(&id).unwrap();
        assert_eq!(used.restore.health, 25);
        assert_eq!(inv.count(), 0);
    }

    #[test]
    fn test_gold() {
        let mut inv = Inventory::default();
        inv.add_gold(50);
        assert!(!inv.spend_gold(60));
        assert!(inv.spend_gold(20));
        assert_eq!(inv.gold(), 30);
    }
}
