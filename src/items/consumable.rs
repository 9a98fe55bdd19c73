//! Consumable capability
//!
//! Typed contract for items that can be used up, resolved at compile time.

use super::item::{Item, ItemCategory, ItemEffect, Restoration};

/// What using one unit of a consumable produced
#[derive(Debug, Clone, PartialEq)]
pub struct Consumption {
    pub restore: Restoration,
    pub effects: Vec<ItemEffect>,
    /// Units left in the stack afterwards
    pub remaining: u32,
}

/// Items that can be used up one unit at a time
pub trait Consumable {
    /// Check if this item can be consumed right now
    fn can_consume(&self) -> bool;

    /// Use one unit. Returns `None` if the item is not consumable.
    fn consume_one(&mut self) -> Option<Consumption>;
}

impl Consumable for Item {
    fn can_consume(&self) -> bool {
        self.category() == ItemCategory::Consumable && self.current_stack > 0
    }

    fn consume_one(&mut self) -> Option<Consumption> {
        if !self.can_consume() {
            return None;
        }

        self.current_stack -= 1;
        Some(Consumption {
            restore: self.restore,
            effects: self.effects.clone(),
            remaining: self.current_stack,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::ItemType;

    #[test]
    fn test_consume_one() {
        let mut potion = Item::new("hp", "Health Potion", ItemType::Consumable, 1).with_stack(5, 2);
        potion.restore.health = 30;

        let used = potion.consume_one().unwrap();
        assert_eq!(used.restore.health, 30);
        assert_eq!(used.remaining, 1);
        assert_eq!(potion.current_stack, 1);
    }

    #[test]
    fn test_non_consumable() {
        let mut sword = Item::new("sword", "Sword", ItemType::Weapon, 1);
        assert!(!sword.can_consume());
        assert!(sword.consume_one().is_none());
        assert_eq!(sword.current_stack, 1);
    }
}
