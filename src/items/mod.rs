//! Item system

pub mod catalog;
pub mod consumable;
pub mod inventory;
pub mod item;
pub mod loot;

pub use catalog::{CatalogError, ItemCatalog, ItemTemplate};
pub use consumable::{Consumable, Consumption};
pub use inventory::{Inventory, ItemStore};
pub use item::{
    AttributeModifiers, CombatStats, Item, ItemCategory, ItemEffect, ItemId, ItemKind, ItemSummary,
    ItemType, PlayerStats, Quality, Rarity, Requirements, Restoration, StackTransfer,
};
pub use loot::{DropRollProvider, GoldRange, TableDropRoller};
