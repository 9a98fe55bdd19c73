//! Lootfall - loot and item economy core
//!
//! Items and their value math, dropped loot simulated from spawn to pickup,
//! and the pipeline that turns enemy deaths into rewards.

pub mod config;
pub mod events;
pub mod items;
pub mod loot;
pub mod progression;
pub mod world;

// Re-export commonly used types
pub use config::{ConfigError, DropConfig, GameConfig, LootConfig};
pub use events::{EventBus, GameEvent, Topic};
pub use items::{Inventory, Item, ItemCatalog, ItemStore, Rarity, TableDropRoller};
pub use loot::{DropPipeline, EnemyDeath, LootEntity, LootField, LootState};
pub use progression::{Adventurer, Looter, LooterDirectory};
pub use world::{PlayerDirectory, PlayerId, PlayerRoster};
