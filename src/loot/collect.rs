//! Collection transaction
//!
//! Moves the item out of a loot entity and into an inventory. The pre-check
//! and the insert happen in one call, so nothing can change the inventory
//! between them.

use thiserror::Error;

use super::entity::LootEntity;
use crate::events::{EconomyEvent, EventBus, Notification, Severity};
use crate::items::{Item, ItemStore, ItemSummary};
use crate::world::PlayerId;

/// Why a pickup did not happen
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("inventory full ({capacity} slots)")]
    InventoryFull { capacity: usize },
    #[error("inventory refused the item")]
    InsertFailed,
    #[error("item is malformed")]
    InvalidItem,
    #[error("loot already collected or expired")]
    Terminal,
    #[error("no inventory for {0}")]
    NoInventory(PlayerId),
}

/// Proof of a completed pickup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectReceipt {
    pub player: PlayerId,
    pub item: ItemSummary,
}

/// Free slot, or a same-kind stack with room left
fn has_room(store: &dyn ItemStore, item: &Item) -> bool {
    store.has_space()
        || (item.is_stackable() && store.find_stack_for(item).is_some_and(|stack| stack.free_space() > 0))
}

fn announce_full(bus: &EventBus, player: PlayerId, capacity: usize, item: ItemSummary) {
    bus.publish(EconomyEvent::InventoryFull { player, capacity, item });
    bus.publish(Notification::new("Inventory full!", Severity::Warning).with_duration(2.0));
}

/// Transfer the entity's item into `store`.
///
/// On rejection the entity keeps its item and drops back to idle. On success
/// it becomes Collected and schedules its own removal.
pub fn collect(
    loot: &mut LootEntity,
    player: PlayerId,
    store: &mut dyn ItemStore,
    bus: &EventBus,
) -> Result<CollectReceipt, Rejection> {
    if loot.is_picked_up() || loot.state().is_terminal() {
        return Err(Rejection::Terminal);
    }
    let Some(item) = loot.item() else {
        return Err(Rejection::Terminal);
    };

    let summary = item.summary();
    if !item.is_valid() {
        log::warn!("{} cannot pick up {}: item is malformed", player, summary.name);
        loot.reject_pickup();
        return Err(Rejection::InvalidItem);
    }

    let capacity = store.capacity();
    if !has_room(store, item) {
        log::warn!("{} cannot pick up {}: inventory full", player, summary.name);
        announce_full(bus, player, capacity, summary);
        loot.reject_pickup();
        return Err(Rejection::InventoryFull { capacity });
    }

    let Some(item) = loot.begin_pickup() else {
        return Err(Rejection::Terminal);
    };
    let color = item.rarity.color();

    match store.add_item(item) {
        Ok(()) => {
            loot.complete_pickup();
            log::info!("{} picked up {}", player, summary.name);
            bus.publish(EconomyEvent::ItemCollected { player, item: summary.clone() });
            let label = if summary.stack > 1 {
                format!("Picked up {} x{}", summary.name, summary.stack)
            } else {
                format!("Picked up {}", summary.name)
            };
            bus.publish(
                Notification::new(label, Severity::Success)
                    .with_duration(2.0)
                    .with_color(color),
            );
            Ok(CollectReceipt { player, item: summary })
        }
        Err(item) => {
            log::warn!("{} refused {} after the capacity check passed", player, summary.name);
            loot.rollback_pickup(item);
            announce_full(bus, player, capacity, summary);
            Err(Rejection::InsertFailed)
        }
    }
}
