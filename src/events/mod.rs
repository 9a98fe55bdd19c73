//! Event bus and typed game events

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventReceiver, GameEvent, Topic};
pub use types::{CombatEvent, EconomyEvent, Notification, PlayerEvent, Severity};
