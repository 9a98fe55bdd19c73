//! Dropped loot
//!
//! The per-item state machine, the transaction that hands an item to an
//! inventory, the field that simulates every drop in a scene, and the
//! pipeline that fills it when enemies die.

pub mod collect;
pub mod entity;
pub mod field;
pub mod pipeline;
pub mod state;
pub mod timers;
pub mod visual;

pub use collect::{collect, CollectReceipt, Rejection};
pub use entity::{Contact, LootEntity, RigidBody, TickContext, TrackedPlayer, BODY_RADIUS};
pub use field::{FieldReport, LootField};
pub use pipeline::{DropPipeline, DropRecord, EnemyDeath};
pub use state::LootState;
pub use timers::{Countdown, LootTimers};
pub use visual::{RarityVisual, VisualState};
