//! Progression systems

pub mod adventurer;
pub mod xp;

pub use adventurer::{Adventurer, Looter, LooterDirectory};
pub use xp::{level_title, xp_for_level, xp_reward_for, Experience};
