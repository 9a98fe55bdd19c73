//! Loot lifecycle states

use std::fmt;

/// Where a dropped item is in its life.
///
/// `Falling → Landed → (Idle | Attracting) → Collected`, or `Expired` from
/// any non-terminal state. Terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LootState {
    /// Dynamic body in the air
    Falling,
    /// Touched ground, stabilization in progress
    Landed,
    /// Frozen on the ground, spinning and bobbing
    Idle,
    /// Homing toward a player
    Attracting,
    Collected,
    Expired,
}

impl LootState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LootState::Collected | LootState::Expired)
    }

    /// States from which homing may start
    pub fn can_attract(&self) -> bool {
        matches!(self, LootState::Landed | LootState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LootState::Falling => "falling",
            LootState::Landed => "landed",
            LootState::Idle => "idle",
            LootState::Attracting => "attracting",
            LootState::Collected => "collected",
            LootState::Expired => "expired",
        }
    }
}

impl fmt::Display for LootState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
