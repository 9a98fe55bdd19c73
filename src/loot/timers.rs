//! Countdown timers
//!
//! Timed sub-routines are plain countdown fields, advanced once per tick by
//! the owning entity. Nothing runs on its own.

/// Seconds left until something happens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds.max(0.0) }
    }

    /// Fires on the next tick
    pub fn immediate() -> Self {
        Self::new(0.0)
    }

    /// Advance by `dt`; true once the countdown has run out
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}

/// Advance an optional countdown. When it fires it is cleared and `true` is
/// returned; an empty slot never fires.
pub fn fire(slot: &mut Option<Countdown>, dt: f32) -> bool {
    let fired = slot.as_mut().is_some_and(|countdown| countdown.tick(dt));
    if fired {
        *slot = None;
    }
    fired
}

/// Two-step wait after landing: grace, probe, settle, freeze
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stabilization {
    Grace(Countdown),
    Settle(Countdown),
}

/// Repeated post-spawn terrain checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundingGuard {
    pub countdown: Countdown,
    pub interval: f32,
    pub checks_left: u32,
}

/// Every pending sub-routine of a loot entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LootTimers {
    pub stabilization: Option<Stabilization>,
    /// Distance-based early despawn re-check
    pub despawn_check: Option<Countdown>,
    pub auto_pickup: Option<Countdown>,
    /// Settle-then-destroy after a pickup
    pub destroy: Option<Countdown>,
    pub grounding_guard: Option<GroundingGuard>,
    /// Next player cache refresh
    pub player_refresh: Option<Countdown>,
    /// Homing is blocked until this runs out
    pub reattract: Option<Countdown>,
}

impl LootTimers {
    /// Drop every pending sub-routine
    pub fn cancel_all(&mut self) {
        *self = Self::default();
    }

    /// Number of armed sub-routines
    pub fn pending(&self) -> usize {
        [
            self.stabilization.is_some(),
            self.despawn_check.is_some(),
            self.auto_pickup.is_some(),
            self.destroy.is_some(),
            self.grounding_guard.is_some(),
            self.player_refresh.is_some(),
            self.reattract.is_some(),
        ]
        .iter()
        .filter(|armed| **armed)
        .count()
    }
}
