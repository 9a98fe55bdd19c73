//! Event payload types.

use glam::Vec3;

use crate::items::ItemSummary;
use crate::world::PlayerId;

/// How urgent a user-facing notification is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Get display color RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Severity::Info => (200, 200, 200),
            Severity::Success => (100, 255, 100),
            Severity::Warning => (255, 200, 50),
            Severity::Error => (255, 80, 80),
        }
    }
}

/// A message meant for the player's screen
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// Seconds on screen
    pub duration: f32,
    pub color: (u8, u8, u8),
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            duration: 3.0,
            color: severity.color(),
        }
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_color(mut self, color: (u8, u8, u8)) -> Self {
        self.color = color;
        self
    }
}

/// Item and currency movements
#[derive(Debug, Clone, PartialEq)]
pub enum EconomyEvent {
    ItemCollected {
        player: PlayerId,
        item: ItemSummary,
    },
    InventoryFull {
        player: PlayerId,
        capacity: usize,
        item: ItemSummary,
    },
    LootDropped {
        source: String,
        position: Vec3,
        items: Vec<ItemSummary>,
        gold: u32,
    },
    GoldCollected {
        player: PlayerId,
        amount: u32,
        total: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    EnemyDefeated {
        name: String,
        level: u32,
        position: Vec3,
        experience: u32,
        boss: bool,
    },
}

/// Player presence changes; loot entities use these to drop cached targets
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Spawned { player: PlayerId, position: Vec3 },
    Destroyed { player: PlayerId },
    SceneTransition { scene: String },
}
