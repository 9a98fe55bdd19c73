//! Tunables
//!
//! Every distance, speed and timer the loot simulation uses. Loaded from a
//! RON file with hardcoded defaults as the fallback; missing fields take
//! their default value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("must be positive, got {}", value) })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("must not be negative, got {}", value) })
    }
}

fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("must be within [0, 1], got {}", value) })
    }
}

/// Per-entity loot tunables. Distances in world units, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Direct-contact pickup radius
    pub pickup_distance: f32,
    /// Distance at which a resting item starts homing
    pub magnet_distance: f32,
    pub attract_speed: f32,
    /// Homing targets this far above the player's feet
    pub attract_height_offset: f32,
    /// Scale homing speed with distance
    pub smart_attraction: bool,
    /// Homing ends in a pickup within this distance of the target point
    pub homing_completion_distance: f32,
    /// Seconds before an uncollected item expires
    pub lifetime: f32,
    /// Fraction of the lifetime after which fading starts
    pub fade_start_fraction: f32,
    /// Player farther than this triggers the early-despawn check
    pub despawn_distance: f32,
    pub despawn_recheck_delay: f32,
    /// Cached player position refresh interval
    pub player_refresh_interval: f32,
    /// Fallback search for a new player when none is tracked
    pub player_reacquire_interval: f32,
    pub stabilize_grace: f32,
    pub stabilize_settle: f32,
    /// Grounding probe starts this far above the item
    pub probe_height: f32,
    pub probe_distance: f32,
    /// Sinking deeper than this below rest height gets corrected
    pub penetration_tolerance: f32,
    /// Resting items float this far above the surface
    pub rest_height: f32,
    /// Delay between a pickup and removal of the entity
    pub collect_settle_delay: f32,
    pub auto_pickup: bool,
    pub auto_pickup_delay: f32,
    /// Wait after a rejected pickup before homing again
    pub reattract_cooldown: f32,
    /// Bounce factor against other dynamic bodies
    pub restitution: f32,
    pub gravity: f32,
    /// Linear velocity lost per second while falling
    pub drag: f32,
    pub angular_damping: f32,
    /// Idle spin in radians per second
    pub rotate_speed: f32,
    pub bob_height: f32,
    pub bob_speed: f32,
    pub pulse_amount: f32,
    pub pulse_speed: f32,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            pickup_distance: 1.0,
            magnet_distance: 4.0,
            attract_speed: 8.0,
            attract_height_offset: 1.0,
            smart_attraction: true,
            homing_completion_distance: 0.35,
            lifetime: 300.0,
            fade_start_fraction: 0.8,
            despawn_distance: 60.0,
            despawn_recheck_delay: 5.0,
            player_refresh_interval: 0.25,
            player_reacquire_interval: 2.0,
            stabilize_grace: 0.15,
            stabilize_settle: 0.1,
            probe_height: 1.0,
            probe_distance: 3.0,
            penetration_tolerance: 0.02,
            rest_height: 0.25,
            collect_settle_delay: 0.3,
            auto_pickup: false,
            auto_pickup_delay: 1.0,
            reattract_cooldown: 1.5,
            restitution: 0.4,
            gravity: 9.81,
            drag: 0.4,
            angular_damping: 0.5,
            rotate_speed: std::f32::consts::FRAC_PI_2,
            bob_height: 0.1,
            bob_speed: 2.0,
            pulse_amount: 0.05,
            pulse_speed: 3.0,
        }
    }
}

impl LootConfig {
    /// Distance beyond which homing gives up
    pub fn abort_distance(&self) -> f32 {
        self.magnet_distance * 1.5
    }

    /// Seconds after spawn at which fading starts
    pub fn fade_start(&self) -> f32 {
        self.lifetime * self.fade_start_fraction
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("pickup_distance", self.pickup_distance)?;
        positive("magnet_distance", self.magnet_distance)?;
        positive("attract_speed", self.attract_speed)?;
        positive("homing_completion_distance", self.homing_completion_distance)?;
        positive("lifetime", self.lifetime)?;
        fraction("fade_start_fraction", self.fade_start_fraction)?;
        positive("despawn_distance", self.despawn_distance)?;
        positive("player_refresh_interval", self.player_refresh_interval)?;
        positive("player_reacquire_interval", self.player_reacquire_interval)?;
        positive("probe_distance", self.probe_distance)?;
        non_negative("despawn_recheck_delay", self.despawn_recheck_delay)?;
        non_negative("stabilize_grace", self.stabilize_grace)?;
        non_negative("stabilize_settle", self.stabilize_settle)?;
        non_negative("probe_height", self.probe_height)?;
        non_negative("penetration_tolerance", self.penetration_tolerance)?;
        non_negative("rest_height", self.rest_height)?;
        non_negative("collect_settle_delay", self.collect_settle_delay)?;
        non_negative("auto_pickup_delay", self.auto_pickup_delay)?;
        non_negative("reattract_cooldown", self.reattract_cooldown)?;
        non_negative("gravity", self.gravity)?;
        non_negative("drag", self.drag)?;
        non_negative("angular_damping", self.angular_damping)?;
        fraction("restitution", self.restitution)?;

        if self.homing_completion_distance >= self.magnet_distance {
            return Err(ConfigError::Invalid {
                field: "homing_completion_distance",
                reason: "must be smaller than magnet_distance".to_string(),
            });
        }
        Ok(())
    }
}

/// Drop pipeline tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Max horizontal offset from the death position, per axis
    pub jitter: f32,
    /// Spawn height above the death position
    pub vertical_offset: f32,
    /// Full impulse magnitude before reduction
    pub impulse: f32,
    /// Multiplier applied to the impulse to limit scatter
    pub impulse_reduction: f32,
    /// Minimum upward share of the impulse direction
    pub upward_bias: f32,
    /// Max angular velocity per axis, radians per second
    pub torque: f32,
    /// Delay before each grounding guard check
    pub grounding_check_delay: f32,
    pub grounding_check_count: u32,
    /// Enemy names containing any of these (case-insensitive) are bosses
    pub boss_keywords: Vec<String>,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            jitter: 0.5,
            vertical_offset: 0.5,
            impulse: 4.0,
            impulse_reduction: 0.5,
            upward_bias: 0.6,
            torque: 3.0,
            grounding_check_delay: 0.5,
            grounding_check_count: 3,
            boss_keywords: vec!["boss".to_string()],
            seed: None,
        }
    }
}

impl DropConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("jitter", self.jitter)?;
        non_negative("vertical_offset", self.vertical_offset)?;
        non_negative("impulse", self.impulse)?;
        fraction("impulse_reduction", self.impulse_reduction)?;
        fraction("upward_bias", self.upward_bias)?;
        non_negative("torque", self.torque)?;
        positive("grounding_check_delay", self.grounding_check_delay)?;
        Ok(())
    }

    /// Naming heuristic for bosses
    pub fn is_boss_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.boss_keywords
            .iter()
            .any(|k| !k.is_empty() && name.contains(&k.to_lowercase()))
    }
}

/// All tunables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub loot: LootConfig,
    pub drop: DropConfig,
}

impl GameConfig {
    /// Per-user config file location
    pub fn user_path() -> Option<PathBuf> {
        use directories::ProjectDirs;

        ProjectDirs::from("com", "lootfall", "Lootfall").map(|dirs| dirs.config_dir().join("config.ron"))
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Load from a file, falling back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to load config: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.loot.validate()?;
        self.drop.validate()
    }
}
