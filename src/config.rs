//! Game tuning parameters
//!
//! Every field has a documented default; a JSON override file only needs the
//! keys it changes. A missing or unreadable file falls back entirely to the
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Window and frame pacing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 720.0,
            fps: 60,
        }
    }
}

/// Player base stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal movement speed (px/s)
    pub speed: f32,
    /// Seconds between shots
    pub shoot_cooldown: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    /// Bullets per shot
    pub bullet_count: u32,
    pub max_health: f32,
    /// Distance from the bottom screen edge to the player's bottom edge
    pub bottom_margin: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 360.0,
            shoot_cooldown: 0.25,
            bullet_speed: 900.0,
            bullet_damage: 1.0,
            bullet_count: 1,
            max_health: 5.0,
            bottom_margin: 32.0,
        }
    }
}

/// Enemy base stats and formation layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub rows: u32,
    pub cols: u32,
    pub horizontal_speed: f32,
    pub shoot_cooldown: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    /// Grid spacing between formation slots
    pub spacing: f32,
    /// Y of the first formation row
    pub start_y: f32,
    /// Horizontal inset of the formation from the screen edges
    pub padding: f32,
    pub base_health: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 6,
            horizontal_speed: 120.0,
            shoot_cooldown: 1.5,
            bullet_speed: 360.0,
            bullet_damage: 1.0,
            spacing: 96.0,
            start_y: 90.0,
            padding: 60.0,
            base_health: 2.0,
        }
    }
}

/// Per-wave difficulty scaling factors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub speed_scaling: f32,
    pub health_scaling: f32,
    pub count_scaling: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            speed_scaling: 0.12,
            health_scaling: 0.6,
            count_scaling: 0.12,
        }
    }
}

/// Complete tuning bundle consumed by the simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub wave: WaveConfig,
}

impl Config {
    /// Load config from a JSON file, merging overrides over the defaults.
    ///
    /// Unknown keys are ignored; absent keys keep their defaults. If the file
    /// is missing or malformed the defaults are used wholesale.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config overrides from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "Ignoring malformed config {}: {err}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
