//! Barrage - a wave-based arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, collisions, state machine)
//! - `config`: Data-driven tuning with defaults and file overrides
//!
//! The crate is headless: input arrives as per-frame intents (`sim::FrameInput`)
//! and a renderer reads the public `sim::Session` state. No windowing, drawing,
//! or audio lives here.

pub mod config;
pub mod sim;

pub use config::Config;
pub use sim::{FrameInput, Phase, Session, tick};

/// Fixed gameplay constants (everything else is tunable via [`Config`])
pub mod consts {
    /// Player hull size in pixels
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 28.0;

    /// Enemy hull size (identical for every cosmetic shape)
    pub const ENEMY_WIDTH: f32 = 50.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;

    /// Bullet size (both player and enemy bullets)
    pub const BULLET_WIDTH: f32 = 6.0;
    pub const BULLET_HEIGHT: f32 = 18.0;

    /// Horizontal gap between bullets of a multi-shot fan
    pub const SHOT_SPREAD: f32 = 16.0;
    /// Horizontal speed factor for split-shot diagonals
    pub const SPLIT_SHOT_FACTOR: f32 = 0.75;
    /// Shoot cooldown can never drop below this
    pub const MIN_SHOOT_COOLDOWN: f32 = 0.05;
    /// Maximum bullets per shot
    pub const BULLET_COUNT_CAP: u32 = 6;

    /// Enemies flip patrol direction this close to a screen edge
    pub const EDGE_TURN_MARGIN: f32 = 20.0;
    /// Per-tick Bernoulli gate once an enemy's cooldown has elapsed.
    /// Staggers volleys without a per-enemy desync timer.
    pub const ENEMY_FIRE_CHANCE: f64 = 0.25;

    /// Bouncy ball diameter
    pub const BOUNCY_BALL_SIZE: f32 = 36.0;
    /// Seconds before a bouncy ball expires
    pub const BOUNCY_BALL_LIFETIME: f32 = 6.0;
    /// Enemy contacts a bouncy ball survives
    pub const BOUNCY_BALL_COLLISIONS: u32 = 10;

    /// Maximum enemies a chain lightning strike can hop to
    pub const CHAIN_MAX_HOPS: usize = 4;
    /// Seconds a lightning bolt stays on screen
    pub const LIGHTNING_DURATION: f32 = 0.25;
    /// Seconds the damage flash overlay lasts
    pub const DAMAGE_FLASH_DURATION: f32 = 0.25;
}
