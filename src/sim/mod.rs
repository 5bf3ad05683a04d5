//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Frame-stepped only, no background work
//! - Seeded RNG only
//! - Stable iteration order (insertion order, order-preserving removal)
//! - No rendering or platform dependencies

pub mod chain;
pub mod rect;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod wave;

pub use chain::{bolt_from_segments, chain_strike, jittered_polyline};
pub use rect::Rect;
pub use state::{
    Ability, AbilitySet, BouncyBall, Bullet, Enemy, EnemyShape, LightningBolt, Phase, Player,
    Session,
};
pub use tick::{FrameInput, tick};
pub use upgrades::{CATALOG, Upgrade, offer_three};
pub use wave::{enemy_count, generate_wave};
