//! Per-frame simulation step
//!
//! `tick` advances one variable timestep: cosmetic timers decay in every
//! phase, but entity updates and combat run only while Playing. The combat
//! resolver passes run in a fixed order after movement:
//! enemy fire, player bullets vs enemies, bouncy balls vs enemies, enemy
//! bullets vs player, off-screen cleanup, wave-clear check.

use glam::Vec2;
use rand::Rng;

use super::chain::{bolt_from_segments, chain_strike};
use super::rect::Rect;
use super::state::{Ability, Bullet, Phase, Session};
use super::upgrades::offer_three;
use crate::consts::*;

/// Intents for a single frame. Everything the core accepts from the outside.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Horizontal movement axis: -1, 0, or +1
    pub move_axis: f32,
    /// Fire trigger
    pub fire: bool,
    /// Upgrade pick (0-based); only meaningful while choosing
    pub select_upgrade: Option<usize>,
    /// Restart request; only meaningful after game over
    pub restart: bool,
}

/// Advance the session by one frame
pub fn tick(state: &mut Session, input: &FrameInput, dt: f32) {
    decay_effects(state, dt);

    match state.phase {
        Phase::GameOver => {
            if input.restart {
                restart(state);
            }
            return;
        }
        Phase::ChoosingUpgrade => {
            if let Some(index) = input.select_upgrade {
                apply_upgrade(state, index);
            }
            return;
        }
        Phase::Playing => {}
    }

    state.elapsed += f64::from(dt);
    let now = state.elapsed;
    let bounds = state.play_area();

    // Movement and firing
    state.player.advance(input.move_axis, dt, &bounds);
    if input.fire {
        let shots = state.player.shoot(now);
        state.player_bullets.extend(shots);
    }
    state.spawn_bouncy_ball_if_needed();

    for enemy in &mut state.enemies {
        enemy.advance(dt, &bounds);
    }
    for bullet in &mut state.player_bullets {
        bullet.advance(dt);
    }
    for bullet in &mut state.enemy_bullets {
        bullet.advance(dt);
    }
    for ball in &mut state.bouncy_balls {
        ball.advance(dt, &bounds);
    }
    state.bouncy_balls.retain(|b| b.lifetime > 0.0);

    // Combat resolution, fixed order
    resolve_enemy_fire(state, now);
    resolve_player_bullets(state);
    resolve_bouncy_balls(state);
    resolve_enemy_bullets(state);
    discard_offscreen(state, &bounds);
    check_wave_clear(state);
}

/// Cosmetic countdowns run in every phase; they never touch gameplay
fn decay_effects(state: &mut Session, dt: f32) {
    state.damage_flash = (state.damage_flash - dt).max(0.0);
    for bolt in &mut state.lightning {
        bolt.timer -= dt;
    }
    state.lightning.retain(|b| b.timer > 0.0);
}

/// Rebuild the session wholesale. The fresh seed comes from the old RNG so
/// seeded runs stay reproducible across restarts.
fn restart(state: &mut Session) {
    let seed = state.rng.random();
    log::info!("Restarting after defeat on wave {}", state.wave);
    *state = Session::new(state.config.clone(), seed);
}

/// Apply the picked upgrade and resume play at the pending wave. An index
/// outside the offered range is ignored.
fn apply_upgrade(state: &mut Session, index: usize) {
    let Some(&upgrade) = state.offered_upgrades.get(index) else {
        return;
    };
    upgrade.apply(&mut state.player);
    log::info!("Upgrade applied: {}", upgrade.name());
    state.offered_upgrades.clear();
    state.phase = Phase::Playing;
    let wave = state.pending_wave.take().unwrap_or(state.wave);
    state.spawn_wave(wave);
    state.spawn_bouncy_ball_if_needed();
}

/// Each enemy whose cooldown has elapsed rolls an independent fire gate.
/// The cooldown clock only restarts on an actual shot, so fire timing stays
/// staggered across the wave.
fn resolve_enemy_fire(state: &mut Session, now: f64) {
    let Session {
        enemies,
        enemy_bullets,
        rng,
        ..
    } = state;
    for enemy in enemies.iter_mut() {
        if now - enemy.last_shot_time < f64::from(enemy.shoot_cooldown) {
            continue;
        }
        if !rng.random_bool(ENEMY_FIRE_CHANCE) {
            continue;
        }
        enemy.last_shot_time = now;
        enemy_bullets.push(Bullet::new(
            enemy.rect.bottom_center(),
            Vec2::new(0.0, enemy.bullet_speed),
            enemy.bullet_damage,
            Some(enemy.id),
        ));
    }
}

/// Damage every enemy overlapping `rect` (co-located enemies all take the
/// hit), remove the dead, and run chain lightning seeded from the first hit.
/// Returns whether anything was hit.
fn strike_enemies(state: &mut Session, rect: &Rect, damage: f32) -> bool {
    let hits: Vec<(u32, Vec2)> = state
        .enemies
        .iter()
        .filter(|e| e.rect.overlaps(rect))
        .map(|e| (e.id, e.rect.center()))
        .collect();
    let Some(&(seed_id, seed_pos)) = hits.first() else {
        return false;
    };

    for &(id, _) in &hits {
        if let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) {
            enemy.health -= damage;
        }
    }
    state.enemies.retain(|e| e.health > 0.0);

    if state.player.abilities.has(Ability::ChainLightning) {
        let segments = chain_strike(
            seed_id,
            seed_pos,
            &mut state.enemies,
            damage * 0.5,
            CHAIN_MAX_HOPS,
        );
        if !segments.is_empty() {
            let bolt = bolt_from_segments(&segments, &mut state.rng);
            state.lightning.push(bolt);
        }
    }
    true
}

/// Player bullets are single-use: removed on any contact, kept otherwise
fn resolve_player_bullets(state: &mut Session) {
    let mut i = 0;
    while i < state.player_bullets.len() {
        let rect = state.player_bullets[i].rect;
        let damage = state.player_bullets[i].damage;
        if strike_enemies(state, &rect, damage) {
            state.player_bullets.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Bouncy balls hit like bullets but spend a collision charge instead of
/// despawning
fn resolve_bouncy_balls(state: &mut Session) {
    let mut i = 0;
    while i < state.bouncy_balls.len() {
        let rect = state.bouncy_balls[i].rect;
        let damage = state.bouncy_balls[i].damage;
        if !strike_enemies(state, &rect, damage) {
            i += 1;
            continue;
        }
        if state.bouncy_balls[i].on_collision() {
            i += 1;
        } else {
            state.bouncy_balls.remove(i);
        }
    }
}

fn resolve_enemy_bullets(state: &mut Session) {
    let mut i = 0;
    while i < state.enemy_bullets.len() {
        if !state.enemy_bullets[i].rect.overlaps(&state.player.rect) {
            i += 1;
            continue;
        }
        let bullet = state.enemy_bullets.remove(i);
        state.player.health = (state.player.health - bullet.damage).max(0.0);
        state.damage_flash = DAMAGE_FLASH_DURATION;

        // Thorns payback: the shooter dies too, if still alive
        if state.player.abilities.has(Ability::Thorns) {
            if let Some(owner) = bullet.owner {
                state.enemies.retain(|e| e.id != owner);
            }
        }

        if state.player.health <= 0.0 {
            log::info!("Player defeated on wave {}", state.wave);
            state.phase = Phase::GameOver;
        }
    }
}

/// Bullets fully past their exit edge are discarded without effect
fn discard_offscreen(state: &mut Session, bounds: &Rect) {
    state.player_bullets.retain(|b| b.rect.bottom() >= 0.0);
    state
        .enemy_bullets
        .retain(|b| b.rect.top() <= bounds.bottom());
}

/// An emptied roster advances the wave. Every second wave the session pauses
/// for an upgrade pick; otherwise the next wave spawns immediately.
fn check_wave_clear(state: &mut Session) {
    if state.phase != Phase::Playing || !state.enemies.is_empty() {
        return;
    }
    state.wave += 1;
    if state.wave > 1 && (state.wave - 1) % 2 == 0 {
        state.offered_upgrades = offer_three(&mut state.rng);
        state.pending_wave = Some(state.wave);
        state.phase = Phase::ChoosingUpgrade;
        log::info!(
            "Wave cleared; offering {:?} before wave {}",
            state.offered_upgrades,
            state.wave
        );
    } else {
        log::info!("Wave cleared; advancing to wave {}", state.wave);
        state.spawn_wave(state.wave);
    }
}
