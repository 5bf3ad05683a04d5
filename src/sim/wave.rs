//! Wave roster generation
//!
//! Builds the enemy batch for a given wave index from the configured base
//! formation and the per-wave scaling rules. Pure apart from the injected RNG
//! (used only for cosmetic shape selection).

use rand::Rng;
use rand::seq::IndexedRandom;

use super::rect::Rect;
use super::state::{Enemy, EnemyShape, SHAPE_PALETTE};
use crate::config::Config;
use crate::consts::{ENEMY_HEIGHT, ENEMY_WIDTH};

/// Enemy count for a wave: the base formation plus a scaled surplus
pub fn enemy_count(wave: u32, config: &Config) -> u32 {
    let base = config.enemy.rows * config.enemy.cols;
    let additional =
        (base as f32 * config.wave.count_scaling * (wave - 1) as f32).ceil() as u32;
    base + additional
}

/// Generate the enemy roster for `wave` (1-based), laid out row-major.
///
/// Column count grows every second wave but never exceeds what fits between
/// the horizontal paddings. Enemies past the base grid spill into extra rows.
pub fn generate_wave(
    wave: u32,
    config: &Config,
    rng: &mut impl Rng,
    next_id: &mut u32,
) -> Vec<Enemy> {
    let enemy_cfg = &config.enemy;
    let total = enemy_count(wave, config);

    let speed_multiplier = 1.0 + (wave - 1) as f32 * config.wave.speed_scaling;
    let health_multiplier = 1.0 + (wave - 1) as f32 * config.wave.health_scaling;
    let health = (enemy_cfg.base_health * health_multiplier).ceil().max(1.0);
    // Faster waves also fire more often
    let shoot_cooldown = enemy_cfg.shoot_cooldown / (0.8 + speed_multiplier * 0.2);

    let fitting_cols =
        ((config.window.width - 2.0 * enemy_cfg.padding) / enemy_cfg.spacing) as u32;
    let cols = (enemy_cfg.cols + wave / 2).min(fitting_cols).max(1);

    let mut enemies = Vec::with_capacity(total as usize);
    for idx in 0..total {
        let row = idx / cols;
        let col = idx % cols;
        let x = (enemy_cfg.padding + col as f32 * enemy_cfg.spacing)
            .clamp(enemy_cfg.padding, config.window.width - enemy_cfg.padding);
        let y = enemy_cfg.start_y + row as f32 * enemy_cfg.spacing;

        let shape = if wave >= 3 {
            SHAPE_PALETTE.choose(rng).copied().unwrap_or_default()
        } else {
            EnemyShape::default()
        };

        let id = *next_id;
        *next_id += 1;
        enemies.push(Enemy {
            id,
            rect: Rect::from_center(glam::Vec2::new(x, y), ENEMY_WIDTH, ENEMY_HEIGHT),
            direction: 1.0,
            speed: enemy_cfg.horizontal_speed * speed_multiplier,
            health,
            shoot_cooldown,
            last_shot_time: 0.0,
            bullet_speed: enemy_cfg.bullet_speed,
            bullet_damage: enemy_cfg.bullet_damage,
            shape,
        });
    }
    enemies
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn roster(wave: u32) -> Vec<Enemy> {
        let config = Config::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut next_id = 1;
        generate_wave(wave, &config, &mut rng, &mut next_id)
    }

    #[test]
    fn test_wave_one_is_base_formation() {
        let enemies = roster(1);
        assert_eq!(enemies.len(), 18);
        assert!(enemies.iter().all(|e| e.health == 2.0));
        assert!(enemies.iter().all(|e| e.speed == 120.0));
        assert!(enemies.iter().all(|e| e.shape == EnemyShape::Slab));
    }

    #[test]
    fn test_scaling_multipliers() {
        let enemies = roster(3);
        // speed: 120 * (1 + 2*0.12), health: ceil(2 * (1 + 2*0.6))
        let speed = enemies[0].speed;
        assert!((speed - 120.0 * 1.24).abs() < 1e-3);
        assert_eq!(enemies[0].health, 5.0);
        // Faster wave fires more often
        assert!(enemies[0].shoot_cooldown < 1.5);
    }

    #[test]
    fn test_unique_ids_across_waves() {
        let config = Config::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut next_id = 1;
        let first = generate_wave(1, &config, &mut rng, &mut next_id);
        let second = generate_wave(2, &config, &mut rng, &mut next_id);
        let max_first = first.iter().map(|e| e.id).max().unwrap();
        assert!(second.iter().all(|e| e.id > max_first));
    }

    #[test]
    fn test_shapes_cosmetic_only() {
        // High wave: shapes vary, stats do not
        let enemies = roster(9);
        let first = &enemies[0];
        assert!(enemies.iter().all(|e| e.health == first.health
            && e.speed == first.speed
            && e.rect.size == first.rect.size));
    }

    proptest! {
        #[test]
        fn prop_enemy_count_formula(wave in 1u32..=40) {
            let config = Config::default();
            let enemies = roster(wave);
            let base = config.enemy.rows * config.enemy.cols;
            let expected = base
                + (base as f32 * config.wave.count_scaling * (wave - 1) as f32).ceil() as u32;
            prop_assert_eq!(enemies.len() as u32, expected);
        }

        #[test]
        fn prop_enemies_within_horizontal_bounds(wave in 1u32..=40) {
            let config = Config::default();
            for enemy in roster(wave) {
                let center = enemy.rect.center().x;
                prop_assert!(center >= config.enemy.padding);
                prop_assert!(center <= config.window.width - config.enemy.padding);
            }
        }
    }
}
