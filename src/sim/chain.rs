//! Chained-damage propagation ("chain lightning")
//!
//! The strike itself is pure geometry and damage: it walks the nearest
//! remaining enemies and returns the hop segments. The jittered polylines for
//! the visual bolt are built separately so rendering never feeds back into
//! gameplay.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, LightningBolt};
use crate::consts::LIGHTNING_DURATION;

/// Hop damage through up to `max_hops` enemies, starting from the seed's
/// position and always jumping to the nearest enemy not yet struck (ties go to
/// the first in iteration order). The seed itself is never a target. Enemies
/// whose health drops to zero are removed from `enemies` immediately.
///
/// Returns the ordered hop segments; they carry no further gameplay meaning.
pub fn chain_strike(
    seed_id: u32,
    seed_pos: Vec2,
    enemies: &mut Vec<Enemy>,
    damage: f32,
    max_hops: usize,
) -> Vec<(Vec2, Vec2)> {
    let mut candidates: Vec<u32> = enemies
        .iter()
        .filter(|e| e.id != seed_id)
        .map(|e| e.id)
        .collect();
    let mut current = seed_pos;
    let mut segments = Vec::new();

    for _ in 0..max_hops {
        if candidates.is_empty() {
            break;
        }
        let mut nearest: Option<(usize, f32)> = None;
        for (slot, &id) in candidates.iter().enumerate() {
            let Some(enemy) = enemies.iter().find(|e| e.id == id) else {
                continue;
            };
            let dist = enemy.rect.center().distance_squared(current);
            if nearest.is_none_or(|(_, best)| dist < best) {
                nearest = Some((slot, dist));
            }
        }
        let Some((slot, _)) = nearest else { break };
        let id = candidates.remove(slot);

        let Some(index) = enemies.iter().position(|e| e.id == id) else {
            break;
        };
        enemies[index].health -= damage;
        let target = enemies[index].rect.center();
        segments.push((current, target));
        current = target;
        if enemies[index].health <= 0.0 {
            enemies.remove(index);
        }
    }
    segments
}

/// Break a straight segment into a jagged polyline with random perpendicular
/// offsets. Endpoints are preserved.
pub fn jittered_polyline(start: Vec2, end: Vec2, rng: &mut impl Rng) -> Vec<Vec2> {
    let delta = end - start;
    let length = delta.length();
    if length == 0.0 {
        return vec![start, end];
    }
    let direction = delta / length;
    let perpendicular = Vec2::new(-direction.y, direction.x);
    let segments = ((length / 35.0) as usize).max(2);

    let mut points = Vec::with_capacity(segments + 1);
    points.push(start);
    for i in 1..segments {
        let t = i as f32 / segments as f32;
        let offset = perpendicular * rng.random_range(-10.0..10.0);
        points.push(start + direction * (length * t) + offset);
    }
    points.push(end);
    points
}

/// Build the transient visual for one strike
pub fn bolt_from_segments(segments: &[(Vec2, Vec2)], rng: &mut impl Rng) -> LightningBolt {
    LightningBolt {
        timer: LIGHTNING_DURATION,
        polylines: segments
            .iter()
            .map(|&(start, end)| jittered_polyline(start, end, rng))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ENEMY_HEIGHT, ENEMY_WIDTH};
    use crate::sim::rect::Rect;
    use crate::sim::state::EnemyShape;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy(id: u32, x: f32, health: f32) -> Enemy {
        Enemy {
            id,
            rect: Rect::from_center(Vec2::new(x, 100.0), ENEMY_WIDTH, ENEMY_HEIGHT),
            direction: 1.0,
            speed: 120.0,
            health,
            shoot_cooldown: 1.5,
            last_shot_time: 0.0,
            bullet_speed: 360.0,
            bullet_damage: 1.0,
            shape: EnemyShape::Slab,
        }
    }

    #[test]
    fn test_hops_in_nearest_order() {
        // Seed at x=0; targets at 300, 100, 200 -> expect 100, 200, 300
        let mut enemies = vec![
            enemy(1, 300.0, 10.0),
            enemy(2, 100.0, 10.0),
            enemy(3, 200.0, 10.0),
        ];
        let segments = chain_strike(0, Vec2::new(0.0, 100.0), &mut enemies, 1.0, 4);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].1.x, 100.0);
        assert_eq!(segments[1].1.x, 200.0);
        assert_eq!(segments[2].1.x, 300.0);
        // Each hop starts where the previous one ended
        assert_eq!(segments[1].0, segments[0].1);
        assert_eq!(segments[2].0, segments[1].1);
    }

    #[test]
    fn test_max_hops_and_single_visit() {
        let mut enemies: Vec<Enemy> =
            (0..8).map(|i| enemy(i + 1, 100.0 + i as f32 * 60.0, 10.0)).collect();
        let segments = chain_strike(99, Vec2::new(0.0, 100.0), &mut enemies, 1.0, 4);
        assert_eq!(segments.len(), 4);
        // Exactly four distinct enemies lost health
        let struck = enemies.iter().filter(|e| e.health < 10.0).count();
        assert_eq!(struck, 4);
        assert!(enemies.iter().all(|e| e.health >= 9.0));
    }

    #[test]
    fn test_seed_is_excluded() {
        let mut enemies = vec![enemy(1, 50.0, 10.0)];
        let segments = chain_strike(1, Vec2::new(50.0, 100.0), &mut enemies, 1.0, 4);
        assert!(segments.is_empty());
        assert_eq!(enemies[0].health, 10.0);
    }

    #[test]
    fn test_lethal_hops_remove_enemies() {
        let mut enemies = vec![enemy(1, 100.0, 0.5), enemy(2, 200.0, 10.0)];
        let segments = chain_strike(0, Vec2::ZERO, &mut enemies, 1.0, 4);
        assert_eq!(segments.len(), 2);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, 2);
        assert_eq!(enemies[0].health, 9.0);
    }

    #[test]
    fn test_no_candidates_no_segments() {
        let mut enemies = Vec::new();
        let segments = chain_strike(0, Vec2::ZERO, &mut enemies, 1.0, 4);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_polyline_preserves_endpoints() {
        let mut rng = Pcg32::seed_from_u64(5);
        let start = Vec2::new(10.0, 20.0);
        let end = Vec2::new(310.0, 20.0);
        let points = jittered_polyline(start, end, &mut rng);
        assert!(points.len() >= 3);
        assert_eq!(points[0], start);
        assert_eq!(*points.last().unwrap(), end);
    }

    #[test]
    fn test_bolt_lifetime() {
        let mut rng = Pcg32::seed_from_u64(5);
        let segments = [(Vec2::ZERO, Vec2::new(100.0, 0.0))];
        let bolt = bolt_from_segments(&segments, &mut rng);
        assert_eq!(bolt.polylines.len(), 1);
        assert!((bolt.intensity() - 1.0).abs() < 1e-6);
    }
}
