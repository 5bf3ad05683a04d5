//! Session state and core simulation types
//!
//! All gameplay state lives here: the player, the current enemy roster, the
//! three projectile collections, and the session-wide phase/wave bookkeeping.
//! Iteration order is stable (entities keep insertion order, removal preserves
//! order) so a seeded session replays identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Rect;
use super::upgrades::Upgrade;
use super::wave::generate_wave;
use crate::config::Config;
use crate::consts::*;

/// Current phase of a play-through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Active gameplay: movement, firing, and collisions run
    Playing,
    /// Between-wave upgrade pick; simulation is frozen
    ChoosingUpgrade,
    /// Terminal. Leaves only via an explicit restart.
    GameOver,
}

/// Cosmetic enemy silhouette. Never affects hitbox or stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyShape {
    #[default]
    Slab,
    Triangle,
    Disc,
    Diamond,
}

/// Shapes drawn at random from wave 3 onward
pub const SHAPE_PALETTE: [EnemyShape; 4] = [
    EnemyShape::Slab,
    EnemyShape::Triangle,
    EnemyShape::Disc,
    EnemyShape::Diamond,
];

/// Permanent player abilities granted by upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    SplitShot,
    Thorns,
    ChainLightning,
    BouncyBall,
}

/// Bitset of held abilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbilitySet(u8);

impl AbilitySet {
    fn bit(ability: Ability) -> u8 {
        match ability {
            Ability::SplitShot => 1 << 0,
            Ability::Thorns => 1 << 1,
            Ability::ChainLightning => 1 << 2,
            Ability::BouncyBall => 1 << 3,
        }
    }

    pub fn grant(&mut self, ability: Ability) {
        self.0 |= Self::bit(ability);
    }

    pub fn has(&self, ability: Ability) -> bool {
        self.0 & Self::bit(ability) != 0
    }
}

/// The player ship. Created once per session and never destroyed; reaching
/// zero health ends the session instead.
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub speed: f32,
    pub shoot_cooldown: f32,
    pub last_shot_time: f64,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub bullet_count: u32,
    pub max_health: f32,
    pub health: f32,
    pub abilities: AbilitySet,
}

impl Player {
    pub fn new(config: &Config) -> Self {
        let bottom = config.window.height - config.player.bottom_margin;
        let center = Vec2::new(config.window.width / 2.0, bottom - PLAYER_HEIGHT / 2.0);
        Self {
            rect: Rect::from_center(center, PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: config.player.speed,
            shoot_cooldown: config.player.shoot_cooldown,
            last_shot_time: 0.0,
            bullet_speed: config.player.bullet_speed,
            bullet_damage: config.player.bullet_damage,
            bullet_count: config.player.bullet_count,
            max_health: config.player.max_health,
            health: config.player.max_health,
            abilities: AbilitySet::default(),
        }
    }

    /// Move horizontally by `axis` (-1/0/+1) and clamp to the play area
    pub fn advance(&mut self, axis: f32, dt: f32, bounds: &Rect) {
        self.rect.pos.x += axis * self.speed * dt;
        self.rect.clamp_within(bounds);
    }

    /// Fire if the cooldown has elapsed. Returns the spawned bullets, fanned
    /// out horizontally, plus two diagonals when split shot is held.
    pub fn shoot(&mut self, now: f64) -> Vec<Bullet> {
        if now - self.last_shot_time < f64::from(self.shoot_cooldown) {
            return Vec::new();
        }
        self.last_shot_time = now;

        let mut bullets = Vec::with_capacity(self.bullet_count as usize + 2);
        for i in 0..self.bullet_count {
            let offset = (i as f32 - (self.bullet_count as f32 - 1.0) / 2.0) * SHOT_SPREAD;
            let pos = Vec2::new(self.rect.center().x + offset, self.rect.top());
            bullets.push(Bullet::new(
                pos,
                Vec2::new(0.0, -self.bullet_speed),
                self.bullet_damage,
                None,
            ));
        }
        if self.abilities.has(Ability::SplitShot) {
            let diag = self.bullet_speed * SPLIT_SHOT_FACTOR;
            let origin = self.rect.top_center();
            bullets.push(Bullet::new(
                origin,
                Vec2::new(-diag, -self.bullet_speed),
                self.bullet_damage,
                None,
            ));
            bullets.push(Bullet::new(
                origin,
                Vec2::new(diag, -self.bullet_speed),
                self.bullet_damage,
                None,
            ));
        }
        bullets
    }

    /// Restore a fraction of max health, capped at max
    pub fn heal_fraction(&mut self, fraction: f32) {
        self.health = (self.health + self.max_health * fraction).min(self.max_health);
    }
}

/// A wave enemy patrolling horizontally
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub rect: Rect,
    /// Patrol direction, +1 or -1
    pub direction: f32,
    pub speed: f32,
    pub health: f32,
    pub shoot_cooldown: f32,
    pub last_shot_time: f64,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub shape: EnemyShape,
}

impl Enemy {
    /// Patrol laterally, flipping direction near either screen edge.
    /// The margin keeps the flip from jittering right at the boundary.
    pub fn advance(&mut self, dt: f32, bounds: &Rect) {
        self.rect.pos.x += self.direction * self.speed * dt;
        if self.rect.left() <= bounds.left() + EDGE_TURN_MARGIN
            || self.rect.right() >= bounds.right() - EDGE_TURN_MARGIN
        {
            self.direction = -self.direction;
        }
    }
}

/// A bullet, fired by the player (moving up) or an enemy (moving down)
#[derive(Debug, Clone)]
pub struct Bullet {
    pub rect: Rect,
    pub velocity: Vec2,
    pub damage: f32,
    /// Firing enemy, for thorns retaliation. `None` for player bullets.
    pub owner: Option<u32>,
}

impl Bullet {
    pub fn new(center: Vec2, velocity: Vec2, damage: f32, owner: Option<u32>) -> Self {
        Self {
            rect: Rect::from_center(center, BULLET_WIDTH, BULLET_HEIGHT),
            velocity,
            damage,
            owner,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.rect.pos += self.velocity * dt;
    }
}

/// A persistent projectile that reflects off the play-area edges and survives
/// a limited number of enemy contacts
#[derive(Debug, Clone)]
pub struct BouncyBall {
    pub rect: Rect,
    pub velocity: Vec2,
    pub damage: f32,
    pub lifetime: f32,
    pub remaining_collisions: u32,
}

impl BouncyBall {
    pub fn new(center: Vec2, velocity: Vec2, damage: f32) -> Self {
        Self {
            rect: Rect::from_center(center, BOUNCY_BALL_SIZE, BOUNCY_BALL_SIZE),
            velocity,
            damage,
            lifetime: BOUNCY_BALL_LIFETIME,
            remaining_collisions: BOUNCY_BALL_COLLISIONS,
        }
    }

    /// Integrate one step: tick down lifetime, move, and reflect elastically
    /// off the play-area edges (no restitution loss).
    pub fn advance(&mut self, dt: f32, bounds: &Rect) {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            return;
        }
        self.rect.pos += self.velocity * dt;

        if self.rect.left() <= bounds.left() || self.rect.right() >= bounds.right() {
            self.velocity.x = -self.velocity.x;
            self.rect.clamp_within(bounds);
        }
        if self.rect.top() <= bounds.top() || self.rect.bottom() >= bounds.bottom() {
            self.velocity.y = -self.velocity.y;
            self.rect.clamp_within(bounds);
        }
    }

    /// Spend one collision charge. Returns false once the budget is used up.
    pub fn on_collision(&mut self) -> bool {
        self.remaining_collisions = self.remaining_collisions.saturating_sub(1);
        self.remaining_collisions > 0
    }
}

/// Transient lightning visual: a countdown plus the jittered polylines of one
/// chain strike. Purely cosmetic; collision and damage never look at it.
#[derive(Debug, Clone)]
pub struct LightningBolt {
    pub timer: f32,
    pub polylines: Vec<Vec<Vec2>>,
}

impl LightningBolt {
    /// Remaining lifetime fraction in [0, 1], for glow falloff
    pub fn intensity(&self) -> f32 {
        (self.timer / LIGHTNING_DURATION).clamp(0.0, 1.0)
    }
}

/// Complete state of one play-through.
///
/// Owned exclusively by the simulation thread; a renderer reads it between
/// ticks. Re-created wholesale on restart.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: Phase,
    pub wave: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub bouncy_balls: Vec<BouncyBall>,
    /// Upgrades currently on offer (non-empty only in `ChoosingUpgrade`)
    pub offered_upgrades: Vec<Upgrade>,
    /// Wave to generate once the upgrade pick resolves
    pub pending_wave: Option<u32>,
    /// Active lightning visuals (countdown-driven, cosmetic)
    pub lightning: Vec<LightningBolt>,
    /// Damage flash countdown (cosmetic)
    pub damage_flash: f32,
    /// Simulation clock in seconds, advanced by dt each Playing tick
    pub elapsed: f64,
    next_id: u32,
}

impl Session {
    /// Start a fresh session at wave 1 with a seeded RNG
    pub fn new(config: Config, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut next_id = 1;
        let player = Player::new(&config);
        let enemies = generate_wave(1, &config, &mut rng, &mut next_id);
        log::info!("New session: seed={seed}, wave 1 with {} enemies", enemies.len());
        Self {
            config,
            seed,
            rng,
            phase: Phase::Playing,
            wave: 1,
            player,
            enemies,
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            bouncy_balls: Vec::new(),
            offered_upgrades: Vec::new(),
            pending_wave: None,
            lightning: Vec::new(),
            damage_flash: 0.0,
            elapsed: 0.0,
            next_id,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the roster with a freshly generated wave
    pub(crate) fn spawn_wave(&mut self, wave: u32) {
        self.enemies = generate_wave(wave, &self.config, &mut self.rng, &mut self.next_id);
    }

    /// The screen rectangle entities are confined to
    pub fn play_area(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.window.width, self.config.window.height)
    }

    /// Remaining damage-flash fraction in [0, 1]
    pub fn damage_flash_fraction(&self) -> f32 {
        (self.damage_flash / DAMAGE_FLASH_DURATION).clamp(0.0, 1.0)
    }

    /// Spawn the patrol ball if the ability is held and none is live.
    /// Velocity gets a randomized left/right bias; damage is half the
    /// player's current bullet damage.
    pub fn spawn_bouncy_ball_if_needed(&mut self) {
        if !self.player.abilities.has(Ability::BouncyBall) || !self.bouncy_balls.is_empty() {
            return;
        }
        let bias = if self.rng.random_bool(0.5) { 0.7 } else { -0.7 };
        let velocity = Vec2::new(
            self.player.bullet_speed * bias,
            -self.player.bullet_speed * 0.6,
        );
        let mut ball = BouncyBall::new(
            self.player.rect.top_center(),
            velocity,
            self.player.bullet_damage * 0.5,
        );
        // Player may be flush against an edge; keep the ball on screen
        ball.rect.clamp_within(&self.play_area());
        self.bouncy_balls.push(ball);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Config::default(), 7)
    }

    #[test]
    fn test_ability_set() {
        let mut abilities = AbilitySet::default();
        assert!(!abilities.has(Ability::Thorns));
        abilities.grant(Ability::Thorns);
        abilities.grant(Ability::SplitShot);
        assert!(abilities.has(Ability::Thorns));
        assert!(abilities.has(Ability::SplitShot));
        assert!(!abilities.has(Ability::ChainLightning));
    }

    #[test]
    fn test_player_movement_clamped() {
        let mut state = session();
        let bounds = state.play_area();
        for _ in 0..10_000 {
            state.player.advance(-1.0, 1.0 / 60.0, &bounds);
        }
        assert_eq!(state.player.rect.left(), 0.0);
        for _ in 0..10_000 {
            state.player.advance(1.0, 1.0 / 60.0, &bounds);
        }
        assert_eq!(state.player.rect.right(), bounds.right());
    }

    #[test]
    fn test_shoot_respects_cooldown() {
        let mut state = session();
        assert!(state.player.shoot(0.1).is_empty());
        let first = state.player.shoot(0.3);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].velocity, Vec2::new(0.0, -900.0));
        // Still cooling down
        assert!(state.player.shoot(0.4).is_empty());
        assert_eq!(state.player.shoot(0.6).len(), 1);
    }

    #[test]
    fn test_split_shot_adds_two_diagonals() {
        let mut state = session();
        state.player.abilities.grant(Ability::SplitShot);
        state.player.bullet_count = 3;
        let bullets = state.player.shoot(1.0);
        assert_eq!(bullets.len(), 5);
        let diagonals: Vec<_> = bullets.iter().filter(|b| b.velocity.x != 0.0).collect();
        assert_eq!(diagonals.len(), 2);
        assert_eq!(diagonals[0].velocity.x, -diagonals[1].velocity.x);
        assert_eq!(diagonals[0].velocity.x.abs(), 900.0 * 0.75);
    }

    #[test]
    fn test_heal_capped_at_max() {
        let mut state = session();
        state.player.health = 4.0;
        state.player.heal_fraction(0.4);
        assert_eq!(state.player.health, 5.0);
    }

    #[test]
    fn test_enemy_flips_direction_at_margin() {
        let mut state = session();
        let bounds = state.play_area();
        let mut enemy = state.enemies.remove(0);
        enemy.rect.pos.x = bounds.right() - enemy.rect.size.x - 10.0;
        enemy.direction = 1.0;
        enemy.advance(1.0 / 60.0, &bounds);
        assert_eq!(enemy.direction, -1.0);
    }

    #[test]
    fn test_bouncy_ball_reflects_and_expires() {
        let bounds = Rect::new(0.0, 0.0, 960.0, 720.0);
        let mut ball = BouncyBall::new(Vec2::new(30.0, 300.0), Vec2::new(-200.0, 50.0), 0.5);
        ball.advance(0.1, &bounds);
        assert!(ball.velocity.x > 0.0);
        assert!(ball.rect.left() >= bounds.left());

        ball.lifetime = 0.05;
        ball.advance(0.1, &bounds);
        assert!(ball.lifetime <= 0.0);
    }

    #[test]
    fn test_bouncy_ball_spawn_requires_ability() {
        let mut state = session();
        state.spawn_bouncy_ball_if_needed();
        assert!(state.bouncy_balls.is_empty());

        state.player.abilities.grant(Ability::BouncyBall);
        state.spawn_bouncy_ball_if_needed();
        assert_eq!(state.bouncy_balls.len(), 1);
        assert_eq!(state.bouncy_balls[0].damage, state.player.bullet_damage * 0.5);

        // Never a second ball while one is live
        state.spawn_bouncy_ball_if_needed();
        assert_eq!(state.bouncy_balls.len(), 1);
    }
}
