//! Between-wave upgrade catalog
//!
//! A fixed, enumerable set of permanent player enhancements. Each variant is a
//! pure mutation of the player's stat set, dispatched through one exhaustive
//! match.

use rand::Rng;
use rand::seq::index::sample;

use super::state::{Ability, Player};
use crate::consts::{BULLET_COUNT_CAP, MIN_SHOOT_COOLDOWN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upgrade {
    Damage,
    AttackSpeed,
    BulletCount,
    MoveSpeed,
    Heal,
    SplitShot,
    Thorns,
    ChainLightning,
    BouncyBall,
}

/// Every upgrade the between-wave pick can offer, in display order
pub const CATALOG: [Upgrade; 9] = [
    Upgrade::Damage,
    Upgrade::AttackSpeed,
    Upgrade::BulletCount,
    Upgrade::MoveSpeed,
    Upgrade::Heal,
    Upgrade::SplitShot,
    Upgrade::Thorns,
    Upgrade::ChainLightning,
    Upgrade::BouncyBall,
];

impl Upgrade {
    pub fn name(&self) -> &'static str {
        match self {
            Upgrade::Damage => "Increased Damage",
            Upgrade::AttackSpeed => "Increased Attack Speed",
            Upgrade::BulletCount => "Increased Number of Bullets",
            Upgrade::MoveSpeed => "Increased Movement Speed",
            Upgrade::Heal => "Heal",
            Upgrade::SplitShot => "Split Shot",
            Upgrade::Thorns => "Thorns",
            Upgrade::ChainLightning => "Chain Lightning",
            Upgrade::BouncyBall => "Bouncy Ball",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Upgrade::Damage => "+1 bullet damage.",
            Upgrade::AttackSpeed => "Fire faster by 15%.",
            Upgrade::BulletCount => "Add one more projectile per shot.",
            Upgrade::MoveSpeed => "+40 units movement speed.",
            Upgrade::Heal => "Recover 40% of your max HP.",
            Upgrade::SplitShot => "Gain two diagonal bullets each attack.",
            Upgrade::Thorns => "When hit, also destroy the attacking enemy.",
            Upgrade::ChainLightning => "Shots chain between 4 enemies for half damage.",
            Upgrade::BouncyBall => "A bouncing orb patrols the arena for half bullet damage.",
        }
    }

    /// Apply the mutation to the player. Bouncy-ball spawning itself happens
    /// when play resumes, since it needs the projectile collection.
    pub fn apply(&self, player: &mut Player) {
        match self {
            Upgrade::Damage => player.bullet_damage += 1.0,
            Upgrade::AttackSpeed => {
                player.shoot_cooldown = (player.shoot_cooldown * 0.85).max(MIN_SHOOT_COOLDOWN);
            }
            Upgrade::BulletCount => {
                player.bullet_count = (player.bullet_count + 1).min(BULLET_COUNT_CAP);
            }
            Upgrade::MoveSpeed => player.speed += 40.0,
            Upgrade::Heal => player.heal_fraction(0.4),
            Upgrade::SplitShot => player.abilities.grant(Ability::SplitShot),
            Upgrade::Thorns => player.abilities.grant(Ability::Thorns),
            Upgrade::ChainLightning => player.abilities.grant(Ability::ChainLightning),
            Upgrade::BouncyBall => player.abilities.grant(Ability::BouncyBall),
        }
    }
}

/// Sample three distinct upgrades from the catalog
pub fn offer_three(rng: &mut impl Rng) -> Vec<Upgrade> {
    sample(rng, CATALOG.len(), 3)
        .iter()
        .map(|i| CATALOG[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player() -> Player {
        Player::new(&Config::default())
    }

    #[test]
    fn test_bullet_count_caps_at_six() {
        let mut player = player();
        Upgrade::BulletCount.apply(&mut player);
        Upgrade::BulletCount.apply(&mut player);
        assert_eq!(player.bullet_count, 3);
        for _ in 0..20 {
            Upgrade::BulletCount.apply(&mut player);
        }
        assert_eq!(player.bullet_count, 6);
    }

    #[test]
    fn test_attack_speed_floors() {
        let mut player = player();
        for _ in 0..100 {
            Upgrade::AttackSpeed.apply(&mut player);
        }
        assert_eq!(player.shoot_cooldown, MIN_SHOOT_COOLDOWN);
    }

    #[test]
    fn test_stat_upgrades() {
        let mut player = player();
        Upgrade::Damage.apply(&mut player);
        Upgrade::MoveSpeed.apply(&mut player);
        assert_eq!(player.bullet_damage, 2.0);
        assert_eq!(player.speed, 400.0);
    }

    #[test]
    fn test_ability_grants() {
        let mut player = player();
        Upgrade::Thorns.apply(&mut player);
        Upgrade::ChainLightning.apply(&mut player);
        assert!(player.abilities.has(Ability::Thorns));
        assert!(player.abilities.has(Ability::ChainLightning));
        assert!(!player.abilities.has(Ability::SplitShot));
    }

    #[test]
    fn test_offer_three_distinct() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let offered = offer_three(&mut rng);
            assert_eq!(offered.len(), 3);
            assert!(offered[0] != offered[1]);
            assert!(offered[1] != offered[2]);
            assert!(offered[0] != offered[2]);
        }
    }
}
