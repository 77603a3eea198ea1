//! Entity constructors
//!
//! Pure functions: the caller supplies ids, positions and any random draws.

use glam::Vec2;

use super::state::{Bullet, BulletOwner, Enemy, Particle, PowerUp, PowerUpKind, ScorePopup};
use crate::tuning::Tuning;

/// Particle colors (renderer palette indices)
pub const COLOR_ENEMY: u32 = 0;
pub const COLOR_OBSTACLE: u32 = 1;
pub const COLOR_PLAYER: u32 = 2;
pub const COLOR_BOMB: u32 = 3;

/// A regular enemy for the given level, moving with `vel`
pub fn enemy(id: u32, pos: Vec2, vel: Vec2, level: u32, skin: usize, tuning: &Tuning) -> Enemy {
    let health = tuning.enemy_base_health + level / tuning.enemy_health_level_divisor.max(1);
    Enemy {
        id,
        pos,
        vel,
        health,
        max_health: health,
        skin,
        score_value: tuning.enemy_score,
        drop_chance: tuning.enemy_drop_chance,
        size: tuning.enemy_size,
        heavy: false,
    }
}

/// A heavy obstacle block, falling straight down
pub fn obstacle(id: u32, pos: Vec2, level: u32, skin: usize, tuning: &Tuning) -> Enemy {
    let health = tuning.obstacle_base_health + level / tuning.enemy_health_level_divisor.max(1);
    Enemy {
        id,
        pos,
        vel: Vec2::new(0.0, tuning.obstacle_speed),
        health,
        max_health: health,
        skin,
        score_value: tuning.obstacle_score,
        drop_chance: tuning.obstacle_drop_chance,
        size: tuning.obstacle_size,
        heavy: true,
    }
}

/// Enemy speed at a given level
pub fn enemy_speed(level: u32, tuning: &Tuning) -> f32 {
    tuning.enemy_base_speed + level as f32 * tuning.enemy_speed_per_level
}

/// A player bullet travelling along `dir` (unit vector)
pub fn player_bullet(id: u32, pos: Vec2, dir: Vec2, tuning: &Tuning) -> Bullet {
    Bullet {
        id,
        pos,
        vel: dir * tuning.bullet_speed,
        owner: BulletOwner::Player,
        damage: tuning.bullet_damage,
        radius: tuning.bullet_radius,
    }
}

/// A power-up falling from `pos`
pub fn power_up(id: u32, kind: PowerUpKind, pos: Vec2, tuning: &Tuning) -> PowerUp {
    PowerUp {
        id,
        kind,
        pos,
        vel: Vec2::new(0.0, tuning.power_up_fall_speed),
    }
}

pub fn particle(id: u32, pos: Vec2, vel: Vec2, color: u32, size: f32) -> Particle {
    Particle {
        id,
        pos,
        vel,
        color,
        life: 1.0,
        size,
    }
}

pub fn score_popup(id: u32, pos: Vec2, value: u64) -> ScorePopup {
    ScorePopup {
        id,
        pos,
        value,
        life: 1.0,
    }
}

/// Lateral offset of the extra ship at `index` (1-based):
/// -1, +1, -2, +2, ... spacing units
pub fn ship_offset(index: usize, spacing: f32) -> f32 {
    let sign = if index % 2 == 1 { -1.0 } else { 1.0 };
    sign * index.div_ceil(2) as f32 * spacing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_health_scales_with_level() {
        let tuning = Tuning::default();
        let e1 = enemy(1, Vec2::ZERO, Vec2::Y, 1, 0, &tuning);
        let e6 = enemy(2, Vec2::ZERO, Vec2::Y, 6, 0, &tuning);
        assert_eq!(e1.health, 1);
        assert_eq!(e6.health, 3);
        assert_eq!(e6.max_health, e6.health);
        assert!(!e1.heavy);
    }

    #[test]
    fn test_obstacle_is_heavier() {
        let tuning = Tuning::default();
        let e = enemy(1, Vec2::ZERO, Vec2::Y, 1, 0, &tuning);
        let o = obstacle(2, Vec2::ZERO, 1, 0, &tuning);
        assert!(o.heavy);
        assert!(o.health > e.health);
        assert!(o.size > e.size);
    }

    #[test]
    fn test_ship_offsets_alternate() {
        let offsets: Vec<f32> = (1..=4).map(|i| ship_offset(i, 10.0)).collect();
        assert_eq!(offsets, vec![-10.0, 10.0, -20.0, 20.0]);
        assert_eq!(ship_offset(0, 10.0), 0.0);
    }

    #[test]
    fn test_bullet_moves_along_direction() {
        let tuning = Tuning::default();
        let b = player_bullet(1, Vec2::new(5.0, 5.0), Vec2::NEG_Y, &tuning);
        assert_eq!(b.owner, BulletOwner::Player);
        assert_eq!(b.vel, Vec2::new(0.0, -tuning.bullet_speed));
    }
}
