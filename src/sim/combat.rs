//! Collision and combat resolution
//!
//! Runs once per tick after movement, always in the same order:
//! bullets vs enemies, kill rewards and drops, enemies vs player,
//! power-ups vs player, off-field culling. Score and combo depend on
//! this order, so keep it.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::factory::{self, COLOR_BOMB, COLOR_ENEMY, COLOR_OBSTACLE};
use super::geometry::{circles_overlap, overlaps};
use super::powerups;
use super::state::{BulletOwner, Enemy, GamePhase, GameState, PowerUpKind};
use crate::Edge;
use crate::consts::MAX_PARTICLES;
use crate::tuning::Tuning;

/// Particles per destroyed enemy
const BURST_PARTICLES: usize = 8;
const BURST_PARTICLES_HEAVY: usize = 16;

/// Points for one kill at the given combo (combo before this kill counts).
///
/// `base * (100 + combo * weight%) / 100 * factor`, non-decreasing in combo.
pub fn kill_points(base: u64, combo: u32, tuning: &Tuning, factor: u64) -> u64 {
    let bonus_pct = 100u64.saturating_add((combo as u64).saturating_mul(tuning.combo_weight_pct));
    base.saturating_mul(bonus_pct) / 100 * factor.max(1)
}

/// Resolve every interaction for this tick
pub fn resolve(state: &mut GameState) {
    bullets_vs_enemies(state);
    reap_destroyed(state);

    enemies_vs_player(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    power_ups_vs_player(state);
    remove_off_field(state);
}

/// Player bullets damage the first live enemy they overlap and are consumed
pub fn bullets_vs_enemies(state: &mut GameState) {
    let shape = state.tuning.collision;
    let mut consumed: Vec<u32> = Vec::new();

    for bullet in &state.bullets {
        if bullet.owner != BulletOwner::Player {
            continue;
        }
        let target = state
            .enemies
            .iter_mut()
            .find(|e| e.is_alive() && overlaps(shape, bullet.pos, bullet.radius, e.pos, e.radius()));
        if let Some(enemy) = target {
            enemy.apply_damage(bullet.damage);
            consumed.push(bullet.id);
        }
    }

    if !consumed.is_empty() {
        state.bullets.retain(|b| !consumed.contains(&b.id));
    }
}

/// Remove dead enemies and pay out for them in id order
pub fn reap_destroyed(state: &mut GameState) {
    if state.enemies.iter().all(Enemy::is_alive) {
        return;
    }
    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
        std::mem::take(&mut state.enemies).into_iter().partition(|e| !e.is_alive());
    state.enemies = alive;

    for enemy in dead {
        let combo = state.combo;
        on_enemy_destroyed(state, &enemy, combo);
    }
}

/// Score, combo, cosmetics and drop roll for one destroyed enemy.
///
/// `scoring_combo` is the combo the points are computed at; the live combo
/// still advances by one.
fn on_enemy_destroyed(state: &mut GameState, enemy: &Enemy, scoring_combo: u32) {
    let factor = powerups::score_factor(&state.player, &state.tuning);
    let points = kill_points(enemy.score_value, scoring_combo, &state.tuning, factor);

    state.award(points);
    state.kills += 1;
    state.combo += 1;
    state.max_combo = state.max_combo.max(state.combo);
    state.events.push(GameEvent::EnemyDestroyed {
        id: enemy.id,
        points,
        combo: state.combo,
    });

    let popup_id = state.next_entity_id();
    state.popups.push(factory::score_popup(popup_id, enemy.pos, points));

    let (count, color) = if enemy.heavy {
        (BURST_PARTICLES_HEAVY, COLOR_OBSTACLE)
    } else {
        (BURST_PARTICLES, COLOR_ENEMY)
    };
    emit_burst(state, enemy.pos, count, color);

    // One draw per death
    let roll: f64 = state.rng.random();
    if roll < enemy.drop_chance {
        let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
        let id = state.next_entity_id();
        state
            .power_ups
            .push(factory::power_up(id, kind, enemy.pos, &state.tuning));
        log::debug!("Enemy {} dropped {:?}", enemy.id, kind);
    }
}

/// Spray `count` particles out of `pos`
fn emit_burst(state: &mut GameState, pos: Vec2, count: usize, color: u32) {
    for _ in 0..count {
        let angle: f32 = state.rng.random_range(0.0..std::f32::consts::TAU);
        let speed: f32 = state.rng.random_range(60.0..180.0);
        let size: f32 = state.rng.random_range(2.0..5.0);
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        let id = state.next_entity_id();
        state.particles.push(factory::particle(id, pos, vel, color, size));
    }
    if state.particles.len() > MAX_PARTICLES {
        let excess = state.particles.len() - MAX_PARTICLES;
        state.particles.drain(..excess);
    }
}

/// Enemy bodies hitting the player
pub fn enemies_vs_player(state: &mut GameState) {
    let shape = state.tuning.collision;
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    let touching: Vec<u32> = state
        .enemies
        .iter()
        .filter(|e| overlaps(shape, e.pos, e.radius(), player_pos, player_radius))
        .map(|e| e.id)
        .collect();

    for enemy_id in touching {
        if powerups::has_active_power_up(&state.player, PowerUpKind::Shield) {
            // Shield destroys the rammer, no reward
            state.enemies.retain(|e| e.id != enemy_id);
            emit_burst(state, player_pos, BURST_PARTICLES, factory::COLOR_PLAYER);
            state.events.push(GameEvent::ShieldAbsorbed { enemy_id });
            continue;
        }
        if state.player.invincible {
            continue;
        }
        state.enemies.retain(|e| e.id != enemy_id);
        damage_player(state);
        if state.phase != GamePhase::Playing {
            return;
        }
    }
}

/// Lose a life: combo reset, invincibility window, game over at zero
fn damage_player(state: &mut GameState) {
    let now = state.clock_ms;
    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(1);
    player.make_invincible(now.saturating_add(state.tuning.invincibility_ms));
    let lives = player.lives;

    state.reset_combo();
    state.events.push(GameEvent::PlayerHit { lives });
    log::info!("Player hit, {} lives left", lives);

    if lives == 0 {
        state.enter_game_over();
    }
}

/// Pick up every power-up within reach of the player
pub fn power_ups_vs_player(state: &mut GameState) {
    let player_pos = state.player.pos;
    let reach = state.tuning.pickup_radius;

    let mut collected: Vec<PowerUpKind> = Vec::new();
    state.power_ups.retain(|p| {
        if circles_overlap(p.pos, 0.0, player_pos, reach) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        powerups::add_power_up(state, kind);
    }
}

/// Destroy every live enemy at once, scoring each at the current combo
pub fn detonate_bomb(state: &mut GameState) {
    let victims = std::mem::take(&mut state.enemies);
    if victims.is_empty() {
        return;
    }
    log::info!("Bomb destroyed {} enemies", victims.len());

    let combo = state.combo;
    for enemy in &victims {
        on_enemy_destroyed(state, enemy, combo);
    }
    let center = state.player.pos;
    emit_burst(state, center, BURST_PARTICLES_HEAVY, COLOR_BOMB);
}

/// Cull everything that left the field. Enemies leaving through the
/// player's edge are escapes and break the combo.
pub fn remove_off_field(state: &mut GameState) {
    let field = state.tuning.field;

    state.bullets.retain(|b| field.exit_edge(b.pos).is_none());
    state.power_ups.retain(|p| field.exit_edge(p.pos).is_none());
    state.particles.retain(|p| field.exit_edge(p.pos).is_none());
    state.popups.retain(|p| field.exit_edge(p.pos).is_none());

    let mut escaped: Vec<u32> = Vec::new();
    state.enemies.retain(|e| match field.exit_edge(e.pos) {
        None => true,
        Some(Edge::Bottom) => {
            escaped.push(e.id);
            false
        }
        Some(_) => false,
    });

    for id in escaped {
        state.reset_combo();
        state.events.push(GameEvent::EnemyEscaped { id });
    }
}
