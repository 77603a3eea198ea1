//! Power-up lifecycle
//!
//! Timed effects carry an expiry on the match clock and are dropped by
//! [`update_player_power_ups`] once `now >= expires_at`. Extra ships are
//! permanent for the match; the bomb is instant and never stored.

use super::combat;
use super::events::GameEvent;
use super::factory::ship_offset;
use super::state::{ActiveEffect, GameState, Player, PlayerShip, PowerUpKind};
use crate::consts::MAX_EXTRA_SHIPS;
use crate::tuning::Tuning;

/// Activate a timed effect lasting `duration_ms` from `now`.
///
/// Re-activating refreshes the expiry; it never stacks and never shortens.
pub fn activate_effect(player: &mut Player, kind: PowerUpKind, now: u64, duration_ms: u64) {
    let expires_at = now.saturating_add(duration_ms);
    match player.effects.iter_mut().find(|e| e.kind == kind) {
        Some(effect) => effect.expires_at = effect.expires_at.max(expires_at),
        None => player.effects.push(ActiveEffect { kind, expires_at }),
    }
}

/// Whether a timed effect is currently active
pub fn has_active_power_up(player: &Player, kind: PowerUpKind) -> bool {
    player.effects.iter().any(|e| e.kind == kind)
}

/// Remaining time of an effect, zero if inactive
pub fn remaining_ms(player: &Player, kind: PowerUpKind, now: u64) -> u64 {
    player
        .effects
        .iter()
        .find(|e| e.kind == kind)
        .map_or(0, |e| e.expires_at.saturating_sub(now))
}

/// Drop expired effects and end a finished invincibility window
pub fn update_player_power_ups(player: &mut Player, now: u64) {
    player.effects.retain(|e| now < e.expires_at);
    if player.invincible && now >= player.invincible_until {
        player.invincible = false;
    }
}

/// Append a formation ship; ignored once the cap is reached
pub fn add_extra_ship(player: &mut Player, id: u32, tuning: &Tuning) -> bool {
    if player.ships.len() >= MAX_EXTRA_SHIPS {
        return false;
    }
    let index = player.ships.len() + 1;
    let offset = ship_offset(index, tuning.ship_spacing);
    player.ships.push(PlayerShip {
        id,
        pos: player.pos,
        offset,
    });
    player.sync_ships();
    true
}

/// Grant a power-up to the player at the current match time.
///
/// Returns false when the power-up had no effect (ship cap reached).
pub fn add_power_up(state: &mut GameState, kind: PowerUpKind) -> bool {
    let now = state.clock_ms;
    let applied = match kind {
        PowerUpKind::ExtraShip => {
            let id = state.next_entity_id();
            add_extra_ship(&mut state.player, id, &state.tuning)
        }
        PowerUpKind::Bomb => {
            combat::detonate_bomb(state);
            true
        }
        timed => match state.tuning.effect_duration_ms(timed) {
            Some(duration) => {
                activate_effect(&mut state.player, timed, now, duration);
                true
            }
            None => false,
        },
    };
    if applied {
        log::debug!("Power-up {:?} applied at {} ms", kind, now);
        state.events.push(GameEvent::PowerUpCollected { kind });
    }
    applied
}

/// Enemy movement factor (slow motion)
pub fn enemy_speed_factor(player: &Player, tuning: &Tuning) -> f32 {
    if has_active_power_up(player, PowerUpKind::SlowMotion) {
        tuning.slow_enemy_factor
    } else {
        1.0
    }
}

/// Player movement factor (slow motion gives a mild boost)
pub fn player_speed_factor(player: &Player, tuning: &Tuning) -> f32 {
    if has_active_power_up(player, PowerUpKind::SlowMotion) {
        tuning.slow_player_factor
    } else {
        1.0
    }
}

/// Score factor from the multiplier effect
pub fn score_factor(player: &Player, tuning: &Tuning) -> u64 {
    if has_active_power_up(player, PowerUpKind::ScoreMultiplier) {
        tuning.score_multiplier
    } else {
        1
    }
}

/// Time between shots, shortened by rapid fire
pub fn fire_cooldown(player: &Player, tuning: &Tuning) -> u64 {
    if has_active_power_up(player, PowerUpKind::RapidFire) {
        player.fire_cooldown_ms / tuning.rapid_fire_divisor.max(1)
    } else {
        player.fire_cooldown_ms
    }
}
