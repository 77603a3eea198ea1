//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::autopilot;
use super::combat;
use super::geometry::direction;
use super::powerups;
use super::spawn;
use super::state::{GamePhase, GameState};
use crate::consts::{MAX_PENDING_EVENTS, MOVE_EPSILON};
use crate::ms_to_secs;

/// How fast score popups float upward (px/s)
const POPUP_RISE_SPEED: f32 = 40.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch position in field coordinates, if active
    pub pointer: Option<Vec2>,
    /// Fire intent (held button / touch)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep of `dt_ms`.
///
/// Events pile up in `state.events` until the caller drains them with
/// [`GameState::take_events`] (`Session` does this every frame). Past
/// `MAX_PENDING_EVENTS` the oldest are discarded.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause();
                return;
            }
            GamePhase::Paused => {
                state.resume();
            }
            _ => {}
        }
    }

    // Don't tick unless a match is running
    if state.phase != GamePhase::Playing {
        return;
    }

    let input = if input.autopilot {
        autopilot::steer(state)
    } else {
        input.clone()
    };

    state.clock_ms += dt_ms;
    let now = state.clock_ms;
    let dt = ms_to_secs(dt_ms);

    // Sample input once for this step
    if let Some(pointer) = input.pointer {
        state.move_player(pointer.x, pointer.y);
    }

    powerups::update_player_power_ups(&mut state.player, now);

    integrate(state, dt);

    if input.fire {
        state.fire_bullet();
    }

    spawn::update_level(state);
    spawn::run_spawns(state);

    combat::resolve(state);

    // Ensure deterministic ordering
    state.normalize_order();

    if state.events.len() > MAX_PENDING_EVENTS {
        let excess = state.events.len() - MAX_PENDING_EVENTS;
        state.events.drain(..excess);
        log::debug!("Dropped {} undrained events", excess);
    }
}

/// Move every entity by one step
fn integrate(state: &mut GameState, dt: f32) {
    // Player glides toward the pointer target
    let speed = state.tuning.player_speed * powerups::player_speed_factor(&state.player, &state.tuning);
    let heading = state
        .player
        .target
        .and_then(|target| direction(state.player.pos, target, MOVE_EPSILON));
    if let Some((dir, dist)) = heading {
        let step = (speed * dt).min(dist);
        let pos = state.player.pos + dir * step;
        state.player.pos = state.tuning.field.clamp(pos, state.player.radius);
    }
    state.player.sync_ships();

    let enemy_factor = powerups::enemy_speed_factor(&state.player, &state.tuning);
    for enemy in &mut state.enemies {
        enemy.pos += enemy.vel * enemy_factor * dt;
    }

    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel * dt;
    }

    for power_up in &mut state.power_ups {
        power_up.pos += power_up.vel * dt;
    }

    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel *= 0.98;
        particle.life -= dt * 1.5;
        particle.size *= 0.995;
    }
    state.particles.retain(|p| p.life > 0.0);

    for popup in state.popups.iter_mut() {
        popup.pos.y -= POPUP_RISE_SPEED * dt;
        popup.life -= dt;
    }
    state.popups.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT_MS;
    use crate::sim::state::PowerUpKind;
    use crate::tuning::Tuning;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default(), Vec::new());
        state.start_game();
        state
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut state = GameState::new(1, Tuning::default(), Vec::new());
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.clock_ms, 0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing_state(12345);
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.clock_ms, SIM_DT_MS);

        // Now pause
        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.phase, GamePhase::Paused);

        // Paused ticks leave the clock alone
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.clock_ms, SIM_DT_MS);

        // Unpause
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.clock_ms, 2 * SIM_DT_MS);
    }

    #[test]
    fn test_player_moves_toward_pointer() {
        let mut state = playing_state(1);
        let start = state.player.pos;
        let input = TickInput {
            pointer: Some(Vec2::new(start.x + 100.0, start.y)),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        let moved = state.player.pos.x - start.x;
        let expected = state.tuning.player_speed * ms_to_secs(SIM_DT_MS);
        assert!((moved - expected).abs() < 0.01);

        // Keep going until we arrive, never overshooting
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT_MS);
        }
        assert!((state.player.pos.x - (start.x + 100.0)).abs() < 0.01);
    }

    #[test]
    fn test_zero_distance_move_is_stable() {
        let mut state = playing_state(1);
        let start = state.player.pos;
        let input = TickInput {
            pointer: Some(start),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.player.pos, start);
        assert!(state.player.pos.is_finite());
    }

    #[test]
    fn test_fire_input_creates_bullet() {
        let mut state = playing_state(1);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);
        assert_eq!(state.bullets.len(), 1);
        assert!(state.bullets[0].vel.y < 0.0);
    }

    #[test]
    fn test_slow_motion_slows_enemies() {
        let mut state = playing_state(1);
        crate::sim::spawn::spawn_enemy(&mut state);
        state.last_enemy_spawn_ms = u64::MAX / 2;
        let vy = state.enemies[0].vel.y;
        let y0 = state.enemies[0].pos.y;
        state.collect_power_up(PowerUpKind::SlowMotion);

        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        let dy = state.enemies[0].pos.y - y0;
        let full = vy * ms_to_secs(SIM_DT_MS);
        assert!((dy - full * state.tuning.slow_enemy_factor).abs() < 1e-3);
    }

    #[test]
    fn test_effects_expire_on_match_clock() {
        let mut state = playing_state(1);
        state.collect_power_up(PowerUpKind::Shield);
        let ticks = state.tuning.shield_ms / SIM_DT_MS + 1;
        for _ in 0..ticks {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        assert!(!powerups::has_active_power_up(&state.player, PowerUpKind::Shield));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing_state(99999);
        let mut state2 = playing_state(99999);

        let inputs = [
            TickInput {
                pointer: Some(Vec2::new(50.0, 500.0)),
                fire: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput {
                pointer: Some(Vec2::new(350.0, 540.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT_MS);
                tick(&mut state2, input, SIM_DT_MS);
            }
        }

        assert_eq!(state1.clock_ms, state2.clock_ms);
        assert_eq!(state1.player.score, state2.player.score);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.take_events(), state2.take_events());
    }

    #[test]
    fn test_undrained_events_are_capped() {
        use crate::sim::events::GameEvent;

        let mut state = playing_state(8);
        state.take_events();
        for level in 0..(MAX_PENDING_EVENTS as u32 + 10) {
            state.events.push(GameEvent::LevelUp { level });
        }
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert_eq!(state.events.len(), MAX_PENDING_EVENTS);
        // Newest survive
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::LevelUp {
                level: MAX_PENDING_EVENTS as u32 + 9
            })
        );
    }

    #[test]
    fn test_enemies_spawn_over_time() {
        let mut state = playing_state(5);
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        // Due at 1400 ms, then 1400 ms later, on 16 ms step boundaries
        assert_eq!(state.clock_ms, 3200);
        assert_eq!(state.last_enemy_spawn_ms, 2816);
        assert_eq!(state.last_obstacle_spawn_ms, 0);
        assert_eq!(state.level, 1);
    }
}
