//! Spawn scheduling and difficulty ramp
//!
//! Enemies and obstacles run on independent timers. The enemy interval
//! shrinks with level down to a floor; the obstacle interval is fixed unless
//! the profile gives it its own step.

use glam::Vec2;
use rand::Rng;

use super::factory;
use super::state::GameState;
use crate::tuning::Tuning;

/// Enemy spawn interval: `max(floor, base - level * step)`
pub fn enemy_spawn_interval(tuning: &Tuning, level: u32) -> u64 {
    stepped_interval(tuning.spawn_base_ms, tuning.spawn_step_ms, tuning.spawn_floor_ms, level)
}

/// Obstacle spawn interval (fixed when `obstacle_step_ms` is zero)
pub fn obstacle_spawn_interval(tuning: &Tuning, level: u32) -> u64 {
    stepped_interval(
        tuning.obstacle_base_ms,
        tuning.obstacle_step_ms,
        tuning.obstacle_floor_ms,
        level,
    )
}

fn stepped_interval(base: u64, step: u64, floor: u64, level: u32) -> u64 {
    base.saturating_sub(step.saturating_mul(level as u64)).max(floor)
}

/// Difficulty level reached after `clock_ms` of play (starts at 1)
pub fn level_for_time(tuning: &Tuning, clock_ms: u64) -> u32 {
    let levels = clock_ms / tuning.level_duration_ms.max(1);
    1 + levels.min(u32::MAX as u64 - 1) as u32
}

/// Whether enough time has passed since the last spawn
#[inline]
pub fn is_due(now: u64, last_spawn: u64, interval: u64) -> bool {
    now.saturating_sub(last_spawn) >= interval
}

/// Uniformly pick a skin index from a pool of `count` skins
pub fn pick_skin<R: Rng>(rng: &mut R, count: usize) -> usize {
    if count <= 1 { 0 } else { rng.random_range(0..count) }
}

/// Random x for a body of `radius` that keeps it inside the field
fn spawn_x<R: Rng>(rng: &mut R, width: f32, radius: f32) -> f32 {
    let lo = radius.min(width / 2.0);
    let hi = (width - radius).max(lo);
    rng.random_range(lo..=hi)
}

/// Advance the difficulty level from the match clock
pub fn update_level(state: &mut GameState) {
    let level = level_for_time(&state.tuning, state.clock_ms);
    if level > state.level {
        state.level = level;
        log::info!(
            "Level {} (enemy interval {} ms)",
            level,
            enemy_spawn_interval(&state.tuning, level)
        );
        state.events.push(super::events::GameEvent::LevelUp { level });
    }
}

/// Spawn at most one enemy and one obstacle if their timers are due
pub fn run_spawns(state: &mut GameState) {
    let now = state.clock_ms;

    if is_due(now, state.last_enemy_spawn_ms, enemy_spawn_interval(&state.tuning, state.level)) {
        spawn_enemy(state);
        state.last_enemy_spawn_ms = now;
    }

    if is_due(
        now,
        state.last_obstacle_spawn_ms,
        obstacle_spawn_interval(&state.tuning, state.level),
    ) {
        spawn_obstacle(state);
        state.last_obstacle_spawn_ms = now;
    }
}

/// Append one regular enemy just above the top edge
pub fn spawn_enemy(state: &mut GameState) {
    let tuning = &state.tuning;
    let radius = tuning.enemy_size / 2.0;
    let x = spawn_x(&mut state.rng, tuning.field.width, radius);
    let drift = if tuning.enemy_drift > 0.0 {
        state.rng.random_range(-tuning.enemy_drift..=tuning.enemy_drift)
    } else {
        0.0
    };
    let vel = Vec2::new(drift, factory::enemy_speed(state.level, tuning));
    let skin = pick_skin(&mut state.rng, state.skins.len());

    let id = state.next_entity_id();
    let enemy = factory::enemy(id, Vec2::new(x, -radius), vel, state.level, skin, &state.tuning);
    log::debug!("Spawned enemy {} at x={:.0} hp={}", id, x, enemy.health);
    state.enemies.push(enemy);
}

/// Append one heavy obstacle just above the top edge
pub fn spawn_obstacle(state: &mut GameState) {
    let radius = state.tuning.obstacle_size / 2.0;
    let x = spawn_x(&mut state.rng, state.tuning.field.width, radius);
    let skin = pick_skin(&mut state.rng, state.skins.len());

    let id = state.next_entity_id();
    let block = factory::obstacle(id, Vec2::new(x, -radius), state.level, skin, &state.tuning);
    log::debug!("Spawned obstacle {} at x={:.0} hp={}", id, x, block.health);
    state.enemies.push(block);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Profile;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42, Tuning::default(), Vec::new());
        state.phase = super::super::state::GamePhase::Playing;
        state
    }

    #[test]
    fn test_enemy_interval_decreases_to_floor() {
        let tuning = Tuning::default();
        assert_eq!(enemy_spawn_interval(&tuning, 0), 1500);
        assert_eq!(enemy_spawn_interval(&tuning, 1), 1400);
        assert_eq!(enemy_spawn_interval(&tuning, 5), 1000);
        assert_eq!(enemy_spawn_interval(&tuning, 10), 500);
        assert_eq!(enemy_spawn_interval(&tuning, 50), 500);
        assert_eq!(enemy_spawn_interval(&tuning, u32::MAX), 500);
    }

    #[test]
    fn test_obstacle_interval_by_profile() {
        let arcade = Tuning::for_profile(Profile::Arcade);
        assert_eq!(obstacle_spawn_interval(&arcade, 1), obstacle_spawn_interval(&arcade, 20));

        let iso = Tuning::for_profile(Profile::Isometric);
        assert!(obstacle_spawn_interval(&iso, 5) < obstacle_spawn_interval(&iso, 1));
        assert_eq!(obstacle_spawn_interval(&iso, 100), iso.obstacle_floor_ms);
    }

    #[test]
    fn test_level_for_time() {
        let tuning = Tuning::default();
        assert_eq!(level_for_time(&tuning, 0), 1);
        assert_eq!(level_for_time(&tuning, 19_999), 1);
        assert_eq!(level_for_time(&tuning, 20_000), 2);
        assert_eq!(level_for_time(&tuning, 100_000), 6);
    }

    #[test]
    fn test_spawn_waits_for_interval() {
        let mut state = playing_state();
        state.clock_ms = 1000;
        run_spawns(&mut state);
        assert!(state.enemies.is_empty());

        state.clock_ms = 1400;
        run_spawns(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.last_enemy_spawn_ms, 1400);

        // Same tick again: nothing new
        run_spawns(&mut state);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_obstacles_have_their_own_timer() {
        let mut state = playing_state();
        state.clock_ms = 8000;
        run_spawns(&mut state);
        assert_eq!(state.enemies.iter().filter(|e| e.heavy).count(), 1);
        assert_eq!(state.enemies.iter().filter(|e| !e.heavy).count(), 1);
        assert_eq!(state.last_obstacle_spawn_ms, 8000);
    }

    #[test]
    fn test_spawned_enemy_inside_field_width() {
        let mut state = playing_state();
        for _ in 0..50 {
            spawn_enemy(&mut state);
        }
        let width = state.tuning.field.width;
        for e in &state.enemies {
            assert!(e.pos.x >= e.radius() && e.pos.x <= width - e.radius());
            assert!(e.pos.y < 0.0);
            assert!(e.vel.y > 0.0);
            assert!(e.skin < state.skins.len());
        }
    }

    #[test]
    fn test_level_up_event() {
        let mut state = playing_state();
        state.clock_ms = 40_000;
        update_level(&mut state);
        assert_eq!(state.level, 3);
        assert!(matches!(
            state.events.last(),
            Some(super::super::events::GameEvent::LevelUp { level: 3 })
        ));
    }
}
