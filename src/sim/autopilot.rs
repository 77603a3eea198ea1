//! Idle/demo mode pilot
//!
//! Produces the same `TickInput` a human would. Good enough for attract
//! screens and soak tests, not meant to be clever.

use glam::Vec2;

use super::state::{Enemy, GameState};
use super::tick::TickInput;

/// Vertical distance at which an incoming enemy is treated as a threat
const DANGER_DISTANCE: f32 = 140.0;

/// Choose this step's input from the current state
pub fn steer(state: &GameState) -> TickInput {
    let player = &state.player;
    let field = state.tuning.field;
    let home_y = field.height - player.radius * 2.0;

    let above = |e: &&Enemy| e.pos.y < player.pos.y;

    // Dodge anything about to land on us
    let threat = state.enemies.iter().filter(above).find(|e| {
        player.pos.y - e.pos.y < DANGER_DISTANCE
            && (e.pos.x - player.pos.x).abs() < e.radius() + player.radius
    });
    if let Some(threat) = threat {
        let side = if threat.pos.x > player.pos.x || player.pos.x > field.width - threat.size * 2.0 {
            -1.0
        } else {
            1.0
        };
        let x = threat.pos.x + side * (threat.radius() + player.radius * 2.0);
        return TickInput {
            pointer: Some(Vec2::new(x, home_y)),
            fire: true,
            ..Default::default()
        };
    }

    // Grab the nearest power-up when it's safe
    let nearest_drop = state.power_ups.iter().min_by(|a, b| {
        a.pos
            .distance_squared(player.pos)
            .total_cmp(&b.pos.distance_squared(player.pos))
    });
    if let Some(drop) = nearest_drop {
        return TickInput {
            pointer: Some(Vec2::new(drop.pos.x, home_y)),
            fire: !state.enemies.is_empty(),
            ..Default::default()
        };
    }

    // Line up under the lowest enemy
    let target = state
        .enemies
        .iter()
        .filter(above)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    TickInput {
        pointer: target.map(|e| Vec2::new(e.pos.x, home_y)),
        fire: target.is_some(),
        ..Default::default()
    }
}
