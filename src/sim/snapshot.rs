//! Read-only view of a match for renderers and HUDs.

use glam::Vec2;
use serde::Serialize;

use super::powerups::remaining_ms;
use super::state::{GamePhase, GameState, PowerUpKind};

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    pub heavy: bool,
    /// Skin image reference
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub kind: PowerUpKind,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerUpView {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub clock_ms: u64,
    pub score: u64,
    pub lives: u8,
    pub combo: u32,
    pub level: u32,
    pub invincible: bool,
    pub player_pos: Vec2,
    pub avatar: Option<String>,
    pub ships: Vec<Vec2>,
    pub effects: Vec<EffectView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<Vec2>,
    pub power_ups: Vec<PowerUpView>,
    /// (position, value) of floating score text
    pub popups: Vec<(Vec2, u64)>,
    pub particle_count: usize,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.clock_ms;
        let player = &state.player;
        Self {
            phase: state.phase,
            clock_ms: now,
            score: player.score,
            lives: player.lives,
            combo: state.combo,
            level: state.level,
            invincible: player.invincible,
            player_pos: player.pos,
            avatar: player.avatar.clone(),
            ships: player.ships.iter().map(|s| s.pos).collect(),
            effects: player
                .effects
                .iter()
                .map(|e| EffectView {
                    kind: e.kind,
                    remaining_ms: remaining_ms(player, e.kind, now),
                })
                .collect(),
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    size: e.size,
                    health: e.health,
                    max_health: e.max_health,
                    heavy: e.heavy,
                    image: state
                        .skins
                        .get(e.skin)
                        .map(|s| s.image.clone())
                        .unwrap_or_default(),
                })
                .collect(),
            bullets: state.bullets.iter().map(|b| b.pos).collect(),
            power_ups: state
                .power_ups
                .iter()
                .map(|p| PowerUpView {
                    id: p.id,
                    kind: p.kind,
                    pos: p.pos,
                })
                .collect(),
            popups: state.popups.iter().map(|p| (p.pos, p.value)).collect(),
            particle_count: state.particles.len(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
