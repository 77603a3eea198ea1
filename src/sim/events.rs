//! Events emitted by the simulation for the HUD, audio and leaderboard hosts.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, PowerUpKind};

/// Final numbers of a finished match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub final_score: u64,
    pub level: u32,
    pub kills: u32,
    pub max_combo: u32,
    pub duration_ms: u64,
}

/// Something the outside world may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    ScoreChanged { score: u64 },
    EnemyDestroyed { id: u32, points: u64, combo: u32 },
    /// Enemy crossed the player's edge alive
    EnemyEscaped { id: u32 },
    PlayerHit { lives: u8 },
    /// Shield soaked up a collision
    ShieldAbsorbed { enemy_id: u32 },
    PowerUpCollected { kind: PowerUpKind },
    LevelUp { level: u32 },
    /// Emitted once per match
    GameOver { summary: MatchSummary },
}

/// Host callbacks. All methods default to no-ops.
pub trait GameListener {
    /// Score changed (fired for every change)
    fn on_score_update(&mut self, _score: u64) {}

    /// Match ended; fired exactly once per match
    fn on_game_over(&mut self, _summary: &MatchSummary) {}

    /// Every event, including the two above
    fn on_event(&mut self, _event: &GameEvent) {}
}

impl GameListener for () {}

/// Route events to a listener in emission order
pub fn dispatch<L: GameListener + ?Sized>(events: &[GameEvent], listener: &mut L) {
    for event in events {
        listener.on_event(event);
        match event {
            GameEvent::ScoreChanged { score } => listener.on_score_update(*score),
            GameEvent::GameOver { summary } => listener.on_game_over(summary),
            _ => {}
        }
    }
}
