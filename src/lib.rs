//! Swarm Shooter - wave-based arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, combat, game state)
//! - `session`: Frame scheduling around the fixed-step tick
//! - `tuning`: Data-driven game balance (Arcade / Isometric profiles)
//! - `highscores`: Local leaderboard fed by game-over events

pub mod highscores;
pub mod session;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use session::{FrameToken, PointerSample, Session};
pub use tuning::{Profile, Tuning, TuningError};

use glam::Vec2;

/// Engine constants that are not balance knobs
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const SIM_DT_MS: u64 = 16;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Movement below this distance is treated as "already there"
    pub const MOVE_EPSILON: f32 = 0.5;

    /// Maximum particles alive at once
    pub const MAX_PARTICLES: usize = 256;
    /// Maximum extra ships granted by power-ups
    pub const MAX_EXTRA_SHIPS: usize = 4;
    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 1024;
}

/// Rectangular play field, origin top-left, y grows toward the player.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
    /// Extra room outside the visible field before entities are culled
    pub margin: f32,
}

impl PlayField {
    /// Clamp a point (with a body radius) to stay fully inside the field
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        let r = radius.min(self.width / 2.0).min(self.height / 2.0);
        Vec2::new(
            pos.x.clamp(r, self.width - r),
            pos.y.clamp(r, self.height - r),
        )
    }

    /// Which edge (if any) a point has crossed, including the margin
    pub fn exit_edge(&self, pos: Vec2) -> Option<Edge> {
        if pos.y > self.height + self.margin {
            Some(Edge::Bottom)
        } else if pos.y < -self.margin {
            Some(Edge::Top)
        } else if pos.x < -self.margin {
            Some(Edge::Left)
        } else if pos.x > self.width + self.margin {
            Some(Edge::Right)
        } else {
            None
        }
    }
}

/// Field edges. `Bottom` is the player's forward edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Milliseconds to seconds for integrating velocities
#[inline]
pub fn ms_to_secs(ms: u64) -> f32 {
    ms as f32 / 1000.0
}
