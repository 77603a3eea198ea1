//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod combat;
pub mod events;
pub mod factory;
pub mod geometry;
pub mod machine;
pub mod powerups;
pub mod skins;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use events::{GameEvent, GameListener, MatchSummary, dispatch};
pub use powerups::{add_power_up, has_active_power_up, update_player_power_ups};
pub use skins::{EnemySkin, SkinSource, WalletAsset, skins_from_assets, skins_from_json};
pub use snapshot::Snapshot;
pub use spawn::{enemy_spawn_interval, obstacle_spawn_interval};
pub use state::{
    ActiveEffect, Bullet, BulletOwner, Enemy, GamePhase, GameState, Particle, Player, PlayerShip,
    PowerUp, PowerUpKind, ScorePopup,
};
pub use tick::{TickInput, tick};
