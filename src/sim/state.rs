//! Game state and core simulation types
//!
//! Everything a match needs lives in [`GameState`]. Transient entities are
//! plain structs in `Vec`s; dropping one from its collection destroys it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::skins::{EnemySkin, default_skins};
use crate::tuning::Tuning;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for `start_game`
    Idle,
    /// Active gameplay
    Playing,
    /// Tick runs but changes nothing
    Paused,
    /// Run ended, final score reported
    GameOver,
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExtraShip,
    RapidFire,
    Shield,
    SlowMotion,
    ScoreMultiplier,
    Bomb,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::ExtraShip,
        PowerUpKind::RapidFire,
        PowerUpKind::Shield,
        PowerUpKind::SlowMotion,
        PowerUpKind::ScoreMultiplier,
        PowerUpKind::Bomb,
    ];

    /// Timed kinds enter the player's active-effect set
    pub fn is_timed(&self) -> bool {
        !matches!(self, PowerUpKind::ExtraShip | PowerUpKind::Bomb)
    }
}

/// A timed effect on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    /// Match-clock time at which the effect ends
    pub expires_at: u64,
}

/// An extra ship flying in formation with the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    pub id: u32,
    pub pos: Vec2,
    /// Lateral offset from the main ship
    pub offset: f32,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub pos: Vec2,
    /// Where the pointer wants the ship to be
    pub target: Option<Vec2>,
    pub radius: f32,
    pub lives: u8,
    pub score: u64,
    pub invincible: bool,
    pub invincible_until: u64,
    pub fire_cooldown_ms: u64,
    pub last_fire_ms: Option<u64>,
    pub effects: Vec<ActiveEffect>,
    pub ships: Vec<PlayerShip>,
    /// Avatar image reference for the renderer
    pub avatar: Option<String>,
}

impl Player {
    pub fn new(id: u32, tuning: &Tuning) -> Self {
        let field = tuning.field;
        Self {
            id,
            pos: Vec2::new(field.width / 2.0, field.height - tuning.player_radius * 2.0),
            target: None,
            radius: tuning.player_radius,
            lives: tuning.starting_lives,
            score: 0,
            invincible: false,
            invincible_until: 0,
            fire_cooldown_ms: tuning.fire_cooldown_ms,
            last_fire_ms: None,
            effects: Vec::new(),
            ships: Vec::new(),
            avatar: None,
        }
    }

    /// Start an invincibility window ending at `until`
    pub fn make_invincible(&mut self, until: u64) {
        self.invincible = true;
        self.invincible_until = until;
    }

    /// Keep formation ships lined up with the main ship
    pub fn sync_ships(&mut self) {
        let base = self.pos;
        for ship in &mut self.ships {
            ship.pos = Vec2::new(base.x + ship.offset, base.y);
        }
    }
}

/// An enemy or heavy obstacle block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: u32,
    pub max_health: u32,
    /// Index into `GameState::skins`
    pub skin: usize,
    pub score_value: u64,
    pub drop_chance: f64,
    /// Diameter / box width
    pub size: f32,
    /// Heavy obstacle block rather than a regular enemy
    pub heavy: bool,
}

impl Enemy {
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage, returns true if this destroyed the enemy
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(damage);
        was_alive && !self.is_alive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: BulletOwner,
    pub damage: u32,
    pub radius: f32,
}

/// A falling collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Floating "+points" text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePopup {
    pub id: u32,
    pub pos: Vec2,
    pub value: u64,
    pub life: f32,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    /// Enemies and obstacles (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub popups: Vec<ScorePopup>,
    /// Skin pool, never empty
    pub skins: Vec<EnemySkin>,
    /// Consecutive kills without a hit or escape
    pub combo: u32,
    pub max_combo: u32,
    /// Difficulty level, starts at 1
    pub level: u32,
    pub kills: u32,
    /// Match clock in ms, only advances while playing
    pub clock_ms: u64,
    pub last_enemy_spawn_ms: u64,
    pub last_obstacle_spawn_ms: u64,
    /// Events not yet handed to the host
    pub events: Vec<GameEvent>,
    pub(crate) game_over_reported: bool,
    next_id: u32,
}

impl GameState {
    /// Create an idle game with the given seed, tuning and skins
    pub fn new(seed: u64, tuning: Tuning, skins: Vec<EnemySkin>) -> Self {
        let skins = if skins.is_empty() { default_skins() } else { skins };
        let player = Player::new(1, &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Idle,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            popups: Vec::new(),
            skins,
            combo: 0,
            max_combo: 0,
            level: 1,
            kills: 0,
            clock_ms: 0,
            last_enemy_spawn_ms: 0,
            last_obstacle_spawn_ms: 0,
            events: Vec::new(),
            game_over_reported: false,
            next_id: 2,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Restart id allocation (new match)
    pub(crate) fn reset_ids(&mut self) {
        self.next_id = 1;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Hand pending events to the caller
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add points and announce the new score
    pub(crate) fn award(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        self.player.score = self.player.score.saturating_add(points);
        self.events.push(GameEvent::ScoreChanged {
            score: self.player.score,
        });
    }

    /// Break the current combo streak
    pub(crate) fn reset_combo(&mut self) {
        self.combo = 0;
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.bullets.sort_by_key(|b| b.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
