//! Match lifecycle and player actions
//!
//! ```text
//! Idle --start--> Playing <--pause/resume--> Paused
//!                    |                          |
//!               lives = 0 / end            end  |
//!                    v                          |
//!                 GameOver <--------------------+
//!                    |-- reset --> Idle
//!                    `-- start --> Playing
//! ```
//!
//! Anything else is refused with `false`. Actions outside `Playing` are
//! silently ignored so late input can't touch a finished match.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::{GameEvent, MatchSummary};
use super::factory;
use super::powerups;
use super::skins::{EnemySkin, default_skins};
use super::state::{GamePhase, GameState, Player, PowerUpKind};

/// Spread of the rapid-fire volley (radians either side of straight up)
const SPREAD_ANGLE: f32 = 0.15;

impl GameState {
    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::info!("Phase {:?} -> {:?}", from, to);
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Start (or restart) a match from `Idle` or `GameOver`
    pub fn start_game(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::GameOver) {
            return false;
        }

        let avatar = self.player.avatar.take();
        // Every match replays from the same seed
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.reset_ids();
        let player_id = self.next_entity_id();
        self.player = Player::new(player_id, &self.tuning);
        self.player.avatar = avatar;

        self.enemies.clear();
        self.bullets.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.popups.clear();

        self.combo = 0;
        self.max_combo = 0;
        self.level = 1;
        self.kills = 0;
        self.clock_ms = 0;
        self.last_enemy_spawn_ms = 0;
        self.last_obstacle_spawn_ms = 0;
        self.game_over_reported = false;

        log::info!("Match started (seed {}, {} skins)", self.seed, self.skins.len());
        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.set_phase(GamePhase::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Abandon the running match, reporting its score
    pub fn end_game(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            return false;
        }
        self.enter_game_over();
        true
    }

    /// Back to the title state after a finished match
    pub fn reset(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.set_phase(GamePhase::Idle);
        true
    }

    /// Switch to `GameOver`, announcing the result the first time only
    pub(crate) fn enter_game_over(&mut self) {
        self.set_phase(GamePhase::GameOver);
        if self.game_over_reported {
            return;
        }
        self.game_over_reported = true;

        let summary = self.summary();
        log::info!(
            "Game over: score {} at level {} ({} kills)",
            summary.final_score,
            summary.level,
            summary.kills
        );
        self.events.push(GameEvent::GameOver { summary });
    }

    /// Current match numbers
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            final_score: self.player.score,
            level: self.level,
            kills: self.kills,
            max_combo: self.max_combo,
            duration_ms: self.clock_ms,
        }
    }

    /// Point the ship at a field position; the tick moves it there
    pub fn move_player(&mut self, x: f32, y: f32) {
        if self.phase != GamePhase::Playing || !x.is_finite() || !y.is_finite() {
            return;
        }
        let target = self
            .tuning
            .field
            .clamp(Vec2::new(x, y), self.player.radius);
        self.player.target = Some(target);
    }

    /// Fire from the main ship and every formation ship.
    ///
    /// Returns false while not playing or still cooling down.
    pub fn fire_bullet(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let now = self.clock_ms;
        let cooldown = powerups::fire_cooldown(&self.player, &self.tuning);
        let cooling = self
            .player
            .last_fire_ms
            .is_some_and(|last| now.saturating_sub(last) < cooldown);
        if cooling {
            return false;
        }
        self.player.last_fire_ms = Some(now);

        let muzzle = Vec2::new(0.0, -self.player.radius);
        let mut shots: Vec<(Vec2, Vec2)> = vec![(self.player.pos + muzzle, Vec2::NEG_Y)];
        if powerups::has_active_power_up(&self.player, PowerUpKind::RapidFire) {
            for angle in [-SPREAD_ANGLE, SPREAD_ANGLE] {
                let dir = Vec2::new(angle.sin(), -angle.cos());
                shots.push((self.player.pos + muzzle, dir));
            }
        }
        for ship in &self.player.ships {
            shots.push((ship.pos + muzzle, Vec2::NEG_Y));
        }

        for (pos, dir) in shots {
            let id = self.next_entity_id();
            let bullet = factory::player_bullet(id, pos, dir, &self.tuning);
            self.bullets.push(bullet);
        }
        true
    }

    /// Apply a power-up directly (host-side grants, debug)
    pub fn collect_power_up(&mut self, kind: PowerUpKind) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        powerups::add_power_up(self, kind)
    }

    /// Replace the enemy skin pool; an empty list restores the defaults
    pub fn set_skins(&mut self, skins: Vec<EnemySkin>) {
        self.skins = if skins.is_empty() { default_skins() } else { skins };
        for enemy in &mut self.enemies {
            if enemy.skin >= self.skins.len() {
                enemy.skin = 0;
            }
        }
    }

    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.player.avatar = avatar;
    }
}
