//! Game balance tuning
//!
//! Every gameplay constant lives here, grouped into two profiles of the same
//! engine. Hosts can override any field from JSON; missing fields fall back to
//! the named profile's defaults.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PlayField;

/// Balance profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Flat 2-D field, circle collisions, combo-weighted scoring
    #[default]
    Arcade,
    /// Wider isometric field, box collisions, flat scoring, obstacle cadence
    /// scaled by difficulty
    Isometric,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Arcade => "arcade",
            Profile::Isometric => "isometric",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arcade" | "2d" => Some(Profile::Arcade),
            "isometric" | "iso" | "3d" => Some(Profile::Isometric),
            _ => None,
        }
    }
}

/// Bounding volume used for bullet/enemy and enemy/player overlap tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionShape {
    Circle,
    Box,
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub profile: Profile,
    pub field: PlayField,
    pub collision: CollisionShape,

    // === Player ===
    pub starting_lives: u8,
    pub player_radius: f32,
    /// Max player speed toward the pointer (px/s)
    pub player_speed: f32,
    pub invincibility_ms: u64,
    pub fire_cooldown_ms: u64,
    /// Lateral distance between extra ships
    pub ship_spacing: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_damage: u32,
    pub bullet_radius: f32,

    // === Enemies ===
    pub enemy_base_health: u32,
    /// One extra hit point every N levels
    pub enemy_health_level_divisor: u32,
    pub enemy_base_speed: f32,
    pub enemy_speed_per_level: f32,
    /// Max lateral drift speed (px/s)
    pub enemy_drift: f32,
    pub enemy_size: f32,
    pub enemy_score: u64,
    pub enemy_drop_chance: f64,

    // === Obstacles (heavy blocks) ===
    pub obstacle_base_health: u32,
    pub obstacle_speed: f32,
    pub obstacle_size: f32,
    pub obstacle_score: u64,
    pub obstacle_drop_chance: f64,

    // === Spawning & difficulty ===
    pub spawn_base_ms: u64,
    pub spawn_step_ms: u64,
    pub spawn_floor_ms: u64,
    pub obstacle_base_ms: u64,
    /// Per-level reduction of the obstacle interval (0 = fixed cadence)
    pub obstacle_step_ms: u64,
    pub obstacle_floor_ms: u64,
    /// Match time per difficulty level
    pub level_duration_ms: u64,

    // === Scoring ===
    /// Percent bonus per combo step (0 = flat scoring)
    pub combo_weight_pct: u64,
    /// Factor applied while the score multiplier effect is active
    pub score_multiplier: u64,

    // === Power-ups ===
    pub power_up_fall_speed: f32,
    pub pickup_radius: f32,
    pub rapid_fire_ms: u64,
    pub shield_ms: u64,
    pub slow_motion_ms: u64,
    pub score_multiplier_ms: u64,
    pub rapid_fire_divisor: u64,
    /// Enemy speed factor under slow motion
    pub slow_enemy_factor: f32,
    /// Player speed factor under slow motion
    pub slow_player_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::arcade()
    }
}

impl Tuning {
    /// Tuning for a profile
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Arcade => Self::arcade(),
            Profile::Isometric => Self::isometric(),
        }
    }

    fn arcade() -> Self {
        Self {
            profile: Profile::Arcade,
            field: PlayField {
                width: 400.0,
                height: 600.0,
                margin: 50.0,
            },
            collision: CollisionShape::Circle,

            starting_lives: 3,
            player_radius: 20.0,
            player_speed: 420.0,
            invincibility_ms: 2000,
            fire_cooldown_ms: 250,
            ship_spacing: 36.0,

            bullet_speed: 640.0,
            bullet_damage: 1,
            bullet_radius: 4.0,

            enemy_base_health: 1,
            enemy_health_level_divisor: 3,
            enemy_base_speed: 80.0,
            enemy_speed_per_level: 10.0,
            enemy_drift: 30.0,
            enemy_size: 40.0,
            enemy_score: 100,
            enemy_drop_chance: 0.2,

            obstacle_base_health: 5,
            obstacle_speed: 50.0,
            obstacle_size: 64.0,
            obstacle_score: 250,
            obstacle_drop_chance: 0.5,

            spawn_base_ms: 1500,
            spawn_step_ms: 100,
            spawn_floor_ms: 500,
            obstacle_base_ms: 8000,
            obstacle_step_ms: 0,
            obstacle_floor_ms: 8000,
            level_duration_ms: 20_000,

            combo_weight_pct: 10,
            score_multiplier: 2,

            power_up_fall_speed: 120.0,
            pickup_radius: 30.0,
            rapid_fire_ms: 8000,
            shield_ms: 6000,
            slow_motion_ms: 5000,
            score_multiplier_ms: 10_000,
            rapid_fire_divisor: 3,
            slow_enemy_factor: 0.5,
            slow_player_factor: 1.25,
        }
    }

    fn isometric() -> Self {
        Self {
            profile: Profile::Isometric,
            field: PlayField {
                width: 800.0,
                height: 600.0,
                margin: 80.0,
            },
            collision: CollisionShape::Box,

            player_speed: 520.0,
            ship_spacing: 48.0,

            enemy_base_speed: 100.0,
            enemy_speed_per_level: 12.0,
            enemy_size: 48.0,
            enemy_score: 100,
            enemy_drop_chance: 0.3,

            obstacle_base_health: 8,
            obstacle_size: 72.0,
            obstacle_score: 50,

            spawn_base_ms: 2000,
            spawn_step_ms: 150,
            spawn_floor_ms: 500,
            obstacle_base_ms: 6000,
            obstacle_step_ms: 250,
            obstacle_floor_ms: 2000,

            combo_weight_pct: 0,
            ..Self::arcade()
        }
    }

    /// Parse tuning overrides from JSON on top of the default profile
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Self::from_json_over(Profile::default(), json)
    }

    /// Parse tuning overrides from JSON on top of `base`.
    ///
    /// An optional `"profile"` key replaces `base`; every other key
    /// overrides a single field of the chosen profile.
    pub fn from_json_over(base: Profile, json: &str) -> Result<Self, TuningError> {
        let overrides: Value =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        let Value::Object(overrides) = overrides else {
            return Err(TuningError::Parse("expected a JSON object".to_string()));
        };

        let profile = match overrides.get("profile") {
            None => base,
            Some(Value::String(name)) => Profile::from_str(name)
                .ok_or_else(|| TuningError::UnknownProfile(name.clone()))?,
            Some(other) => return Err(TuningError::UnknownProfile(other.to_string())),
        };

        let mut merged = serde_json::to_value(Self::for_profile(profile))
            .map_err(|e| TuningError::Parse(e.to_string()))?;
        if let Value::Object(base) = &mut merged {
            for (key, value) in overrides {
                if key == "profile" {
                    continue;
                }
                if !base.contains_key(&key) {
                    return Err(TuningError::UnknownField(key));
                }
                base.insert(key, value);
            }
            base.insert("profile".to_string(), Value::String(profile.as_str().to_string()));
        }

        let tuning: Self =
            serde_json::from_value(merged).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        log::info!("Loaded {} tuning overrides", tuning.profile.as_str());
        Ok(tuning)
    }

    /// Check that values keep the simulation well-defined
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            if ok {
                Ok(())
            } else {
                Err(TuningError::Invalid { field, reason })
            }
        }

        check(
            self.field.width > 0.0 && self.field.height > 0.0,
            "field",
            "dimensions must be positive",
        )?;
        check(self.field.margin >= 0.0, "field", "margin must not be negative")?;
        check(self.starting_lives >= 1, "starting_lives", "must be at least 1")?;
        check(self.spawn_floor_ms > 0, "spawn_floor_ms", "must be positive")?;
        check(
            self.spawn_floor_ms <= self.spawn_base_ms,
            "spawn_floor_ms",
            "must not exceed spawn_base_ms",
        )?;
        check(self.obstacle_floor_ms > 0, "obstacle_floor_ms", "must be positive")?;
        check(
            self.obstacle_floor_ms <= self.obstacle_base_ms,
            "obstacle_floor_ms",
            "must not exceed obstacle_base_ms",
        )?;
        check(self.level_duration_ms > 0, "level_duration_ms", "must be positive")?;
        check(
            self.enemy_base_health >= 1 && self.obstacle_base_health >= 1,
            "enemy_base_health",
            "enemies need at least one hit point",
        )?;
        check(
            self.enemy_health_level_divisor >= 1,
            "enemy_health_level_divisor",
            "must be at least 1",
        )?;
        check(
            (0.0..=1.0).contains(&self.enemy_drop_chance)
                && (0.0..=1.0).contains(&self.obstacle_drop_chance),
            "enemy_drop_chance",
            "drop chances must be within 0..=1",
        )?;
        check(self.score_multiplier >= 1, "score_multiplier", "must be at least 1")?;
        check(self.rapid_fire_divisor >= 1, "rapid_fire_divisor", "must be at least 1")?;
        check(
            self.slow_enemy_factor > 0.0 && self.slow_player_factor > 0.0,
            "slow_enemy_factor",
            "slow motion factors must be positive",
        )?;
        check(self.bullet_damage >= 1, "bullet_damage", "must be at least 1")?;
        Ok(())
    }

    /// Duration of a timed power-up, `None` for instant/permanent kinds
    pub fn effect_duration_ms(&self, kind: crate::sim::PowerUpKind) -> Option<u64> {
        use crate::sim::PowerUpKind;
        match kind {
            PowerUpKind::RapidFire => Some(self.rapid_fire_ms),
            PowerUpKind::Shield => Some(self.shield_ms),
            PowerUpKind::SlowMotion => Some(self.slow_motion_ms),
            PowerUpKind::ScoreMultiplier => Some(self.score_multiplier_ms),
            PowerUpKind::ExtraShip | PowerUpKind::Bomb => None,
        }
    }
}

/// Errors from loading or validating tuning
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TuningError {
    Parse(String),
    UnknownProfile(String),
    UnknownField(String),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
            Self::UnknownProfile(name) => write!(f, "unknown tuning profile: {name}"),
            Self::UnknownField(name) => write!(f, "unknown tuning field: {name}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning value {field}: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {}
