//! Data-driven game balance
//!
//! Every gameplay number lives here so it can be overridden from JSON
//! without a rebuild. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading tuning overrides
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Player movement (all speeds in pixels per frame)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub spawn_x: f32,
    pub size: f32,
    pub speed: f32,
    pub gravity: f32,
    pub jump_force: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            spawn_x: 100.0,
            size: 40.0,
            speed: 10.0,
            gravity: 0.6,
            jump_force: -15.0,
        }
    }
}

/// Procedural platform layout and decay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    /// World width of one generation chunk
    pub chunk_size: f32,
    pub platforms_per_chunk: u32,
    /// Minimum clearance between any two platforms
    pub min_gap: f32,
    pub height: f32,
    pub min_width: f32,
    pub width_range: f32,
    /// Horizontal margin kept free at both ends of a chunk
    pub chunk_margin: f32,
    /// Lowest platform top, measured up from the ground
    pub min_rise: f32,
    pub rise_range: f32,
    /// Chunks generated on each side of the player's chunk
    pub generate_radius: i64,
    /// Chunks remembered on each side before they may regenerate
    pub forget_radius: i64,
    /// Platforms further than this many chunks from the player are culled
    pub cull_chunks: f32,
    /// Depth below a platform top that still counts as standing on it
    pub standing_tolerance: f32,
    pub stand_before_fade_ms: f64,
    pub fade_duration_ms: f64,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            chunk_size: 800.0,
            platforms_per_chunk: 3,
            min_gap: 30.0,
            height: 20.0,
            min_width: 80.0,
            width_range: 120.0,
            chunk_margin: 100.0,
            min_rise: 100.0,
            rise_range: 250.0,
            generate_radius: 2,
            forget_radius: 4,
            cull_chunks: 3.0,
            standing_tolerance: 10.0,
            stand_before_fade_ms: 2000.0,
            fade_duration_ms: 1000.0,
        }
    }
}

/// Enemy spawning, movement and difficulty ramp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: f32,
    pub initial_cap: u32,
    pub hard_cap: u32,
    pub cap_increase_interval_ms: f64,
    pub spawn_cooldown_ms: f64,
    pub flying_after_ms: f64,
    pub flying_chance: f64,
    /// Off-screen spawn offset on the left edge
    pub spawn_offset_left: f32,
    /// Off-screen spawn offset on the right edge
    pub spawn_offset_right: f32,
    /// Despawn once further than this many viewport widths from the camera centre
    pub despawn_widths: f32,

    pub ground_min_speed: f32,
    pub ground_speed_range: f32,
    pub ground_gravity: f32,
    pub ground_jump_force: f32,
    pub jumper_chance: f64,
    pub first_jump_min_ms: f64,
    pub first_jump_range_ms: f64,
    pub jump_interval_min_ms: f64,
    pub jump_interval_range_ms: f64,

    pub flying_min_speed: f32,
    pub flying_speed_range: f32,
    pub flying_min_y: f32,
    /// Flying enemies stay at least this far above the ground
    pub flying_ground_clearance: f32,
    pub zigzag_chance: f64,
    pub zigzag_min_amplitude: f32,
    pub zigzag_amplitude_range: f32,
    pub zigzag_min_frequency: f32,
    pub zigzag_frequency_range: f32,
    pub wing_speed: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: 40.0,
            initial_cap: 1,
            hard_cap: 50,
            cap_increase_interval_ms: 5000.0,
            spawn_cooldown_ms: 1000.0,
            flying_after_ms: 10_000.0,
            flying_chance: 0.3,
            spawn_offset_left: 50.0,
            spawn_offset_right: 10.0,
            despawn_widths: 1.5,

            ground_min_speed: 3.0,
            ground_speed_range: 2.0,
            ground_gravity: 0.6,
            ground_jump_force: -12.0,
            jumper_chance: 0.3,
            first_jump_min_ms: 1000.0,
            first_jump_range_ms: 2000.0,
            jump_interval_min_ms: 1500.0,
            jump_interval_range_ms: 2000.0,

            flying_min_speed: 4.0,
            flying_speed_range: 2.0,
            flying_min_y: 50.0,
            flying_ground_clearance: 150.0,
            zigzag_chance: 0.5,
            zigzag_min_amplitude: 40.0,
            zigzag_amplitude_range: 30.0,
            zigzag_min_frequency: 0.01,
            zigzag_frequency_range: 0.01,
            wing_speed: 0.2,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub platforms: PlatformTuning,
    pub enemies: EnemyTuning,
}

impl Tuning {
    /// Parse overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break generation or physics
    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.platforms;
        if p.chunk_size <= 0.0 {
            return Err(TuningError::Invalid {
                field: "platforms.chunk_size",
                reason: "must be positive",
            });
        }
        if p.min_width + p.width_range + 2.0 * p.chunk_margin > p.chunk_size {
            return Err(TuningError::Invalid {
                field: "platforms.chunk_margin",
                reason: "widest platform plus margins must fit in a chunk",
            });
        }
        if p.forget_radius < p.generate_radius {
            return Err(TuningError::Invalid {
                field: "platforms.forget_radius",
                reason: "must be at least generate_radius",
            });
        }
        if p.fade_duration_ms <= 0.0 {
            return Err(TuningError::Invalid {
                field: "platforms.fade_duration_ms",
                reason: "must be positive",
            });
        }
        if self.player.size <= 0.0 || self.enemies.size <= 0.0 {
            return Err(TuningError::Invalid {
                field: "size",
                reason: "entity sizes must be positive",
            });
        }
        if self.enemies.hard_cap == 0 {
            return Err(TuningError::Invalid {
                field: "enemies.hard_cap",
                reason: "must be at least 1",
            });
        }
        for (field, chance) in [
            ("enemies.flying_chance", self.enemies.flying_chance),
            ("enemies.jumper_chance", self.enemies.jumper_chance),
            ("enemies.zigzag_chance", self.enemies.zigzag_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "probability must be within 0..=1",
                });
            }
        }
        Ok(())
    }

    /// Load from the file named by `SKY_RUNNER_TUNING`, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("SKY_RUNNER_TUNING") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {path}");
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to load tuning from {path}: {e}, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {path}: {e}, using defaults");
                Self::default()
            }
        }
    }
}
