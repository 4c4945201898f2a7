//! Game state and core simulation types
//!
//! Everything a run needs lives here so a whole session is reproducible
//! from its world seed and the input sequence.

use serde::{Deserialize, Serialize};

use super::enemies::EnemyManager;
use super::platforms::PlatformField;
use super::player::Player;
use super::rng::SimRng;
use crate::consts::{GROUND_HEIGHT, MAX_NAME_LEN, SCREEN_DELAY_MS};
use crate::tuning::Tuning;

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a key
    Start,
    /// Active gameplay
    Playing,
    /// Frozen after death while the leaderboard is fetched
    Dead,
    /// Typing initials for a qualifying time
    EnteringName,
    /// Results and leaderboard
    End,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::Dead => "dead",
            GamePhase::EnteringName => "entering_name",
            GamePhase::End => "end",
        }
    }
}

/// Visible area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// World y of the ground surface
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Things that happened during a tick, for audio and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted,
    Jumped,
    EnemySpawned { flying: bool },
    PlatformFaded,
    PlayerDied { survival_secs: f64 },
    SoundToggled { enabled: bool },
    ScoreSubmitted { rank: Option<usize> },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Per-session seed for layouts and spawns
    pub world_seed: u64,
    pub rng: SimRng,
    pub viewport: Viewport,
    /// Simulation clock (ms), advances every tick in every phase
    pub clock_ms: f64,
    /// Clock time the current run started
    pub run_start_ms: f64,
    /// Seconds survived in the current run
    pub survival_secs: f64,
    /// Horizontal world offset of the left screen edge
    pub camera_x: f32,
    pub player: Player,
    pub platforms: PlatformField,
    pub enemies: EnemyManager,
    pub phase: GamePhase,
    /// Clock time the current screen was entered (start/end key delay)
    pub screen_entered_ms: f64,
    /// Initials typed on the name entry screen
    pub player_name: String,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the start screen
    pub fn new(world_seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        Self {
            world_seed,
            rng: SimRng::new(world_seed),
            viewport,
            clock_ms: 0.0,
            run_start_ms: 0.0,
            survival_secs: 0.0,
            camera_x: 0.0,
            player: Player::new(&tuning.player),
            platforms: PlatformField::new(),
            enemies: EnemyManager::new(&tuning.enemies),
            phase: GamePhase::Start,
            screen_entered_ms: 0.0,
            player_name: String::new(),
            events: Vec::new(),
            tuning,
        }
    }

    /// Whether the start/end screen has been up long enough to accept a key
    pub fn can_proceed(&self) -> bool {
        self.clock_ms - self.screen_entered_ms >= SCREEN_DELAY_MS
    }

    /// Switch phase and restart the screen delay
    pub fn enter_phase(&mut self, phase: GamePhase) {
        log::debug!("Phase {} -> {}", self.phase.as_str(), phase.as_str());
        self.phase = phase;
        self.screen_entered_ms = self.clock_ms;
    }

    /// Begin a run from the start screen
    pub fn start_run(&mut self) {
        self.phase = GamePhase::Playing;
        self.run_start_ms = self.clock_ms;
        self.survival_secs = 0.0;
        self.enemies.start(self.clock_ms);
        self.events.push(GameEvent::GameStarted);
        log::info!("Run started (seed {})", self.world_seed);
    }

    /// Stop the run after a fatal hit
    pub fn kill_player(&mut self) {
        self.enter_phase(GamePhase::Dead);
        self.events.push(GameEvent::PlayerDied {
            survival_secs: self.survival_secs,
        });
        log::info!("Player died after {:.1}s", self.survival_secs);
    }

    /// Clear the world for a new session with a fresh seed, back to the start screen
    pub fn reset(&mut self, world_seed: u64) {
        self.world_seed = world_seed;
        self.rng = SimRng::new(world_seed);
        self.player.reset(&self.tuning.player);
        self.platforms.reset();
        self.enemies.reset(&self.tuning.enemies);
        self.camera_x = 0.0;
        self.survival_secs = 0.0;
        self.player_name.clear();
        self.enter_phase(GamePhase::Start);
    }

    /// Append a typed letter to the initials (uppercased, max length enforced)
    pub fn push_name_char(&mut self, c: char) -> bool {
        if !c.is_ascii_alphabetic() || self.player_name.len() >= MAX_NAME_LEN {
            return false;
        }
        self.player_name.push(c.to_ascii_uppercase());
        true
    }

    pub fn pop_name_char(&mut self) -> bool {
        self.player_name.pop().is_some()
    }

    /// Camera keeps the player horizontally centred
    pub fn follow_player(&mut self) {
        self.camera_x =
            self.player.rect.x - self.viewport.width / 2.0 + self.player.rect.width / 2.0;
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state() -> GameState {
        GameState::new(7, Viewport::default(), Tuning::default())
    }

    #[test]
    fn test_new_state_on_start_screen() {
        let state = new_state();
        assert_eq!(state.phase, GamePhase::Start);
        assert!(!state.can_proceed());
        assert!(state.platforms.platforms.is_empty());
    }

    #[test]
    fn test_screen_delay() {
        let mut state = new_state();
        state.clock_ms = 1999.0;
        assert!(!state.can_proceed());
        state.clock_ms = 2000.0;
        assert!(state.can_proceed());
        state.enter_phase(GamePhase::End);
        assert!(!state.can_proceed());
    }

    #[test]
    fn test_name_entry_rules() {
        let mut state = new_state();
        assert!(state.push_name_char('a'));
        assert!(!state.push_name_char('1'));
        assert!(!state.push_name_char(' '));
        for c in ['b', 'c', 'd'] {
            assert!(state.push_name_char(c));
        }
        assert!(!state.push_name_char('e'));
        assert_eq!(state.player_name, "ABCD");
        assert!(state.pop_name_char());
        assert_eq!(state.player_name, "ABC");
    }

    #[test]
    fn test_camera_centres_player() {
        let mut state = new_state();
        state.player.rect.x = 1000.0;
        state.follow_player();
        assert_eq!(state.camera_x, 1000.0 - 640.0 + 20.0);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut state = new_state();
        state.start_run();
        state.player.rect.x = 5000.0;
        state.player_name.push_str("ZZ");
        state.clock_ms = 9000.0;
        state.reset(8);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.world_seed, 8);
        assert_eq!(state.player.rect.x, state.tuning.player.spawn_x);
        assert!(state.player_name.is_empty());
        assert_eq!(state.screen_entered_ms, 9000.0);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&GameEvent::EnemySpawned { flying: true }).unwrap();
        assert_eq!(json, r#"{"type":"enemy_spawned","flying":true}"#);
    }
}
