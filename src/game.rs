//! Game driver: input, fixed-step updates and the post-death flow
//!
//! The host feeds key/click events and frame deltas. When a run ends the
//! game asks the host to fetch the shared leaderboard, then either
//! collects initials or goes straight to the results screen. A submitted
//! score produces an outgoing blob for the host to post.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::leaderboard::Leaderboard;
use crate::platform;
use crate::renderer::mute_button_rect;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, Viewport, tick};
use crate::tuning::Tuning;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Backspace,
    Enter,
    /// Any single letter A-Z (case preserved)
    Letter(char),
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "ArrowUp" => Key::Up,
            "Backspace" => Key::Backspace,
            "Enter" => Key::Enter,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => Key::Letter(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// Game instance holding all state
#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    pub leaderboard: Leaderboard,
    pub settings: Settings,
    accumulator: f32,
    input: TickInput,
    /// Host should fetch the remote board
    leaderboard_request: bool,
    /// Blob the host should post to the remote board
    pending_upload: Option<String>,
}

impl Game {
    pub fn new(
        world_seed: u64,
        viewport: Viewport,
        tuning: Tuning,
        leaderboard: Leaderboard,
        settings: Settings,
    ) -> Self {
        log::info!("Game initialized with seed: {}", world_seed);
        Self {
            state: GameState::new(world_seed, viewport, tuning),
            leaderboard,
            settings,
            accumulator: 0.0,
            input: TickInput::default(),
            leaderboard_request: false,
            pending_upload: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    /// Run simulation ticks for a frame of `dt` seconds (non-finite deltas are ignored)
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() {
            return;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let was_playing = self.state.phase == GamePhase::Playing;
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            if was_playing && self.state.phase == GamePhase::Dead {
                self.input = TickInput::default();
                self.leaderboard_request = true;
            }
        }

        // Drop backlog we could not simulate this frame
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
    }

    pub fn key_down(&mut self, key: Key) {
        match self.state.phase {
            GamePhase::Start => {
                if self.state.can_proceed() {
                    self.input = TickInput::default();
                    self.leaderboard.reset_player_rank();
                    self.state.start_run();
                }
            }
            GamePhase::Playing => match key {
                Key::Letter('m' | 'M') => self.toggle_sound(),
                Key::Left => self.input.left = true,
                Key::Right => self.input.right = true,
                Key::Up => self.input.jump = true,
                _ => {}
            },
            GamePhase::Dead => {}
            GamePhase::EnteringName => match key {
                Key::Letter(c) => {
                    self.state.push_name_char(c);
                }
                Key::Backspace => {
                    self.state.pop_name_char();
                }
                Key::Enter => self.submit_name(),
                _ => {}
            },
            GamePhase::End => {
                if self.state.can_proceed() {
                    let seed = platform::now_ms() as u64;
                    self.input = TickInput::default();
                    self.state.reset(seed);
                    log::info!("New world seed: {}", seed);
                }
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.input.left = false,
            Key::Right => self.input.right = false,
            Key::Up => self.input.jump = false,
            _ => {}
        }
    }

    /// Canvas click in screen pixels
    pub fn click(&mut self, x: f32, y: f32) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        if mute_button_rect(self.state.viewport).contains(x, y) {
            self.toggle_sound();
        }
    }

    fn toggle_sound(&mut self) {
        let enabled = self.settings.toggle_sound();
        self.settings.save();
        self.state.events.push(GameEvent::SoundToggled { enabled });
    }

    /// Hand the fetched leaderboard blob to the game (`None` if the fetch failed)
    pub fn on_leaderboard_fetched(&mut self, blob: Option<&str>) {
        if self.state.phase != GamePhase::Dead {
            log::warn!(
                "Ignoring leaderboard while in phase {}",
                self.state.phase.as_str()
            );
            return;
        }

        match blob.map(Leaderboard::from_blob) {
            Some(Ok(fetched)) => {
                self.leaderboard.replace_scores(fetched);
                self.leaderboard.save_cached();
            }
            Some(Err(e)) => log::warn!("Failed to read leaderboard: {e}"),
            None => log::warn!("Leaderboard fetch failed, using cached scores"),
        }

        let survival = self.state.survival_secs;
        if self.leaderboard.qualifies(survival) {
            log::info!("{:.1}s qualifies for the leaderboard", survival);
            self.state.player_name.clear();
            self.state.enter_phase(GamePhase::EnteringName);
        } else {
            self.state.enter_phase(GamePhase::End);
        }
    }

    /// Submit the typed initials (ignored while empty)
    pub fn submit_name(&mut self) {
        if self.state.phase != GamePhase::EnteringName || self.state.player_name.is_empty() {
            return;
        }

        let rank = self.leaderboard.submit(
            &self.state.player_name,
            self.state.survival_secs,
            platform::now_ms(),
        );
        log::info!(
            "Submitted {} with {:.1}s, rank {:?}",
            self.state.player_name,
            self.state.survival_secs,
            rank.map(|r| r + 1)
        );
        self.pending_upload = Some(self.leaderboard.to_blob());
        self.leaderboard.save_cached();
        self.state.events.push(GameEvent::ScoreSubmitted { rank });
        self.state.enter_phase(GamePhase::End);
    }

    /// Whether the host should fetch the leaderboard now (clears the flag)
    pub fn take_leaderboard_request(&mut self) -> bool {
        std::mem::take(&mut self.leaderboard_request)
    }

    /// Blob the host should post to the remote board, if any
    pub fn take_upload(&mut self) -> Option<String> {
        self.pending_upload.take()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
