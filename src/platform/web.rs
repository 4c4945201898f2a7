//! JavaScript-facing game handle
//!
//! The page owns the canvas, audio and network. It forwards DOM input,
//! calls `frame` from `requestAnimationFrame`, paints the draw list and
//! services the leaderboard fetch/post requests the game raises.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::{Game, Key};
use crate::leaderboard::{Leaderboard, format_date};
use crate::platform::now_ms;
use crate::renderer::{RectInstance, build_draw_list, format_timer};
use crate::settings::Settings;
use crate::sim::Viewport;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Sky Runner starting...");
}

/// Leaderboard row as shown on the end screen
#[derive(Serialize)]
struct LeaderboardRow<'a> {
    rank: usize,
    name: &'a str,
    score: f64,
    when: String,
    is_player: bool,
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game for a canvas of the given CSS size.
    /// `tuning_json` overrides the default balance.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, tuning_json: Option<String>) -> Result<WebGame, JsError> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::default(),
        };
        let seed = now_ms() as u64;
        let game = Game::new(
            seed,
            Viewport::new(width, height),
            tuning,
            Leaderboard::load_cached(),
            Settings::load(),
        );
        Ok(WebGame {
            game,
            last_time: None,
        })
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.game.resize(Viewport::new(width, height));
    }

    /// `KeyboardEvent.key` of a keydown
    pub fn key_down(&mut self, key: &str) {
        self.game.key_down(Key::from_dom(key));
    }

    pub fn key_up(&mut self, key: &str) {
        self.game.key_up(Key::from_dom(key));
    }

    /// Canvas-relative click position
    pub fn click(&mut self, x: f32, y: f32) {
        self.game.click(x, y);
    }

    /// Advance to the `requestAnimationFrame` timestamp
    pub fn frame(&mut self, now_ms: f64) {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.game.update(dt);
    }

    /// Flattened draw list, `RectInstance::FLOATS` floats per rectangle:
    /// x, y, width, height, r, g, b, a
    pub fn draw_list(&self) -> js_sys::Float32Array {
        let list = build_draw_list(&self.game.state, &self.game.settings);
        js_sys::Float32Array::from(bytemuck::cast_slice::<RectInstance, f32>(&list))
    }

    pub fn floats_per_rect(&self) -> usize {
        RectInstance::FLOATS
    }

    pub fn phase(&self) -> String {
        self.game.phase().as_str().to_string()
    }

    /// Start/end screens accept a key
    pub fn can_proceed(&self) -> bool {
        self.game.state.can_proceed()
    }

    pub fn survival_time(&self) -> f64 {
        self.game.state.survival_secs
    }

    pub fn timer_text(&self) -> String {
        format_timer(self.game.state.survival_secs)
    }

    pub fn player_name(&self) -> String {
        self.game.state.player_name.clone()
    }

    pub fn sound_enabled(&self) -> bool {
        self.game.settings.sound_enabled
    }

    pub fn sfx_volume(&self) -> f32 {
        self.game.settings.effective_sfx_volume()
    }

    /// Background music gain (0 when muted)
    pub fn music_volume(&self) -> f32 {
        self.game.settings.effective_music_volume()
    }

    /// Best time on the board, for the start screen
    pub fn best_time(&self) -> Option<f64> {
        self.game.leaderboard.top_score()
    }

    /// Rows for the end screen as a JSON array
    pub fn leaderboard_json(&self) -> String {
        let board = &self.game.leaderboard;
        let now = now_ms();
        let rows: Vec<LeaderboardRow> = board
            .scores
            .iter()
            .enumerate()
            .map(|(i, entry)| LeaderboardRow {
                rank: i + 1,
                name: &entry.name,
                score: entry.score,
                when: format_date(entry.date, now),
                is_player: board.player_rank == Some(i),
            })
            .collect();
        serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    /// True once after the player dies: fetch the remote board and call
    /// `leaderboard_fetched`
    pub fn take_leaderboard_request(&mut self) -> bool {
        self.game.take_leaderboard_request()
    }

    /// Fetched blob text, or `undefined` if the request failed
    pub fn leaderboard_fetched(&mut self, blob: Option<String>) {
        self.game.on_leaderboard_fetched(blob.as_deref());
    }

    pub fn submit_name(&mut self) {
        self.game.submit_name();
    }

    /// Blob to post to the remote board after a submission
    pub fn take_upload(&mut self) -> Option<String> {
        self.game.take_upload()
    }

    /// Events since the last call as a JSON array
    pub fn drain_events(&mut self) -> String {
        let events = self.game.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Failed to encode events: {e}");
            "[]".to_string()
        })
    }
}
