//! Fixed timestep simulation tick
//!
//! Core game loop that advances the run deterministically, one gameplay
//! frame per call.

use super::player::MoveInput;
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState};

/// Held keys for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl From<TickInput> for MoveInput {
    fn from(input: TickInput) -> Self {
        MoveInput {
            left: input.left,
            right: input.right,
            jump: input.jump,
        }
    }
}

/// Advance the game state by one fixed timestep (`dt` in seconds)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt_ms = dt as f64 * 1000.0;
    state.clock_ms += dt_ms;

    if state.phase != GamePhase::Playing {
        return;
    }

    let now = state.clock_ms;
    state.survival_secs = (now - state.run_start_ms) / 1000.0;

    // Difficulty ramp
    state.enemies.increase_cap_if_due(now, &state.tuning.enemies);

    // Spawn
    if let Some(flying) = state.enemies.try_spawn(
        now,
        now - state.run_start_ms,
        state.camera_x,
        state.viewport,
        &state.tuning.enemies,
        &mut state.rng,
    ) {
        state.events.push(GameEvent::EnemySpawned { flying });
    }

    // Enemies move against the current platforms
    let platform_rects: Vec<Rect> = state.platforms.rects().copied().collect();
    state.enemies.update(
        now,
        state.camera_x,
        state.viewport,
        &platform_rects,
        &state.tuning.enemies,
        &mut state.rng,
    );

    // Platform decay
    let faded = state.platforms.update_stability(
        &state.player.rect,
        state.player.velocity_y,
        dt_ms,
        &state.tuning.platforms,
    );
    for _ in 0..faded {
        state.events.push(GameEvent::PlatformFaded);
    }

    // Fatal contact freezes the frame
    if state.enemies.hits(&state.player.rect).is_some() {
        state.kill_player();
        return;
    }

    // Player
    let ground_top = state.viewport.ground_y();
    let jumped = state.player.update(
        (*input).into(),
        &state.tuning.player,
        ground_top,
        state.platforms.rects(),
    );
    if jumped {
        state.events.push(GameEvent::Jumped);
    }

    state.follow_player();

    // Keep the world generated around the player
    state.platforms.update_around(
        state.player.rect.x,
        ground_top,
        state.world_seed,
        &state.tuning.platforms,
    );
}
