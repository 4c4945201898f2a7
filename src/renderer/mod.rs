//! Draw list rendering
//!
//! The crate does not touch the canvas. Each frame it flattens the visible
//! world into screen-space rectangles which the host paints in order.
//! Text (timer, prompts, leaderboard) is left to the host.

pub mod shapes;
pub mod vertex;

pub use vertex::{Palette, RectInstance, colors};

use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Rect, Viewport};

/// Mute button bounds in screen pixels, overlapping the timer panel's left edge
pub fn mute_button_rect(viewport: Viewport) -> Rect {
    Rect::new(viewport.width - 200.0, 10.0, 80.0, 50.0)
}

/// Timer panel bounds in screen pixels
pub fn timer_rect(viewport: Viewport) -> Rect {
    Rect::new(viewport.width - 150.0, 10.0, 140.0, 50.0)
}

/// Survival time as shown on the HUD
pub fn format_timer(secs: f64) -> String {
    format!("{:.1}s", secs)
}

/// Build the frame's rectangles, back to front
pub fn build_draw_list(state: &GameState, settings: &Settings) -> Vec<RectInstance> {
    let palette = Palette::new(settings.high_contrast);
    let viewport = state.viewport;
    let camera_x = state.camera_x;
    let mut out = Vec::with_capacity(64 + state.platforms.platforms.len() * 4);

    shapes::ground(
        &mut out,
        viewport.width,
        viewport.ground_y(),
        viewport.height,
        &palette,
    );

    for platform in &state.platforms.platforms {
        if shapes::visible(&platform.rect, camera_x, viewport.width) {
            shapes::platform(&mut out, platform, camera_x, &palette);
        }
    }

    for enemy in &state.enemies.enemies {
        if shapes::visible(&enemy.rect, camera_x, viewport.width) {
            shapes::enemy(&mut out, enemy, camera_x, &palette);
        }
    }

    shapes::player(&mut out, &state.player, camera_x, &palette);

    match state.phase {
        GamePhase::Playing => {
            if settings.show_timer {
                let t = timer_rect(viewport);
                out.push(RectInstance::new(t.x, t.y, t.width, t.height, colors::HUD_PANEL));
            }
            let b = mute_button_rect(viewport);
            out.push(RectInstance::new(b.x, b.y, b.width, b.height, colors::HUD_PANEL));
            let indicator = if settings.sound_enabled {
                colors::SOUND_ON
            } else {
                colors::SOUND_OFF
            };
            out.push(RectInstance::new(b.x + 10.0, b.y + 20.0, 10.0, 10.0, indicator));
        }
        GamePhase::Start => out.push(overlay(viewport, colors::OVERLAY_START)),
        GamePhase::Dead => out.push(overlay(viewport, colors::OVERLAY_DEAD)),
        GamePhase::EnteringName | GamePhase::End => {
            out.push(overlay(viewport, colors::OVERLAY_RESULTS))
        }
    }

    out
}

fn overlay(viewport: Viewport, color: [f32; 4]) -> RectInstance {
    RectInstance::new(0.0, 0.0, viewport.width, viewport.height, color)
}
