//! Shape generation for the draw list
//!
//! Every helper takes world-space geometry plus the camera offset and
//! appends screen-space rectangles.

use super::vertex::{Palette, RectInstance, colors};
use crate::sim::{Enemy, EnemyKind, Platform, Player, Rect};

/// Wing flap amplitude in pixels
const WING_FLAP: f32 = 6.0;

/// Whether a world rect is at least partly on screen horizontally
#[inline]
pub fn visible(rect: &Rect, camera_x: f32, screen_width: f32) -> bool {
    let screen_x = rect.x - camera_x;
    screen_x + rect.width >= 0.0 && screen_x <= screen_width
}

/// Ground strip with a grass edge
pub fn ground(out: &mut Vec<RectInstance>, width: f32, ground_y: f32, height: f32, palette: &Palette) {
    out.push(RectInstance::new(0.0, ground_y, width, height - ground_y, palette.ground));
    out.push(RectInstance::new(0.0, ground_y - 4.0, width, 8.0, palette.grass));
}

/// Platform body, grass top and edges, faded by its opacity
pub fn platform(out: &mut Vec<RectInstance>, platform: &Platform, camera_x: f32, palette: &Palette) {
    let r = platform.rect;
    let x = r.x - camera_x;
    let opacity = platform.opacity;

    out.push(RectInstance::new(x, r.y, r.width, r.height, palette.platform).faded(opacity));
    out.push(RectInstance::new(x, r.y, r.width, 8.0, palette.grass).faded(opacity));
    if r.height > 8.0 {
        let edge_h = r.height - 8.0;
        out.push(RectInstance::new(x, r.y + 8.0, 4.0, edge_h, palette.platform_edge).faded(opacity));
        out.push(
            RectInstance::new(x + r.width - 4.0, r.y + 8.0, 4.0, edge_h, palette.platform_edge)
                .faded(opacity),
        );
    }
}

/// Player body with eyes and mouth
pub fn player(out: &mut Vec<RectInstance>, player: &Player, camera_x: f32, palette: &Palette) {
    let r = player.rect;
    let x = r.x - camera_x;
    out.push(RectInstance::new(x, r.y, r.width, r.height, palette.player));
    out.push(RectInstance::new(x + 8.0, r.y + 10.0, 6.0, 6.0, colors::FACE));
    out.push(RectInstance::new(x + 26.0, r.y + 10.0, 6.0, 6.0, colors::FACE));
    out.push(RectInstance::new(x + 12.0, r.y + 26.0, 16.0, 4.0, colors::FACE));
}

/// Enemy body and face; flying enemies get flapping wings behind the body
pub fn enemy(out: &mut Vec<RectInstance>, enemy: &Enemy, camera_x: f32, palette: &Palette) {
    let r = enemy.rect;
    let x = r.x - camera_x;

    match &enemy.kind {
        EnemyKind::Flying(path) => {
            let flap = path.wing_phase.sin() * WING_FLAP;
            out.push(RectInstance::new(x - 15.0, r.y + 5.0 + flap, 13.0, 15.0, palette.wing));
            out.push(RectInstance::new(x + r.width + 2.0, r.y + 5.0 + flap, 13.0, 15.0, palette.wing));
            out.push(RectInstance::new(x, r.y, r.width, r.height, palette.enemy));
            out.push(RectInstance::new(x + 8.0, r.y + 10.0, 6.0, 6.0, colors::ENEMY_FACE));
            out.push(RectInstance::new(x + 26.0, r.y + 10.0, 6.0, 6.0, colors::ENEMY_FACE));
            out.push(RectInstance::new(x + 14.0, r.y + 28.0, 12.0, 3.0, colors::ENEMY_FACE));
        }
        EnemyKind::Ground(_) => {
            out.push(RectInstance::new(x, r.y, r.width, r.height, palette.enemy));
            out.push(RectInstance::new(x + 6.0, r.y + 8.0, 8.0, 6.0, colors::ENEMY_FACE));
            out.push(RectInstance::new(x + 26.0, r.y + 8.0, 8.0, 6.0, colors::ENEMY_FACE));
            out.push(RectInstance::new(x + 10.0, r.y + 28.0, 20.0, 4.0, colors::ENEMY_FACE));
        }
    }
}
