//! Collision rules between moving bodies, platforms and the ground
//!
//! Platforms are one-way: bodies pass through from below and only land
//! on top while falling.

use super::rect::Rect;

/// Check whether a falling body should land on top of `surface` this frame
///
/// The body must overlap the surface horizontally, be falling or resting,
/// have its feet at or below the surface top but no deeper than what one
/// frame of fall could carry it (`surface.bottom() + velocity_y + 1`), and
/// still have its head above the surface top.
pub fn lands_on(body: &Rect, velocity_y: f32, surface: &Rect) -> bool {
    body.overlaps_x(surface)
        && velocity_y >= 0.0
        && body.bottom() >= surface.y
        && body.bottom() <= surface.bottom() + velocity_y + 1.0
        && body.y < surface.y
}

/// Check whether a body is standing on `surface` (feet within `tolerance` of its top)
pub fn standing_on(body: &Rect, velocity_y: f32, surface: &Rect, tolerance: f32) -> bool {
    body.overlaps_x(surface)
        && body.bottom() >= surface.y
        && body.bottom() <= surface.y + tolerance
        && velocity_y >= 0.0
}

/// Result of resolving vertical motion against the ground and platforms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// New top y of the body
    pub y: f32,
    /// New vertical velocity
    pub velocity_y: f32,
    /// Whether the body ended the frame supported
    pub grounded: bool,
}

/// Integrate gravity for one frame and resolve against ground and platforms
///
/// `ground_top` is the y of the ground surface. The first platform the body
/// lands on wins.
pub fn fall_and_land<'a>(
    body: &Rect,
    velocity_y: f32,
    gravity: f32,
    ground_top: f32,
    surfaces: impl IntoIterator<Item = &'a Rect>,
) -> Landing {
    let mut velocity_y = velocity_y + gravity;
    let mut y = body.y + velocity_y;
    let mut grounded = false;

    let rest_y = ground_top - body.height;
    if y >= rest_y {
        y = rest_y;
        velocity_y = 0.0;
        grounded = true;
    }

    let moved = Rect { y, ..*body };
    for surface in surfaces {
        if lands_on(&moved, velocity_y, surface) {
            y = surface.y - body.height;
            velocity_y = 0.0;
            grounded = true;
            break;
        }
    }

    Landing {
        y,
        velocity_y,
        grounded,
    }
}
