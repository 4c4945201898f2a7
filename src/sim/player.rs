//! The player character

use serde::{Deserialize, Serialize};

use super::collision::fall_and_land;
use super::rect::Rect;
use crate::tuning::PlayerTuning;

/// Held movement keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub velocity_y: f32,
    pub grounded: bool,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            rect: Rect::new(tuning.spawn_x, 0.0, tuning.size, tuning.size),
            velocity_y: 0.0,
            grounded: false,
        }
    }

    pub fn reset(&mut self, tuning: &PlayerTuning) {
        *self = Self::new(tuning);
    }

    /// Advance one frame. Returns true if a jump started.
    pub fn update<'a>(
        &mut self,
        input: MoveInput,
        tuning: &PlayerTuning,
        ground_top: f32,
        platforms: impl IntoIterator<Item = &'a Rect>,
    ) -> bool {
        if input.left {
            self.rect.x -= tuning.speed;
        }
        if input.right {
            self.rect.x += tuning.speed;
        }

        let mut jumped = false;
        if input.jump && self.grounded {
            self.velocity_y = tuning.jump_force;
            self.grounded = false;
            jumped = true;
        }

        let landing = fall_and_land(
            &self.rect,
            self.velocity_y,
            tuning.gravity,
            ground_top,
            platforms,
        );
        self.rect.y = landing.y;
        self.velocity_y = landing.velocity_y;
        self.grounded = landing.grounded;

        // Ceiling
        if self.rect.y < 0.0 {
            self.rect.y = 0.0;
            self.velocity_y = 0.0;
        }

        jumped
    }
}
