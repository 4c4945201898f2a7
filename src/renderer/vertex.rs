//! Instance type for the 2D draw list

use bytemuck::{Pod, Zeroable};

/// Screen-space filled rectangle with a straight-alpha RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectInstance {
    /// Floats per instance in the flattened buffer
    pub const FLOATS: usize = std::mem::size_of::<RectInstance>() / std::mem::size_of::<f32>();

    pub const fn new(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            size: [width, height],
            color,
        }
    }

    /// Same rectangle with its alpha scaled by `opacity`
    pub fn faded(mut self, opacity: f32) -> Self {
        self.color[3] *= opacity.clamp(0.0, 1.0);
        self
    }
}

/// Convert a `#RRGGBB` literal to 0..1 RGBA
pub const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Colors for game elements
pub mod colors {
    use super::rgb;

    pub const GROUND: [f32; 4] = rgb(0x3D6B3D);
    pub const GRASS: [f32; 4] = rgb(0x4A8A4A);
    pub const PLATFORM: [f32; 4] = rgb(0x8B4513);
    pub const PLATFORM_EDGE: [f32; 4] = rgb(0x6B3510);
    pub const PLAYER: [f32; 4] = rgb(0xE94560);
    pub const FACE: [f32; 4] = rgb(0xFFFFFF);
    pub const ENEMY: [f32; 4] = rgb(0xFFD700);
    pub const ENEMY_FACE: [f32; 4] = rgb(0x000000);
    pub const WING: [f32; 4] = rgb(0xFFA500);
    pub const HUD_PANEL: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const SOUND_ON: [f32; 4] = rgb(0x00FF00);
    pub const SOUND_OFF: [f32; 4] = rgb(0xE94560);

    // Screen overlays per phase
    pub const OVERLAY_START: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
    pub const OVERLAY_DEAD: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const OVERLAY_RESULTS: [f32; 4] = [0.0, 0.0, 0.0, 0.85];

    /// High contrast replacements
    pub mod high_contrast {
        use super::super::rgb;

        pub const GROUND: [f32; 4] = rgb(0x202020);
        pub const GRASS: [f32; 4] = rgb(0xFFFFFF);
        pub const PLATFORM: [f32; 4] = rgb(0x00A0FF);
        pub const PLATFORM_EDGE: [f32; 4] = rgb(0x0060C0);
        pub const PLAYER: [f32; 4] = rgb(0x00FF00);
        pub const ENEMY: [f32; 4] = rgb(0xFF0000);
        pub const WING: [f32; 4] = rgb(0xFF00FF);
    }
}

/// Palette picked from settings
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub ground: [f32; 4],
    pub grass: [f32; 4],
    pub platform: [f32; 4],
    pub platform_edge: [f32; 4],
    pub player: [f32; 4],
    pub enemy: [f32; 4],
    pub wing: [f32; 4],
}

impl Palette {
    pub fn new(high_contrast: bool) -> Self {
        if high_contrast {
            use colors::high_contrast as hc;
            Self {
                ground: hc::GROUND,
                grass: hc::GRASS,
                platform: hc::PLATFORM,
                platform_edge: hc::PLATFORM_EDGE,
                player: hc::PLAYER,
                enemy: hc::ENEMY,
                wing: hc::WING,
            }
        } else {
            Self {
                ground: colors::GROUND,
                grass: colors::GRASS,
                platform: colors::PLATFORM,
                platform_edge: colors::PLATFORM_EDGE,
                player: colors::PLAYER,
                enemy: colors::ENEMY,
                wing: colors::WING,
            }
        }
    }
}
