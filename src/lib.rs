//! Sky Runner - An endless side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, platforms, enemies, game flow state)
//! - `game`: Input handling, fixed-step driver, death/leaderboard flow
//! - `leaderboard`: Top-10 survival times shared through a remote JSON blob
//! - `renderer`: Screen-space draw list for the canvas host
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod leaderboard;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, Key};
pub use leaderboard::Leaderboard;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one gameplay frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed timestep in milliseconds
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 6;
    /// Largest frame delta the driver accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Height of the ground strip at the bottom of the viewport
    pub const GROUND_HEIGHT: f32 = 60.0;

    /// Minimum time on the start/end screens before a key press is accepted
    pub const SCREEN_DELAY_MS: f64 = 2000.0;

    /// Leaderboard size
    pub const MAX_LEADERBOARD_ENTRIES: usize = 10;
    /// Maximum initials length on the leaderboard
    pub const MAX_NAME_LEN: usize = 4;
}
