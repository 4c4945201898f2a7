//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded randomness only (world seed)
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemies;
pub mod platforms;
pub mod player;
pub mod rect;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{fall_and_land, lands_on, standing_on};
pub use enemies::{Enemy, EnemyKind, EnemyManager};
pub use platforms::{Platform, PlatformField, chunk_of};
pub use player::Player;
pub use rect::Rect;
pub use rng::{SimRng, seeded_random};
pub use state::{GameEvent, GamePhase, GameState, Viewport};
pub use tick::{TickInput, tick};
