//! Retro Dodge - a configurable vertical-scrolling dodge game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (player, obstacles, collisions, score)
//! - `session`: Configuring / Playing / GameOver state machine
//! - `driver`: Frame-callback scheduling of simulation ticks
//! - `renderer`: Scene composition, tessellation and the WebGPU pipeline
//! - `config`: Player-selected options and the shareable-link encoding
//! - `input`: Held movement keys
//! - `audio`: Injected sound cue capability

pub mod audio;
pub mod config;
pub mod driver;
pub mod input;
pub mod renderer;
pub mod session;
pub mod sim;

pub use audio::{AudioCues, Cue, SilentAudio};
pub use config::{Background, GameConfig, Pattern, Preferences, SpeedTier, Sprite};
pub use session::{Session, SessionPhase};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (logical drawing surface units)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_SPAWN_X: f32 = 384.0;
    pub const PLAYER_SPAWN_Y: f32 = 568.0;
    /// Horizontal distance covered per tick while a direction is held
    pub const PLAYER_STEP: f32 = 10.0;

    /// Recycled obstacles re-enter somewhere in [-RESPAWN_BAND, 0)
    pub const RESPAWN_BAND: f32 = 200.0;

    /// Nominal display refresh; score is shown as ticks / this
    pub const TICKS_PER_SECOND: u64 = 60;
}
