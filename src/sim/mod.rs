//! Simulation module
//!
//! All gameplay logic lives here:
//! - One tick per display frame, no wall-clock time
//! - Randomness only through an injected RNG
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps};
pub use spawn::{generate, recycle};
pub use state::{GamePhase, GameState, Obstacle, Player};
pub use tick::{TickInput, TickOutcome, tick};
