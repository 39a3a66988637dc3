//! Game state and core simulation types
//!
//! Everything a running session mutates each tick lives here.

use glam::Vec2;

use super::collision::Rect;
use crate::consts::*;

/// Phase of a running game
///
/// A session that is still being configured has no `GameState` at all,
/// so "not playing but over" cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Ticks advance the simulation
    Playing,
    /// Collision happened; state is frozen
    GameOver,
}

/// The player-controlled shape
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            size: Vec2::splat(PLAYER_SIZE),
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Largest x that keeps the player fully inside the field
    pub fn max_x(&self) -> f32 {
        FIELD_WIDTH - self.size.x
    }

    pub fn move_left(&mut self) {
        self.pos.x = (self.pos.x - PLAYER_STEP).max(0.0);
    }

    pub fn move_right(&mut self) {
        self.pos.x = (self.pos.x + PLAYER_STEP).min(self.max_x());
    }
}

/// A pooled obstacle
///
/// Obstacles are never removed during a session; once they scroll past
/// the bottom edge they are moved back above the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward velocity (units per tick)
    pub vy: f32,
    /// Horizontal sweep velocity, walls only
    pub vx: Option<f32>,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32, vy: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            vy,
            vx: None,
        }
    }

    pub fn with_sweep(mut self, vx: f32) -> Self {
        self.vx = Some(vx);
        self
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Largest x that keeps the obstacle inside the field
    pub fn max_x(&self) -> f32 {
        FIELD_WIDTH - self.size.x
    }

    /// Whether the obstacle has scrolled past the bottom edge
    pub fn is_below_field(&self) -> bool {
        self.pos.y > FIELD_HEIGHT
    }
}

/// Complete state of one playing session
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Surviving ticks
    pub score: u64,
    pub player: Player,
    /// Fixed-size pool; order is irrelevant
    pub obstacles: Vec<Obstacle>,
}

impl GameState {
    /// Fresh state around an already generated obstacle pool
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self {
            phase: GamePhase::Playing,
            score: 0,
            player: Player::default(),
            obstacles,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Score in whole seconds, assuming one tick per display frame
    pub fn seconds(&self) -> u64 {
        self.score / TICKS_PER_SECOND
    }
}
