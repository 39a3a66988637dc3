//! Scene composition
//!
//! Turns the current run and config into an ordered list of draw commands
//! in field units. Nothing here touches the GPU or mutates game state.
//!
//! Star and skyline decoration is re-rolled on every call, which makes the
//! background twinkle. It carries no gameplay state.

use glam::Vec2;
use rand::Rng;

use super::vertex::colors;
use crate::config::{Background, GameConfig, Pattern, Sprite};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::{GameState, Rect};

const STAR_COUNT: usize = 100;
const STAR_SIZE: f32 = 2.0;

const SKYLINE_BARS: usize = 10;
const SKYLINE_SPACING: f32 = 80.0;
const SKYLINE_BAR_WIDTH: f32 = 60.0;
const SKYLINE_MIN_HEIGHT: f32 = 100.0;
const SKYLINE_HEIGHT_RANGE: f32 = 200.0;

const GRID_SPACING: usize = 40;
const GRID_LINE_WIDTH: f32 = 1.0;

/// Score text baseline and dot size of the pixel font
pub const SCORE_ORIGIN: Vec2 = Vec2::new(20.0, 40.0);
pub const SCORE_DOT: f32 = 2.0;

/// A single drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        rect: Rect,
        color: u32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: u32,
    },
    Triangle {
        points: [Vec2; 3],
        color: u32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: u32,
    },
    /// Pixel-font text; `origin` is the left end of the baseline
    Text {
        origin: Vec2,
        dot: f32,
        text: String,
        color: u32,
    },
}

/// One frame worth of drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub clear: u32,
    pub commands: Vec<DrawCmd>,
}

/// Build the frame for `game` (absent while configuring)
pub fn compose<R: Rng + ?Sized>(game: Option<&GameState>, config: &GameConfig, rng: &mut R) -> Scene {
    let mut commands = Vec::new();
    background(config.background, rng, &mut commands);

    if let Some(game) = game {
        commands.push(player_shape(config.sprite, game.player.rect()));

        for obstacle in &game.obstacles {
            commands.push(obstacle_shape(config.pattern, obstacle.rect()));
        }

        commands.push(DrawCmd::Text {
            origin: SCORE_ORIGIN,
            dot: SCORE_DOT,
            text: score_label(game),
            color: colors::SCORE,
        });
    }

    Scene {
        clear: colors::BACKGROUND,
        commands,
    }
}

/// HUD text for the current run
pub fn score_label(game: &GameState) -> String {
    format!("SCORE: {}", game.seconds())
}

fn background<R: Rng + ?Sized>(kind: Background, rng: &mut R, out: &mut Vec<DrawCmd>) {
    match kind {
        Background::Stars => {
            for _ in 0..STAR_COUNT {
                out.push(DrawCmd::Rect {
                    rect: Rect::new(
                        rng.random_range(0.0..FIELD_WIDTH),
                        rng.random_range(0.0..FIELD_HEIGHT),
                        STAR_SIZE,
                        STAR_SIZE,
                    ),
                    color: colors::STAR,
                });
            }
        }
        Background::City => {
            for i in 0..SKYLINE_BARS {
                let height = SKYLINE_MIN_HEIGHT + rng.random_range(0.0..SKYLINE_HEIGHT_RANGE);
                out.push(DrawCmd::Rect {
                    rect: Rect::new(
                        i as f32 * SKYLINE_SPACING,
                        FIELD_HEIGHT - height,
                        SKYLINE_BAR_WIDTH,
                        height,
                    ),
                    color: colors::SKYLINE,
                });
            }
        }
        Background::Grid => {
            for x in (0..=FIELD_WIDTH as usize).step_by(GRID_SPACING) {
                let x = x as f32;
                out.push(DrawCmd::Line {
                    from: Vec2::new(x, 0.0),
                    to: Vec2::new(x, FIELD_HEIGHT),
                    width: GRID_LINE_WIDTH,
                    color: colors::GRID,
                });
            }
            for y in (0..=FIELD_HEIGHT as usize).step_by(GRID_SPACING) {
                let y = y as f32;
                out.push(DrawCmd::Line {
                    from: Vec2::new(0.0, y),
                    to: Vec2::new(FIELD_WIDTH, y),
                    width: GRID_LINE_WIDTH,
                    color: colors::GRID,
                });
            }
        }
    }
}

fn player_shape(sprite: Sprite, rect: Rect) -> DrawCmd {
    match sprite {
        // Nose up
        Sprite::Spaceship => DrawCmd::Triangle {
            points: [
                Vec2::new(rect.left() + rect.size.x / 2.0, rect.top()),
                Vec2::new(rect.left(), rect.bottom()),
                Vec2::new(rect.right(), rect.bottom()),
            ],
            color: colors::PLAYER,
        },
        Sprite::Bird => DrawCmd::Circle {
            center: rect.center(),
            radius: rect.size.x / 2.0,
            color: colors::PLAYER,
        },
        Sprite::Robot => DrawCmd::Rect {
            rect,
            color: colors::PLAYER,
        },
    }
}

fn obstacle_shape(pattern: Pattern, rect: Rect) -> DrawCmd {
    match pattern {
        Pattern::Asteroids => DrawCmd::Circle {
            center: rect.center(),
            radius: rect.size.x / 2.0,
            color: colors::ASTEROID,
        },
        Pattern::Walls => DrawCmd::Rect {
            rect,
            color: colors::WALL,
        },
        Pattern::Blocks => DrawCmd::Rect {
            rect,
            color: colors::BLOCK,
        },
    }
}
