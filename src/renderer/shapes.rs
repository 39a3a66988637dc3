//! Shape generation for 2D primitives
//!
//! Everything becomes a triangle list in field units.

use glam::Vec2;
use std::f32::consts::PI;

use super::scene::{DrawCmd, Scene};
use super::vertex::{Vertex, rgba};
use crate::sim::Rect;

/// Segments used for filled circles
const CIRCLE_SEGMENTS: u32 = 24;

/// Pixel font cell
const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
/// Advance between glyphs, in dots
const GLYPH_ADVANCE: f32 = 6.0;

/// Tessellate a whole scene in draw order
pub fn tessellate(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for cmd in &scene.commands {
        match cmd {
            DrawCmd::Rect { rect: r, color } => vertices.extend(rect(r, rgba(*color))),
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => vertices.extend(circle(*center, *radius, rgba(*color), CIRCLE_SEGMENTS)),
            DrawCmd::Triangle { points, color } => {
                let color = rgba(*color);
                vertices.extend(points.iter().map(|p| Vertex::new(p.x, p.y, color)));
            }
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => vertices.extend(line(*from, *to, *width, rgba(*color))),
            DrawCmd::Text {
                origin,
                dot,
                text: s,
                color,
            } => vertices.extend(text(*origin, *dot, s, rgba(*color))),
        }
    }
    vertices
}

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, t, rt, b) = (r.left(), r.top(), r.right(), r.bottom());
    vec![
        Vertex::new(l, t, color),
        Vertex::new(l, b, color),
        Vertex::new(rt, t, color),
        Vertex::new(rt, t, color),
        Vertex::new(l, b, color),
        Vertex::new(rt, b, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a line segment of the given width
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// 5x7 glyph rows, bit 4 is the leftmost column
fn glyph(c: char) -> Option<[u8; GLYPH_HEIGHT]> {
    let rows = match c.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        _ => return None,
    };
    Some(rows)
}

/// Generate vertices for pixel-font text sitting on the baseline at `origin`.
///
/// Characters without a glyph (including space) just advance.
pub fn text(origin: Vec2, dot: f32, s: &str, color: [f32; 4]) -> Vec<Vertex> {
    let top = origin.y - GLYPH_HEIGHT as f32 * dot;
    let mut vertices = Vec::new();

    for (i, c) in s.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let left = origin.x + i as f32 * GLYPH_ADVANCE * dot;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    let cell = Rect::new(
                        left + col as f32 * dot,
                        top + row as f32 * dot,
                        dot,
                        dot,
                    );
                    vertices.extend(rect(&cell, color));
                }
            }
        }
    }

    vertices
}
