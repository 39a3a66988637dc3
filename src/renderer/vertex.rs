//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Palette (sRGB hex, 0xRRGGBB)
pub mod colors {
    pub const BACKGROUND: u32 = 0x1A1A1A;
    pub const STAR: u32 = 0xFFFFFF;
    pub const SKYLINE: u32 = 0x00FFFF;
    pub const GRID: u32 = 0x00FF00;
    pub const PLAYER: u32 = 0x00FF00;
    pub const SCORE: u32 = 0x00FF00;
    pub const ASTEROID: u32 = 0xFF00FF;
    pub const WALL: u32 = 0x00FFFF;
    pub const BLOCK: u32 = 0xFFFF00;
}

/// Convert an 8-bit sRGB channel to linear
fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Opaque linear RGBA from a 0xRRGGBB hex color
pub fn rgba(hex: u32) -> [f32; 4] {
    [
        srgb_to_linear((hex >> 16) as u8),
        srgb_to_linear((hex >> 8) as u8),
        srgb_to_linear(hex as u8),
        1.0,
    ]
}
