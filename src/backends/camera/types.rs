// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backends

//! Shared frame types
//!
//! [`FrameBuffer`] owns its pixel storage and exposes a bounds-checked
//! accessor, so nothing downstream ever indexes into foreign memory.

/// One RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Owned RGBA frame, row-major, 4 bytes per pixel
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate an opaque black frame
    pub fn new(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 0xff;
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap raw RGBA bytes; returns `None` if the length does not match the
    /// dimensions
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read one pixel; `None` when out of bounds
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgba {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        })
    }

    /// Write one pixel; silently ignored when out of bounds
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i] = px.r;
        self.data[i + 1] = px.g;
        self.data[i + 2] = px.b;
        self.data[i + 3] = px.a;
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
