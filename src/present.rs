//! Frame presentation
//!
//! The raster core only produces indices. A [`FrameView`] pairs the screen
//! canvas with its palette so a display backend can expand it into texels.

use crate::gfx::{Canvas, Palette};

/// Borrowed view of a finished frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    width: u32,
    height: u32,
    indices: &'a [u8],
    palette: &'a [u8],
    mask: u8,
}

impl<'a> FrameView<'a> {
    pub(crate) fn new(canvas: &'a Canvas, palette: &'a Palette) -> Self {
        Self {
            width: canvas.width(),
            height: canvas.height(),
            indices: canvas.pixels(),
            palette: palette.data(),
            mask: palette.mask(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// One palette index per pixel, row-major
    #[inline]
    pub fn indices(&self) -> &'a [u8] {
        self.indices
    }

    /// Palette as RGBA bytes (the lookup texture)
    #[inline]
    pub fn palette(&self) -> &'a [u8] {
        self.palette
    }

    /// Bytes per row of an RGBA8888 texture of this frame
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * 4
    }
}

/// Expand indices through the palette into RGBA8888 texels.
///
/// Bytes land in A, B, G, R order, matching an SDL `RGBA8888` streaming
/// texture on little-endian hosts. `out` is resized to `pitch * height`.
pub fn expand_rgba8888(frame: &FrameView<'_>, out: &mut Vec<u8>) {
    // Per-entry texel table so the per-pixel loop is a single lookup
    let lut: Vec<[u8; 4]> = frame
        .palette
        .chunks_exact(4)
        .map(|c| [c[3], c[2], c[1], c[0]])
        .collect();

    out.resize(frame.indices.len() * 4, 0);
    for (texel, &index) in out.chunks_exact_mut(4).zip(frame.indices) {
        texel.copy_from_slice(&lut[(index & frame.mask) as usize]);
    }
}

/// Single-channel path: each index becomes `index * scalar`, saturated to 255
pub fn expand_grayscale(frame: &FrameView<'_>, scalar: u32, out: &mut Vec<u8>) {
    out.clear();
    out.extend(
        frame
            .indices
            .iter()
            .map(|&index| (index as u32 * scalar).min(255) as u8),
    );
}
