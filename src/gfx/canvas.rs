use super::Rect;

/// Handle to a canvas owned by a [`RasterContext`](super::RasterContext)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasId(pub(crate) usize);

impl CanvasId {
    /// The primary canvas created by `RasterContext::new`
    pub const SCREEN: CanvasId = CanvasId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Index buffer: one palette index per pixel, row-major, top-left origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Blank (all index 0) canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize],
            width,
            height,
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

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Full-canvas rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32 - 1, self.height as i32 - 1)
    }

    /// Read one index; `None` outside the canvas
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.pixels[self.offset(x, y)])
    }

    /// Byte offset of (x, y); caller guarantees it lies on the canvas
    #[inline]
    pub(crate) fn offset(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Write one pixel (already clipped)
    #[inline]
    pub(crate) fn put(&mut self, x: i32, y: i32, index: u8) {
        let i = self.offset(x, y);
        self.pixels[i] = index;
    }

    /// Fill `[x0, x1]` on row `y` (already clipped, x0 <= x1)
    #[inline]
    pub(crate) fn span(&mut self, y: i32, x0: i32, x1: i32, index: u8) {
        let start = self.offset(x0, y);
        let end = self.offset(x1, y);
        self.pixels[start..=end].fill(index);
    }

    /// Fill `[x0, x1]` on row `y` after trimming to `clip`; endpoints in any order.
    /// Coordinates are i64 so callers can pass unclipped geometry far off the canvas.
    pub(crate) fn span_clipped(&mut self, clip: &Rect, y: i64, x0: i64, x1: i64, index: u8) {
        if y < i64::from(clip.y0) || y > i64::from(clip.y1) {
            return;
        }
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let start = x0.max(i64::from(clip.x0));
        let end = x1.min(i64::from(clip.x1));
        if start > end {
            return;
        }
        self.span(y as i32, start as i32, end as i32, index);
    }

    /// Copy one row of indices to (x, y), each masked (already clipped)
    #[inline]
    pub(crate) fn copy_row(&mut self, x: i32, y: i32, src: &[u8], mask: u8) {
        let start = self.offset(x, y);
        for (dst, &s) in self.pixels[start..start + src.len()].iter_mut().zip(src) {
            *dst = s & mask;
        }
    }
}
