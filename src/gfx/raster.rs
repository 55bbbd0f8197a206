//! Indexed Raster Engine
//!
//! [`RasterContext`] owns the canvases, the palette, the clip rectangle and
//! the loaded sprites. Every primitive masks its color through the palette,
//! clips against the current clip rectangle, and writes indices into the
//! active canvas.
//!
//! Constructing a context is initialization and [`RasterContext::shutdown`]
//! consumes it, so drawing outside the initialized state cannot compile.

use std::ops::{Deref, DerefMut};
use std::path::Path;

use log::{debug, warn};

use super::{ByteImage, Canvas, CanvasId, GfxError, Palette, Rect};
use crate::fixed::Fixed16;
use crate::present::FrameView;

/// Handle to a sprite registered with a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(usize);

impl ImageHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

pub struct RasterContext {
    canvases: Vec<Canvas>,
    active: CanvasId,
    palette: Palette,
    clip: Rect,
    images: Vec<Option<ByteImage>>,
}

impl RasterContext {
    /// Allocate the screen canvas; the clip rectangle covers all of it
    pub fn new(width: u32, height: u32, palette: Palette) -> Result<Self, GfxError> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(GfxError::InvalidDimensions { width, height });
        }
        let screen = Canvas::new(width, height);
        let clip = screen.bounds();
        debug!(
            "raster init: {}x{}, {} palette entries",
            width,
            height,
            palette.size()
        );
        Ok(Self {
            canvases: vec![screen],
            active: CanvasId::SCREEN,
            palette,
            clip,
            images: Vec::new(),
        })
    }

    /// Release every canvas and sprite
    pub fn shutdown(self) {
        debug!(
            "raster shutdown: {} canvases, {} sprites",
            self.canvases.len(),
            self.images.iter().flatten().count()
        );
    }

    // ========================================================================
    // State queries
    // ========================================================================

    #[inline]
    pub fn width(&self) -> u32 {
        self.canvases[0].width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.canvases[0].height()
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// Restrict drawing to `rect` (trimmed to the canvas).
    /// Returns false and keeps the old clip when nothing would remain.
    pub fn set_clip(&mut self, rect: Rect) -> bool {
        match rect.clip_to(&self.canvases[0].bounds()) {
            Some(r) => {
                self.clip = r;
                true
            },
            None => false,
        }
    }

    /// Clip to the whole canvas again
    pub fn reset_clip(&mut self) {
        self.clip = self.canvases[0].bounds();
    }

    #[inline]
    pub fn active_target(&self) -> CanvasId {
        self.active
    }

    pub fn canvas(&self, id: CanvasId) -> Option<&Canvas> {
        self.canvases.get(id.0)
    }

    /// Indices of the active canvas
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        self.target().pixels()
    }

    /// Read a pixel of the active canvas (ignores the clip rectangle)
    pub fn pget(&self, x: i32, y: i32) -> Option<u8> {
        self.target().get(x, y)
    }

    /// Screen canvas plus palette, ready for the display layer
    pub fn frame(&self) -> FrameView<'_> {
        FrameView::new(&self.canvases[0], &self.palette)
    }

    #[inline]
    fn target(&self) -> &Canvas {
        &self.canvases[self.active.0]
    }

    #[inline]
    fn target_mut(&mut self) -> &mut Canvas {
        &mut self.canvases[self.active.0]
    }

    // ========================================================================
    // Canvases
    // ========================================================================

    /// Blank off-screen canvas the size of the screen
    pub fn create_canvas(&mut self) -> CanvasId {
        self.canvases.push(Canvas::new(self.width(), self.height()));
        let id = CanvasId(self.canvases.len() - 1);
        debug!("created canvas {}", id.0);
        id
    }

    /// Draw into `id` until the returned guard drops; the previous target
    /// and clip rectangle come back on drop.
    pub fn bind_target(&mut self, id: CanvasId) -> Result<TargetGuard<'_>, GfxError> {
        if id.0 >= self.canvases.len() {
            warn!("bind_target: no canvas {}", id.0);
            return Err(GfxError::InvalidCanvas(id.0));
        }
        let previous = self.active;
        let previous_clip = self.clip;
        self.active = id;
        Ok(TargetGuard {
            ctx: self,
            previous,
            previous_clip,
        })
    }

    /// Copy canvas `id` onto the active canvas at (x, y)
    pub fn blit_canvas(&mut self, id: CanvasId, x: i32, y: i32) -> Result<(), GfxError> {
        if id.0 >= self.canvases.len() {
            warn!("blit_canvas: no canvas {}", id.0);
            return Err(GfxError::InvalidCanvas(id.0));
        }
        let clip = self.clip;
        let mask = self.palette.mask();
        let active = self.active.0;

        if id.0 == active {
            let copy = self.canvases[active].clone();
            let (w, h) = (copy.width(), copy.height());
            blit_indices(&mut self.canvases[active], &clip, mask, copy.pixels(), w, h, x, y);
        } else {
            let (src, dst) = if id.0 < active {
                let (lo, hi) = self.canvases.split_at_mut(active);
                (&lo[id.0], &mut hi[0])
            } else {
                let (lo, hi) = self.canvases.split_at_mut(id.0);
                (&hi[0], &mut lo[active])
            };
            blit_indices(dst, &clip, mask, src.pixels(), src.width(), src.height(), x, y);
        }
        Ok(())
    }

    // ========================================================================
    // Sprites
    // ========================================================================

    /// Register a quantized sprite; freed slots are reused
    pub fn add_image(&mut self, image: ByteImage) -> ImageHandle {
        if let Some(slot) = self.images.iter().position(Option::is_none) {
            self.images[slot] = Some(image);
            return ImageHandle(slot);
        }
        self.images.push(Some(image));
        ImageHandle(self.images.len() - 1)
    }

    /// Decode, quantize against this context's palette, and register
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<ImageHandle, GfxError> {
        let image = ByteImage::load(path, &self.palette)?;
        Ok(self.add_image(image))
    }

    pub fn free_image(&mut self, handle: ImageHandle) -> Result<(), GfxError> {
        match self.images.get_mut(handle.0) {
            Some(slot @ Some(_)) => {
                *slot = None;
                Ok(())
            },
            _ => {
                warn!("free_image: invalid handle {}", handle.0);
                Err(GfxError::InvalidHandle(handle.0))
            },
        }
    }

    pub fn image(&self, handle: ImageHandle) -> Option<&ByteImage> {
        self.images.get(handle.0).and_then(Option::as_ref)
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    /// Fill the clip rectangle (not necessarily the whole canvas)
    pub fn clear(&mut self, color: i32) {
        let index = self.palette.mask_index(color);
        let clip = self.clip;
        let canvas = self.target_mut();
        for y in clip.y0..=clip.y1 {
            canvas.span(y, clip.x0, clip.x1, index);
        }
    }

    /// Single pixel; silently skipped outside the clip rectangle
    pub fn point(&mut self, x: i32, y: i32, color: i32) {
        if self.clip.contains_point(x, y) {
            let index = self.palette.mask_index(color);
            self.target_mut().put(x, y, index);
        }
    }

    /// Bresenham line, both endpoints included
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: i32) {
        let Some((mut x, mut y, x1, y1)) = self.clip.clip_line(x0, y0, x1, y1) else {
            return;
        };
        let index = self.palette.mask_index(color);
        let canvas = self.target_mut();

        let dx = (x1 - x).abs();
        let dy = (y1 - y).abs();

        if dy == 0 {
            canvas.span(y, x.min(x1), x.max(x1), index);
            return;
        }
        if dx == 0 {
            for row in y.min(y1)..=y.max(y1) {
                canvas.put(x, row, index);
            }
            return;
        }

        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = (if dx > dy { dx } else { -dy }) / 2;

        loop {
            canvas.put(x, y, index);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = err;
            if e2 > -dx {
                err -= dy;
                x += sx;
            }
            if e2 < dy {
                err += dx;
                y += sy;
            }
        }
    }

    /// Circle outline (midpoint algorithm, 8-way symmetry)
    pub fn circle(&mut self, cx: i32, cy: i32, radius: i32, color: i32) {
        if !self.circle_visible(cx, cy, radius) {
            return;
        }
        let index = self.palette.mask_index(color);
        let clip = self.clip;
        let canvas = self.target_mut();
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let mut plot = |x: i64, y: i64| {
            if x >= i64::from(clip.x0)
                && x <= i64::from(clip.x1)
                && y >= i64::from(clip.y0)
                && y <= i64::from(clip.y1)
            {
                canvas.put(x as i32, y as i32, index);
            }
        };

        let mut x = i64::from(radius);
        let mut y = 0i64;
        let mut err = 0i64;

        while x >= y {
            plot(cx + x, cy + y);
            plot(cx + y, cy + x);
            plot(cx + x, cy - y);
            plot(cx + y, cy - x);
            plot(cx - x, cy + y);
            plot(cx - y, cy + x);
            plot(cx - x, cy - y);
            plot(cx - y, cy - x);

            if err <= 0 {
                y += 1;
                err += 2 * y + 1;
            }
            if err > 0 {
                x -= 1;
                err -= 2 * x + 1;
            }
        }
    }

    /// Filled circle from four horizontal spans per step
    pub fn circle_fill(&mut self, cx: i32, cy: i32, radius: i32, color: i32) {
        if !self.circle_visible(cx, cy, radius) {
            return;
        }
        let index = self.palette.mask_index(color);
        let clip = self.clip;
        let canvas = self.target_mut();
        let (cx, cy) = (i64::from(cx), i64::from(cy));

        let mut x = i64::from(radius);
        let mut y = 0i64;
        let mut err = 0i64;

        while x >= y {
            canvas.span_clipped(&clip, cy - y, cx - x, cx + x, index);
            canvas.span_clipped(&clip, cy - x, cx - y, cx + y, index);
            canvas.span_clipped(&clip, cy + y, cx - x, cx + x, index);
            canvas.span_clipped(&clip, cy + x, cx - y, cx + y, index);

            if err <= 0 {
                y += 1;
                err += 2 * y + 1;
            }
            if err > 0 {
                x -= 1;
                err -= 2 * x + 1;
            }
        }
    }

    /// Bounding box of the circle overlaps the clip rectangle (computed in i64)
    fn circle_visible(&self, cx: i32, cy: i32, radius: i32) -> bool {
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
        r >= 0
            && cx - r <= i64::from(self.clip.x1)
            && cx + r >= i64::from(self.clip.x0)
            && cy - r <= i64::from(self.clip.y1)
            && cy + r >= i64::from(self.clip.y0)
    }

    /// Rectangle outline: four edges, each clipped on its own
    pub fn rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: i32) {
        let r = Rect::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1));
        if !r.intersects(&self.clip) {
            return;
        }
        self.line(r.x0, r.y0, r.x1, r.y0, color);
        self.line(r.x0, r.y1, r.x1, r.y1, color);
        self.line(r.x0, r.y0, r.x0, r.y1, color);
        self.line(r.x1, r.y0, r.x1, r.y1, color);
    }

    /// Filled rectangle, corners inclusive
    pub fn rectangle_fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: i32) {
        let r = Rect::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1));
        let Some(r) = r.clip_to(&self.clip) else {
            return;
        };
        let index = self.palette.mask_index(color);
        let canvas = self.target_mut();
        for y in r.y0..=r.y1 {
            canvas.span(y, r.x0, r.x1, index);
        }
    }

    /// Flat-shaded filled triangle
    ///
    /// Vertices are sorted by y and the triangle is split at the middle
    /// vertex into a flat-bottom and a flat-top half. Edge x positions are
    /// stepped in 16.16 fixed point and rounded to the nearest column.
    /// A triangle with zero total height draws nothing.
    pub fn triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: i32,
    ) {
        let mut v = [(x0, y0), (x1, y1), (x2, y2)];
        v.sort_by_key(|&(_, y)| y);
        let [(ax, ay), (bx, by), (cx, cy)] = v;

        if cy == ay {
            return;
        }
        let bounds = Rect::new(ax.min(bx).min(cx), ay, ax.max(bx).max(cx), cy);
        if !bounds.intersects(&self.clip) {
            return;
        }

        let index = self.palette.mask_index(color);

        // Where the horizontal through the middle vertex meets the long edge.
        // The product of two coordinate spans needs more than 64 bits.
        let x4 = i64::from(ax)
            + ((i128::from(by) - i128::from(ay)) * (i128::from(cx) - i128::from(ax))
                / (i128::from(cy) - i128::from(ay))) as i64;
        let (ax, bx, cx) = (i64::from(ax), i64::from(bx), i64::from(cx));

        self.fill_half(ay, by, (ax, ax), (bx, x4), false, index);
        self.fill_half(by, cy, (bx, x4), (cx, cx), true, index);
    }

    /// Scan-convert the rows between two horizontal edges.
    /// `top` and `bottom` hold the two edge x positions at `y_top` / `y_bottom`.
    ///
    /// Edges step in 16.16 fixed point held in i64, so vertices far outside
    /// the `Fixed16` range still produce the right slope.
    fn fill_half(
        &mut self,
        y_top: i32,
        y_bottom: i32,
        top: (i64, i64),
        bottom: (i64, i64),
        skip_top_row: bool,
        index: u8,
    ) {
        const FRAC: u32 = Fixed16::FRAC_BITS;
        let half = i64::from(Fixed16::HALF.raw());

        let clip = self.clip;
        let rows = i64::from(y_bottom) - i64::from(y_top);

        if rows == 0 {
            if !skip_top_row {
                let lo = top.0.min(top.1).min(bottom.0).min(bottom.1);
                let hi = top.0.max(top.1).max(bottom.0).max(bottom.1);
                self.target_mut().span_clipped(&clip, i64::from(y_top), lo, hi, index);
            }
            return;
        }

        let step_a = ((bottom.0 - top.0) << FRAC) / rows;
        let step_b = ((bottom.1 - top.1) << FRAC) / rows;

        let first = i64::from(y_top) + i64::from(skip_top_row);
        let start = first.max(i64::from(clip.y0));
        let end = i64::from(y_bottom).min(i64::from(clip.y1));
        if start > end {
            return;
        }

        // Jump the accumulators over rows above the clip rectangle
        let skipped = start - i64::from(y_top);
        let mut a = (top.0 << FRAC) + half + step_a * skipped;
        let mut b = (top.1 << FRAC) + half + step_b * skipped;

        let canvas = self.target_mut();
        for y in start..=end {
            canvas.span_clipped(&clip, y, a >> FRAC, b >> FRAC, index);
            a += step_a;
            b += step_b;
        }
    }

    /// Copy a registered sprite to (x, y), clipped
    pub fn blit(&mut self, handle: ImageHandle, x: i32, y: i32) -> Result<(), GfxError> {
        let Some(image) = self.images.get(handle.0).and_then(Option::as_ref) else {
            warn!("blit: invalid handle {}", handle.0);
            return Err(GfxError::InvalidHandle(handle.0));
        };
        let canvas = &mut self.canvases[self.active.0];
        blit_indices(
            canvas,
            &self.clip,
            self.palette.mask(),
            image.pixels(),
            image.width(),
            image.height(),
            x,
            y,
        );
        Ok(())
    }
}

/// Copy a `w` x `h` block of indices to (x, y) on `dst`, clipped to `clip`
fn blit_indices(
    dst: &mut Canvas,
    clip: &Rect,
    mask: u8,
    src: &[u8],
    w: u32,
    h: u32,
    x: i32,
    y: i32,
) {
    let Some(dest) = Rect::from_size(x, y, w as i32, h as i32).clip_to(clip) else {
        return;
    };
    let len = dest.width() as usize;
    let src_x = (dest.x0 - x) as usize;
    for dy in dest.y0..=dest.y1 {
        let row = (dy - y) as usize * w as usize + src_x;
        dst.copy_row(dest.x0, dy, &src[row..row + len], mask);
    }
}

// ============================================================================
// Target binding
// ============================================================================

/// Scoped render-target binding from [`RasterContext::bind_target`]
pub struct TargetGuard<'a> {
    ctx: &'a mut RasterContext,
    previous: CanvasId,
    previous_clip: Rect,
}

impl Deref for TargetGuard<'_> {
    type Target = RasterContext;

    fn deref(&self) -> &RasterContext {
        self.ctx
    }
}

impl DerefMut for TargetGuard<'_> {
    fn deref_mut(&mut self) -> &mut RasterContext {
        self.ctx
    }
}

impl Drop for TargetGuard<'_> {
    fn drop(&mut self) {
        self.ctx.active = self.previous;
        self.ctx.clip = self.previous_clip;
    }
}
