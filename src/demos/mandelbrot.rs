//! Indexed Mandelbrot
//!
//! Escape-time Mandelbrot iterated in 16.16 fixed point. The set is drawn
//! into an off-screen canvas once per zoom step and composited onto the
//! screen with a slow pan, so the blit is clipped at the edges.

use paladin::{CanvasId, Fixed16, GfxError, RasterContext};

use super::Demo;

const MAX_ITER: u32 = 48;

pub struct Mandelbrot {
    time: f32,
    zoom: Fixed16,
    center_x: Fixed16,
    center_y: Fixed16,
    canvas: Option<CanvasId>,
    rendered_zoom: Option<Fixed16>,
}

impl Mandelbrot {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            zoom: Fixed16::ONE,
            center_x: Fixed16::from_f32(-0.745),
            center_y: Fixed16::from_f32(0.186),
            canvas: None,
            rendered_zoom: None,
        }
    }

    /// Escape iteration count for c = (cr, ci); `None` inside the set
    fn escape_time(cr: Fixed16, ci: Fixed16) -> Option<u32> {
        let four = Fixed16::from_int(4);
        let (mut zr, mut zi) = (Fixed16::ZERO, Fixed16::ZERO);
        for iter in 0..MAX_ITER {
            let zr2 = zr * zr;
            let zi2 = zi * zi;
            if zr2 + zi2 > four {
                return Some(iter);
            }
            zi = Fixed16::from_int(2) * zr * zi + ci;
            zr = zr2 - zi2 + cr;
        }
        None
    }

    fn draw_set(&self, ctx: &mut RasterContext) {
        let (w, h) = (ctx.width() as i32, ctx.height() as i32);
        let colors = ctx.palette().size() as u32;
        // Complex-plane units per pixel
        let step = Fixed16::from_int(3) / (Fixed16::from_int(w.min(h)) * self.zoom);

        ctx.clear(0);
        for py in 0..h {
            let ci = self.center_y + step * (py - h / 2);
            for px in 0..w {
                let cr = self.center_x + step * (px - w / 2);
                if let Some(iter) = Self::escape_time(cr, ci) {
                    // Index 0 is reserved for the interior
                    let color = 1 + iter % (colors - 1).max(1);
                    ctx.point(px, py, color as i32);
                }
            }
        }
    }
}

impl Default for Mandelbrot {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for Mandelbrot {
    fn update(&mut self, dt: f32) {
        self.time += dt;
        // Ping-pong zoom between 1x and 16x over 20 seconds each way
        let t = (self.time % 40.0) / 20.0;
        let t = if t < 1.0 { t } else { 2.0 - t };
        let eased = t * t * (3.0 - 2.0 * t);
        // Quantized so the set is only recomputed when the zoom visibly changes
        let zoom = Fixed16::from_f32((1.0 + eased * 15.0) * 8.0).floor() / Fixed16::from_int(8);
        self.zoom = zoom.max(Fixed16::ONE);
    }

    fn render(&mut self, ctx: &mut RasterContext) -> Result<(), GfxError> {
        let canvas = match self.canvas {
            Some(id) => id,
            None => {
                let id = ctx.create_canvas();
                self.canvas = Some(id);
                id
            },
        };

        if self.rendered_zoom != Some(self.zoom) {
            let mut target = ctx.bind_target(canvas)?;
            self.draw_set(&mut target);
            self.rendered_zoom = Some(self.zoom);
        }

        let pan = Fixed16::from_f32(self.time * 0.05).fract().sin();
        let dx = (pan * Fixed16::from_int(ctx.width() as i32 / 8)).to_int();

        ctx.clear(0);
        ctx.blit_canvas(canvas, dx, 0)
    }

    fn name(&self) -> &str {
        "mandelbrot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paladin::Palette;

    #[test]
    fn test_escape_time() {
        // Origin and -1 are in the set
        assert_eq!(Mandelbrot::escape_time(Fixed16::ZERO, Fixed16::ZERO), None);
        assert_eq!(Mandelbrot::escape_time(-Fixed16::ONE, Fixed16::ZERO), None);
        // 2 + 2i escapes immediately after one step
        let escape = Mandelbrot::escape_time(Fixed16::from_int(2), Fixed16::from_int(2));
        assert_eq!(escape, Some(1));
    }

    #[test]
    fn test_render_composites_offscreen() {
        let mut ctx = RasterContext::new(32, 16, Palette::pico8()).unwrap();
        let mut demo = Mandelbrot::new();
        demo.update(0.0);
        demo.render(&mut ctx).unwrap();
        assert!(demo.canvas.is_some());
        assert_eq!(ctx.active_target(), CanvasId::SCREEN);
        assert!(ctx.pixels().iter().any(|&p| p != 0));
    }
}
