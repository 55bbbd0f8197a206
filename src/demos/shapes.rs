//! Primitive Showcase
//!
//! Bouncing filled circles, a spinning triangle, a line fan, nested
//! rectangle outlines and (when a sprite sheet is loaded) a row of
//! sprites sliding off the screen edge to show clipping.

use paladin::util::Rng;
use paladin::{Fixed16, GfxError, ImageHandle, RasterContext};

use super::Demo;

const BALL_COUNT: usize = 12;

struct Ball {
    x: Fixed16,
    y: Fixed16,
    vx: Fixed16,
    vy: Fixed16,
    radius: i32,
    color: i32,
}

pub struct Shapes {
    time: f32,
    balls: Vec<Ball>,
    sprite: Option<ImageHandle>,
    width: i32,
    height: i32,
}

impl Shapes {
    pub fn new(width: u32, height: u32, sprite: Option<ImageHandle>) -> Self {
        let mut rng = Rng::new(0x5EED);
        let (w, h) = (width as i32, height as i32);
        let balls = (0..BALL_COUNT)
            .map(|i| Ball {
                x: rng.rnd(Fixed16::from_int(w)),
                y: rng.rnd(Fixed16::from_int(h)),
                vx: rng.rnd(Fixed16::from_int(120)) - Fixed16::from_int(60),
                vy: rng.rnd(Fixed16::from_int(120)) - Fixed16::from_int(60),
                radius: rng.range_i32(3, 12),
                // Skip 0 so balls stay visible on the black background
                color: 1 + i as i32 % 15,
            })
            .collect();

        Self {
            time: 0.0,
            balls,
            sprite,
            width: w,
            height: h,
        }
    }
}

impl Demo for Shapes {
    fn update(&mut self, dt: f32) {
        self.time += dt;
        let dt = Fixed16::from_f32(dt);
        let w = Fixed16::from_int(self.width - 1);
        let h = Fixed16::from_int(self.height - 1);

        for ball in &mut self.balls {
            ball.x += ball.vx * dt;
            ball.y += ball.vy * dt;
            if ball.x < Fixed16::ZERO || ball.x > w {
                ball.vx = -ball.vx;
                ball.x = ball.x.max(Fixed16::ZERO).min(w);
            }
            if ball.y < Fixed16::ZERO || ball.y > h {
                ball.vy = -ball.vy;
                ball.y = ball.y.max(Fixed16::ZERO).min(h);
            }
        }
    }

    fn render(&mut self, ctx: &mut RasterContext) -> Result<(), GfxError> {
        let (w, h) = (self.width, self.height);
        ctx.clear(0);

        // Line fan from the bottom-left corner
        for i in 0..16 {
            ctx.line(0, h - 1, i * w / 15, 0, 1 + i % 3);
        }

        // Nested outlines
        for i in 0..4 {
            ctx.rectangle(4 + i * 4, 4 + i * 4, w - 5 - i * 4, h - 5 - i * 4, 5 + i);
        }

        for ball in &self.balls {
            ctx.circle_fill(ball.x.to_int(), ball.y.to_int(), ball.radius, ball.color);
            ctx.circle(ball.x.to_int(), ball.y.to_int(), ball.radius, 7);
        }

        // Spinning triangle, angles in turns
        let spin = Fixed16::from_f32(self.time * 0.25).fract();
        let radius = Fixed16::from_int(h.min(w) / 3);
        let (cx, cy) = (w / 2, h / 2);
        let vertex = |k: i32| {
            let a = spin + Fixed16::from_int(k) / Fixed16::from_int(3);
            (
                cx + (a.cos() * radius).to_int(),
                cy + (a.sin() * radius).to_int(),
            )
        };
        let ((x0, y0), (x1, y1), (x2, y2)) = (vertex(0), vertex(1), vertex(2));
        ctx.triangle(x0, y0, x1, y1, x2, y2, 8 + (self.time as i32 % 4));

        if let Some(sprite) = self.sprite {
            let (sw, sh) = ctx
                .image(sprite)
                .map_or((16, 16), |s| (s.width() as i32, s.height() as i32));
            let offset = (self.time * 40.0) as i32 % (w + 4 * (sw + 2));
            for i in 0..4 {
                ctx.blit(sprite, w - offset + i * (sw + 2), h - sh - 2)?;
            }
        }

        ctx.point(w / 2, h / 2, 7);
        Ok(())
    }

    fn name(&self) -> &str {
        "shapes"
    }
}
