//! Rectangles and Clipping
//!
//! Axis-aligned rectangles with inclusive bounds, plus rectangle
//! intersection and Cohen-Sutherland line clipping against them.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates, bounds inclusive on all sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

// Cohen-Sutherland outcode bits
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle covering `w` x `h` pixels starting at (x, y)
    pub const fn from_size(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x.saturating_add(w - 1), y.saturating_add(h - 1))
    }

    /// Number of pixel columns covered (0 when inverted)
    #[inline]
    pub fn width(&self) -> i32 {
        (self.x1 - self.x0 + 1).max(0)
    }

    /// Number of pixel rows covered (0 when inverted)
    #[inline]
    pub fn height(&self) -> i32 {
        (self.y1 - self.y0 + 1).max(0)
    }

    /// True when x0 <= x1 and y0 <= y1
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }

    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && y >= self.y0 && x <= self.x1 && y <= self.y1
    }

    /// Overlap test (touching edges count)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && self.x1 >= other.x0 && self.y0 <= other.y1 && self.y1 >= other.y0
    }

    /// Intersect with `bounds`. `None` when nothing non-degenerate remains,
    /// in which case the caller skips the draw entirely.
    pub fn clip_to(&self, bounds: &Rect) -> Option<Rect> {
        let r = Rect {
            x0: self.x0.max(bounds.x0),
            y0: self.y0.max(bounds.y0),
            x1: self.x1.min(bounds.x1),
            y1: self.y1.min(bounds.y1),
        };
        r.is_valid().then_some(r)
    }

    fn outcode(&self, x: i32, y: i32) -> u8 {
        let mut code = INSIDE;
        if x < self.x0 {
            code |= LEFT;
        } else if x > self.x1 {
            code |= RIGHT;
        }
        if y < self.y0 {
            code |= TOP;
        } else if y > self.y1 {
            code |= BOTTOM;
        }
        code
    }

    /// Cohen-Sutherland line clipping
    ///
    /// Returns the clipped endpoints, or `None` when the segment lies
    /// entirely outside. Intersections truncate to the pixel grid, so a
    /// clipped endpoint may sit a fraction of a pixel off the true line.
    pub fn clip_line(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i32, i32, i32, i32)> {
        // Each pass moves one endpoint onto an edge; 4 edges x 2 endpoints
        const MAX_ITERATIONS: u32 = 8;

        let (mut ax, mut ay, mut bx, mut by) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        let (xmin, ymin, xmax, ymax) = (
            self.x0 as i64,
            self.y0 as i64,
            self.x1 as i64,
            self.y1 as i64,
        );

        for _ in 0..MAX_ITERATIONS {
            let code_a = self.outcode(ax as i32, ay as i32);
            let code_b = self.outcode(bx as i32, by as i32);

            if (code_a | code_b) == INSIDE {
                return Some((ax as i32, ay as i32, bx as i32, by as i32));
            }
            if (code_a & code_b) != 0 {
                // Both endpoints beyond the same edge
                return None;
            }

            let code_out = if code_a != INSIDE { code_a } else { code_b };

            // Divisors are non-zero: an endpoint beyond TOP with dy == 0 would put
            // both endpoints beyond TOP, which the shared-bit test rejected
            let (x, y) = if (code_out & TOP) != 0 {
                (ax + (bx - ax) * (ymin - ay) / (by - ay), ymin)
            } else if (code_out & BOTTOM) != 0 {
                (ax + (bx - ax) * (ymax - ay) / (by - ay), ymax)
            } else if (code_out & RIGHT) != 0 {
                (xmax, ay + (by - ay) * (xmax - ax) / (bx - ax))
            } else {
                (xmin, ay + (by - ay) * (xmin - ax) / (bx - ax))
            };

            if code_out == code_a {
                ax = x;
                ay = y;
            } else {
                bx = x;
                by = y;
            }
        }

        // Did not converge (integer rounding walked an endpoint around a corner)
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0, 0, 9, 9);

    #[test]
    fn test_clip_rect_partial() {
        let r = Rect::new(-5, -5, 5, 5);
        assert_eq!(r.clip_to(&BOUNDS), Some(Rect::new(0, 0, 5, 5)));
    }

    #[test]
    fn test_clip_rect_outside() {
        assert_eq!(Rect::new(20, 20, 30, 30).clip_to(&BOUNDS), None);
        assert_eq!(Rect::new(-10, 0, -1, 9).clip_to(&BOUNDS), None);
    }

    #[test]
    fn test_clip_rect_inverted_fails() {
        assert_eq!(Rect::new(5, 5, 4, 6).clip_to(&BOUNDS), None);
    }

    #[test]
    fn test_clip_rect_single_pixel() {
        let r = Rect::new(9, 9, 12, 12);
        assert_eq!(r.clip_to(&BOUNDS), Some(Rect::new(9, 9, 9, 9)));
    }

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::from_size(2, 3, 4, 5);
        assert_eq!(r, Rect::new(2, 3, 5, 7));
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 5);
        assert!(r.contains_point(5, 7));
        assert!(!r.contains_point(6, 7));
        assert_eq!(Rect::new(3, 0, 1, 0).width(), 0);
    }

    #[test]
    fn test_intersects() {
        assert!(BOUNDS.intersects(&Rect::new(9, 9, 20, 20)));
        assert!(!BOUNDS.intersects(&Rect::new(10, 0, 20, 9)));
    }

    #[test]
    fn test_clip_line_inside_unchanged() {
        assert_eq!(BOUNDS.clip_line(1, 2, 8, 7), Some((1, 2, 8, 7)));
    }

    #[test]
    fn test_clip_line_outside_rejected() {
        // Both endpoints left of the rectangle
        assert_eq!(BOUNDS.clip_line(-5, 0, -1, 9), None);
        // Both below
        assert_eq!(BOUNDS.clip_line(0, 12, 9, 15), None);
    }

    #[test]
    fn test_clip_line_crossing_one_edge() {
        // Diagonal exits through the right edge at x = 9
        let (x0, y0, x1, y1) = BOUNDS.clip_line(5, 1, 13, 5).unwrap();
        assert_eq!((x0, y0), (5, 1));
        assert_eq!(x1, 9);
        assert_eq!(y1, 3);
    }

    #[test]
    fn test_clip_line_both_ends_outside() {
        let (x0, y0, x1, y1) = BOUNDS.clip_line(-5, 4, 15, 4).unwrap();
        assert_eq!((x0, y0, x1, y1), (0, 4, 9, 4));
        let (x0, y0, x1, y1) = BOUNDS.clip_line(3, -10, 3, 30).unwrap();
        assert_eq!((x0, y0, x1, y1), (3, 0, 3, 9));
    }

    #[test]
    fn test_clip_line_corner_miss() {
        // Passes outside the top-left corner without touching the rectangle
        assert_eq!(BOUNDS.clip_line(-6, 2, 2, -6), None);
    }

    #[test]
    fn test_clip_line_endpoints_inside_bounds() {
        let lines = [(-50, -20, 60, 33), (4, 4, 100, -100), (-3, 12, 12, -3), (9, -1, -1, 9)];
        for (x0, y0, x1, y1) in lines {
            if let Some((a, b, c, d)) = BOUNDS.clip_line(x0, y0, x1, y1) {
                assert!(BOUNDS.contains_point(a, b), "{:?}", (a, b));
                assert!(BOUNDS.contains_point(c, d), "{:?}", (c, d));
            }
        }
    }
}
