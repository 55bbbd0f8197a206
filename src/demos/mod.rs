mod mandelbrot;
mod shapes;

pub use mandelbrot::Mandelbrot;
pub use shapes::Shapes;

use paladin::{GfxError, RasterContext};

/// A self-animating scene drawn with the raster primitives
pub trait Demo {
    /// Advance animation state by `dt` seconds
    fn update(&mut self, dt: f32);

    /// Draw the current state onto the active canvas of `ctx`
    fn render(&mut self, ctx: &mut RasterContext) -> Result<(), GfxError>;

    /// Demo name for the window title and the settings file
    fn name(&self) -> &str;
}
