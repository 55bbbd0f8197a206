//! Palette-indexed software rasterizer
//!
//! Drawing happens in palette indices on integer canvases with 16.16
//! fixed-point edge stepping. The binary (feature `display`) shows frames
//! through SDL2; the library itself has no platform dependencies.

pub mod config;
pub mod fixed;
pub mod gfx;
pub mod present;
pub mod util;

pub use fixed::Fixed16;
pub use gfx::{
    ByteImage, Canvas, CanvasId, GfxError, ImageHandle, Palette, RasterContext, Rect, TargetGuard,
};
pub use present::FrameView;
