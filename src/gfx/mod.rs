//! Palette-indexed raster core
//!
//! Everything here works on palette indices; RGBA only appears when a
//! palette is built and when a frame is expanded for presentation.

mod canvas;
mod error;
mod image;
mod palette;
mod raster;
mod rect;

pub use canvas::{Canvas, CanvasId};
pub use error::GfxError;
pub use image::ByteImage;
pub use palette::{pack_rgb, Palette, MAX_PALETTE_SIZE};
pub use raster::{ImageHandle, RasterContext, TargetGuard};
pub use rect::Rect;
