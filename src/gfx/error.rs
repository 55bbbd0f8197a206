use std::fmt;
use std::path::PathBuf;

/// Errors reported by the raster core
#[derive(Debug)]
pub enum GfxError {
    /// Width or height of zero
    InvalidDimensions { width: u32, height: u32 },
    /// Pixel data shorter than `width * height * bytes_per_pixel`
    ImageSize { expected: usize, actual: usize },
    /// Only 3 (RGB) and 4 (RGBA) bytes per pixel are accepted
    UnsupportedFormat { bytes_per_pixel: usize },
    /// Palette source contained no pixels
    EmptyPalette,
    /// More colors than a byte index can address
    PaletteTooLarge { colors: usize },
    /// A sprite pixel has no exact match in the palette
    UnmappedColor { x: u32, y: u32, rgb: u32 },
    /// Image handle was never issued or has been freed
    InvalidHandle(usize),
    /// Canvas id does not name a canvas of this context
    InvalidCanvas(usize),
    /// Image file could not be read or decoded
    Decode {
        path: PathBuf,
        source: ::image::ImageError,
    },
}

impl fmt::Display for GfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid buffer dimensions {}x{}", width, height)
            },
            Self::ImageSize { expected, actual } => {
                write!(f, "image data is {} bytes, expected {}", actual, expected)
            },
            Self::UnsupportedFormat { bytes_per_pixel } => {
                write!(f, "unsupported pixel format: {} bytes per pixel", bytes_per_pixel)
            },
            Self::EmptyPalette => write!(f, "palette source has no pixels"),
            Self::PaletteTooLarge { colors } => {
                write!(f, "palette of {} colors exceeds 256 entries", colors)
            },
            Self::UnmappedColor { x, y, rgb } => {
                write!(f, "color #{:06X} at ({}, {}) is not in the palette", rgb, x, y)
            },
            Self::InvalidHandle(h) => write!(f, "invalid image handle {}", h),
            Self::InvalidCanvas(id) => write!(f, "invalid canvas id {}", id),
            Self::Decode { path, source } => {
                write!(f, "failed to load {}: {}", path.display(), source)
            },
        }
    }
}

impl std::error::Error for GfxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}
