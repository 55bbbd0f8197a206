//! Indexed Color Palette
//!
//! Maps palette indices to RGBA colors and exact RGB colors back to indices.
//! Built once from an image whose pixels, in row-major order, are the entries.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};

use super::GfxError;
use crate::util::{is_pow2, next_pow2};

/// Largest palette a byte index can address
pub const MAX_PALETTE_SIZE: usize = 256;

/// The pico-8 16-color palette as 0xAARRGGBB
const PICO8_COLORS: [u32; 16] = [
    0xFF000000, 0xFF1D2B53, 0xFF7E2553, 0xFF008751, 0xFFAB5236, 0xFF5F574F, 0xFFC2C3C7, 0xFFFFF1E8,
    0xFFFF004D, 0xFFFFA300, 0xFFFFEC27, 0xFF00E436, 0xFF29ADFF, 0xFF83769C, 0xFFFF77A8, 0xFFFFCCAA,
];

/// Pack RGB into the reverse-lookup key (alpha ignored)
#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Color lookup table, `size` entries of RGBA bytes
#[derive(Debug, Clone)]
pub struct Palette {
    data: Vec<u8>,
    index_map: HashMap<u32, u8>,
    size: usize,
    mask: u8,
    scalar: u32,
}

impl Palette {
    /// Build from `pixel_count` RGBA pixels.
    ///
    /// The entry count rounds up to a power of two; padding entries are
    /// transparent black. Duplicate colors keep their first index.
    pub fn from_rgba(rgba: &[u8], pixel_count: usize) -> Result<Self, GfxError> {
        if pixel_count == 0 {
            return Err(GfxError::EmptyPalette);
        }
        let size = next_pow2(pixel_count);
        if size > MAX_PALETTE_SIZE {
            return Err(GfxError::PaletteTooLarge { colors: pixel_count });
        }
        let used = pixel_count * 4;
        if rgba.len() < used {
            return Err(GfxError::ImageSize {
                expected: used,
                actual: rgba.len(),
            });
        }

        Ok(Self::build(&rgba[..used], size))
    }

    /// Fill `size` entries from already validated RGBA bytes
    fn build(rgba: &[u8], size: usize) -> Self {
        debug_assert!(is_pow2(size) && size <= MAX_PALETTE_SIZE, "palette size {}", size);
        let mut data = vec![0u8; size * 4];
        data[..rgba.len()].copy_from_slice(rgba);

        let mut index_map = HashMap::with_capacity(rgba.len() / 4);
        for (i, px) in rgba.chunks_exact(4).enumerate() {
            index_map.entry(pack_rgb(px[0], px[1], px[2])).or_insert(i as u8);
        }

        debug!(
            "palette: {} source colors, {} entries, {} unique",
            rgba.len() / 4,
            size,
            index_map.len()
        );

        Self {
            data,
            index_map,
            size,
            mask: (size - 1) as u8,
            scalar: (256 / size) as u32,
        }
    }

    /// Decode an image file (PNG/BMP/JPEG) and use its pixels as entries
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GfxError> {
        let path = path.as_ref();
        let img = ::image::open(path)
            .map_err(|source| GfxError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let pixel_count = (img.width() * img.height()) as usize;
        let palette = Self::from_rgba(img.as_raw(), pixel_count)?;
        info!("Loaded palette {} ({} colors)", path.display(), palette.size);
        Ok(palette)
    }

    /// Built-in pico-8 palette
    pub fn pico8() -> Self {
        let rgba: Vec<u8> = PICO8_COLORS
            .iter()
            .flat_map(|&argb| {
                let [a, r, g, b] = argb.to_be_bytes();
                [r, g, b, a]
            })
            .collect();

        Self::build(&rgba, PICO8_COLORS.len())
    }

    /// Number of entries (always a power of two)
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// `size - 1`, applied to every incoming color index
    #[inline]
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// `256 / size`: index to 8-bit intensity for the grayscale path
    #[inline]
    pub fn scalar(&self) -> u32 {
        self.scalar
    }

    /// Raw RGBA bytes, `4 * size` long (the display lookup texture)
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Wrap an arbitrary color number into the palette
    #[inline]
    pub fn mask_index(&self, color: i32) -> u8 {
        (color & self.mask as i32) as u8
    }

    /// RGBA of the entry at `index` (masked)
    pub fn color(&self, index: u8) -> (u8, u8, u8, u8) {
        let i = (index & self.mask) as usize * 4;
        (self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3])
    }

    /// Exact RGB reverse lookup. `None` when the color is not in the palette.
    #[inline]
    pub fn index_from_color(&self, r: u8, g: u8, b: u8) -> Option<u8> {
        self.index_map.get(&pack_rgb(r, g, b)).copied()
    }
}
