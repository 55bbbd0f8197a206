//! Palette-indexed sprites
//!
//! A [`ByteImage`] is a source image quantized against a [`Palette`]: one
//! index byte per pixel, row-major, immutable once built.

use std::path::Path;

use log::info;

use super::{pack_rgb, GfxError, Palette, Rect};

/// Indexed image, 1 byte per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl ByteImage {
    /// Wrap pre-indexed pixels
    pub fn from_indices(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, GfxError> {
        if width == 0 || height == 0 {
            return Err(GfxError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(GfxError::ImageSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Quantize RGB (3 bpp) or RGBA (4 bpp) pixels by exact palette match.
    ///
    /// Fails on the first pixel whose color is not in the palette; no
    /// partially converted image is returned.
    pub fn quantize(
        data: &[u8],
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
        palette: &Palette,
    ) -> Result<Self, GfxError> {
        if width == 0 || height == 0 {
            return Err(GfxError::InvalidDimensions { width, height });
        }
        if bytes_per_pixel != 3 && bytes_per_pixel != 4 {
            return Err(GfxError::UnsupportedFormat { bytes_per_pixel });
        }
        let count = width as usize * height as usize;
        let expected = count * bytes_per_pixel;
        if data.len() < expected {
            return Err(GfxError::ImageSize {
                expected,
                actual: data.len(),
            });
        }

        let mut pixels = Vec::with_capacity(count);
        for (i, px) in data[..expected].chunks_exact(bytes_per_pixel).enumerate() {
            let index = palette.index_from_color(px[0], px[1], px[2]).ok_or_else(|| {
                GfxError::UnmappedColor {
                    x: i as u32 % width,
                    y: i as u32 / width,
                    rgb: pack_rgb(px[0], px[1], px[2]),
                }
            })?;
            pixels.push(index);
        }

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Decode an image file and quantize it against `palette`
    pub fn load(path: impl AsRef<Path>, palette: &Palette) -> Result<Self, GfxError> {
        let path = path.as_ref();
        let img = ::image::open(path)
            .map_err(|source| GfxError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let sprite = Self::quantize(img.as_raw(), img.width(), img.height(), 4, palette)?;
        info!("Loaded image {} ({}x{})", path.display(), sprite.width, sprite.height);
        Ok(sprite)
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

    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Bounds of the image placed at (x, y)
    pub fn rect_at(&self, x: i32, y: i32) -> Rect {
        Rect::from_size(x, y, self.width as i32, self.height as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        let rgba = [0, 0, 0, 255, 255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255];
        Palette::from_rgba(&rgba, 4).unwrap()
    }

    #[test]
    fn test_quantize_rgba() {
        // 2x2: red, green / blue, black
        let data = [
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 0, 0, 0, 255,
        ];
        let img = ByteImage::quantize(&data, 2, 2, 4, &palette()).unwrap();
        assert_eq!(img.pixels(), &[1, 2, 3, 0]);
        assert_eq!(img.pixel(1, 1), Some(0));
        assert_eq!(img.pixel(2, 0), None);
    }

    #[test]
    fn test_quantize_rgb() {
        let data = [0, 255, 0, 0, 0, 255, 255, 0, 0];
        let img = ByteImage::quantize(&data, 3, 1, 3, &palette()).unwrap();
        assert_eq!(img.pixels(), &[2, 3, 1]);
    }

    #[test]
    fn test_quantize_unmapped_color_fails() {
        let data = [0, 0, 0, 255, 10, 20, 30, 255];
        match ByteImage::quantize(&data, 2, 1, 4, &palette()) {
            Err(GfxError::UnmappedColor { x, y, rgb }) => {
                assert_eq!((x, y), (1, 0));
                assert_eq!(rgb, 0x0A141E);
            },
            other => panic!("expected UnmappedColor, got {:?}", other),
        }
    }

    #[test]
    fn test_quantize_rejects_bad_input() {
        let p = palette();
        assert!(matches!(
            ByteImage::quantize(&[0; 4], 0, 1, 4, &p),
            Err(GfxError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            ByteImage::quantize(&[0; 8], 1, 1, 2, &p),
            Err(GfxError::UnsupportedFormat { bytes_per_pixel: 2 })
        ));
        assert!(matches!(
            ByteImage::quantize(&[0; 4], 2, 1, 4, &p),
            Err(GfxError::ImageSize { expected: 8, actual: 4 })
        ));
    }

    #[test]
    fn test_from_indices() {
        let img = ByteImage::from_indices(2, 1, vec![5, 6]).unwrap();
        assert_eq!(img.rect_at(3, 4), Rect::new(3, 4, 4, 4));
        assert!(ByteImage::from_indices(2, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ByteImage::load("does/not/exist.png", &palette()).unwrap_err();
        assert!(matches!(err, GfxError::Decode { .. }));
    }
}
