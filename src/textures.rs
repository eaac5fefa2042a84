//! CPU-side sprite textures.
//!
//! A [`SpriteTexture`] is the CPU-side pixel buffer that gets mapped onto
//! every particle. It is produced by [`crate::synth`], handed to the particle
//! field, and uploaded to the GPU by the point renderer.
//!
//! # Layout
//!
//! Pixels are straight-alpha RGBA8, row-major, top row first, in sRGB.

use std::path::Path;

use crate::error::TextureError;

/// A square RGBA8 sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteTexture {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
}

impl SpriteTexture {
    /// Create a sprite from raw RGBA data.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize * 4,
            "RGBA data size mismatch"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// A fully transparent `size x size` sprite.
    ///
    /// Falls back to an empty 0x0 sprite if even the blank buffer cannot be
    /// allocated.
    pub fn blank(size: u32) -> Self {
        let len = (size as usize)
            .checked_mul(size as usize)
            .and_then(|n| n.checked_mul(4));
        let mut data = Vec::new();
        match len {
            Some(len) if data.try_reserve_exact(len).is_ok() => {
                data.resize(len, 0);
                Self::from_rgba(data, size, size)
            }
            _ => {
                log::warn!("Cannot allocate a {size}x{size} blank sprite, using an empty one");
                Self::from_rgba(Vec::new(), 0, 0)
            }
        }
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Write the sprite as a PNG (or any format `image` infers from the
    /// extension).
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), TextureError> {
        if self.width == 0 || self.height == 0 {
            return Err(TextureError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            TextureError::Empty {
                width: self.width,
                height: self.height,
            },
        )?;
        img.save(path.as_ref())?;
        log::info!("Wrote {}x{} sprite to {}", self.width, self.height, path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_dimensions() {
        let tex = SpriteTexture::blank(16);
        assert_eq!(tex.width, 16);
        assert_eq!(tex.height, 16);
        assert_eq!(tex.data.len(), 16 * 16 * 4);
        assert!(tex.is_blank());
    }

    #[test]
    fn test_blank_zero() {
        let tex = SpriteTexture::blank(0);
        assert!(tex.data.is_empty());
        assert!(tex.is_blank());
    }

    #[test]
    #[should_panic(expected = "RGBA data size mismatch")]
    fn test_from_rgba_size_mismatch() {
        SpriteTexture::from_rgba(vec![0; 3], 1, 1);
    }

    #[test]
    fn test_pixel_lookup() {
        let data = vec![
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
            0, 0, 0, 0,
        ];
        let tex = SpriteTexture::from_rgba(data, 2, 2);
        assert_eq!(tex.pixel(1, 0), [0, 255, 0, 255]);
        assert_eq!(tex.pixel(0, 1), [0, 0, 255, 255]);
        assert!(!tex.is_blank());
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        let tex = SpriteTexture::from_rgba(vec![255; 4 * 4 * 4], 4, 4);
        tex.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded.dimensions(), (4, 4));
        assert_eq!(loaded.into_raw(), tex.data);
    }

    #[test]
    fn test_save_empty_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tex = SpriteTexture::blank(0);
        assert!(matches!(
            tex.save_png(dir.path().join("empty.png")),
            Err(TextureError::Empty { .. })
        ));
    }
}
