use crate::geometry::Size;
use std::fmt;

/// A decoded bitmap: tightly packed RGBA8 rows with straight (not
/// premultiplied) alpha.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width_px: u32,
    pub height_px: u32,
    pub pixels: Vec<u8>,
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("pixels_len", &self.pixels.len())
            .finish()
    }
}

impl RasterImage {
    /// Returns `None` when `pixels` is not exactly `width_px * height_px * 4` bytes.
    pub fn from_rgba(width_px: u32, height_px: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width_px as usize)
            .checked_mul(height_px as usize)?
            .checked_mul(4)?;
        (pixels.len() == expected).then_some(Self {
            width_px,
            height_px,
            pixels,
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width_px as f32, self.height_px as f32)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size().aspect_ratio()
    }

    /// Splits the bitmap into packed RGB bytes and a separate alpha channel.
    pub fn split_alpha(&self) -> (Vec<u8>, Vec<u8>) {
        let pixel_count = self.pixels.len() / 4;
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for px in self.pixels.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
            alpha.push(px[3]);
        }
        (rgb, alpha)
    }

    pub fn is_opaque(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffers() {
        assert!(RasterImage::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(RasterImage::from_rgba(2, 2, vec![0; 16]).is_some());
    }

    #[test]
    fn splits_channels() {
        let image = RasterImage::from_rgba(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 0]).unwrap();
        let (rgb, alpha) = image.split_alpha();
        assert_eq!(rgb, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(alpha, vec![255, 0]);
        assert!(!image.is_opaque());
        assert_eq!(image.aspect_ratio(), 2.0);
    }
}
