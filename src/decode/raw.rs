//! Raw pixel planes produced by container fallback codecs.

use image::{DynamicImage, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba, RgbaImage};

use super::DecodeError;

/// Interleaved channel layout of a [`RawPlane`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// 8-bit luminance.
    Luma,
    /// 8-bit luminance plus alpha.
    LumaAlpha,
    /// 8-bit red, green, blue.
    Rgb,
    /// 8-bit red, green, blue, alpha.
    Rgba,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    #[must_use]
    pub fn channels(self) -> usize {
        match self {
            Self::Luma => 1,
            Self::LumaAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// A decoded, interleaved 8-bit pixel plane whose rows may be padded.
///
/// `stride` is the distance in bytes between the starts of consecutive rows and
/// must be at least `width * layout.channels()`.
#[derive(Debug, Clone)]
pub struct RawPlane {
    /// Channel layout.
    pub layout: PixelLayout,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row stride in bytes.
    pub stride: usize,
    /// Plane bytes, `height` rows of `stride` bytes (the last row may be unpadded).
    pub data: Vec<u8>,
}

impl RawPlane {
    /// Reinterprets the plane as the canonical RGBA buffer, dropping row padding.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidPlane`] for zero-sized planes or a stride
    /// narrower than a row, and [`DecodeError::PlaneTooShort`] when `data`
    /// cannot hold every row.
    pub fn into_rgba(self) -> Result<RgbaImage, DecodeError> {
        if self.width == 0 || self.height == 0 {
            return Err(DecodeError::invalid_plane(format!(
                "zero-sized plane {}x{}",
                self.width, self.height
            )));
        }

        let width = usize::try_from(self.width)
            .map_err(|_| DecodeError::invalid_plane("width overflows usize"))?;
        let height = usize::try_from(self.height)
            .map_err(|_| DecodeError::invalid_plane("height overflows usize"))?;
        let row_bytes = width
            .checked_mul(self.layout.channels())
            .ok_or_else(|| DecodeError::invalid_plane("row size overflows usize"))?;

        if self.stride < row_bytes {
            return Err(DecodeError::invalid_plane(format!(
                "stride {} is narrower than a {row_bytes}-byte row",
                self.stride
            )));
        }

        let required = self
            .stride
            .checked_mul(height - 1)
            .and_then(|padded| padded.checked_add(row_bytes))
            .ok_or_else(|| DecodeError::invalid_plane("plane size overflows usize"))?;
        if self.data.len() < required {
            return Err(DecodeError::PlaneTooShort {
                width: self.width,
                height: self.height,
                stride: self.stride,
                required,
                actual: self.data.len(),
            });
        }

        let packed = if self.stride == row_bytes {
            let mut data = self.data;
            data.truncate(required);
            data
        } else {
            let mut packed = Vec::with_capacity(row_bytes * height);
            for row in self.data.chunks(self.stride).take(height) {
                packed.extend_from_slice(&row[..row_bytes]);
            }
            packed
        };

        let dynamic = match self.layout {
            PixelLayout::Luma => {
                DynamicImage::ImageLuma8(to_buffer::<Luma<u8>>(self.width, self.height, packed)?)
            }
            PixelLayout::LumaAlpha => DynamicImage::ImageLumaA8(to_buffer::<LumaA<u8>>(
                self.width,
                self.height,
                packed,
            )?),
            PixelLayout::Rgb => {
                DynamicImage::ImageRgb8(to_buffer::<Rgb<u8>>(self.width, self.height, packed)?)
            }
            PixelLayout::Rgba => return to_buffer::<Rgba<u8>>(self.width, self.height, packed),
        };

        Ok(dynamic.into_rgba8())
    }
}

fn to_buffer<P>(width: u32, height: u32, packed: Vec<u8>) -> Result<ImageBuffer<P, Vec<u8>>, DecodeError>
where
    P: Pixel<Subpixel = u8>,
{
    ImageBuffer::from_raw(width, height, packed)
        .ok_or_else(|| DecodeError::invalid_plane("packed rows do not match plane geometry"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_plane_with_padding_is_unpadded() {
        // 2x2 RGB, stride 8 (6 bytes of pixels + 2 padding per row)
        let data = vec![
            1, 2, 3, 4, 5, 6, 0xEE, 0xEE, //
            7, 8, 9, 10, 11, 12, 0xEE, 0xEE,
        ];
        let plane = RawPlane {
            layout: PixelLayout::Rgb,
            width: 2,
            height: 2,
            stride: 8,
            data,
        };

        let rgba = plane.into_rgba().unwrap();

        assert_eq!(rgba.get_pixel(0, 0).0, [1, 2, 3, 255]);
        assert_eq!(rgba.get_pixel(1, 0).0, [4, 5, 6, 255]);
        assert_eq!(rgba.get_pixel(0, 1).0, [7, 8, 9, 255]);
        assert_eq!(rgba.get_pixel(1, 1).0, [10, 11, 12, 255]);
    }

    #[test]
    fn test_last_row_may_omit_padding() {
        let data = vec![1, 2, 3, 0, 4, 5, 6];
        let plane = RawPlane {
            layout: PixelLayout::Rgb,
            width: 1,
            height: 2,
            stride: 4,
            data,
        };

        let rgba = plane.into_rgba().unwrap();
        assert_eq!(rgba.get_pixel(0, 1).0, [4, 5, 6, 255]);
    }

    #[test]
    fn test_rgba_plane_preserves_alpha() {
        let plane = RawPlane {
            layout: PixelLayout::Rgba,
            width: 1,
            height: 1,
            stride: 4,
            data: vec![10, 20, 30, 40],
        };
        assert_eq!(plane.into_rgba().unwrap().get_pixel(0, 0).0, [10, 20, 30, 40]);
    }

    #[test]
    fn test_luma_alpha_plane_expands_to_rgba() {
        let plane = RawPlane {
            layout: PixelLayout::LumaAlpha,
            width: 1,
            height: 1,
            stride: 2,
            data: vec![50, 60],
        };
        assert_eq!(plane.into_rgba().unwrap().get_pixel(0, 0).0, [50, 50, 50, 60]);
    }

    #[test]
    fn test_short_plane_rejected() {
        let plane = RawPlane {
            layout: PixelLayout::Rgb,
            width: 2,
            height: 2,
            stride: 6,
            data: vec![0; 10],
        };
        assert!(matches!(
            plane.into_rgba(),
            Err(DecodeError::PlaneTooShort {
                required: 12,
                actual: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_narrow_stride_rejected() {
        let plane = RawPlane {
            layout: PixelLayout::Rgba,
            width: 2,
            height: 1,
            stride: 4,
            data: vec![0; 8],
        };
        assert!(matches!(
            plane.into_rgba(),
            Err(DecodeError::InvalidPlane { .. })
        ));
    }

    #[test]
    fn test_zero_sized_plane_rejected() {
        let plane = RawPlane {
            layout: PixelLayout::Luma,
            width: 0,
            height: 3,
            stride: 0,
            data: Vec::new(),
        };
        assert!(matches!(
            plane.into_rgba(),
            Err(DecodeError::InvalidPlane { .. })
        ));
    }
}
