//! HEIF/HEIC container fallback codec backed by libheif.

use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

use super::{CodecError, ContainerCodec, PixelLayout, RawPlane};

/// Decodes the primary image of a HEIF container into an interleaved RGB(A) plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeifCodec;

impl ContainerCodec for HeifCodec {
    fn name(&self) -> &'static str {
        "heif"
    }

    fn decode_raw(&self, payload: &[u8]) -> Result<RawPlane, CodecError> {
        let lib_heif = LibHeif::new();
        let context = HeifContext::read_from_bytes(payload)
            .map_err(|e| CodecError::new(format!("failed to read HEIF container: {e}")))?;
        let handle = context
            .primary_image_handle()
            .map_err(|e| CodecError::new(format!("HEIF container has no primary image: {e}")))?;

        let (chroma, layout) = if handle.has_alpha_channel() {
            (RgbChroma::Rgba, PixelLayout::Rgba)
        } else {
            (RgbChroma::Rgb, PixelLayout::Rgb)
        };

        let image = lib_heif
            .decode(&handle, ColorSpace::Rgb(chroma), None)
            .map_err(|e| CodecError::new(format!("failed to decode HEIF image: {e}")))?;

        let planes = image.planes();
        let plane = planes
            .interleaved
            .ok_or_else(|| CodecError::new("decoded HEIF image has no interleaved plane"))?;

        Ok(RawPlane {
            layout,
            width: plane.width,
            height: plane.height,
            stride: plane.stride,
            data: plane.data.to_vec(),
        })
    }
}
