//! Payload decoding and normalization to the canonical RGBA pixel buffer.
//!
//! A [`Decoder`] tries the general-purpose raster codec from the `image` crate
//! first. When that codec rejects the payload and a [`ContainerCodec`] is
//! configured, the fallback codec decodes the payload into a [`RawPlane`],
//! which is then reinterpreted (honouring its row stride) into the canonical
//! buffer. Every successful decode is normalized to RGBA8.
//!
//! # Example
//!
//! ```
//! use imgpull_core::decode::Decoder;
//!
//! let decoder = Decoder::primary_only();
//! assert!(decoder.decode(b"definitely not an image").is_err());
//! ```

mod error;
#[cfg(feature = "heif")]
mod heif;
mod raw;

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};
use tracing::{debug, instrument};

pub use error::{CodecError, DecodeError};
#[cfg(feature = "heif")]
pub use heif::HeifCodec;
pub use raw::{PixelLayout, RawPlane};

/// A secondary decoder for a container format the primary codec does not understand.
///
/// Implementations return the decoded raw plane; the [`Decoder`] takes care of
/// reinterpreting it into the canonical RGBA buffer.
pub trait ContainerCodec: Send + Sync {
    /// Short codec name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Decodes the payload into a raw pixel plane.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the payload is not a valid container of this format.
    fn decode_raw(&self, payload: &[u8]) -> Result<RawPlane, CodecError>;
}

/// Which codec produced a [`DecodedImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeSource {
    /// The general-purpose raster codec.
    Primary,
    /// The named container fallback codec.
    Fallback(&'static str),
}

/// A decoded image normalized to the canonical 4-channel RGBA8 layout.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: RgbaImage,
    source: DecodeSource,
}

impl DecodedImage {
    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The codec that decoded this image.
    #[must_use]
    pub fn source(&self) -> DecodeSource {
        self.source
    }

    /// The canonical pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Encodes the image as PNG into memory.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Encode`] if the PNG encoder fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, DecodeError> {
        let mut buffer = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(DecodeError::Encode)?;
        Ok(buffer.into_inner())
    }
}

/// Two-stage payload decoder: primary raster codec, then optional container fallback.
#[derive(Clone, Default)]
pub struct Decoder {
    fallback: Option<Arc<dyn ContainerCodec>>,
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("fallback", &self.fallback_name())
            .finish()
    }
}

impl Decoder {
    /// Creates a decoder that only uses the primary raster codec.
    #[must_use]
    pub fn primary_only() -> Self {
        Self { fallback: None }
    }

    /// Creates a decoder with the given container codec as fallback.
    #[must_use]
    pub fn with_fallback(codec: Arc<dyn ContainerCodec>) -> Self {
        Self {
            fallback: Some(codec),
        }
    }

    /// Creates a decoder with the HEIF container codec as fallback.
    #[cfg(feature = "heif")]
    #[must_use]
    pub fn with_heif_fallback() -> Self {
        Self::with_fallback(Arc::new(HeifCodec))
    }

    /// Name of the configured fallback codec, if any.
    #[must_use]
    pub fn fallback_name(&self) -> Option<&'static str> {
        self.fallback.as_ref().map(|codec| codec.name())
    }

    /// Decodes a payload into the canonical RGBA buffer.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::EmptyPayload`] for zero-length payloads
    /// - [`DecodeError::Primary`] when the primary codec fails and no fallback is configured
    /// - [`DecodeError::FallbackFailed`] when both codecs fail
    /// - [`DecodeError::PlaneTooShort`] / [`DecodeError::InvalidPlane`] when the
    ///   fallback's raw plane cannot be reinterpreted
    #[instrument(level = "debug", skip(self, payload), fields(payload_len = payload.len()))]
    pub fn decode(&self, payload: &[u8]) -> Result<DecodedImage, DecodeError> {
        if payload.is_empty() {
            return Err(DecodeError::EmptyPayload);
        }

        let primary_error = match image::load_from_memory(payload) {
            Ok(dynamic) => {
                return Ok(DecodedImage {
                    pixels: dynamic.into_rgba8(),
                    source: DecodeSource::Primary,
                });
            }
            Err(e) => e,
        };

        let Some(codec) = self.fallback.as_ref() else {
            return Err(DecodeError::Primary(primary_error));
        };

        debug!(
            codec = codec.name(),
            primary_error = %primary_error,
            "primary codec rejected payload, trying fallback"
        );

        let plane = codec
            .decode_raw(payload)
            .map_err(|source| DecodeError::FallbackFailed {
                primary: primary_error,
                codec: codec.name(),
                source,
            })?;

        Ok(DecodedImage {
            pixels: plane.into_rgba()?,
            source: DecodeSource::Fallback(codec.name()),
        })
    }
}
