//! Error types for the decode module.

use thiserror::Error;

/// Errors that can occur while turning a payload into the canonical pixel buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload contained no bytes.
    #[error("empty payload")]
    EmptyPayload,

    /// The primary codec rejected the payload and no fallback codec is configured.
    #[error("unrecognized image payload: {0}")]
    Primary(#[source] image::ImageError),

    /// Both the primary codec and the fallback container codec rejected the payload.
    #[error("unrecognized image payload: {primary}; {codec} fallback failed: {source}")]
    FallbackFailed {
        /// The primary codec's error.
        primary: image::ImageError,
        /// Name of the fallback codec.
        codec: &'static str,
        /// The fallback codec's error.
        #[source]
        source: CodecError,
    },

    /// The fallback codec produced a plane whose buffer is smaller than its geometry requires.
    #[error(
        "raw plane {width}x{height} with stride {stride} needs {required} bytes, got {actual}"
    )]
    PlaneTooShort {
        /// Plane width in pixels.
        width: u32,
        /// Plane height in pixels.
        height: u32,
        /// Row stride in bytes.
        stride: usize,
        /// Minimum number of bytes required.
        required: usize,
        /// Number of bytes provided.
        actual: usize,
    },

    /// The fallback codec produced a plane with inconsistent geometry.
    #[error("invalid raw plane: {reason}")]
    InvalidPlane {
        /// What is wrong with the plane.
        reason: String,
    },

    /// Encoding the normalized image failed.
    #[error("failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),
}

impl DecodeError {
    /// Creates an invalid-plane error.
    pub fn invalid_plane(reason: impl Into<String>) -> Self {
        Self::InvalidPlane {
            reason: reason.into(),
        }
    }
}

/// Error reported by a [`ContainerCodec`](super::ContainerCodec).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CodecError {
    message: String,
}

impl CodecError {
    /// Creates a codec error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
