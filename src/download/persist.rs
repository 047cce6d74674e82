//! Decode, re-encode and atomically persist a fetched payload.
//!
//! Decoding and PNG encoding are CPU-bound, so the whole pipeline runs on the
//! blocking pool. The image is written to a temporary file in the destination
//! directory and renamed into place, so the destination either holds a
//! complete image or does not exist.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::debug;

use super::error::DownloadError;
use crate::decode::{DecodeSource, Decoder};

/// What a successful persist produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedImage {
    /// Size of the written PNG file.
    pub bytes_written: u64,
    /// Codec that decoded the payload.
    pub source: DecodeSource,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Decodes `payload` and writes it as PNG to `destination`.
///
/// # Errors
///
/// - [`DownloadError::Decode`] if no codec accepts the payload or PNG encoding fails
/// - [`DownloadError::Io`] if the temporary file cannot be created, written or renamed
pub(crate) async fn decode_and_persist(
    decoder: Arc<Decoder>,
    url: &str,
    payload: Vec<u8>,
    destination: &Path,
) -> Result<PersistedImage, DownloadError> {
    let url_owned = url.to_string();
    let destination_owned = destination.to_path_buf();

    tokio::task::spawn_blocking(move || {
        decode_and_persist_blocking(&decoder, &url_owned, &payload, &destination_owned)
    })
    .await
    .map_err(|join_error| {
        DownloadError::io(
            destination,
            std::io::Error::other(format!("persist task failed: {join_error}")),
        )
    })?
}

fn decode_and_persist_blocking(
    decoder: &Decoder,
    url: &str,
    payload: &[u8],
    destination: &Path,
) -> Result<PersistedImage, DownloadError> {
    let decoded = decoder
        .decode(payload)
        .map_err(|e| DownloadError::decode(url, e))?;
    let png = decoded
        .encode_png()
        .map_err(|e| DownloadError::decode(url, e))?;

    let parent = parent_dir(destination);
    std::fs::create_dir_all(&parent).map_err(|e| DownloadError::io(&parent, e))?;

    let mut temp = NamedTempFile::new_in(&parent).map_err(|e| DownloadError::io(&parent, e))?;
    temp.write_all(&png)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| DownloadError::io(temp.path(), e))?;
    temp.persist(destination)
        .map_err(|e| DownloadError::io(destination, e.error))?;

    debug!(
        path = %destination.display(),
        width = decoded.width(),
        height = decoded.height(),
        bytes = png.len(),
        "image persisted"
    );

    Ok(PersistedImage {
        bytes_written: png.len() as u64,
        source: decoded.source(),
        width: decoded.width(),
        height: decoded.height(),
    })
}

fn parent_dir(destination: &Path) -> PathBuf {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
