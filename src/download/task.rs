//! The unit of work handed to a fetch worker.

use std::path::{Path, PathBuf};

use super::filename::destination_path;

/// One image to fetch, convert and persist.
///
/// Immutable once built; `destination` is derived from `identifier` and the
/// output directory and never set independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    identifier: String,
    url: String,
    destination: PathBuf,
}

impl DownloadTask {
    /// Creates a task whose output lands in `output_dir`.
    #[must_use]
    pub fn new(identifier: impl Into<String>, url: impl Into<String>, output_dir: &Path) -> Self {
        let identifier = identifier.into();
        let destination = destination_path(output_dir, &identifier);
        Self {
            identifier,
            url: url.into(),
            destination,
        }
    }

    /// The identifier the output file is named after.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The source URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Where the normalized image is written.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}
