//! Identifier sanitization and deterministic output path resolution.
//!
//! The output path of a task is a pure function of its identifier and the
//! output directory, which is what makes reruns over a partially completed
//! batch idempotent.

use std::path::{Path, PathBuf};

use super::constants::OUTPUT_EXTENSION;

/// Sanitizes an identifier for use as a file stem.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and control characters) with `_`, and rewrites
/// all-dot identifiers so they cannot name a parent or current directory.
#[must_use]
pub fn sanitize_identifier(identifier: &str) -> String {
    let sanitized: String = identifier
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if sanitized.chars().all(|c| c == '.') {
        sanitized.replace('.', "_")
    } else {
        sanitized
    }
}

/// Returns the output path for `identifier` under `output_dir`.
///
/// The extension is always appended, even when the identifier already ends
/// in an image extension, so `a.jpg` maps to `a.jpg.png`.
#[must_use]
pub fn destination_path(output_dir: &Path, identifier: &str) -> PathBuf {
    output_dir.join(format!(
        "{}.{OUTPUT_EXTENSION}",
        sanitize_identifier(identifier)
    ))
}

/// Extracts the identifier from the final `/`-separated segment of a URL.
///
/// Query strings and fragments are kept, so two URLs that differ only in
/// their query map to distinct outputs. Returns `None` when the URL ends in `/`.
#[must_use]
pub fn identifier_from_url_tail(url: &str) -> Option<&str> {
    url.trim()
        .rsplit('/')
        .next()
        .filter(|tail| !tail.is_empty())
}
