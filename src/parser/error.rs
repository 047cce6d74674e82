//! Error types for input list parsing.

use thiserror::Error;

/// Why an input line or platform name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A url-tail line whose URL ends in `/`, leaving no identifier.
    #[error("line {line}: no identifier after the last '/' in '{url}'")]
    EmptyIdentifier {
        /// 1-based line number.
        line: usize,
        /// The URL as written.
        url: String,
    },

    /// An explicit-id line that is not exactly `URL ID`.
    #[error("line {line}: expected 'URL ID', found {tokens} field(s)")]
    MalformedPair {
        /// 1-based line number.
        line: usize,
        /// Whitespace-separated fields on the line.
        tokens: usize,
    },

    /// A platform name outside the supported set.
    #[error("unsupported platform '{name}'. Expected one of: xhs, weibo, pexels, unsplash, huaban")]
    UnknownPlatform {
        /// The rejected name.
        name: String,
    },
}

impl ParseError {
    /// Creates an `EmptyIdentifier` error.
    #[must_use]
    pub fn empty_identifier(line: usize, url: &str) -> Self {
        Self::EmptyIdentifier {
            line,
            url: url.to_string(),
        }
    }

    /// Creates a `MalformedPair` error.
    #[must_use]
    pub fn malformed_pair(line: usize, tokens: usize) -> Self {
        Self::MalformedPair { line, tokens }
    }

    /// Creates an `UnknownPlatform` error.
    #[must_use]
    pub fn unknown_platform(name: &str) -> Self {
        Self::UnknownPlatform {
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_pair_display() {
        let msg = ParseError::malformed_pair(7, 3).to_string();
        assert!(msg.contains("line 7"), "got: {msg}");
        assert!(msg.contains("3 field"), "got: {msg}");
    }

    #[test]
    fn test_unknown_platform_lists_choices() {
        let msg = ParseError::unknown_platform("flickr").to_string();
        assert!(msg.contains("flickr"));
        assert!(msg.contains("xhs"));
    }
}
