//! Source platforms and how their input lists are interpreted.

use std::fmt;
use std::str::FromStr;

use super::error::ParseError;
use crate::decode::Decoder;

/// How a task identifier is derived from an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierStrategy {
    /// One URL per line; the identifier is the URL's final path segment.
    UrlTail,
    /// `URL ID` per line; the identifier is the second field.
    ExplicitId,
}

/// A supported image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Platform {
    /// Xiaohongshu; images may arrive as HEIF containers.
    Xhs,
    /// Weibo.
    Weibo,
    /// Pexels.
    Pexels,
    /// Unsplash.
    Unsplash,
    /// Huaban.
    Huaban,
}

impl Platform {
    /// Every supported platform.
    pub const ALL: [Self; 5] = [
        Self::Xhs,
        Self::Weibo,
        Self::Pexels,
        Self::Unsplash,
        Self::Huaban,
    ];

    /// Returns the stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xhs => "xhs",
            Self::Weibo => "weibo",
            Self::Pexels => "pexels",
            Self::Unsplash => "unsplash",
            Self::Huaban => "huaban",
        }
    }

    /// How this platform's input lines name their tasks.
    #[must_use]
    pub fn identifier_strategy(self) -> IdentifierStrategy {
        match self {
            Self::Xhs | Self::Weibo => IdentifierStrategy::UrlTail,
            Self::Pexels | Self::Unsplash | Self::Huaban => IdentifierStrategy::ExplicitId,
        }
    }

    /// Whether payloads from this platform need the container fallback codec.
    #[must_use]
    pub fn wants_container_fallback(self) -> bool {
        matches!(self, Self::Xhs)
    }

    /// Builds the decoder this platform's payloads are handed to.
    ///
    /// `xhs` gets the HEIF fallback (on by default). A build with
    /// `--no-default-features` gives it a primary-only decoder and a warning.
    #[must_use]
    pub fn decoder(self) -> Decoder {
        if !self.wants_container_fallback() {
            return Decoder::primary_only();
        }

        #[cfg(feature = "heif")]
        {
            Decoder::with_heif_fallback()
        }

        #[cfg(not(feature = "heif"))]
        {
            tracing::warn!(
                platform = self.as_str(),
                "built without the `heif` feature; HEIF payloads will fail to decode"
            );
            Decoder::primary_only()
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseError::unknown_platform(name))
    }
}
