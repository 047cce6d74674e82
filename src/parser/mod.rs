//! Input list parsing.
//!
//! Input lists are line-delimited text files. Depending on the source
//! [`Platform`], each line is either a bare URL whose final path segment names
//! the output (`UrlTail`) or a `URL ID` pair (`ExplicitId`).
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use imgpull_core::parser::{Platform, parse_task_list};
//!
//! let platform: Platform = "pexels".parse().unwrap();
//! let result = parse_task_list(
//!     "https://images.example.com/photos/1181.jpeg 1181\n",
//!     platform.identifier_strategy(),
//!     Path::new("./data/img"),
//! );
//! assert_eq!(result.tasks[0].identifier(), "1181");
//! ```

mod error;
mod platform;
mod task_list;

pub use error::ParseError;
pub use platform::{IdentifierStrategy, Platform};
pub use task_list::{ParseResult, SkippedLine, parse_task_list};
