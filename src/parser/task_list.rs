//! Line-delimited input lists turned into download tasks.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use super::error::ParseError;
use super::platform::IdentifierStrategy;
use crate::download::{DownloadTask, identifier_from_url_tail};

/// A line that produced no task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// The line as written, trimmed.
    pub raw: String,
    /// Why it was rejected.
    pub error: ParseError,
}

/// Tasks parsed from one input list.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Tasks in input order, one per distinct destination.
    pub tasks: Vec<DownloadTask>,
    /// Malformed lines.
    pub skipped: Vec<SkippedLine>,
    /// Lines dropped because an earlier line already targets the same destination.
    pub duplicates: usize,
}

impl ParseResult {
    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no tasks were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Parses an input list into tasks writing under `output_dir`.
///
/// Blank lines are ignored. Malformed lines are recorded in
/// [`ParseResult::skipped`] and logged; they never fail the whole list. A
/// line whose destination was already claimed by an earlier line is dropped,
/// so each output file is targeted by at most one task.
///
/// URLs are not validated here; an unusable URL fails its task at fetch time.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use imgpull_core::parser::{IdentifierStrategy, parse_task_list};
///
/// let list = "https://img.example/a1\n\nhttps://img.example/b2\n";
/// let result = parse_task_list(list, IdentifierStrategy::UrlTail, Path::new("/out"));
/// assert_eq!(result.len(), 2);
/// assert_eq!(result.tasks[0].identifier(), "a1");
/// ```
#[instrument(skip(text, output_dir), fields(input_len = text.len()))]
#[must_use]
pub fn parse_task_list(
    text: &str,
    strategy: IdentifierStrategy,
    output_dir: &Path,
) -> ParseResult {
    let mut result = ParseResult::default();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_number = index + 1;

        let parsed = match strategy {
            IdentifierStrategy::UrlTail => parse_url_tail_line(line, line_number),
            IdentifierStrategy::ExplicitId => parse_explicit_id_line(line, line_number),
        };

        let (url, identifier) = match parsed {
            Ok(pair) => pair,
            Err(error) => {
                warn!(line = line_number, error = %error, "Skipping malformed line");
                result.skipped.push(SkippedLine {
                    raw: line.to_string(),
                    error,
                });
                continue;
            }
        };

        let task = DownloadTask::new(identifier, url, output_dir);
        if !claimed.insert(task.destination().to_path_buf()) {
            debug!(
                line = line_number,
                identifier = %task.identifier(),
                "duplicate destination, dropping line"
            );
            result.duplicates += 1;
            continue;
        }
        result.tasks.push(task);
    }

    debug!(
        tasks = result.tasks.len(),
        skipped = result.skipped.len(),
        duplicates = result.duplicates,
        "parsed input list"
    );

    result
}

fn parse_url_tail_line(line: &str, line_number: usize) -> Result<(&str, &str), ParseError> {
    identifier_from_url_tail(line)
        .map(|identifier| (line, identifier))
        .ok_or_else(|| ParseError::empty_identifier(line_number, line))
}

fn parse_explicit_id_line(line: &str, line_number: usize) -> Result<(&str, &str), ParseError> {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(url), Some(identifier), None) => Ok((url, identifier)),
        _ => Err(ParseError::malformed_pair(
            line_number,
            line.split_whitespace().count(),
        )),
    }
}
