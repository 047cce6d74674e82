//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use imgpull_core::DEFAULT_MAX_RETRIES;
use imgpull_core::download::{
    CONNECT_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT, DEFAULT_RETRY_BACKOFF, REQUEST_TIMEOUT_SECS,
};
use imgpull_core::parser::Platform;

/// Default directory converted images are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "./data/img/";

/// Batch download remote images and normalize them to PNG.
///
/// Reads line-delimited URL lists, fetches every image with bounded
/// concurrency and retry, converts each payload to RGBA PNG, and writes one
/// file per line. Images whose output already exists are skipped, so an
/// interrupted run can simply be started again.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgpull")]
#[command(author, version, about)]
#[command(group(ArgGroup::new("input").required(true).args(["txt_paths", "txt_dir"])))]
pub struct Args {
    /// Source platform; selects how list lines are read and which codecs are used
    #[arg(long, value_enum, default_value_t = Platform::Xhs)]
    pub platform: Platform,

    /// Input list files, processed in the order given
    #[arg(long = "txt-paths", value_name = "FILE", num_args = 1..)]
    pub txt_paths: Vec<PathBuf>,

    /// Directory whose `*.txt` files are processed in name order
    #[arg(long = "txt-dir", value_name = "DIR")]
    pub txt_dir: Option<PathBuf>,

    /// Directory converted images are written to (created if missing)
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Maximum attempts per image, including the first (1-20)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub max_retries: u32,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_MAX_CONCURRENT as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub max_concurrent: u8,

    /// Per-request timeout in seconds, covering connect, headers and body (1-3600)
    #[arg(long, value_name = "SECS", default_value_t = REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: u64,

    /// Connect timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// Delay in seconds before retrying after a network error (0-600)
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_RETRY_BACKOFF.as_secs(), value_parser = clap::value_parser!(u64).range(0..=600))]
    pub retry_delay: u64,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        let mut argv = vec!["imgpull", "--txt-paths", "list.txt"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.platform, Platform::Xhs);
        assert_eq!(args.txt_paths, vec![PathBuf::from("list.txt")]);
        assert_eq!(args.output_dir, PathBuf::from("./data/img/"));
        assert_eq!(args.max_retries, 3);
        assert_eq!(args.max_concurrent, 10);
        assert_eq!(args.timeout, 300);
        assert_eq!(args.connect_timeout, 30);
        assert_eq!(args.retry_delay, 5);
        assert!(!args.json);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_requires_an_input_source() {
        let err = Args::try_parse_from(["imgpull"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_txt_paths_and_txt_dir_conflict() {
        let err = parse(&["--txt-dir", "lists"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_txt_dir_alone() {
        let args = Args::try_parse_from(["imgpull", "--txt-dir", "lists"]).unwrap();
        assert_eq!(args.txt_dir, Some(PathBuf::from("lists")));
        assert!(args.txt_paths.is_empty());
    }

    #[test]
    fn test_cli_multiple_txt_paths() {
        let args =
            Args::try_parse_from(["imgpull", "--txt-paths", "a.txt", "b.txt", "c.txt"]).unwrap();
        assert_eq!(args.txt_paths.len(), 3);
        assert_eq!(args.txt_paths[2], PathBuf::from("c.txt"));
    }

    #[test]
    fn test_cli_platform_values() {
        for (name, platform) in [
            ("xhs", Platform::Xhs),
            ("weibo", Platform::Weibo),
            ("pexels", Platform::Pexels),
            ("unsplash", Platform::Unsplash),
            ("huaban", Platform::Huaban),
        ] {
            assert_eq!(parse(&["--platform", name]).unwrap().platform, platform);
        }
    }

    #[test]
    fn test_cli_unknown_platform_rejected() {
        let err = parse(&["--platform", "flickr"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        assert_eq!(parse(&["-v"]).unwrap().verbose, 1);
        assert_eq!(parse(&["-vv"]).unwrap().verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        assert!(parse(&["-q"]).unwrap().quiet);
        let err = parse(&["-q", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["imgpull", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["imgpull", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    // ==================== Range Tests ====================

    #[test]
    fn test_cli_max_concurrent_bounds() {
        assert_eq!(parse(&["-c", "1"]).unwrap().max_concurrent, 1);
        assert_eq!(parse(&["-c", "100"]).unwrap().max_concurrent, 100);
        for bad in ["0", "101"] {
            let err = parse(&["-c", bad]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }
    }

    #[test]
    fn test_cli_max_retries_bounds() {
        assert_eq!(parse(&["-r", "1"]).unwrap().max_retries, 1);
        assert_eq!(parse(&["--max-retries", "20"]).unwrap().max_retries, 20);
        for bad in ["0", "21"] {
            let err = parse(&["-r", bad]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }
    }

    #[test]
    fn test_cli_timeouts() {
        let args = parse(&[
            "--timeout",
            "60",
            "--connect-timeout",
            "5",
            "--retry-delay",
            "0",
        ])
        .unwrap();
        assert_eq!(args.timeout, 60);
        assert_eq!(args.connect_timeout, 5);
        assert_eq!(args.retry_delay, 0);

        let err = parse(&["--timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
