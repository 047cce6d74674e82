//! CLI parsing with value sources, and merging of file config defaults.

use anyhow::Result;
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};

use crate::app_config::FileConfig;
use crate::cli::Args;

/// Which options were given explicitly on the command line.
///
/// Explicit CLI values always win over file config; clap defaults never do.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) platform: bool,
    pub(crate) output_dir: bool,
    pub(crate) max_retries: bool,
    pub(crate) max_concurrent: bool,
    pub(crate) timeout: bool,
    pub(crate) connect_timeout: bool,
    pub(crate) retry_delay: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    let sources = sources_from_matches(&matches);
    (args, sources)
}

fn sources_from_matches(matches: &ArgMatches) -> CliValueSources {
    CliValueSources {
        platform: is_commandline_value(matches, "platform"),
        output_dir: is_commandline_value(matches, "output_dir"),
        max_retries: is_commandline_value(matches, "max_retries"),
        max_concurrent: is_commandline_value(matches, "max_concurrent"),
        timeout: is_commandline_value(matches, "timeout"),
        connect_timeout: is_commandline_value(matches, "connect_timeout"),
        retry_delay: is_commandline_value(matches, "retry_delay"),
    }
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

pub(crate) fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Result<Args> {
    let Some(file_config) = file_config else {
        return Ok(args);
    };
    file_config.validate()?;

    if !cli_sources.platform
        && let Some(platform) = file_config.platform
    {
        args.platform = platform;
    }

    if !cli_sources.output_dir
        && let Some(output_dir) = &file_config.output_dir
    {
        args.output_dir.clone_from(output_dir);
    }

    if !cli_sources.max_retries
        && let Some(max_retries) = file_config.max_retries
    {
        args.max_retries = max_retries;
    }

    if !cli_sources.max_concurrent
        && let Some(max_concurrent) = file_config.max_concurrent
    {
        args.max_concurrent = max_concurrent;
    }

    if !cli_sources.timeout
        && let Some(timeout) = file_config.timeout_secs
    {
        args.timeout = timeout;
    }

    if !cli_sources.connect_timeout
        && let Some(connect_timeout) = file_config.connect_timeout_secs
    {
        args.connect_timeout = connect_timeout;
    }

    if !cli_sources.retry_delay
        && let Some(retry_delay) = file_config.retry_delay_secs
    {
        args.retry_delay = retry_delay;
    }

    Ok(args)
}

/// Default log level from `-q`/`-v`; `RUST_LOG` still wins in `init_tracing`.
pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
