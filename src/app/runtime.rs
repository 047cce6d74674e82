use std::fs;
use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use imgpull_core::parser::parse_task_list;
use imgpull_core::{DownloadEngine, FetchWorker, HttpClient, RetryPolicy};
use tracing::{debug, info, warn};

use crate::ProcessExit;
use crate::app::config_runtime;
use crate::app::exit_handler;
use crate::app::input_files;
use crate::app::progress::BatchProgress;
use crate::app::summary::{FileSummary, RunSummary};
use crate::app::terminal;
use crate::app_config::load_default_file_config;
use crate::cli::Args;

pub(crate) async fn run_imgpull() -> Result<ProcessExit> {
    let (cli_args, cli_sources) = config_runtime::parse_cli_with_sources();
    let loaded_config = load_default_file_config()?;
    let args =
        config_runtime::apply_config_defaults(cli_args, &cli_sources, loaded_config.config.as_ref())?;

    terminal::init_tracing(
        config_runtime::resolve_default_log_level(&args),
        terminal::no_color_env_requested(),
    );

    debug!(?args, "CLI arguments parsed");
    if loaded_config.config.is_some()
        && let Some(path) = &loaded_config.path
    {
        debug!(path = %path.display(), "Loaded config file");
    }
    info!(platform = %args.platform, "imgpull starting");

    let inputs = input_files::resolve_input_files(&args)?;

    if !args.output_dir.exists() {
        fs::create_dir_all(&args.output_dir).with_context(|| {
            format!(
                "Failed to create output directory '{}'",
                args.output_dir.display()
            )
        })?;
        info!(dir = %args.output_dir.display(), "Created output directory");
    }

    let engine = build_engine(&args)?;
    let use_progress_bar = terminal::should_use_progress_bar(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    );

    let mut summary = RunSummary::default();

    for input in inputs {
        let text = match fs::read_to_string(&input) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %input.display(), error = %e, "Input file does not exist or cannot be read");
                summary.missing_inputs.push(input);
                continue;
            }
        };

        let parsed = parse_task_list(
            &text,
            args.platform.identifier_strategy(),
            &args.output_dir,
        );
        info!(
            path = %input.display(),
            images = parsed.len(),
            malformed = parsed.skipped.len(),
            duplicates = parsed.duplicates,
            "Found images to download"
        );

        let malformed_lines = parsed.skipped.len();
        let duplicate_lines = parsed.duplicates;
        let progress = BatchProgress::start(use_progress_bar, parsed.len(), &input);

        let report = tokio::select! {
            result = engine.run_with_observer(parsed.tasks, progress.observer()) => {
                result.context("batch processing failed")?
            }
            _ = tokio::signal::ctrl_c() => {
                progress.abandon();
                warn!(
                    path = %input.display(),
                    finished = progress.position(),
                    "Interrupted. Run again to resume."
                );
                summary.interrupted = true;
                break;
            }
        };
        progress.finish();

        info!(
            path = %input.display(),
            succeeded = report.succeeded,
            skipped = report.skipped,
            failed = report.failed,
            "Finished downloading"
        );

        summary.files.push(FileSummary {
            path: input,
            malformed_lines,
            duplicate_lines,
            report,
        });
    }

    let totals = summary.totals();
    info!(
        files = summary.files.len(),
        missing_inputs = summary.missing_inputs.len(),
        succeeded = totals.succeeded,
        skipped = totals.skipped,
        failed = totals.failed,
        retried = totals.retried,
        "Run complete"
    );

    print_summary(&summary, &args)?;

    Ok(exit_handler::determine_exit_outcome(&summary))
}

fn build_engine(args: &Args) -> Result<DownloadEngine> {
    let client = HttpClient::with_timeouts(
        Duration::from_secs(args.connect_timeout),
        Duration::from_secs(args.timeout),
    )
    .context("Failed to build HTTP client")?;
    let retry_policy = RetryPolicy::new(args.max_retries, Duration::from_secs(args.retry_delay));
    let worker = FetchWorker::new(client, args.platform.decoder(), retry_policy);

    DownloadEngine::new(usize::from(args.max_concurrent), worker)
        .context("invalid download engine configuration")
}

fn print_summary(summary: &RunSummary, args: &Args) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        summary.write_json(&mut out)
    } else if args.quiet {
        Ok(())
    } else {
        summary
            .write_text(&mut out)
            .context("failed to write summary")
    }
}
