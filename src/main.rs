//! CLI entry point for the imgpull tool.

use std::process::ExitCode;

mod app;
mod app_config;
mod cli;

/// Process exit outcome.
///
/// - `Success` (0): nothing failed
/// - `Partial` (1): some images failed while others succeeded or were
///   skipped, or an input file was missing
/// - `Failure` (2): every attempted image failed, the run was interrupted,
///   or it could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Partial,
    Failure,
}

impl ProcessExit {
    fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial => 1,
            Self::Failure => 2,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match app::runtime::run_imgpull().await {
        Ok(outcome) => ExitCode::from(outcome.code()),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(ProcessExit::Failure.code())
        }
    }
}
