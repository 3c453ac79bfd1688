//! `connect-packager` entrypoint.
//!
//! Builds a Magento Connect package archive and exits non-zero on failure.

use clap::Parser;
use connect_packager::{LogReporter, Reporter};
use connect_packager_cli::cli::Cli;
use connect_packager_cli::error::Result;
use connect_packager_cli::logging;
use connect_packager_cli::run::{current_dir, run};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let mut stdout = std::io::stdout().lock();
    let run_result = current_dir().and_then(|cwd| {
        run(&cli, &cwd, &LogReporter, &mut stdout)?;
        Ok(())
    });

    let mut stderr = std::io::stderr();
    let exit_code = exit_code_for_run_result(run_result, &LogReporter, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for_run_result(
    result: Result<()>,
    reporter: &dyn Reporter,
    stderr: &mut dyn Write,
) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            reporter.error(&err.to_string());
            log::debug!("run failed: {err:?}");
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort; nothing else to report to.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_packager::RecordingReporter;
    use connect_packager_cli::CliError;
    use log::Level;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let reporter = RecordingReporter::default();
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &reporter, &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn exit_code_for_run_result_reports_errors() {
        let reporter = RecordingReporter::default();
        let mut stderr = Vec::new();
        let exit_code =
            exit_code_for_run_result(Err(CliError::MissingDescriptor), &reporter, &mut stderr);
        assert_eq!(exit_code, 1);
        let message = String::from_utf8(stderr).expect("utf-8");
        assert!(message.starts_with("error: no connect descriptor given"));
        let errors = reporter.at_level(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors.iter().all(|error| error.starts_with("no connect descriptor given")));
    }
}
