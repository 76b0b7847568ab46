//! Final status line and process exit code.
//!
//! On GitHub Actions (`GITHUB_ACTIONS=true`) messages use workflow commands
//! so they surface as annotations; elsewhere they are colored.

use std::fs::OpenOptions;
use std::io::Write;
use std::process::ExitCode;

use colored::Colorize;

use bara_core::exit::{self, Severity, CONFIG_FAILURE, UNHANDLED_FAILURE};
use bara_runner::RunnerError;

/// Exit code an error maps to.
pub fn error_code(err: &anyhow::Error) -> i32 {
    if let Some(runner) = err.downcast_ref::<RunnerError>() {
        return runner.exit_code();
    }
    if err.downcast_ref::<bara_core::ConfigError>().is_some() {
        return CONFIG_FAILURE;
    }
    UNHANDLED_FAILURE
}

/// Print the outcome of `result` and convert it into the process exit code.
///
/// `Ok(None)` is a command with no tool status to report.
pub fn finish(result: anyhow::Result<Option<i32>>) -> ExitCode {
    let on_actions = std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true");

    let code = match result {
        Ok(None) => return ExitCode::SUCCESS,
        Ok(Some(code)) => {
            let message = exit::describe(code).unwrap_or("Completed.");
            match exit::lookup(code).map(|o| o.severity) {
                Some(Severity::Warning) => warn(on_actions, message),
                _ => eprintln!("{}", message.green()),
            }
            // No-op is not a failure.
            0
        }
        Err(err) => {
            let code = error_code(&err);
            let message = exit::describe(code).unwrap_or("Failed.");
            error(on_actions, &format!("{message} {err:#}"));
            code
        }
    };

    append_step_summary(code);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn warn(on_actions: bool, message: &str) {
    if on_actions {
        println!("::warning::{message}");
    } else {
        eprintln!("{}", message.yellow());
    }
}

fn error(on_actions: bool, message: &str) {
    if on_actions {
        println!("::error::{message}");
    } else {
        eprintln!("{}", message.red().bold());
    }
}

/// One line per job in the workflow run summary, when the runner provides one.
fn append_step_summary(code: i32) {
    let Ok(path) = std::env::var("GITHUB_STEP_SUMMARY") else {
        return;
    };
    if path.is_empty() {
        return;
    }
    let line = format!(
        "- bara: exit code {code} ({})\n",
        exit::describe(code).unwrap_or("unknown")
    );
    let written = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(line.as_bytes()));
    if let Err(e) = written {
        tracing::warn!("cannot write step summary to {path}: {e}");
    }
}
