//! Mirror a repository with Copybara from CI.
//!
//! # Usage
//!
//! ```text
//! bara run    --sot-repo <owner/name> --destination-repo <owner/name> --committer <who> [--workflow push|init|pr|<name>]
//! bara render [job flags] [--template-dir <dir>]
//! bara diff   [job flags] [--stage-dir <dir>]
//! ```
//!
//! Every job flag also reads its GitHub Actions `INPUT_*` variable.

mod commands;
mod report;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, render::RenderArgs, run::RunArgs};

#[derive(Parser, Debug)]
#[command(
    name = "bara",
    version,
    about = "Synthesize a Copybara config and run it in a container",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate, stage credentials and config, pull the image and run it.
    Run(RunArgs),

    /// Print the config document the job would use.
    Render(RenderArgs),

    /// Show unified diff between the staged config document and a fresh render.
    Diff(DiffArgs),
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => args.run().map(Some),
        Commands::Render(args) => args.run().map(|()| None),
        Commands::Diff(args) => args.run().map(|()| None),
    };
    report::finish(result)
}
