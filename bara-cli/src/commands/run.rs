//! `bara run`: validate, stage, pull and run the container.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use bara_renderer::Synthesizer;
use bara_runner::github::GITHUB_API;
use bara_runner::{run_job, Copybara, GitHubClient, HostStager, JobReport, TokioProcessRunner};

use super::inputs::JobArgs;

/// Arguments for `bara run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: JobArgs,

    /// Print the job report as JSON.
    #[arg(long)]
    pub json: bool,

    /// GitHub REST API root used to create the destination repository.
    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API)]
    pub github_api: String,
}

impl RunArgs {
    /// Returns the classified tool exit code on success.
    pub fn run(self) -> Result<i32> {
        let job = self.inputs.to_job()?;
        let paths = self.inputs.host_paths()?;
        let workdir = std::env::current_dir().context("cannot resolve working directory")?;

        let synthesizer = Synthesizer::new()?;
        let stager = HostStager::new(paths.clone());
        let copybara = Copybara::new(
            job.image.clone(),
            paths,
            workdir,
            Arc::new(TokioProcessRunner),
        );
        let github = GitHubClient::with_api(&self.github_api, &job.credentials.access_token);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("cannot start tokio runtime")?;
        let report = runtime.block_on(run_job(
            &job,
            &synthesizer,
            &stager,
            &copybara,
            &github,
        ))?;

        if self.json {
            print_json(&report)?;
        }
        Ok(report.exit_code)
    }
}

fn print_json(report: &JobReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
