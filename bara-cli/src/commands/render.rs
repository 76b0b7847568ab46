//! `bara render`: print the config document without staging or running.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use bara_renderer::Synthesizer;
use bara_runner::prepare_config;

use super::inputs::JobArgs;

/// Arguments for `bara render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub inputs: JobArgs,

    /// Directory holding a `copy.bara.sky.tera` that overrides the built-in template.
    #[arg(long)]
    pub template_dir: Option<PathBuf>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let job = self.inputs.to_job()?;
        let synthesizer = Synthesizer::with_template_dir(self.template_dir.as_deref())?;
        let (document, _) = prepare_config(&job, &synthesizer)?;
        print!("{document}");
        Ok(())
    }
}
