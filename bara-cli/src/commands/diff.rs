//! `bara diff`: show what `run` would change in the staged config document.

use anyhow::Result;
use clap::Args;

use bara_renderer::Synthesizer;
use bara_runner::{diff_staged, prepare_config};

use super::inputs::JobArgs;

/// Arguments for `bara diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub inputs: JobArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let job = self.inputs.to_job()?;
        let paths = self.inputs.host_paths()?;
        let (document, _) = prepare_config(&job, &Synthesizer::new()?)?;

        match diff_staged(&paths.config_document, &document)? {
            None => println!(
                "No differences for '{}'.",
                paths.config_document.display()
            ),
            Some(diff) => {
                print!("{diff}");
                if !diff.ends_with('\n') {
                    println!();
                }
            }
        }
        Ok(())
    }
}
