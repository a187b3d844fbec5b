use std::path::PathBuf;

use anyhow::Context;
use newsroom::{ArticleStore, Config};
use tracing::instrument;

use crate::cli::{prompt_to_proceed, report_persistence, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// A JSON file holding an array of articles
    path: PathBuf,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let document = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let mut store = ArticleStore::open(config);

        if !self.yes {
            println!(
                "Will replace all {} article(s) with the contents of {}",
                store.served().articles.len(),
                self.path.display()
            );
            prompt_to_proceed()?;
        }

        let written = store.import(&document)?;

        println!(
            "{}",
            format!("✅ Imported {} article(s)", written.value).success()
        );
        report_persistence(&written.persistence);
        Ok(())
    }
}
