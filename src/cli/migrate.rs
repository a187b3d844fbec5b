use newsroom::{ArticleStore, Config};
use tracing::instrument;

use crate::cli::{prompt_to_proceed, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let store = ArticleStore::open(config);

        if !self.yes {
            println!(
                "Will overwrite the durable store at {} with {}",
                config.durable_path.display(),
                config.snapshot_path.display()
            );
            prompt_to_proceed()?;
        }

        let count = store.migrate_snapshot()?;

        println!(
            "{}",
            format!("✅ Migrated {count} article(s) into the durable store").success()
        );
        Ok(())
    }
}
