use newsroom::{ArticleId, ArticleStore, Config};
use tracing::instrument;

use crate::cli::{report_persistence, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The id of the article to publish or unpublish
    id: ArticleId,
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut store = ArticleStore::open(config);
        let written = store.toggle_status(self.id)?;

        println!(
            "{}",
            format!(
                "✅ Article {} is now {}",
                written.value.id, written.value.status
            )
            .success()
        );
        report_persistence(&written.persistence);
        Ok(())
    }
}
