use newsroom::{ArticleId, ArticleStore, Config};
use tracing::instrument;

use crate::cli::{prompt_to_proceed, report_persistence, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The id of the article to delete
    id: ArticleId,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut store = ArticleStore::open(config);
        let article = store.get(self.id)?;

        if !self.yes {
            println!("Will delete article {}: {}", article.id, article.title);
            prompt_to_proceed()?;
        }

        let written = store.delete(self.id)?;

        println!(
            "{}",
            format!("✅ Deleted article {}", written.value.id).success()
        );
        report_persistence(&written.persistence);
        Ok(())
    }
}
