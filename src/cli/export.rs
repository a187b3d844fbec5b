use std::path::PathBuf;

use anyhow::Context;
use newsroom::{ArticleStore, Config, storage::codec::export_file_name};
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Where to write the document. Use '-' for stdout.
    ///
    /// Defaults to `news-<date>.json` in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let store = ArticleStore::open(config);
        let document = store.export()?;

        let path = self
            .output
            .unwrap_or_else(|| PathBuf::from(export_file_name(chrono::Local::now().date_naive())));

        if path.as_os_str() == "-" {
            println!("{document}");
            return Ok(());
        }

        std::fs::write(&path, document)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!(
            "{}",
            format!("✅ Exported the collection to {}", path.display()).success()
        );
        Ok(())
    }
}
