use newsroom::{ArticleStore, Config};
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let probe = ArticleStore::open(config).probe();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&probe)?);
            return Ok(());
        }

        let mark = |ok: bool| if ok { "✅".success() } else { "❌".warning() };

        println!("Preferred backend: {}", probe.backend);
        println!("Serving from:      {}", probe.serving);
        println!(
            "{} Durable store {}",
            mark(probe.durable_available),
            config.durable_path.display().to_string().dim()
        );
        println!(
            "{} Snapshot file {}",
            mark(probe.snapshot_reachable),
            config.snapshot_path.display().to_string().dim()
        );

        if let Some(test) = &probe.durable_test {
            match &test.error {
                Some(error) => println!("   Test read failed: {}", error.warning()),
                None if test.has_data => {
                    println!("   Test read found {} article(s)", test.item_count);
                }
                None => println!("   Test read found no stored collection"),
            }
        }

        if !probe.durable_available {
            println!();
            println!(
                "{}",
                "Writes will not outlive the process. Run 'newsroom init --backend durable' to \
                 configure a durable store."
                    .warning()
            );
        }

        Ok(())
    }
}
