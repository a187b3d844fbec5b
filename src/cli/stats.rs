use clap::Parser;
use newsroom::{ArticleStore, Config, Stats};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "Show article counts")]
pub struct Command {
    /// Output format (table, json)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let store = ArticleStore::open(config);
        let served = store.served();
        let stats = Stats::of(&served.articles);

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
            OutputFormat::Table if self.quiet => Self::output_quiet(&stats),
            OutputFormat::Table => {
                Self::output_table(&stats);
                println!();
                println!("{}", format!("Served from the {} tier", served.source).dim());
            }
        }

        Ok(())
    }

    fn output_quiet(stats: &Stats) {
        println!(
            "total={} published={} draft={} featured={}",
            stats.total, stats.published, stats.draft, stats.featured
        );
    }

    fn output_table(stats: &Stats) {
        if stats.total == 0 {
            println!("No articles yet. Create one with 'newsroom create'.");
            return;
        }

        println!("Article counts");
        println!("{}", "──────────────".dim());

        let rows = [
            ("Total", stats.total),
            ("Published", stats.published),
            ("Draft", stats.draft),
            ("Featured", stats.featured),
            ("Monthly views", stats.monthly_views),
            ("Active pages", stats.active_pages),
            ("Contacts", stats.contacts),
        ];
        if is_narrow() {
            for (label, count) in rows {
                println!("{label}: {count}");
            }
        } else {
            for (label, count) in rows {
                println!("{label:<14} {count}");
            }
        }

        if stats.draft > 0 {
            println!();
            println!(
                "{}",
                format!("{} draft(s) awaiting publication", stats.draft).warning()
            );
        }
    }
}
