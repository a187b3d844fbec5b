use clap::Parser;
use newsroom::{Article, ArticleId, ArticleStore, Config};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Display a single article")]
pub struct Command {
    /// The id of the article to display
    id: ArticleId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,

    /// Include the article body
    #[arg(long)]
    with_content: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let store = ArticleStore::open(config);
        let article = store.get(self.id)?;

        match self.output {
            OutputFormat::Pretty => self.output_pretty(&article),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&article)?);
            }
        }

        Ok(())
    }

    fn output_pretty(&self, article: &Article) {
        println!("# {}", article.title);
        println!("{}\n", article.excerpt);

        println!("{}", "Metadata".dim());
        println!("  Id:        {}", article.id);
        println!("  Status:    {}", article.status);
        println!("  Date:      {}", article.date);
        println!("  Category:  {}", article.category);
        if !article.author.is_empty() {
            println!("  Author:    {}", article.author);
        }
        if article.featured {
            println!("  Featured:  {}", "yes".info());
        }
        if let Some(image) = &article.image {
            let shown = if image.starts_with("data:") {
                "(inline data)"
            } else {
                image.as_str()
            };
            println!("  Image:     {shown}");
        }

        if self.with_content {
            println!("\n{}", "Content".dim());
            println!("{}", article.content);
        }
    }
}
