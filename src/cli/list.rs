use anyhow::Context;
use clap::{Parser, ValueEnum};
use newsroom::{
    Article, ArticleFilter, ArticleStore, Config, Status,
    domain::Search,
};
use regex::Regex;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow, truncate};

const TITLE_WIDTH: usize = 48;
const NARROW_TITLE_WIDTH: usize = 24;

/// Command arguments for `newsroom list`.
#[derive(Debug, Parser)]
#[command(about = "List articles with filters")]
pub struct Command {
    /// Filter by status (draft or published).
    #[arg(long, value_parser = super::parse_status)]
    status: Option<Status>,

    /// Filter by exact category name.
    #[arg(long)]
    category: Option<String>,

    /// Case-insensitive substring match against title/excerpt.
    #[arg(long, conflicts_with = "regex")]
    contains: Option<String>,

    /// Regular expression match against title/excerpt.
    #[arg(long)]
    regex: Option<String>,

    /// Show only featured articles.
    #[arg(long)]
    featured: bool,

    /// Show the N most recent published articles.
    #[arg(
        long,
        value_name = "N",
        conflicts_with_all = ["status", "category", "contains", "regex", "featured"]
    )]
    recent: Option<usize>,

    /// Limit number of rows returned.
    #[arg(long)]
    limit: Option<usize>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Print ids only, one per line.
    #[arg(long)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let store = ArticleStore::open(config);

        let mut articles = match self.recent {
            Some(limit) => store.recent(limit),
            None => store.list(&self.filter()?),
        };
        if let Some(limit) = self.limit {
            articles.truncate(limit);
        }

        match self.output {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &articles)
                    .context("failed to render json output")?;
                println!();
            }
            OutputFormat::Table if self.quiet => {
                for article in &articles {
                    println!("{}", article.id);
                }
            }
            OutputFormat::Table => render_table(&articles),
        }

        Ok(())
    }

    fn filter(&self) -> anyhow::Result<ArticleFilter> {
        let search = match (&self.contains, &self.regex) {
            (_, Some(pattern)) => Some(Search::Regex(
                Regex::new(pattern).with_context(|| format!("invalid regex '{pattern}'"))?,
            )),
            (Some(needle), None) => Some(Search::Contains(needle.clone())),
            (None, None) => None,
        };

        Ok(ArticleFilter {
            status: self.status,
            category: self.category.clone(),
            search,
            featured: self.featured.then_some(true),
        })
    }
}

fn render_table(articles: &[Article]) {
    if articles.is_empty() {
        println!("{}", "No articles found.".dim());
        return;
    }

    let narrow = is_narrow();
    let title_width = if narrow {
        NARROW_TITLE_WIDTH
    } else {
        TITLE_WIDTH
    };

    let rows: Vec<Vec<String>> = articles
        .iter()
        .map(|article| {
            let marker = if article.featured { "★ " } else { "" };
            let title = truncate(&format!("{marker}{}", article.title), title_width);
            if narrow {
                vec![article.id.to_string(), article.status.to_string(), title]
            } else {
                vec![
                    article.id.to_string(),
                    article.status.to_string(),
                    article.date.to_string(),
                    article.category.clone(),
                    title,
                ]
            }
        })
        .collect();

    let headers: &[&str] = if narrow {
        &["ID", "Status", "Title"]
    } else {
        &["ID", "Status", "Date", "Category", "Title"]
    };

    // Determine column widths for alignment.
    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect::<Vec<_>>();

    for (header, width) in headers.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    println!();
    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in rows {
        for (idx, value) in row.iter().enumerate() {
            let width = widths[idx];
            let cell = format!("{value:<width$}");
            if idx == 1 && value == Status::Draft.as_str() {
                print!("{}  ", cell.warning());
            } else {
                print!("{cell}  ");
            }
        }
        println!();
    }

    println!(
        "\n{}",
        format!("{} article(s)", articles.len()).dim()
    );
}
