use std::path::PathBuf;

use anyhow::Context;
use newsroom::{ArticleStore, Config, NewArticle, Status};
use tracing::instrument;

use crate::cli::{report_persistence, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Headline
    #[arg(long)]
    title: String,

    /// Short summary shown in listings
    #[arg(long)]
    excerpt: String,

    /// Article body
    #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
    content: Option<String>,

    /// Read the article body from a file
    #[arg(long, value_name = "PATH")]
    content_file: Option<PathBuf>,

    /// Registered category name
    #[arg(long)]
    category: String,

    /// Byline
    #[arg(long, default_value = "")]
    author: String,

    /// Highlight the article on the home page
    #[arg(long)]
    featured: bool,

    /// Publish immediately instead of creating a draft
    #[arg(long)]
    publish: bool,

    /// External image path or data URI
    #[arg(long)]
    image: Option<String>,
}

impl Command {
    #[instrument(skip(self), fields(title = %self.title))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let content = match (self.content, &self.content_file) {
            (Some(content), _) => content,
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            (None, None) => anyhow::bail!("either --content or --content-file is required"),
        };

        let fields = NewArticle {
            title: self.title,
            excerpt: self.excerpt,
            content,
            category: self.category,
            author: self.author,
            featured: self.featured,
            status: if self.publish {
                Status::Published
            } else {
                Status::Draft
            },
            image: self.image,
        };

        let mut store = ArticleStore::open(config);
        let written = store.create(fields)?;

        println!(
            "{}",
            format!(
                "✅ Created article {} ({})",
                written.value.id, written.value.status
            )
            .success()
        );
        report_persistence(&written.persistence);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use newsroom::ArticleFilter;

    use super::*;
    use crate::cli::tests::durable_config;

    fn command() -> Command {
        Command {
            title: "Open day".to_string(),
            excerpt: "Visit our offices".to_string(),
            content: Some("<p>Doors open at ten.</p>".to_string()),
            content_file: None,
            category: "Event".to_string(),
            author: "Events team".to_string(),
            featured: false,
            publish: true,
            image: None,
        }
    }

    #[test]
    fn creates_a_published_article() {
        let tmp = tempfile::tempdir().unwrap();
        let config = durable_config(tmp.path());

        command().run(&config).unwrap();

        let store = ArticleStore::open(&config);
        let article = store.get(4).unwrap();
        assert_eq!(article.title, "Open day");
        assert_eq!(article.status, Status::Published);
        assert_eq!(store.list(&ArticleFilter::default()).len(), 4);
    }

    #[test]
    fn reads_content_from_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = durable_config(tmp.path());
        let body = tmp.path().join("body.html");
        std::fs::write(&body, "<p>From a file</p>").unwrap();

        Command {
            content: None,
            content_file: Some(body),
            ..command()
        }
        .run(&config)
        .unwrap();

        let store = ArticleStore::open(&config);
        assert_eq!(store.get(4).unwrap().content, "<p>From a file</p>");
    }

    #[test]
    fn unknown_category_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let config = durable_config(tmp.path());

        let result = Command {
            category: "Gossip".to_string(),
            ..command()
        }
        .run(&config);

        assert!(result.is_err());
    }
}
