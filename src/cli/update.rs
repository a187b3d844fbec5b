use newsroom::{ArticleId, ArticleStore, ArticleUpdate, Config, Status};
use tracing::instrument;

use crate::cli::{parse_status, report_persistence, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The id of the article to update
    id: ArticleId,

    /// New headline
    #[arg(long)]
    title: Option<String>,

    /// New summary
    #[arg(long)]
    excerpt: Option<String>,

    /// New body
    #[arg(long)]
    content: Option<String>,

    /// New category
    #[arg(long)]
    category: Option<String>,

    /// New byline
    #[arg(long)]
    author: Option<String>,

    /// Set or clear the home page highlight
    #[arg(long, value_name = "BOOL")]
    featured: Option<bool>,

    /// New status (draft or published)
    #[arg(long, value_parser = parse_status)]
    status: Option<Status>,

    /// New image path or data URI. Pass an empty string to remove it
    #[arg(long)]
    image: Option<String>,
}

impl Command {
    #[instrument(skip(self), fields(id = self.id))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let changes = ArticleUpdate {
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            category: self.category,
            author: self.author,
            featured: self.featured,
            status: self.status,
            image: self.image,
        };
        if changes.is_empty() {
            anyhow::bail!("Nothing to update: pass at least one field to change");
        }

        let mut store = ArticleStore::open(config);
        let written = store.update(self.id, changes)?;

        println!(
            "{}",
            format!("✅ Updated article {}", written.value.id).success()
        );
        report_persistence(&written.persistence);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::durable_config;

    fn command(id: ArticleId) -> Command {
        Command {
            id,
            title: None,
            excerpt: None,
            content: None,
            category: None,
            author: None,
            featured: None,
            status: None,
            image: None,
        }
    }

    #[test]
    fn updates_only_the_given_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let config = durable_config(tmp.path());
        let before = ArticleStore::open(&config).get(2).unwrap();

        Command {
            title: Some("Head office has moved".to_string()),
            featured: Some(true),
            ..command(2)
        }
        .run(&config)
        .unwrap();

        let after = ArticleStore::open(&config).get(2).unwrap();
        assert_eq!(after.title, "Head office has moved");
        assert!(after.featured);
        assert_eq!(after.excerpt, before.excerpt);
        assert_eq!(after.date, before.date);
    }

    #[test]
    fn empty_update_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let config = durable_config(tmp.path());

        assert!(command(1).run(&config).is_err());
    }

    #[test]
    fn missing_article_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = durable_config(tmp.path());

        let result = Command {
            title: Some("x".to_string()),
            ..command(99)
        }
        .run(&config);

        assert!(result.is_err());
    }
}
