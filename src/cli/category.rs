use newsroom::{ArticleStore, Config, domain::category::usage_count};
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Debug, clap::Subcommand)]
enum CategoryCommand {
    /// List categories with their usage
    List,

    /// Register a custom category
    Add {
        /// The category name
        name: String,
    },

    /// Remove a custom category that no article uses
    Remove {
        /// The category name
        name: String,
    },
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut store = ArticleStore::open(config);

        match self.command {
            CategoryCommand::List => {
                let articles = store.served().articles;
                let registry = store.categories();
                for name in registry.list() {
                    let count = usage_count(&articles, name);
                    let label = if registry.is_default(name) {
                        format!("{name} {}", "(default)".dim())
                    } else {
                        name.to_string()
                    };
                    println!("{label}  {}", format!("{count} article(s)").dim());
                }
            }
            CategoryCommand::Add { name } => {
                if store.add_category(&name)? {
                    println!("{}", format!("✅ Added category '{name}'").success());
                    if !store.is_durable() {
                        eprintln!(
                            "{}",
                            "⚠️  No durable store is configured; the category will not be kept."
                                .warning()
                        );
                    }
                } else {
                    println!("{}", format!("Category '{name}' already exists").dim());
                }
            }
            CategoryCommand::Remove { name } => {
                if store.remove_category(&name)? {
                    println!("{}", format!("✅ Removed category '{name}'").success());
                } else {
                    anyhow::bail!("Category '{name}' not found");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::durable_config;

    fn run(config: &Config, command: CategoryCommand) -> anyhow::Result<()> {
        Command { command }.run(config)
    }

    #[test]
    fn added_categories_persist_and_can_be_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let config = durable_config(tmp.path());

        run(&config, CategoryCommand::Add {
            name: "Webinar".to_string(),
        })
        .unwrap();
        assert!(ArticleStore::open(&config).categories().contains("Webinar"));

        run(&config, CategoryCommand::Remove {
            name: "Webinar".to_string(),
        })
        .unwrap();
        assert!(!ArticleStore::open(&config).categories().contains("Webinar"));
    }

    #[test]
    fn defaults_cannot_be_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let config = durable_config(tmp.path());

        let result = run(&config, CategoryCommand::Remove {
            name: "Notice".to_string(),
        });

        assert!(result.is_err());
    }

    #[test]
    fn removing_an_unknown_category_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let config = durable_config(tmp.path());

        let result = run(&config, CategoryCommand::Remove {
            name: "Nope".to_string(),
        });

        assert!(result.is_err());
    }
}
