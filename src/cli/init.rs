use std::path::Path;

use newsroom::{BackendChoice, Config};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Storage tier to prefer (durable, snapshot or seed)
    #[arg(long, default_value_t)]
    backend: BackendChoice,

    /// Location of the local cache mirror
    #[arg(long, value_name = "PATH")]
    cache: Option<std::path::PathBuf>,

    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration already exists at {} (use --force to overwrite)",
                config_path.display()
            );
        }

        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", parent.display()))?;
        }

        let config = Config {
            backend: self.backend,
            cache_path: self.cache,
            ..Config::default()
        };
        config
            .save(config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", config_path.display()))?;

        println!("Initialized newsroom configuration");
        println!("  Created: {}", config_path.display());
        println!("  Backend: {}", config.backend);

        println!();
        println!("Next steps:");
        match config.backend {
            BackendChoice::Durable => {
                println!("  newsroom migrate   # Copy the snapshot file into the durable store");
            }
            BackendChoice::Snapshot => {
                println!(
                    "  Place the article snapshot at {}",
                    config.snapshot_path.display()
                );
            }
            BackendChoice::Seed => {
                println!("  newsroom list      # Browse the built-in articles");
            }
        }
        println!("  newsroom serve     # Start the HTTP API on {}", config.bind);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_loadable_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("conf/newsroom.toml");
        let command = Command {
            backend: BackendChoice::Durable,
            cache: None,
            force: false,
        };

        command.run(&path).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.backend, BackendChoice::Durable);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("newsroom.toml");
        std::fs::write(&path, "").unwrap();

        let command = Command {
            backend: BackendChoice::Seed,
            cache: None,
            force: false,
        };

        assert!(command.run(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
