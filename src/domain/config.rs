use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::domain::category::default_categories;

/// The preferred storage tier.
///
/// Reads start at this tier and fall back towards the seed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// The redb-backed durable store, then the snapshot file, then the seed.
    Durable,
    /// The static snapshot file, then the seed.
    Snapshot,
    /// The in-process seed collection only.
    #[default]
    Seed,
}

impl fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Durable => "durable",
            Self::Snapshot => "snapshot",
            Self::Seed => "seed",
        })
    }
}

impl FromStr for BackendChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "durable" => Ok(Self::Durable),
            "snapshot" => Ok(Self::Snapshot),
            "seed" => Ok(Self::Seed),
            other => Err(format!(
                "unknown backend '{other}', expected durable, snapshot or seed"
            )),
        }
    }
}

/// Configuration for the news store and its server.
///
/// Relative paths are resolved against the directory the configuration file
/// was loaded from; see [`Config::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The preferred storage tier.
    pub backend: BackendChoice,

    /// Location of the redb database used by the durable tier.
    pub durable_path: PathBuf,

    /// Location of the static snapshot file.
    pub snapshot_path: PathBuf,

    /// Location of the local cache mirror. No mirror when unset.
    pub cache_path: Option<PathBuf>,

    /// Protected categories, in display order.
    pub default_categories: Vec<String>,

    /// Socket address the HTTP server binds to.
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendChoice::default(),
            durable_path: default_durable_path(),
            snapshot_path: default_snapshot_path(),
            cache_path: None,
            default_categories: default_categories(),
            bind: default_bind(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration at `path`, falling back to the defaults when
    /// no file exists there, and resolves relative paths against the file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        let config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolve(base))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Makes every relative path absolute with respect to `base`.
    #[must_use]
    pub fn resolve(mut self, base: &Path) -> Self {
        let join = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };
        self.durable_path = join(self.durable_path);
        self.snapshot_path = join(self.snapshot_path);
        self.cache_path = self.cache_path.map(join);
        self
    }
}

fn default_durable_path() -> PathBuf {
    PathBuf::from("news.redb")
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("public/data/news.json")
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        backend: BackendChoice,

        #[serde(default = "default_durable_path")]
        durable_path: PathBuf,

        #[serde(default = "default_snapshot_path")]
        snapshot_path: PathBuf,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_path: Option<PathBuf>,

        #[serde(default = "default_categories")]
        default_categories: Vec<String>,

        #[serde(default = "default_bind")]
        bind: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                backend,
                durable_path,
                snapshot_path,
                cache_path,
                default_categories,
                bind,
            } => Self {
                backend,
                durable_path,
                snapshot_path,
                cache_path,
                default_categories,
                bind,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            backend: config.backend,
            durable_path: config.durable_path,
            snapshot_path: config.snapshot_path,
            cache_path: config.cache_path,
            default_categories: config.default_categories,
            bind: config.bind,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nbackend = \"durable\"\ndurable_path = \"data/news.redb\"\ncache_path = \"cache.json\"\ndefault_categories = [\"Press\", \"Notice\"]\nbind = \"0.0.0.0:8080\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.backend, BackendChoice::Durable);
        assert_eq!(config.durable_path, PathBuf::from("data/news.redb"));
        assert_eq!(config.snapshot_path, default_snapshot_path());
        assert_eq!(config.cache_path, Some(PathBuf::from("cache.json")));
        assert_eq!(config.default_categories, ["Press", "Notice"]);
        assert_eq!(config.bind, "0.0.0.0:8080");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nbackend = \"cloud\"\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("newsroom.toml");
        let config = Config {
            backend: BackendChoice::Snapshot,
            cache_path: Some(PathBuf::from("cache/news.json")),
            ..Config::default()
        };

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn load_or_default_resolves_relative_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("newsroom.toml");
        std::fs::write(&path, "_version = \"1\"\ncache_path = \"cache.json\"\n").unwrap();

        let config = Config::load_or_default(&path).unwrap();

        assert_eq!(config.durable_path, tmp.path().join("news.redb"));
        assert_eq!(
            config.snapshot_path,
            tmp.path().join("public/data/news.json")
        );
        assert_eq!(config.cache_path, Some(tmp.path().join("cache.json")));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.backend, BackendChoice::Seed);
        assert_eq!(config.durable_path, tmp.path().join("news.redb"));
    }

    #[test]
    fn load_or_default_rejects_an_unparseable_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("newsroom.toml");
        std::fs::write(&path, "backend = \"durable\"\n").unwrap();

        let result = Config::load_or_default(&path);

        assert!(result.unwrap_err().contains("parse"));
    }

    #[test_case("durable", BackendChoice::Durable)]
    #[test_case("Snapshot", BackendChoice::Snapshot)]
    #[test_case("SEED", BackendChoice::Seed)]
    fn backend_choice_parses(input: &str, expected: BackendChoice) {
        assert_eq!(input.parse::<BackendChoice>().unwrap(), expected);
    }

    #[test]
    fn backend_choice_rejects_unknown() {
        assert!("cloud".parse::<BackendChoice>().is_err());
    }
}
