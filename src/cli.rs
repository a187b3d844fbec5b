use std::path::{Path, PathBuf};

mod category;
mod create;
mod delete;
mod diagnose;
mod export;
mod import;
mod init;
mod list;
mod migrate;
mod serve;
mod show;
mod stats;
mod terminal;
mod toggle;
mod update;

use clap::ArgAction;
use newsroom::{Config, Status, storage::Persistence};
use terminal::Colorize;

/// Parse an article status, ignoring case.
fn parse_status(s: &str) -> Result<Status, String> {
    match s.to_ascii_lowercase().as_str() {
        "draft" => Ok(Status::Draft),
        "published" => Ok(Status::Published),
        other => Err(format!(
            "unknown status '{other}', expected draft or published"
        )),
    }
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the configuration file
    #[arg(short, long, default_value = "newsroom.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.unwrap_or_default().run(&self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show article counts (default)
    Stats(stats::Command),

    /// Write a configuration file
    Init(init::Command),

    /// List articles with filters
    List(list::Command),

    /// Show a single article
    Show(show::Command),

    /// Create a new article
    Create(create::Command),

    /// Update fields of an article
    Update(update::Command),

    /// Flip an article between draft and published
    Toggle(toggle::Command),

    /// Delete an article
    Delete(delete::Command),

    /// Manage categories
    Category(category::Command),

    /// Export the collection to a JSON file
    Export(export::Command),

    /// Replace the collection with a JSON file
    ///
    /// The file must hold an array of articles. The current collection is
    /// discarded.
    Import(import::Command),

    /// Copy the snapshot file into the durable store
    Migrate(migrate::Command),

    /// Report which storage tiers are reachable
    Diagnose(diagnose::Command),

    /// Serve the HTTP API
    Serve(serve::Command),
}

impl Default for Command {
    fn default() -> Self {
        Self::Stats(stats::Command::default())
    }
}

impl Command {
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = || Config::load_or_default(config_path).map_err(anyhow::Error::msg);
        match self {
            Self::Init(command) => command.run(config_path)?,
            Self::Stats(command) => command.run(&config()?)?,
            Self::List(command) => command.run(&config()?)?,
            Self::Show(command) => command.run(&config()?)?,
            Self::Create(command) => command.run(&config()?)?,
            Self::Update(command) => command.run(&config()?)?,
            Self::Toggle(command) => command.run(&config()?)?,
            Self::Delete(command) => command.run(&config()?)?,
            Self::Category(command) => command.run(&config()?)?,
            Self::Export(command) => command.run(&config()?)?,
            Self::Import(command) => command.run(&config()?)?,
            Self::Migrate(command) => command.run(&config()?)?,
            Self::Diagnose(command) => command.run(&config()?)?,
            Self::Serve(command) => command.run(&config()?)?,
        }
        Ok(())
    }
}

fn prompt_to_proceed() -> anyhow::Result<()> {
    let proceed = dialoguer::Confirm::new()
        .with_prompt("Proceed?")
        .default(false)
        .interact()?;
    if !proceed {
        println!("Cancelled");
        std::process::exit(130);
    }
    Ok(())
}

/// Warns on stderr when a write did not reach the durable store.
fn report_persistence(persistence: &Persistence) {
    if let Some(warning) = persistence.warning() {
        eprintln!("{}", format!("⚠️  {warning}").warning());
    }
}
