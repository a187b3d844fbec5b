use newsroom::{
    ArticleStore, Config,
    api::{self, ApiState},
};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Socket address to listen on. Overrides the configured address.
    #[arg(long, env = "NEWSROOM_BIND")]
    bind: Option<String>,
}

impl Command {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let bind = self.bind.unwrap_or_else(|| config.bind.clone());
        let store = ArticleStore::open(config);

        if !store.is_durable() {
            tracing::warn!("No durable store is bound; writes will not outlive the process");
        }

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(api::serve(ApiState::new(store), &bind))?;
        Ok(())
    }
}
