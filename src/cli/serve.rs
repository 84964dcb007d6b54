//! CLI entry-point for serving the web form and HTTP API.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    api::{self, AppState},
    config::Settings,
    ner,
};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind (default 7860).
    #[arg(long, default_value_t = 7860)]
    pub port: u16,
    /// Host address, defaults to localhost.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let ner = ner::load_model(&settings).await?;
    api::serve(AppState::new(settings, ner), args.host, args.port).await
}
