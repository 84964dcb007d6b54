//! CLI entry-point for analysing one text without the web UI.

use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{api::types::AnalyzeResponse, config::Settings, highlight, ner};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text to analyse; read from stdin when omitted.
    #[arg(long)]
    pub text: Option<String>,
    /// Print the full result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading text from stdin")?;
            buf
        }
    };
    if !settings.accepts(&text) {
        bail!(
            "input is longer than MAX_INPUT_CHARS={}",
            settings.max_input_chars
        );
    }

    let ner = ner::load_model(&settings).await?;
    let result = highlight::analyze(ner.as_ref(), &text)?;
    info!(entities = result.entities.len(), "analysed text");

    if args.json {
        let response = AnalyzeResponse::from(result);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", result.highlighted_text);
        println!();
        println!("{}", result.summary_text());
    }
    Ok(())
}
