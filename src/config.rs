//! Runtime configuration utilities for uk-ner-highlight.

use std::{env, fmt, path::PathBuf, str::FromStr};

use anyhow::{bail, Context};

/// Which NER backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerBackend {
    /// Built-in dictionary, optionally extended from a JSON file.
    Gazetteer,
    /// Transformer token classifier exported to ONNX.
    Onnx,
}

impl FromStr for NerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gazetteer" | "dictionary" => Ok(Self::Gazetteer),
            "onnx" => Ok(Self::Onnx),
            other => bail!("unknown NER_BACKEND {other:?}; expected `gazetteer` or `onnx`"),
        }
    }
}

impl fmt::Display for NerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gazetteer => f.write_str("gazetteer"),
            Self::Onnx => f.write_str("onnx"),
        }
    }
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Backend used to extract entities.
    pub ner_backend: NerBackend,
    /// Directory holding `model.onnx`, `tokenizer.json` and `config.json`.
    pub model_dir: PathBuf,
    /// Extra gazetteer entries merged over the built-in list.
    pub gazetteer_path: Option<PathBuf>,
    /// Longest accepted input, in characters.
    pub max_input_chars: usize,
    /// Directory served for stylesheets and other assets.
    pub static_dir: PathBuf,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ner_backend = match lookup("NER_BACKEND") {
            Some(raw) => raw.parse().context("parsing NER_BACKEND")?,
            None => NerBackend::Gazetteer,
        };
        let model_dir = lookup("NER_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./models/uk-ner"));
        let gazetteer_path = lookup("NER_GAZETTEER_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let max_input_chars = match lookup("MAX_INPUT_CHARS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("parsing MAX_INPUT_CHARS={raw:?}"))?,
            None => 20_000,
        };
        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("src/ui/static"));

        Ok(Self {
            ner_backend,
            model_dir,
            gazetteer_path,
            max_input_chars,
            static_dir,
        })
    }

    /// Whether `text` fits the configured input limit.
    pub fn accepts(&self, text: &str) -> bool {
        text.chars().count() <= self.max_input_chars
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ner_backend: NerBackend::Gazetteer,
            model_dir: PathBuf::from("./models/uk-ner"),
            gazetteer_path: None,
            max_input_chars: 20_000,
            static_dir: PathBuf::from("src/ui/static"),
        }
    }
}
