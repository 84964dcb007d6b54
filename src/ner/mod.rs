//! Entity extraction adapter: a pretrained model behind the `Ner` trait.
//!
//! Backends translate their native output into [`EntitySpan`] at this
//! boundary; everything downstream only ever sees spans.

pub mod bio;
pub mod chunk;
pub mod gazetteer;
#[cfg(feature = "onnx")]
pub mod onnx;

use std::{fmt, str::FromStr, sync::Arc};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{NerBackend, Settings};

pub use gazetteer::GazetteerNer;

/// Extracted entity span with byte offsets relative to the source text.
///
/// `start..end` always lies on char boundaries and `text == source[start..end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub label: String,
    pub score: f32,
}

impl EntitySpan {
    /// Build a span from byte offsets, returning `None` for ranges that do not
    /// address a non-empty slice of `source`.
    pub fn new(source: &str, start: usize, end: usize, label: impl Into<String>) -> Option<Self> {
        if start >= end {
            return None;
        }
        let text = source.get(start..end)?;
        Some(Self {
            start,
            end,
            text: text.to_string(),
            label: label.into(),
            score: 1.0,
        })
    }

    /// Build a span from character offsets, as reported by models that count
    /// Unicode scalar values instead of bytes.
    pub fn from_char_range(
        source: &str,
        start_char: usize,
        end_char: usize,
        label: impl Into<String>,
    ) -> Option<Self> {
        if start_char >= end_char {
            return None;
        }
        let start = char_to_byte(source, start_char)?;
        let end = char_to_byte(source, end_char)?;
        Self::new(source, start, end, label)
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score.clamp(0.0, 1.0);
        self
    }

    /// Recognised category, `None` for labels outside the supported set.
    pub fn category(&self) -> Option<Category> {
        self.label.parse().ok()
    }

    /// Whether the offsets still address `text` inside `source`.
    pub fn is_valid_for(&self, source: &str) -> bool {
        self.start < self.end && source.get(self.start..self.end).is_some()
    }
}

fn char_to_byte(source: &str, char_idx: usize) -> Option<usize> {
    if char_idx == source.chars().count() {
        return Some(source.len());
    }
    source.char_indices().nth(char_idx).map(|(byte, _)| byte)
}

/// Entity categories surfaced to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Loc,
    Org,
    Per,
    Gpe,
    Misc,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Loc,
        Category::Org,
        Category::Per,
        Category::Gpe,
        Category::Misc,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Category::Loc => "LOC",
            Category::Org => "ORG",
            Category::Per => "PER",
            Category::Gpe => "GPE",
            Category::Misc => "MISC",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Category::Loc => "Location",
            Category::Org => "Organization",
            Category::Per => "Person",
            Category::Gpe => "Geopolitical Entity",
            Category::Misc => "Miscellaneous",
        }
    }

    /// Legend text shown on the category information tab.
    pub fn description(self) -> &'static str {
        match self {
            Category::Loc => {
                "Локація або географічне місце, наприклад, міста, села, вулиці."
            }
            Category::Org => {
                "Організація, компанія або інші об'єднання, наприклад, компанії, школи, організації."
            }
            Category::Per => "Персоналія, людина, або назва особи.",
            Category::Gpe => "Геополітична одиниця, що включає країни, міста, регіони.",
            Category::Misc => "Інші категорії, що не підпадають під жодну з попередніх.",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Category {
    type Err = NerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOC" => Ok(Category::Loc),
            "ORG" => Ok(Category::Org),
            "PER" => Ok(Category::Per),
            "GPE" => Ok(Category::Gpe),
            "MISC" => Ok(Category::Misc),
            other => Err(NerError::UnknownLabel(other.to_string())),
        }
    }
}

/// Failures raised by NER backends.
#[derive(Debug, thiserror::Error)]
pub enum NerError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("invalid gazetteer: {0}")]
    Gazetteer(String),

    #[error("unknown entity label {0:?}")]
    UnknownLabel(String),

    #[error("backend {0} is not compiled in; rebuild with `--features {0}`")]
    BackendUnavailable(&'static str),
}

/// Trait for NER implementations.
///
/// Implementations return spans ordered by ascending start offset and
/// non-overlapping. They are shared across request handlers, so `extract`
/// must not mutate state.
pub trait Ner: Send + Sync {
    fn name(&self) -> &str;

    fn extract(&self, text: &str) -> Result<Vec<EntitySpan>, NerError>;
}

/// Load the configured NER backend once at startup.
pub async fn load_model(settings: &Settings) -> Result<Arc<dyn Ner>> {
    let ner: Arc<dyn Ner> = match settings.ner_backend {
        NerBackend::Gazetteer => {
            let mut gazetteer = GazetteerNer::builtin();
            if let Some(path) = &settings.gazetteer_path {
                gazetteer = gazetteer.extend_from_file(path)?;
            }
            Arc::new(gazetteer.build()?)
        }
        NerBackend::Onnx => load_onnx(settings)?,
    };
    info!(backend = ner.name(), "loaded NER model");
    Ok(ner)
}

#[cfg(feature = "onnx")]
fn load_onnx(settings: &Settings) -> Result<Arc<dyn Ner>> {
    let model = onnx::OnnxNer::load(&settings.model_dir)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_settings: &Settings) -> Result<Arc<dyn Ner>> {
    Err(NerError::BackendUnavailable("onnx").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_range_maps_to_byte_offsets() {
        let text = "Я відвідав Рим.";
        let span = EntitySpan::from_char_range(text, 11, 14, "LOC").unwrap();
        assert_eq!(span.text, "Рим");
        assert_eq!(&text[span.start..span.end], "Рим");
        assert_eq!(span.category(), Some(Category::Loc));
    }

    #[test]
    fn char_range_rejects_out_of_bounds() {
        assert!(EntitySpan::from_char_range("Київ", 2, 9, "LOC").is_none());
        assert!(EntitySpan::from_char_range("Київ", 2, 2, "LOC").is_none());
    }

    #[test]
    fn byte_range_must_hit_char_boundaries() {
        // "Київ" is two bytes per char
        assert!(EntitySpan::new("Київ", 1, 4, "LOC").is_none());
        assert!(EntitySpan::new("Київ", 0, 4, "LOC").is_some());
    }

    #[test]
    fn unknown_labels_have_no_category() {
        let span = EntitySpan::new("2024 рік", 0, 4, "DATE").unwrap();
        assert_eq!(span.category(), None);
        assert_eq!("misc".parse::<Category>().unwrap(), Category::Misc);
    }

    #[tokio::test]
    async fn onnx_backend_requires_feature_or_model() {
        let settings = Settings {
            ner_backend: NerBackend::Onnx,
            model_dir: std::path::PathBuf::from("/nonexistent/model"),
            gazetteer_path: None,
            max_input_chars: 100,
            static_dir: std::path::PathBuf::from("src/ui/static"),
        };
        assert!(load_model(&settings).await.is_err());
    }
}
