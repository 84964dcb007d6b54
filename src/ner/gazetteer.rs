//! Dictionary-backed NER used when no neural model is configured.

use std::{collections::HashMap, path::Path};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::{Category, EntitySpan, Ner, NerError};

/// Surface forms shipped with the binary. Ukrainian nouns inflect, so the
/// common case forms are listed explicitly.
static BUILTIN_TERMS: Lazy<Vec<(&'static str, Category)>> = Lazy::new(|| {
    vec![
        ("Рим", Category::Loc),
        ("Риму", Category::Loc),
        ("Римі", Category::Loc),
        ("Римом", Category::Loc),
        ("Колізей", Category::Loc),
        ("Колізею", Category::Loc),
        ("Форум Романум", Category::Loc),
        ("Форуму Роману", Category::Loc),
        ("Сикстинська капела", Category::Loc),
        ("Сикстинську капелу", Category::Loc),
        ("Сикстинській капелі", Category::Loc),
        ("Ватикан", Category::Gpe),
        ("Ватикану", Category::Gpe),
        ("Ватиканські музеї", Category::Org),
        ("Ватиканських музеях", Category::Org),
        ("Київ", Category::Loc),
        ("Києва", Category::Loc),
        ("Києві", Category::Loc),
        ("Львів", Category::Loc),
        ("Львова", Category::Loc),
        ("Львові", Category::Loc),
        ("Одеса", Category::Loc),
        ("Одесі", Category::Loc),
        ("Дніпро", Category::Loc),
        ("Україна", Category::Gpe),
        ("України", Category::Gpe),
        ("Україні", Category::Gpe),
        ("Україну", Category::Gpe),
        ("Італія", Category::Gpe),
        ("Італії", Category::Gpe),
        ("Європа", Category::Loc),
        ("Європі", Category::Loc),
        ("Океан Ельзи", Category::Org),
        ("ЮНЕСКО", Category::Org),
        ("ООН", Category::Org),
        ("Джамала", Category::Per),
        ("Джамали", Category::Per),
        ("Тарас Шевченко", Category::Per),
        ("Тараса Шевченка", Category::Per),
        ("Леся Українка", Category::Per),
        ("Лесі Українки", Category::Per),
        ("Atlas Weekend", Category::Misc),
        ("Євробачення", Category::Misc),
        ("Євробаченні", Category::Misc),
    ]
});

/// One record of a user-supplied gazetteer file.
#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerEntry {
    pub text: String,
    pub label: String,
}

/// Accumulates surface forms before compiling the matcher.
#[derive(Debug, Default, Clone)]
pub struct GazetteerBuilder {
    entries: Vec<(String, String)>,
}

impl GazetteerBuilder {
    pub fn add(mut self, text: impl Into<String>, label: impl Into<String>) -> Self {
        self.entries.push((text.into(), label.into()));
        self
    }

    /// Append entries from a JSON array of `{"text", "label"}` objects.
    pub fn extend_from_file(mut self, path: &Path) -> Result<Self, NerError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| NerError::Gazetteer(format!("{}: {e}", path.display())))?;
        let entries: Vec<GazetteerEntry> = serde_json::from_str(&raw)
            .map_err(|e| NerError::Gazetteer(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), count = entries.len(), "read gazetteer file");
        self.entries
            .extend(entries.into_iter().map(|entry| (entry.text, entry.label)));
        Ok(self)
    }

    /// Compile the matcher. Later duplicates of a surface form are ignored.
    pub fn build(self) -> Result<GazetteerNer, NerError> {
        let mut labels = HashMap::new();
        let mut forms = Vec::new();
        for (text, label) in self.entries {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(NerError::Gazetteer(format!(
                    "empty surface form for label {label}"
                )));
            }
            if !labels.contains_key(&text) {
                labels.insert(text.clone(), label);
                forms.push(text);
            }
        }
        // longest alternative first so "Рим" never shadows "Риму"
        forms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

        let matcher = if forms.is_empty() {
            None
        } else {
            let alternation = forms
                .iter()
                .map(|form| regex::escape(form))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"\b(?:{alternation})\b");
            Some(Regex::new(&pattern).map_err(|e| NerError::Gazetteer(e.to_string()))?)
        };

        Ok(GazetteerNer { matcher, labels })
    }
}

/// Whole-word, case-sensitive dictionary matcher.
#[derive(Debug)]
pub struct GazetteerNer {
    matcher: Option<Regex>,
    labels: HashMap<String, String>,
}

impl GazetteerNer {
    /// Builder seeded with the built-in Ukrainian gazetteer.
    pub fn builtin() -> GazetteerBuilder {
        BUILTIN_TERMS
            .iter()
            .fold(GazetteerBuilder::default(), |builder, (text, category)| {
                builder.add(*text, category.code())
            })
    }

    pub fn empty() -> GazetteerBuilder {
        GazetteerBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Ner for GazetteerNer {
    fn name(&self) -> &str {
        "gazetteer"
    }

    fn extract(&self, text: &str) -> Result<Vec<EntitySpan>, NerError> {
        let Some(matcher) = &self.matcher else {
            return Ok(Vec::new());
        };
        let spans = matcher
            .find_iter(text)
            .filter_map(|m| {
                let label = self.labels.get(m.as_str())?;
                EntitySpan::new(text, m.start(), m.end(), label.as_str())
            })
            .collect();
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> GazetteerNer {
        GazetteerNer::builtin().build().unwrap()
    }

    #[test]
    fn finds_entities_in_rome_example() {
        let text = "Під час відвідування Риму, ми вирішили піднятися на вершину Колізею, \
                    щоб помилуватися панорамою Форуму Роману, а потім відвідати Ватиканські музеї \
                    та побачити Сикстинську капелу.";
        let spans = builtin().extract(text).unwrap();
        let found: Vec<(&str, &str)> = spans
            .iter()
            .map(|s| (s.text.as_str(), s.label.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Риму", "LOC"),
                ("Колізею", "LOC"),
                ("Форуму Роману", "LOC"),
                ("Ватиканські музеї", "ORG"),
                ("Сикстинську капелу", "LOC"),
            ]
        );
    }

    #[test]
    fn matches_whole_words_only() {
        let spans = builtin().extract("Римський сенат і Рим").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Рим");
        assert_eq!(spans[0].start, "Римський сенат і ".len());
    }

    #[test]
    fn spans_are_ascending_and_disjoint() {
        let text = "Джамала співала в Києві, а Океан Ельзи грав у Львові.";
        let spans = builtin().extract(text).unwrap();
        assert_eq!(spans.len(), 4);
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        for span in &spans {
            assert_eq!(&text[span.start..span.end], span.text);
        }
    }

    #[test]
    fn empty_gazetteer_finds_nothing() {
        let ner = GazetteerNer::empty().build().unwrap();
        assert!(ner.is_empty());
        assert!(ner.extract("Київ").unwrap().is_empty());
    }

    #[test]
    fn rejects_blank_surface_forms() {
        let err = GazetteerNer::empty().add("  ", "LOC").build().unwrap_err();
        assert!(matches!(err, NerError::Gazetteer(_)));
    }

    #[test]
    fn first_label_wins_for_duplicates() {
        let ner = GazetteerNer::empty()
            .add("Дніпро", "LOC")
            .add("Дніпро", "ORG")
            .build()
            .unwrap();
        assert_eq!(ner.len(), 1);
        assert_eq!(ner.extract("Дніпро").unwrap()[0].label, "LOC");
    }
}
