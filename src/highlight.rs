//! Span highlighting and entity summaries over adapter output.

use serde::Serialize;
use tracing::warn;

use crate::ner::{EntitySpan, Ner, NerError};

/// Opening tag wrapped around every highlighted entity.
pub const HIGHLIGHT_OPEN: &str = "<span style='color:blue; font-weight:bold;'>";
/// Closing tag matching [`HIGHLIGHT_OPEN`].
pub const HIGHLIGHT_CLOSE: &str = "</span>";
/// Summary shown when no entity of a supported category was found.
pub const NONE_FOUND: &str = "Власні назви не знайдено.";

/// Derived view of one analysed text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Input with raw markup spliced around entities.
    pub highlighted_text: String,
    /// Same highlighting with the surrounding text HTML-escaped.
    pub highlighted_html: String,
    /// `"text (CATEGORY)"` lines in source order.
    pub entity_summary: Vec<String>,
    /// Qualifying spans as returned by the adapter.
    pub entities: Vec<EntitySpan>,
}

impl AnalysisResult {
    /// Summary lines joined for display, or [`NONE_FOUND`].
    pub fn summary_text(&self) -> String {
        if self.entity_summary.is_empty() {
            NONE_FOUND.to_string()
        } else {
            self.entity_summary.join("\n")
        }
    }
}

/// Run the adapter once and derive every view of the result.
pub fn analyze(ner: &dyn Ner, text: &str) -> Result<AnalysisResult, NerError> {
    let spans = ner.extract(text)?;
    Ok(AnalysisResult {
        highlighted_text: highlight(text, &spans),
        highlighted_html: highlight_html(text, &spans),
        entity_summary: summary_lines(&spans),
        entities: spans
            .into_iter()
            .filter(|span| span.category().is_some())
            .collect(),
    })
}

/// Wrap every qualifying span of `text` in highlight markup.
///
/// Spans are spliced from the highest start offset down, so offsets of spans
/// not yet processed still refer to the untouched prefix of the string.
pub fn highlight(text: &str, spans: &[EntitySpan]) -> String {
    let mut highlighted = text.to_string();
    for span in splice_order(text, spans).into_iter().rev() {
        let entity = &text[span.start..span.end];
        highlighted.replace_range(
            span.start..span.end,
            &format!("{HIGHLIGHT_OPEN}{entity}{HIGHLIGHT_CLOSE}"),
        );
    }
    highlighted
}

/// Like [`highlight`], but HTML-escapes all source text so the result is safe
/// to embed in a page.
pub fn highlight_html(text: &str, spans: &[EntitySpan]) -> String {
    let mut html = String::with_capacity(text.len() * 2);
    let mut cursor = 0;
    for span in splice_order(text, spans) {
        html.push_str(&escape_html(&text[cursor..span.start]));
        html.push_str(HIGHLIGHT_OPEN);
        html.push_str(&escape_html(&text[span.start..span.end]));
        html.push_str(HIGHLIGHT_CLOSE);
        cursor = span.end;
    }
    html.push_str(&escape_html(&text[cursor..]));
    html
}

/// Newline-separated `"text (CATEGORY)"` list, or [`NONE_FOUND`].
pub fn summarize(spans: &[EntitySpan]) -> String {
    let lines = summary_lines(spans);
    if lines.is_empty() {
        NONE_FOUND.to_string()
    } else {
        lines.join("\n")
    }
}

/// Summary lines for qualifying spans, in the order the adapter returned them.
pub fn summary_lines(spans: &[EntitySpan]) -> Vec<String> {
    spans
        .iter()
        .filter_map(|span| {
            span.category()
                .map(|category| format!("{} ({category})", span.text))
        })
        .collect()
}

/// Qualifying spans, ascending and pairwise disjoint.
///
/// Adapter output is expected to satisfy this already; anything that does not
/// is dropped with a warning rather than corrupting the splice.
fn splice_order<'a>(text: &str, spans: &'a [EntitySpan]) -> Vec<&'a EntitySpan> {
    let mut kept: Vec<&EntitySpan> = spans
        .iter()
        .filter(|span| span.category().is_some())
        .filter(|span| {
            let valid = span.is_valid_for(text);
            if !valid {
                warn!(start = span.start, end = span.end, label = %span.label, "dropping span outside text");
            }
            valid
        })
        .collect();
    kept.sort_by_key(|span| (span.start, span.end));

    let mut disjoint: Vec<&EntitySpan> = Vec::with_capacity(kept.len());
    for span in kept {
        match disjoint.last() {
            Some(prev) if span.start < prev.end => {
                warn!(
                    start = span.start,
                    end = span.end,
                    overlaps = %prev.text,
                    "dropping overlapping span"
                );
            }
            _ => disjoint.push(span),
        }
    }
    disjoint
}

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
