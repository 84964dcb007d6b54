//! Decoding of per-token BIO/BIOES tags into entity spans.

use super::EntitySpan;

/// Tag predicted for a single sub-word token, with byte offsets into the text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenTag<'a> {
    pub tag: &'a str,
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Begin,
    Inside,
    End,
    Single,
    Outside,
}

fn split_tag(tag: &str) -> (Marker, &str) {
    if tag == "O" || tag.is_empty() {
        return (Marker::Outside, "");
    }
    match tag.split_once('-') {
        Some(("B", label)) => (Marker::Begin, label),
        Some(("I", label)) => (Marker::Inside, label),
        Some(("E", label)) | Some(("L", label)) => (Marker::End, label),
        Some(("S", label)) | Some(("U", label)) => (Marker::Single, label),
        // IO scheme without prefixes
        _ => (Marker::Inside, tag),
    }
}

struct Open<'a> {
    label: &'a str,
    start: usize,
    end: usize,
    score_sum: f32,
    tokens: usize,
}

impl<'a> Open<'a> {
    fn new(label: &'a str, token: &TokenTag<'_>) -> Self {
        Self {
            label,
            start: token.start,
            end: token.end,
            score_sum: token.score,
            tokens: 1,
        }
    }

    fn push(&mut self, token: &TokenTag<'_>) {
        self.end = self.end.max(token.end);
        self.score_sum += token.score;
        self.tokens += 1;
    }

    fn close(self, text: &str) -> Option<EntitySpan> {
        let score = self.score_sum / self.tokens as f32;
        EntitySpan::new(text, self.start, self.end, self.label).map(|span| span.with_score(score))
    }
}

fn flush(text: &str, open: &mut Option<Open<'_>>, spans: &mut Vec<EntitySpan>) {
    if let Some(entity) = open.take() {
        spans.extend(entity.close(text));
    }
}

/// Merge token tags into spans ordered by start offset.
///
/// Tokens with empty offsets (special tokens) are skipped. An `I-X` that does
/// not continue an open `X` entity starts a new one.
pub fn decode(text: &str, tokens: &[TokenTag<'_>]) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut open: Option<Open<'_>> = None;

    for token in tokens.iter().filter(|t| t.start < t.end) {
        let (marker, label) = split_tag(token.tag);
        match marker {
            Marker::Outside => flush(text, &mut open, &mut spans),
            Marker::Begin | Marker::Single => {
                flush(text, &mut open, &mut spans);
                open = Some(Open::new(label, token));
                if marker == Marker::Single {
                    flush(text, &mut open, &mut spans);
                }
            }
            Marker::Inside | Marker::End => {
                match open.as_mut() {
                    Some(current) if current.label == label => current.push(token),
                    _ => {
                        flush(text, &mut open, &mut spans);
                        open = Some(Open::new(label, token));
                    }
                }
                if marker == Marker::End {
                    flush(text, &mut open, &mut spans);
                }
            }
        }
    }
    flush(text, &mut open, &mut spans);
    spans
}
