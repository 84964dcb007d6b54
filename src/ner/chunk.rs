//! Sentence-aligned chunking for models with a bounded context window.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?…]+[\s\u{00A0}]+|\n+").expect("sentence boundary pattern is valid")
});

/// A slice of the source text together with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub offset: usize,
    pub text: &'a str,
}

/// Split `text` into chunks of at most `max_chars` characters, cutting at
/// sentence boundaries where possible and at whitespace otherwise.
pub fn sentence_chunks(text: &str, max_chars: usize) -> Vec<Chunk<'_>> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut chunk_start = 0;
    let mut chunk_chars = 0;

    for sentence in sentences(text) {
        let sentence_chars = text[sentence.0..sentence.1].chars().count();
        if chunk_chars > 0 && chunk_chars + sentence_chars > max_chars {
            chunks.push(Chunk {
                offset: chunk_start,
                text: &text[chunk_start..sentence.0],
            });
            chunk_start = sentence.0;
            chunk_chars = 0;
        }
        if sentence_chars > max_chars {
            for piece in split_long(text, sentence.0, sentence.1, max_chars) {
                chunks.push(piece);
            }
            chunk_start = sentence.1;
            chunk_chars = 0;
            continue;
        }
        chunk_chars += sentence_chars;
    }
    if chunk_start < text.len() {
        chunks.push(Chunk {
            offset: chunk_start,
            text: &text[chunk_start..],
        });
    }
    chunks
}

/// Like [`sentence_chunks`], then halves any chunk that `fits` rejects
/// until every chunk is accepted or is a single character.
pub fn fitting_chunks<'a, E, F>(
    text: &'a str,
    max_chars: usize,
    mut fits: F,
) -> Result<Vec<Chunk<'a>>, E>
where
    F: FnMut(&str) -> Result<bool, E>,
{
    let mut accepted = Vec::new();
    for chunk in sentence_chunks(text, max_chars) {
        refine(chunk, &mut fits, &mut accepted)?;
    }
    Ok(accepted)
}

fn refine<'a, E, F>(
    chunk: Chunk<'a>,
    fits: &mut F,
    accepted: &mut Vec<Chunk<'a>>,
) -> Result<(), E>
where
    F: FnMut(&str) -> Result<bool, E>,
{
    let chars = chunk.text.chars().count();
    if chars <= 1 || fits(chunk.text)? {
        accepted.push(chunk);
        return Ok(());
    }
    for piece in sentence_chunks(chunk.text, chars / 2) {
        let piece = Chunk {
            offset: chunk.offset + piece.offset,
            text: piece.text,
        };
        refine(piece, fits, accepted)?;
    }
    Ok(())
}

fn sentences(text: &str) -> Vec<(usize, usize)> {
    let mut bounds = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_END.find_iter(text) {
        bounds.push((start, boundary.end()));
        start = boundary.end();
    }
    if start < text.len() {
        bounds.push((start, text.len()));
    }
    bounds
}

fn split_long(text: &str, start: usize, end: usize, max_chars: usize) -> Vec<Chunk<'_>> {
    let mut pieces = Vec::new();
    let mut piece_start = start;
    while piece_start < end {
        let rest = &text[piece_start..end];
        let hard_end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(idx, _)| piece_start + idx)
            .unwrap_or(end);
        let cut = if hard_end == end {
            end
        } else {
            text[piece_start..hard_end]
                .char_indices()
                .rev()
                .find(|(_, c)| c.is_whitespace())
                .map(|(idx, c)| piece_start + idx + c.len_utf8())
                .filter(|&idx| idx > piece_start)
                .unwrap_or(hard_end)
        };
        pieces.push(Chunk {
            offset: piece_start,
            text: &text[piece_start..cut],
        });
        piece_start = cut;
    }
    pieces
}
