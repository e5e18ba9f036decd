//! Sentence segmentation with offsets stable against the original text.

use regex::Regex;
use std::sync::LazyLock;

/// Sentence-ending punctuation followed by whitespace.
static BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("boundary pattern is valid"));

/// One sentence of a draft.
///
/// `start..end` is a byte range into the segmented text and
/// `text == &source[start..end]`. Surrounding whitespace is not part of a span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentenceSpan {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Split `text` into sentence spans.
///
/// Lines are split on `\n` first; blank lines contribute no span. Within a line a
/// sentence ends after `.`, `!` or `?` when followed by whitespace.
pub fn segment_sentences(text: &str) -> Vec<SentenceSpan> {
    let mut spans = Vec::new();
    let mut line_start = 0usize;

    for line in text.split('\n') {
        if !line.trim().is_empty() {
            let mut last = 0usize;
            for m in BOUNDARY.find_iter(line) {
                // The punctuation is a single ASCII byte.
                let sentence_end = m.start() + 1;
                push_trimmed(&mut spans, &line[last..sentence_end], line_start + last);
                last = m.end();
            }
            push_trimmed(&mut spans, &line[last..], line_start + last);
        }
        line_start += line.len() + 1;
    }

    spans
}

fn push_trimmed(spans: &mut Vec<SentenceSpan>, raw: &str, base: usize) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    let start = base + lead;
    spans.push(SentenceSpan {
        index: spans.len(),
        start,
        end: start + trimmed.len(),
        text: trimmed.to_string(),
    });
}

/// Map a byte offset to a sentence index.
///
/// Returns the span containing `offset`, else the nearest span ending at or
/// before it, else `0`.
pub fn find_sentence_index_for_offset(spans: &[SentenceSpan], offset: usize) -> usize {
    if let Some(span) = spans.iter().find(|s| s.start <= offset && offset < s.end) {
        return span.index;
    }
    spans
        .iter()
        .rev()
        .find(|s| s.end <= offset)
        .map(|s| s.index)
        .unwrap_or(0)
}
