//! Fuzz target for sentence segmentation.
//!
//! Goal: spans must always slice the input on char boundaries and never panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_segmenter
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use releasegate_domain::{find_sentence_index_for_offset, segment_sentences};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let spans = segment_sentences(text);

        let mut previous_end = 0;
        for (i, span) in spans.iter().enumerate() {
            assert_eq!(span.index, i);
            assert!(span.start < span.end);
            assert!(span.start >= previous_end);
            assert_eq!(&text[span.start..span.end], span.text);
            previous_end = span.end;
        }

        // Lookups for any offset stay within the span list.
        for offset in [0, text.len() / 2, text.len(), text.len() + 1] {
            let index = find_sentence_index_for_offset(&spans, offset);
            assert!(spans.is_empty() || index < spans.len());
        }
    }
});
