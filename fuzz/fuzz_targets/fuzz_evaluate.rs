//! Fuzz target for draft evaluation against the built-in pack.
//!
//! Goal: every citation is a valid char-boundary range of the draft and
//! evaluation never panics, whatever the text.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_evaluate
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use releasegate_domain::{CompiledPack, RoutingConfig};
use releasegate_types::{Channel, DraftContext, DraftSubmission};
use std::sync::LazyLock;

static PACK: LazyLock<CompiledPack> = LazyLock::new(|| {
    let pack = releasegate_settings::builtin_pack("generic.v0.1").expect("built-in pack parses");
    CompiledPack::compile(&pack).expect("built-in pack compiles")
});

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    strict: bool,
}

fuzz_target!(|input: Input| {
    let submission = DraftSubmission {
        text: input.text,
        context: DraftContext {
            channel: Channel::Email,
            product: None,
            audience: None,
        },
    };
    let result = releasegate_domain::evaluate(&submission, &PACK);

    for v in &result.violations {
        let c = &v.citation;
        assert!(c.start <= c.end && c.end <= submission.text.len());
        assert!(submission.text.is_char_boundary(c.start));
        assert!(submission.text.is_char_boundary(c.end));
    }

    let routing = RoutingConfig {
        auto_pass_confidence: if input.strict { 0.95 } else { 0.90 },
        prefer_needs_changes_on_uncertainty: !input.strict,
    };
    let routed = releasegate_domain::route(&result, &routing);
    assert!((0.0..=1.0).contains(&routed.confidence.score));
});
