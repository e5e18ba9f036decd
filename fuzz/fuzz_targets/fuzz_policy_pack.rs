//! Fuzz target for policy-pack parsing and compilation.
//!
//! Goal: arbitrary pack JSON is either rejected with an error or compiles.
//! Neither step may panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_pack
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use releasegate_domain::CompiledPack;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(pack) = releasegate_settings::parse_policy_pack_json(text) {
            let _ = CompiledPack::compile(&pack);
        }
    }
});
