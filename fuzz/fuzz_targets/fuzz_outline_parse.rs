#![no_main]
use libfuzzer_sys::fuzz_target;
use model_hierarchy::{parse_indented, INDENT_WIDTH};

/// Fuzz parsing of indented hierarchy text.
///
/// Arbitrary indentation (jumps, tabs, blank lines) must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_indented(s, INDENT_WIDTH);
        let _ = parse_indented(s, 1);
    }
});
