#![no_main]
use libfuzzer_sys::fuzz_target;
use model_hierarchy::NodeId;

/// Fuzz node identifier decoding.
///
/// Decoding is total: arbitrary input either fails cleanly or yields an id
/// that re-encodes to a string decoding to the same id.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(id) = NodeId::decode(s) {
            let again = NodeId::decode(&id.encode()).expect("re-encoded id must decode");
            assert_eq!(again, id);
        }
    }
});
