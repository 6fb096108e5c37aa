#![no_main]

use libfuzzer_sys::fuzz_target;
use netcentra_core::graph::parse_line;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(Some(edge)) = parse_line(line) {
        assert!(!edge.source.is_empty());
        assert!(!edge.target.is_empty());
        assert!(!edge.source.contains('#'));
        assert!(edge.weight.is_finite());
    }
});
