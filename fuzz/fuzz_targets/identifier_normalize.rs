#![no_main]

use intake_flow::{escape_html, looks_like_identifier, normalize_identifier};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);

    let normalized = normalize_identifier(&raw);
    assert_eq!(normalize_identifier(&normalized), normalized);
    assert!(!normalized.contains('-'));
    assert!(!normalized.chars().any(char::is_whitespace));
    if looks_like_identifier(&normalized) {
        let count = normalized.chars().count();
        assert!((5..=10).contains(&count));
    }

    let escaped = escape_html(&raw);
    assert!(!escaped.contains('<'));
    assert!(!escaped.contains('>'));
    assert!(!escaped.contains('"'));
});
