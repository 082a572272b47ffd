#![no_main]

use classtab_core::dom::{parse_html, to_html};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(html) = std::str::from_utf8(data) {
        if let Ok(doc) = parse_html(html) {
            let _ = parse_html(&to_html(&doc));
        }
    }
});
