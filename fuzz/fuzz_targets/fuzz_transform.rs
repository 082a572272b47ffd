#![no_main]

use classtab_core::config::SynthConfig;
use classtab_docs::transform_html;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(html) = std::str::from_utf8(data) {
        let config = SynthConfig::default();
        if let Ok((once, _)) = transform_html(html, &config) {
            let _ = transform_html(&once, &config);
        }
    }
});
