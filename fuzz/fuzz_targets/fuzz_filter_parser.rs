#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = litedoc::query::parse_filter_json(s);
        let _ = litedoc::query::parse_find_options_json(s);
    }
});
