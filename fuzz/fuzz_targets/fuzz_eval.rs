#![no_main]
use libfuzzer_sys::fuzz_target;
use litedoc::Document;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(filter) = litedoc::query::parse_filter_json(s) {
            let docs = [
                serde_json::json!({"a": 1, "b": 2, "name": "x"}),
                serde_json::json!({"a": 10, "b": -5, "name": "y", "nested": {"z": 3}}),
                serde_json::json!({"active": true, "tags": [1, "two", null]}),
            ];
            for d in docs.into_iter().filter_map(|v| Document::from_json(v).ok()) {
                let _ = litedoc::query::eval_filter(&d, &filter);
            }
        }
    }
});
