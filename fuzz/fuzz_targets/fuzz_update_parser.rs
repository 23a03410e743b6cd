#![no_main]
use libfuzzer_sys::fuzz_target;
use litedoc::{Document, update};

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(upd) = update::parse_update_json(s) {
            let Ok(doc) = Document::from_json(serde_json::json!({
                "_id": "a", "n": 1, "tags": ["x", "y"], "nested": {"z": 3}
            })) else { return };
            let _ = update::apply_update(&doc, &upd);
        }
    }
});
