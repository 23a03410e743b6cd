#![no_main]
use libfuzzer_sys::fuzz_target;
use litedoc::{Document, aggregate};

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(stages) = aggregate::parse_pipeline_json(s) {
            let docs: Vec<Document> = [
                serde_json::json!({"_id": "1", "g": "a", "v": 3}),
                serde_json::json!({"_id": "2", "g": "b", "v": "text"}),
                serde_json::json!({"_id": "3", "g": null}),
            ]
            .into_iter()
            .filter_map(|v| Document::from_json(v).ok())
            .collect();
            let _ = aggregate::execute(docs, &stages);
        }
    }
});
