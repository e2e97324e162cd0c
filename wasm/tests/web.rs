//! Browser tests, run with `wasm-pack test --headless --firefox wasm`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use shared::checklist::STORAGE_KEY;
use winery_calculators_wasm::{init, mailto_href, today, DeliveryChecklist};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_mailto_encodes_subject_and_body() {
    let href = mailto_href("a@b.se", "Leveranser klara – 2024-05-14", "rad 1\n  [x] klar");

    assert_eq!(
        href,
        "mailto:a@b.se?subject=Leveranser%20klara%20%E2%80%93%202024-05-14&body=rad%201%0A%20%20%5Bx%5D%20klar"
    );
}

#[wasm_bindgen_test]
fn test_checklist_persists_in_local_storage() {
    let mut checklist = DeliveryChecklist::new();
    checklist.clear();
    checklist.toggle("do-delivery");

    let reloaded = DeliveryChecklist::new();
    assert!(reloaded.is_checked("do-delivery"));
    assert_eq!(reloaded.state_json(), r#"{"do-delivery":true}"#);

    checklist.clear();
    assert!(!DeliveryChecklist::new().is_checked("do-delivery"));
}

#[wasm_bindgen_test]
fn test_report_uses_performer() {
    let mut checklist = DeliveryChecklist::new();
    checklist.set_performed_by("Claes".to_string());
    let report = checklist.report();

    assert!(report.starts_with("Leverans – checklista\nDatum: "));
    assert!(report.contains(&today().format("%Y-%m-%d").to_string()));
    assert!(report.contains("Utfört av: Claes"));
}

#[wasm_bindgen_test]
fn test_corrupt_state_logs_and_starts_empty() {
    init();
    init();

    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    storage.set_item(STORAGE_KEY, "{not json").unwrap();

    let checklist = DeliveryChecklist::new();
    assert_eq!(checklist.state_json(), "{}");
    storage.remove_item(STORAGE_KEY).unwrap();
}
