//! Browser glue: local storage, printing, mail and today's date

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

use shared::checklist::{
    report_subject, ChecklistStore, KeyValueStore, MemoryStorage, DELIVERY_SECTIONS, REPORT_RECIPIENT,
};
use shared::StorageError;

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or_default()
}

/// Open the browser print dialog (also used for "save as PDF")
#[wasm_bindgen]
pub fn print_page() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    window.print()
}

/// `mailto:` link with URI-encoded subject and body
#[wasm_bindgen]
pub fn mailto_href(recipient: &str, subject: &str, body: &str) -> String {
    let subject: String = js_sys::encode_uri_component(subject).into();
    let body: String = js_sys::encode_uri_component(body).into();
    format!("mailto:{}?subject={}&body={}", recipient, subject, body)
}

// ============================================================================
// Storage
// ============================================================================

/// `window.localStorage`, or an in-memory map when the browser refuses it
pub enum BrowserStorage {
    Local(web_sys::Storage),
    Memory(MemoryStorage),
}

impl BrowserStorage {
    pub fn open() -> Self {
        match local_storage() {
            Ok(storage) => BrowserStorage::Local(storage),
            Err(e) => {
                tracing::warn!("Falling back to in-memory checklist: {}", e);
                BrowserStorage::Memory(MemoryStorage::new())
            }
        }
    }
}

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
    window
        .local_storage()
        .map_err(|e| StorageError::Unavailable(describe(&e)))?
        .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            BrowserStorage::Local(storage) => storage
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(describe(&e))),
            BrowserStorage::Memory(storage) => storage.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            BrowserStorage::Local(storage) => storage
                .set_item(key, value)
                .map_err(|e| StorageError::Write(describe(&e))),
            BrowserStorage::Memory(storage) => storage.set(key, value),
        }
    }
}

// ============================================================================
// Delivery checklist
// ============================================================================

/// Delivery checklist state for the page, persisted per browser
#[wasm_bindgen]
pub struct DeliveryChecklist {
    store: ChecklistStore<BrowserStorage>,
    performed_by: String,
}

#[wasm_bindgen]
impl DeliveryChecklist {
    #[wasm_bindgen(constructor)]
    pub fn new() -> DeliveryChecklist {
        DeliveryChecklist {
            store: ChecklistStore::load(BrowserStorage::open()),
            performed_by: String::new(),
        }
    }

    /// Sections, items, notes and links as JSON
    pub fn sections_json() -> String {
        serde_json::to_string(DELIVERY_SECTIONS).unwrap_or_default()
    }

    pub fn state_json(&self) -> String {
        serde_json::to_string(self.store.state()).unwrap_or_default()
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.store.is_checked(id)
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.store.toggle(id)
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) {
        self.store.set(id, checked);
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    #[wasm_bindgen(setter)]
    pub fn set_performed_by(&mut self, name: String) {
        self.performed_by = name;
    }

    #[wasm_bindgen(getter)]
    pub fn performed_by(&self) -> String {
        self.performed_by.clone()
    }

    pub fn report(&self) -> String {
        self.store.report(today(), &self.performed_by)
    }

    /// Open the mail client with the report, then clear the checklist
    pub fn send(&mut self) -> Result<(), JsValue> {
        let date = today();
        let href = mailto_href(
            REPORT_RECIPIENT,
            &report_subject(date),
            &self.store.report(date, &self.performed_by),
        );

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        window.location().set_href(&href)?;
        self.store.clear();
        Ok(())
    }
}

impl Default for DeliveryChecklist {
    fn default() -> Self {
        Self::new()
    }
}
