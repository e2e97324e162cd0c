//! Delivery checklist with per-browser persistence
//!
//! The checked state is a flat map of item id to bool, stored as JSON under a
//! single key. Storage is injected so the same store runs against
//! `localStorage` in the browser and an in-memory map in tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StorageError;
use crate::schedule::format_date;

/// Storage key for the checked state
pub const STORAGE_KEY: &str = "leverans-checklist-v1";

/// Where the finished report is mailed
pub const REPORT_RECIPIENT: &str = "claes@astadvingard.se";

pub const REPORT_HEADER: &str = "Leverans – checklista";

/// Checked state by item id
pub type ChecklistState = BTreeMap<String, bool>;

// ============================================================================
// Storage
// ============================================================================

/// String key-value storage, the shape of the browser's `localStorage`
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory storage for tests and non-browser hosts
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.entries.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// Static content
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: &'static str,
    pub title: &'static str,
    pub note: Option<&'static str>,
    pub link: Option<ChecklistLink>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSection {
    pub id: &'static str,
    pub title: &'static str,
    pub items: &'static [ChecklistItem],
}

const MONDAY_BOARD: ChecklistLink = ChecklistLink {
    label: "Monday",
    href: "https://astadvingard.monday.com/boards/5651094640",
};

pub static DELIVERY_SECTIONS: &[ChecklistSection] = &[
    ChecklistSection {
        id: "monday",
        title: "1) Orderunderlag (Monday)",
        items: &[
            ChecklistItem {
                id: "open-export-monday",
                title: "Öppna och exportera ‘Beställning Vin’ (Monday)",
                note: Some(
                    "Klicka ‘…’ uppe till höger → Fler åtgärder → Exportera tavla till Excel → \
                     Kryssa i ‘Inkludera underobjekt’ → Klicka ‘Exportera’.",
                ),
                link: Some(MONDAY_BOARD),
            },
            ChecklistItem {
                id: "open-print-excel",
                title: "Öppna och printa ‘Beställning Vin’ i Excel",
                note: Some(
                    "Öppna Hämtade filer → öppna senaste filen ‘Best_llning_Vin…’ → Aktivera redigering → \
                     Ctrl/Cmd+P → Välj A4 → Skalning: ‘Anpassa bladet till en sida’ → Skriv ut.",
                ),
                link: None,
            },
        ],
    },
    ChecklistSection {
        id: "delivery",
        title: "2) Genomför leverans",
        items: &[ChecklistItem {
            id: "do-delivery",
            title: "Genomför leverans",
            note: Some(
                "Under säsong: vaktmästare sköter leveranser. Övrig tid: produktionsteamet. \
                 Etikettera vid behov.",
            ),
            link: None,
        }],
    },
    ChecklistSection {
        id: "docs",
        title: "3) Dokumentera",
        items: &[
            ChecklistItem {
                id: "forflyttningar",
                title: "Registrera i ‘Förflyttningar’ (Google Sheets)",
                note: Some("Logga utleverans/förflyttning enligt kolumner."),
                link: Some(ChecklistLink {
                    label: "Förflyttningar",
                    href: "https://docs.google.com/spreadsheets/d/16EDRcYErHPbd4tNv6Jp6Ts3cekBDY7YQl0Zsz4pH69M/edit?usp=sharing",
                }),
            },
            ChecklistItem {
                id: "innovint-remove-taxpaid",
                title: "Innovint – Remove Taxpaid",
                note: Some(
                    "Öppna Case Goods Explorer → välj case goods → Record action → Remove taxpaid → \
                     fyll i antal bottles → välj Destination → kryssa UR ‘change lot stage to Taxpaid \
                     upon submission’ → kryssa UR ‘Generate bill of lading’ → Record.",
                ),
                link: Some(ChecklistLink {
                    label: "Innovint",
                    href: "https://cellar.innovint.us/#/wineries/2107445/casegoods",
                }),
            },
        ],
    },
    ChecklistSection {
        id: "cleanup",
        title: "4) Rensa och uppdatera i Monday",
        items: &[ChecklistItem {
            id: "cleanup-monday",
            title: "Ta bort gamla leveranser och uppdatera datum",
            note: Some(
                "Öppna samma tavla ‘Beställning Vin’ i Monday → Ta bort alla leveranser som är klara → \
                 Uppdatera leveransdatum för återstående poster till följande onsdag.",
            ),
            link: Some(MONDAY_BOARD),
        }],
    },
];

// ============================================================================
// Store
// ============================================================================

/// Checked state bound to a storage backend
///
/// Every mutation is written through immediately. Storage failures are logged
/// and leave the in-memory state authoritative for the rest of the session.
pub struct ChecklistStore<S: KeyValueStore> {
    storage: S,
    state: ChecklistState,
}

impl<S: KeyValueStore> ChecklistStore<S> {
    /// Load the saved state; missing or unreadable data starts empty
    pub fn load(storage: S) -> Self {
        let state = read_state(&storage);
        Self { storage, state }
    }

    pub fn state(&self) -> &ChecklistState {
        &self.state
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.state.get(id).copied().unwrap_or(false)
    }

    /// Flip an item and persist; returns the new value
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_checked(id);
        self.set(id, next);
        next
    }

    pub fn set(&mut self, id: &str, checked: bool) {
        self.state.insert(id.to_string(), checked);
        self.persist();
    }

    /// Uncheck everything and persist the empty map
    pub fn clear(&mut self) {
        self.state.clear();
        self.persist();
    }

    /// Plain-text report of the current state
    pub fn report(&self, date: NaiveDate, performed_by: &str) -> String {
        build_report(&self.state, date, performed_by)
    }

    pub fn save(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.state)?;
        self.storage.set(STORAGE_KEY, &json)
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::error!("Failed to save checklist: {}", e);
        }
    }
}

fn read_state(storage: &impl KeyValueStore) -> ChecklistState {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return ChecklistState::new(),
        Err(e) => {
            tracing::warn!("Checklist storage unavailable, starting empty: {}", e);
            return ChecklistState::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!("Discarding unreadable checklist state: {}", e);
        ChecklistState::new()
    })
}

// ============================================================================
// Report
// ============================================================================

pub fn report_subject(date: NaiveDate) -> String {
    format!("Leveranser klara – {}", format_date(date))
}

/// Header, date, optional performer, then every section with tick marks
pub fn build_report(state: &ChecklistState, date: NaiveDate, performed_by: &str) -> String {
    let mut lines: Vec<String> = vec![REPORT_HEADER.to_string(), format!("Datum: {}", format_date(date))];

    let who = performed_by.trim();
    if !who.is_empty() {
        lines.push(format!("Utfört av: {}", who));
    }
    lines.push(String::new());

    for section in DELIVERY_SECTIONS {
        lines.push(section.title.to_string());
        for item in section.items {
            let tick = if state.get(item.id).copied().unwrap_or(false) {
                "[x]"
            } else {
                "[ ]"
            };
            lines.push(format!("  {} {}", tick, item.title));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
