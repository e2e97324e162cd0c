//! WebAssembly module for the winery calculators
//!
//! Provides client-side computation for:
//! - Base-wine must and sugar dosing
//! - Blend composition (see [`BlendSession`])
//! - Bottling and yeast starter dosing with printable manuals
//! - Packaging mass per material stream
//! - The delivery checklist (see [`DeliveryChecklist`])
//!
//! Records cross the boundary as JSON strings in the camelCase shape of the
//! shared models.

mod browser;
mod logging;
mod session;

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::field::{self, field_by_key, fmt, NumericField};
use shared::routes::{tool_index, Route};
use shared::types::{ChartPoint, ManualSection, RawInput};
use shared::{
    journal_rows, BaseWineInputs, BaseWineResults, BottlingInputs, BottlingResults, JournalRow,
    PackagingInputs, StarterInputs, StarterResults,
};

pub use browser::{mailto_href, print_page, today, DeliveryChecklist};
pub use session::BlendSession;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Route tracing events to the browser console
    logging::init();
}

fn js_error(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

// ============================================================================
// Field helpers
// ============================================================================

/// Coerce the text of a form field, `fallback` when empty or invalid
#[wasm_bindgen]
pub fn coerce_number(text: &str, fallback: f64) -> f64 {
    field::num(&RawInput::from(text), fallback)
}

/// Format with a fixed number of decimals, or the dash placeholder
#[wasm_bindgen]
pub fn format_number(value: Option<f64>, decimals: u32) -> String {
    fmt(value, decimals)
}

fn page_field(location: &str, key: &str) -> Result<&'static NumericField, JsValue> {
    let route = Route::from_path(location).ok_or_else(|| JsValue::from_str("Unknown page"))?;
    field_by_key(route.fields(), key).ok_or_else(|| JsValue::from_str(&format!("Unknown field: {}", key)))
}

/// Numeric inputs of a page (key, label, unit, step, decimals, min) as JSON
#[wasm_bindgen]
pub fn fields_json(location: &str) -> Option<String> {
    let route = Route::from_path(location)?;
    serde_json::to_string(route.fields()).ok()
}

/// Read the text of a page field; unusable text is unknown
#[wasm_bindgen]
pub fn parse_field(location: &str, key: &str, text: &str) -> Result<Option<f64>, JsValue> {
    Ok(page_field(location, key)?.parse(text))
}

/// Display a value with the field's precision and unit
#[wasm_bindgen]
pub fn format_field(location: &str, key: &str, value: Option<f64>) -> Result<String, JsValue> {
    Ok(page_field(location, key)?.format(value))
}

/// Why the text of a page field is not usable, `None` when it is
#[wasm_bindgen]
pub fn check_field(location: &str, key: &str, text: &str) -> Result<Option<String>, JsValue> {
    Ok(page_field(location, key)?.check(text).err().map(|e| e.to_string()))
}

// ============================================================================
// Calculators
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BaseWineView {
    results: BaseWineResults,
    chart: Vec<ChartPoint>,
    diagnostic: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BottlingView {
    results: BottlingResults,
    manual: Vec<ManualSection>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StarterView {
    results: StarterResults,
    manual: Vec<ManualSection>,
    journal: Vec<JournalRow>,
}

fn base_wine_view(inputs_json: &str) -> Result<String, serde_json::Error> {
    let inputs: BaseWineInputs = serde_json::from_str(inputs_json)?;
    let results = inputs.calculate();
    serde_json::to_string(&BaseWineView {
        chart: results.chart_data(),
        diagnostic: results.diagnostic(),
        results,
    })
}

fn bottling_view(inputs_json: &str, today: NaiveDate) -> Result<String, serde_json::Error> {
    let inputs: BottlingInputs = serde_json::from_str(inputs_json)?;
    let results = inputs.calculate(today);
    serde_json::to_string(&BottlingView {
        manual: inputs.manual(&results),
        results,
    })
}

fn starter_view(inputs_json: &str, today: NaiveDate) -> Result<String, serde_json::Error> {
    let inputs: StarterInputs = serde_json::from_str(inputs_json)?;
    let results = inputs.calculate(today);
    serde_json::to_string(&StarterView {
        manual: inputs.manual(&results),
        journal: journal_rows(results.bottling_date),
        results,
    })
}

fn packaging_view(inputs_json: &str) -> Result<String, serde_json::Error> {
    let inputs: PackagingInputs = serde_json::from_str(inputs_json)?;
    serde_json::to_string(&inputs.calculate())
}

#[wasm_bindgen]
pub fn default_base_wine_inputs() -> String {
    serde_json::to_string(&BaseWineInputs::default()).unwrap_or_default()
}

/// Results, bar chart series and diagnostic for the base-wine page
#[wasm_bindgen]
pub fn calculate_base_wine(inputs_json: &str) -> Result<String, JsValue> {
    base_wine_view(inputs_json).map_err(|e| js_error("Invalid base wine inputs", e))
}

/// Defaults with today's date as the bottling date
#[wasm_bindgen]
pub fn default_bottling_inputs() -> String {
    serde_json::to_string(&BottlingInputs::starting(today())).unwrap_or_default()
}

#[wasm_bindgen]
pub fn calculate_bottling(inputs_json: &str) -> Result<String, JsValue> {
    bottling_view(inputs_json, today()).map_err(|e| js_error("Invalid bottling inputs", e))
}

#[wasm_bindgen]
pub fn default_starter_inputs() -> String {
    serde_json::to_string(&StarterInputs::starting(today())).unwrap_or_default()
}

/// Results, manual and journal rows for the starter page
#[wasm_bindgen]
pub fn calculate_starter(inputs_json: &str) -> Result<String, JsValue> {
    starter_view(inputs_json, today()).map_err(|e| js_error("Invalid starter inputs", e))
}

#[wasm_bindgen]
pub fn default_packaging_inputs() -> String {
    serde_json::to_string(&PackagingInputs::default()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn calculate_packaging(inputs_json: &str) -> Result<String, JsValue> {
    packaging_view(inputs_json).map_err(|e| js_error("Invalid packaging inputs", e))
}

// ============================================================================
// Routing
// ============================================================================

/// Canonical path for a location path or hash, `None` for unknown pages
#[wasm_bindgen]
pub fn resolve_route(location: &str) -> Option<String> {
    Route::from_path(location).map(|route| route.path().to_string())
}

#[wasm_bindgen]
pub fn page_title(location: &str) -> Option<String> {
    Route::from_path(location).map(|route| route.title().to_string())
}

/// Home page categories and tool cards
#[wasm_bindgen]
pub fn tool_index_json() -> String {
    serde_json::to_string(&tool_index()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(" 12.5 ", 0.0), 12.5);
        assert_eq!(coerce_number("", 0.0), 0.0);
        assert!(coerce_number("abc", f64::NAN).is_nan());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Some(2082.3045), 1), "2082.3");
        assert_eq!(format_number(None, 1), "–");
    }

    #[test]
    fn test_fields_json_per_page() {
        let json: Value = serde_json::from_str(&fields_json("/buteljering").unwrap()).unwrap();
        assert_eq!(json[0]["key"], "wineVolume");
        assert_eq!(json[0]["unit"], "L");

        let empty: Value = serde_json::from_str(&fields_json("#/instruktioner/leverans").unwrap()).unwrap();
        assert_eq!(empty.as_array().unwrap().len(), 0);
        assert!(fields_json("/okand").is_none());
    }

    #[test]
    fn test_parse_format_and_check_field() {
        assert_eq!(parse_field("/jaststart", "starterPercent", "3.5").ok(), Some(Some(3.5)));
        assert_eq!(parse_field("/jaststart", "starterPercent", "").ok(), Some(None));
        assert_eq!(
            format_field("/inrapportering/forpackningar", "weights.bottle_glass", Some(835.0)).ok(),
            Some("835 g/st".to_string())
        );
        assert_eq!(check_field("/basvin", "wineVolume", "2000").ok(), Some(None));
        assert_eq!(
            check_field("/basvin", "wineVolume", "-1").ok().flatten().as_deref(),
            Some("Value -1 is below the minimum 0")
        );
    }

    #[test]
    fn test_packaging_view_accepts_cleared_and_fractional_fields() {
        let json: Value = serde_json::from_str(
            &packaging_view(r#"{"counts": {"bottle": 2.5, "cork": null}, "weights": {"cork_wood": ""}}"#).unwrap(),
        )
        .unwrap();

        assert_eq!(json["streams"][3]["massKg"], "2.09");
        assert_eq!(json["streams"][5]["massKg"], "0.00");
    }

    #[test]
    fn test_base_wine_view() {
        let json: Value = serde_json::from_str(&base_wine_view("{}").unwrap()).unwrap();

        assert_eq!(json["results"]["status"], "valid");
        assert_eq!(json["chart"][0]["name"], "Från must");
        assert!(json["diagnostic"].is_null());
    }

    #[test]
    fn test_base_wine_view_reports_invalid() {
        let json: Value =
            serde_json::from_str(&base_wine_view(r#"{"targetAlcohol": 11}"#).unwrap()).unwrap();

        assert_eq!(json["results"]["status"], "invalid");
        assert!(json["diagnostic"].is_string());
    }

    #[test]
    fn test_bottling_view_uses_supplied_today() {
        let json: Value = serde_json::from_str(&bottling_view("{}", date(2024, 5, 14)).unwrap()).unwrap();

        assert_eq!(json["results"]["bottlingDate"], "2024-05-14");
        assert_eq!(json["results"]["yeastG"], 200.0);
        assert_eq!(json["manual"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_starter_view_has_journal() {
        let json: Value =
            serde_json::from_str(&starter_view(r#"{"bottlingDate": "2024-03-01"}"#, date(2024, 5, 14)).unwrap())
                .unwrap();

        assert_eq!(json["journal"].as_array().unwrap().len(), 6);
        assert_eq!(json["journal"][3]["date"], "2024-02-29");
    }

    #[test]
    fn test_packaging_view() {
        let json: Value =
            serde_json::from_str(&packaging_view(r#"{"counts": {"bottle": 100}}"#).unwrap()).unwrap();
        assert_eq!(json["streams"][3]["massKg"], "83.50");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(packaging_view("not json").is_err());
        assert!(base_wine_view(r#"{"wineVolume": "lots"}"#).is_err());
    }

    #[test]
    fn test_resolve_route() {
        assert_eq!(resolve_route("#/jaststart/").as_deref(), Some("/jaststart"));
        assert_eq!(page_title("/blend").as_deref(), Some("Blendkalkylator"));
        assert_eq!(resolve_route("/nope"), None);
    }

    #[test]
    fn test_tool_index_json() {
        let json: Value = serde_json::from_str(&tool_index_json()).unwrap();
        assert_eq!(json[0]["title"], "Andrajäsning");
        assert_eq!(json[2]["tools"][0]["path"], "/inrapportering/forpackningar");
    }
}
