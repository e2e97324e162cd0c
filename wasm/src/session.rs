//! Stateful blend page session

use uuid::Uuid;
use wasm_bindgen::prelude::*;

use shared::field::field_by_key;
use shared::{Blend, Lot, SamplePlan, BLEND_FIELDS};

use crate::js_error;

/// The lot table of the blend page
#[wasm_bindgen]
pub struct BlendSession {
    blend: Blend,
}

fn parse_id(id: &str) -> Result<Uuid, JsValue> {
    Uuid::parse_str(id).map_err(|e| js_error("Invalid lot id", e))
}

fn parse_blend_field(key: &str, text: &str) -> Result<Option<f64>, String> {
    field_by_key(BLEND_FIELDS, key)
        .map(|numeric| numeric.parse(text))
        .ok_or_else(|| format!("Unknown field: {}", key))
}

fn apply_lot_field(lot: &mut Lot, field: &str, text: &str) -> Result<(), String> {
    let slot = match field {
        "name" => {
            lot.name = text.to_string();
            return Ok(());
        }
        "tank" => {
            lot.tank = text.to_string();
            return Ok(());
        }
        "volume" => &mut lot.volume,
        "alcohol" => &mut lot.alcohol,
        "residualSugar" => &mut lot.residual_sugar,
        "titratableAcid" => &mut lot.titratable_acid,
        "ph" => &mut lot.ph,
        other => return Err(format!("Unknown lot field: {}", other)),
    };
    *slot = parse_blend_field(field, text)?;
    Ok(())
}

fn apply_sample_field(plan: &mut SamplePlan, field: &str, text: &str) -> Result<(), String> {
    let slot = match field {
        "tasters" => &mut plan.tasters,
        "clPerGlass" => &mut plan.cl_per_glass,
        other => return Err(format!("Unknown sample field: {}", other)),
    };
    *slot = parse_blend_field(field, text)?;
    Ok(())
}

#[wasm_bindgen]
impl BlendSession {
    /// Start with one empty lot
    #[wasm_bindgen(constructor)]
    pub fn new() -> BlendSession {
        BlendSession { blend: Blend::new() }
    }

    /// Restore a session saved with `to_json`
    pub fn from_json(json: &str) -> Result<BlendSession, JsValue> {
        let blend: Blend = serde_json::from_str(json).map_err(|e| js_error("Invalid blend JSON", e))?;
        Ok(BlendSession { blend })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.blend).unwrap_or_default()
    }

    pub fn lots_json(&self) -> String {
        serde_json::to_string(self.blend.lots()).unwrap_or_default()
    }

    /// Append an empty lot, returning its id
    pub fn add_lot(&mut self) -> String {
        self.blend.add_lot().to_string()
    }

    /// Replace a lot by id with the given lot JSON
    pub fn update_lot(&mut self, lot_json: &str) -> Result<(), JsValue> {
        let lot: Lot = serde_json::from_str(lot_json).map_err(|e| js_error("Invalid lot JSON", e))?;
        let slot = self
            .blend
            .lot_mut(lot.id)
            .ok_or_else(|| JsValue::from_str("Lot not found"))?;
        *slot = lot;
        Ok(())
    }

    /// Set one field from the raw text of its input
    ///
    /// Numeric fields that are empty or unparsable become unknown.
    pub fn set_field(&mut self, id: &str, field: &str, text: &str) -> Result<(), JsValue> {
        let id = parse_id(id)?;
        let lot = self
            .blend
            .lot_mut(id)
            .ok_or_else(|| JsValue::from_str("Lot not found"))?;
        apply_lot_field(lot, field, text).map_err(|e| JsValue::from_str(&e))
    }

    /// Set a tasting sample input from the raw text of its field
    pub fn set_sample_field(&mut self, field: &str, text: &str) -> Result<(), JsValue> {
        apply_sample_field(&mut self.blend.sample_plan, field, text).map_err(|e| JsValue::from_str(&e))
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> Result<bool, JsValue> {
        Ok(self.blend.set_selected(parse_id(id)?, selected))
    }

    pub fn select_all(&mut self, selected: bool) {
        self.blend.select_all(selected);
    }

    pub fn all_selected(&self) -> bool {
        self.blend.all_selected()
    }

    /// Remove every selected lot, returning how many were removed
    pub fn remove_selected(&mut self) -> usize {
        self.blend.remove_selected()
    }

    /// Reset to a single empty lot
    pub fn clear(&mut self) {
        self.blend.clear();
    }

    pub fn set_sample_plan(&mut self, tasters: Option<f64>, cl_per_glass: Option<f64>) {
        self.blend.sample_plan.tasters = tasters;
        self.blend.sample_plan.cl_per_glass = cl_per_glass;
    }

    /// Totals, weighted analyses, pie data and tasting sample as JSON
    pub fn results_json(&self) -> String {
        serde_json::to_string(&self.blend.calculate()).unwrap_or_default()
    }
}

impl Default for BlendSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn first_id(session: &BlendSession) -> String {
        session.blend.lots()[0].id.to_string()
    }

    #[test]
    fn test_set_fields_then_results() {
        let mut session = BlendSession::new();
        let id = first_id(&session);
        assert!(session.set_field(&id, "name", "Solaris").is_ok());
        assert!(session.set_field(&id, "volume", "400").is_ok());
        assert!(session.set_field(&id, "alcohol", "11,5").is_ok());

        let second = session.add_lot();
        assert!(session.set_field(&second, "volume", "100").is_ok());
        assert!(session.set_field(&second, "alcohol", "12").is_ok());

        let results: Value = serde_json::from_str(&session.results_json()).unwrap();
        assert_eq!(results["totalVolume"], 500.0);
        // "11,5" is not a number, so the first lot contributes no alcohol
        assert!((results["analyses"]["alcohol"].as_f64().unwrap() - 2.4).abs() < 1e-9);
        assert_eq!(results["pie"][0]["name"], "Solaris");
    }

    #[test]
    fn test_json_round_trip_keeps_ids() {
        let mut session = BlendSession::new();
        session.add_lot();
        let restored = BlendSession::from_json(&session.to_json()).ok().unwrap();

        assert_eq!(restored.lots_json(), session.lots_json());
    }

    #[test]
    fn test_remove_selected_and_clear() {
        let mut session = BlendSession::new();
        session.add_lot();
        session.select_all(true);
        assert!(session.all_selected());

        assert_eq!(session.remove_selected(), 2);
        assert_eq!(session.blend.lots().len(), 0);

        session.clear();
        assert_eq!(session.blend.lots().len(), 1);
    }

    #[test]
    fn test_lot_field_keys() {
        let mut lot = Lot::empty();

        assert!(apply_lot_field(&mut lot, "colour", "red").is_err());
        assert!(apply_lot_field(&mut lot, "tasters", "3").is_err());
        assert_eq!(apply_lot_field(&mut lot, "tank", "T4"), Ok(()));
        assert_eq!(apply_lot_field(&mut lot, "titratableAcid", "6.25"), Ok(()));
        assert_eq!(apply_lot_field(&mut lot, "ph", ""), Ok(()));

        assert_eq!(lot.tank, "T4");
        assert_eq!(lot.titratable_acid, Some(6.25));
        assert_eq!(lot.ph, None);
    }

    #[test]
    fn test_set_sample_field_from_text() {
        let mut session = BlendSession::new();
        assert!(session.set_sample_field("tasters", "10").is_ok());
        assert!(session.set_sample_field("clPerGlass", " 2.5 ").is_ok());
        assert!(apply_sample_field(&mut SamplePlan::default(), "volume", "1").is_err());

        let results: Value = serde_json::from_str(&session.results_json()).unwrap();
        assert_eq!(results["sampleTotalMl"], 250.0);
    }

    #[test]
    fn test_sample_plan() {
        let mut session = BlendSession::new();
        session.set_sample_plan(Some(10.0), Some(5.0));

        let results: Value = serde_json::from_str(&session.results_json()).unwrap();
        assert_eq!(results["sampleTotalMl"], 500.0);
    }
}
