//! Common types used across the calculators

use serde::{Deserialize, Serialize};

/// A raw value as it arrives from a form control
///
/// Browser inputs hand over either a number or the text typed so far.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawInput {
    Number(f64),
    Text(String),
}

impl From<f64> for RawInput {
    fn from(value: f64) -> Self {
        RawInput::Number(value)
    }
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::Text(value.to_string())
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        RawInput::Text(value)
    }
}

/// One labelled value in a bar or pie chart series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub name: String,
    /// `None` renders as an empty bar
    pub value: Option<f64>,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Dosing parameters for one processing aid (yeast or nutrient)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdditiveDose {
    /// Product name shown in results and manual steps
    pub brand: String,
    /// Dose rate in g/hL of the volume it is dosed on
    #[serde(default)]
    pub dose_g_per_hl: Option<f64>,
    /// Rehydration water as a multiple of the additive mass
    #[serde(default)]
    pub rehydration_ratio: Option<f64>,
}

impl AdditiveDose {
    pub fn new(brand: &str, dose_g_per_hl: f64, rehydration_ratio: Option<f64>) -> Self {
        Self {
            brand: brand.to_string(),
            dose_g_per_hl: Some(dose_g_per_hl),
            rehydration_ratio,
        }
    }

    /// Brand name, or `fallback` when the field was cleared
    pub fn brand_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        let brand = self.brand.trim();
        if brand.is_empty() {
            fallback
        } else {
            brand
        }
    }
}

/// One card of a printable step-by-step manual
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManualSection {
    pub title: String,
    /// Scheduled start, already formatted
    pub when: Option<String>,
    pub note: Option<String>,
    pub steps: Vec<String>,
}
