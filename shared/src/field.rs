//! Numeric form fields: coercion, validation and display formatting
//!
//! Every calculator reads its inputs through these helpers so that an empty or
//! garbled field behaves the same way on every page: it becomes an unknown
//! value and is displayed as a dash.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FieldError;
use crate::types::RawInput;

/// Shown in place of any value that is unknown or not finite
pub const PLACEHOLDER: &str = "–";

// ============================================================================
// Coercion
// ============================================================================

/// Coerce a raw form value to a finite number, or `fallback`
///
/// Callers that need to tell "unset" apart from zero pass `f64::NAN`.
pub fn num(value: &RawInput, fallback: f64) -> f64 {
    match value {
        RawInput::Number(n) if n.is_finite() => *n,
        RawInput::Number(_) => fallback,
        RawInput::Text(text) => parse_number(text).unwrap_or(fallback),
    }
}

/// Parse typed text into a finite number
pub fn parse_number(text: &str) -> Option<f64> {
    parse_strict(text).ok()
}

/// Parse typed text, reporting why it was rejected
pub fn parse_strict(text: &str) -> Result<f64, FieldError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Empty);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| FieldError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(FieldError::NotFinite);
    }
    Ok(value)
}

/// Keep a value only if it is finite
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// An optional input that is present and finite
pub fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// An optional input read as zero when absent, for pages that dose on zero
pub fn or_zero(value: Option<f64>) -> f64 {
    known(value).unwrap_or(0.0)
}

/// A raw form value as an exact decimal, zero when empty or unusable
pub fn decimal_or_zero(value: Option<&RawInput>) -> Decimal {
    let number = value.map(|raw| num(raw, 0.0)).unwrap_or(0.0);
    // Shortest round-trip text keeps typed decimals such as 0.1 exact
    number
        .to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_f64(number))
        .unwrap_or(Decimal::ZERO)
}

/// Deserialize a number, numeric text, empty text or null to a decimal
///
/// Cleared fields read as zero, so a half-edited form still calculates.
pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawInput> = Option::deserialize(deserializer)?;
    Ok(decimal_or_zero(raw.as_ref()))
}

/// Divide, yielding `None` instead of an infinity or NaN
///
/// A zero, negative-zero or non-finite denominator is undefined.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    finite(numerator / denominator)
}

/// Divide by a volume, which must be strictly positive
pub fn per_volume(numerator: f64, volume: f64) -> Option<f64> {
    if volume > 0.0 {
        ratio(numerator, volume)
    } else {
        None
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Format with exactly `decimals` places, or the placeholder
///
/// Exact ties round away from zero, the way the browser's `toFixed` does.
pub fn fmt(value: impl Into<Option<f64>>, decimals: u32) -> String {
    let Some(value) = value.into().filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };
    let places = decimals as usize;
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let rounded =
                exact.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            let rounded = if rounded.is_zero() { rounded.abs() } else { rounded };
            format!("{:.*}", places, rounded)
        }
        // Outside the decimal range; std formatting is fine at that magnitude.
        None => format!("{:.*}", places, value),
    }
}

pub fn fmt0(value: impl Into<Option<f64>>) -> String {
    fmt(value, 0)
}

pub fn fmt1(value: impl Into<Option<f64>>) -> String {
    fmt(value, 1)
}

pub fn fmt2(value: impl Into<Option<f64>>) -> String {
    fmt(value, 2)
}

// ============================================================================
// Field capability
// ============================================================================

/// Description of one numeric input on a calculator page
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct NumericField {
    /// Input record key, dotted for nested records (`yeast.doseGPerHl`)
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    /// Step of the input control
    pub step: f64,
    /// Decimals used when the value is displayed back
    pub decimals: u32,
    pub min: Option<f64>,
}

impl NumericField {
    pub const fn new(
        key: &'static str,
        label: &'static str,
        unit: Option<&'static str>,
        step: f64,
        decimals: u32,
    ) -> Self {
        Self {
            key,
            label,
            unit,
            step,
            decimals,
            min: None,
        }
    }

    pub const fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Read typed text; anything unusable is unknown
    pub fn parse(&self, text: &str) -> Option<f64> {
        parse_number(text)
    }

    /// Check a value against this field's constraints
    pub fn validate(&self, value: Option<f64>) -> Result<f64, FieldError> {
        let value = value.ok_or(FieldError::Empty)?;
        if !value.is_finite() {
            return Err(FieldError::NotFinite);
        }
        match self.min {
            Some(min) if value < min => Err(FieldError::BelowMinimum { value, min }),
            _ => Ok(value),
        }
    }

    /// Parse and validate in one step, for reporting a field's problem
    pub fn check(&self, text: &str) -> Result<f64, FieldError> {
        self.validate(Some(parse_strict(text)?))
    }

    /// Display a value with this field's precision and unit
    pub fn format(&self, value: Option<f64>) -> String {
        let shown = fmt(value, self.decimals);
        match self.unit {
            Some(unit) => format!("{} {}", shown, unit),
            None => shown,
        }
    }
}

/// Look a field up by its record key
pub fn field_by_key(fields: &'static [NumericField], key: &str) -> Option<&'static NumericField> {
    fields.iter().find(|field| field.key == key)
}
