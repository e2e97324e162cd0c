//! Error types for the calculation engine
//!
//! None of these are fatal to a page. Field errors turn into a dash placeholder,
//! storage errors degrade the checklist to an empty state.

use thiserror::Error;

/// Why a raw form value could not be used as a number
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Field is empty")]
    Empty,

    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("Value is not finite")]
    NotFinite,

    #[error("Value {value} is below the minimum {min}")]
    BelowMinimum { value: f64, min: f64 },
}

/// Failures from the key-value store backing the checklist
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write failed: {0}")]
    Write(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
