//! Calculation engine for the winery production calculators
//!
//! This crate holds everything the pages compute: numeric form handling, the
//! base-wine, blend, bottling, starter and packaging models, the delivery
//! checklist and the route table. It is shared by the browser crate (via WASM)
//! and the static site server.

pub mod checklist;
pub mod error;
pub mod field;
pub mod models;
pub mod routes;
pub mod schedule;
pub mod types;

pub use error::*;
pub use models::*;
pub use types::*;
