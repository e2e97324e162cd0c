//! Calculator models

mod base_wine;
mod blend;
mod bottling;
mod dosing;
mod packaging;
mod starter;

pub use base_wine::*;
pub use blend::*;
pub use bottling::*;
pub use dosing::*;
pub use packaging::*;
pub use starter::*;
