//! Domain logic for the RotorBase parts catalog.
//!
//! Pure rules shared by the repository and API layers: canonical key
//! derivation, the gear taxonomy, curation state definitions, and search
//! helpers. This crate has no database or HTTP dependencies, so every rule
//! here is unit-testable in isolation.

pub mod canonical;
pub mod curation;
pub mod error;
pub mod gear;
pub mod search;
pub mod types;

pub use error::CoreError;
