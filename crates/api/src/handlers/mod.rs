//! Request handlers for the parts catalog.
//!
//! Each submodule provides async handler functions for one audience.
//! Handlers delegate to the repositories in `rotorbase_db` and map errors
//! via [`crate::error::AppError`]; response payloads go through the
//! image-visibility projections in `rotorbase_db::models::part::PartView`.

pub mod parts;
pub mod parts_admin;
