//! Row models and request/response DTOs.

pub mod part;
