//! Data access repositories.
//!
//! Each repository is a unit struct with static async methods taking the
//! pool (or a transaction) as the first argument. Plain lookups return
//! `sqlx::Error`; operations that enforce domain rules return [`DbError`]
//! so rule violations and infrastructure failures stay distinguishable.
//!
//! [`DbError`]: crate::error::DbError

pub mod curation_repo;
pub mod near_match_repo;
pub mod part_repo;

pub use curation_repo::CurationRepo;
pub use near_match_repo::NearMatchRepo;
pub use part_repo::PartRepo;
