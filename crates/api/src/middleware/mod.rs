//! Identity extractors for forwarded gateway headers.
//!
//! - [`identity::Contributor`] -- Optional contributor id from `x-user-id`.
//! - [`identity::AdminUser`] -- Required admin id from `x-admin-id`.

pub mod identity;
