//! Collab domain rules: input validators, profile trust scoring and the
//! match-request / match lifecycle. Everything here is pure; persistence and
//! HTTP live in collab-db and collab-api.

pub mod error;
pub mod lifecycle;
pub mod trust;
pub mod validators;

pub use error::DomainError;
pub use lifecycle::{RequestAction, MAX_PROJECTS_PER_OWNER};
pub use trust::compute_trust;
pub use validators::{digits_only, is_valid_inn, normalize_phone_ru};
