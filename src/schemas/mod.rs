//! Typed request/response structures.
//!
//! Each request type deserializes permissively (optional fields) and then
//! runs `validate()`, returning either the cleaned, allow-listed value or a
//! field-keyed error map. Validation happens before any persistence touch.

pub mod admin;
pub mod category;
pub mod product;
pub mod provider;
pub mod site_content;
pub mod tag;

use std::collections::BTreeMap;

/// Per-field validation messages, keyed by field name. The pseudo-field
/// `general` is used for whole-request problems.
pub type FieldErrors = BTreeMap<String, String>;

/// Trimmed, non-empty view of an optional input string.
pub(crate) fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
