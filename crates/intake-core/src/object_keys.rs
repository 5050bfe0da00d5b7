//! S3 key conventions for stored submissions.
//!
//! Pure string functions, no AWS SDK dependency.

use uuid::Uuid;

pub const FORMS_PREFIX: &str = "forms/";

pub fn form(id: Uuid) -> String {
    format!("forms/{id}.json")
}

/// Recover the submission id from a key produced by [`form`].
pub fn form_id(key: &str) -> Option<Uuid> {
    key.strip_prefix(FORMS_PREFIX)?
        .strip_suffix(".json")?
        .parse()
        .ok()
}
