//! intake-core
//!
//! The medical intake questionnaire as data: the statically typed form
//! record, the field registry with its conditional-reveal rules, the derived
//! value calculators, and the form state store that owns one record per
//! session. No I/O lives here.

pub mod calculators;
pub mod error;
pub mod models;
pub mod object_keys;
pub mod precondition;
pub mod registry;
pub mod snapshot;
pub mod store;
