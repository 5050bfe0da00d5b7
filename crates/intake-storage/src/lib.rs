//! intake-storage
//!
//! S3 persistence of submitted forms. Thin wrapper around the AWS S3 SDK.

pub mod client;
pub mod error;
pub mod forms;
pub mod objects;
