//! intake-notify
//!
//! Outbound email through the Resend HTTP API.

pub mod error;
pub mod resend;

pub use resend::{Attachment, Email, ResendClient, ResendConfig};
