pub mod record;
pub mod submission;
