pub mod epworth;
pub mod snoring;
