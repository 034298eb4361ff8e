//! Data models

pub mod outcome;
pub mod record;

pub use outcome::*;
pub use record::*;
