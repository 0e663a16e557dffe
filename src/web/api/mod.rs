pub mod error;
pub mod tle;
pub mod tracker;
