//! Remark classification: junk heuristics and country matching

pub mod country;
pub mod junk;

pub use country::CountryMatcher;
pub use junk::{FilterRejected, JunkFilter};
