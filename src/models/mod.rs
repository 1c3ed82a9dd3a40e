//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! ```rust
//! use subcategorize::models::{CountryEntry, CountryTable, ProxyType};
//!
//! let table = CountryTable::new(vec![CountryEntry::new("DE", "Germany", &["DE"], Some("🇩🇪"))]).unwrap();
//! assert_eq!(table.len(), 1);
//! assert_eq!(ProxyType::Vmess.as_str(), "Vmess");
//! ```

mod country;
mod proxy;

pub use country::*;
pub use proxy::*;
