pub mod base64;
pub mod file;
pub mod matcher;
pub mod url;

// Re-export common utilities
pub use file::{file_exists, file_stem, read_input};
pub use matcher::contains_bounded;
