pub mod filter;
pub mod generator;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod settings;
pub mod utils;

// Re-export the main types for easier access
pub use models::{CountryEntry, CountryTable, ProxyRecord, ProxyType};
pub use pipeline::{CancelToken, Pipeline, PipelineError, RunOutput};
pub use settings::Settings;
