pub mod app;
pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod inputs;
pub mod normalizer;
pub mod pipeline;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod types;

pub use config::{OutputFormat, ScraperConfig, Settings};
pub use error::{Result, ScraperError};
pub use types::ProfileRecord;
