pub mod config;
pub mod paths;

pub use config::{ApiConfig, Config, DisplayConfig, LoggingConfig, SearchConfig};
pub use paths::PathManager;
