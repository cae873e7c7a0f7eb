//! Configuration module
//!
//! Settings for the dictionary backend, the result cache, the search
//! history, and display preferences.

pub mod config;

pub use config::{config_dir, ApiConfig, CacheConfig, Config, DisplayConfig, HistoryConfig};
