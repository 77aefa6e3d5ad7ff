//! Configuration module for RankSight
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section except `[storage]` falls back to production defaults.
//!
//! # Example
//!
//! ```no_run
//! use ranksight::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ranksight.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, PageSpeedConfig, ScoringConfig, StorageConfig, UserAgentConfig,
    WorkerConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
