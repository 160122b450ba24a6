//! Configuration system
//!
//! TOML-backed configuration with embedded defaults. The config file lives at
//! `data/config.toml`; missing keys fall back to the defaults declared in the
//! schema definitions.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{AggregatorConfig, ApisConfig, Config, DashboardConfig};
pub use utils::{load_config, load_config_from_path, with_config, CONFIG, CONFIG_FILE_PATH};
