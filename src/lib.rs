pub mod aggregator;
pub mod apis;
pub mod arguments;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod logger;
pub mod scoring;
pub mod tokens;
