//! Aggregation pipeline and the global token store
//!
//! The engine runs batched enrichment passes over the candidate universe;
//! the store holds the published results behind a generation guard so
//! concurrent or superseded passes cannot clobber newer data.

pub mod engine;
pub mod store;

pub use engine::{
    build_scored_token, log_ranked_summary, refresh, run_refresh_service, select_universe,
};
pub use store::{get_snapshot, get_tokens, global_store, teardown_store, StoreSnapshot, TokenStore};
