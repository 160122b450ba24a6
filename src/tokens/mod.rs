//! Token data model and field normalizer
//!
//! Raw gateway responses become complete [`types::OnChainMetrics`] records
//! here. Downstream modules never see a missing field.

pub mod normalizer;
pub mod types;

pub use normalizer::{normalize_onchain, NormalizedRecord};
pub use types::{
    OnChainMetrics, RegistryEntry, ScoredToken, SentimentBreakdown, SocialMetrics, TokenIdentity,
    TokenPair,
};
