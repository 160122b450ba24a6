//! External market data gateway
//!
//! Thin rate-limited clients over the public upstreams:
//! - Jupiter token registry (universe + identity)
//! - DexScreener pairs (liquidity, volume, price action)
//! - CryptoCompare social counters (best-effort, randomized fallback)
//! - Solscan holder counts (best-effort, zero fallback)
//!
//! Every call carries a hard request timeout. A single upstream failure
//! degrades to a documented default and never aborts sibling calls.

pub mod client;
pub mod dexscreener;
pub mod jupiter;
pub mod manager;
pub mod social;
pub mod solscan;

pub use client::{HttpClient, RateLimiter};
pub use dexscreener::DexScreenerClient;
pub use jupiter::JupiterClient;
pub use manager::ApiManager;
pub use social::{fallback_social_metrics, SocialClient};
pub use solscan::SolscanClient;
