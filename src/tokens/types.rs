/// Core data model for the ranking pipeline
///
/// Raw upstream responses are converted into these complete records at the
/// gateway boundary; everything downstream of the normalizer operates on
/// fully-populated values with documented defaults, never on Options.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registry entry from Jupiter, already defaulted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub tags: Vec<String>,
    pub logo_uri: Option<String>,
    /// Raw base-unit supply as reported by the registry (0 when unknown)
    pub supply: f64,
    pub created_at: Option<DateTime<Utc>>,
}

/// One trading pair from DexScreener, already defaulted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub pair_address: String,
    pub base_name: String,
    pub base_symbol: String,
    pub price_usd: f64,
    /// 24h price change in percent, as reported upstream
    pub price_change_h24: f64,
    pub liquidity_usd: f64,
    pub volume_h24: f64,
    pub fdv: f64,
    pub market_cap: f64,
    pub txns_h24: u64,
    /// Upstream reports this in seconds despite the field naming
    pub pair_created_at: Option<i64>,
}

/// Stable identity fields for display and search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenIdentity {
    pub address: String,
    pub name: String,
    pub chain: String,
    pub logo_uri: Option<String>,
    pub tags: Vec<String>,
}

/// Complete on-chain record produced by the normalizer
///
/// Invariants: peak_market_cap >= current_market_cap * 1.1 and
/// peak_liquidity >= liquidity_usd * 1.1, for all inputs including zeros.
/// No field is ever NaN or infinite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnChainMetrics {
    pub current_market_cap: f64,
    pub peak_market_cap: f64,
    pub liquidity_usd: f64,
    pub peak_liquidity: f64,
    pub volume_24h: f64,
    pub price_usd: f64,
    /// 24h price change as a fraction (h24 percent / 100)
    pub price_change_24h: f64,
    pub tx_count_24h: u64,
    pub supply: f64,
    pub holders: u64,
    pub holder_change_rate: f64,
    pub age_days: f64,
    /// Creation time from the best pair, else the registry
    pub created_at: Option<DateTime<Utc>>,
    /// When this record was observed
    pub last_active: Option<DateTime<Utc>>,
}

/// Social activity counters (placeholder-filled when upstream has no data)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialMetrics {
    pub twitter_volume_24h: f64,
    pub reddit_posts_24h: f64,
    pub discord_messages_24h: f64,
    pub telegram_messages_24h: f64,
    pub sentiment: SentimentBreakdown,
}

/// Independent bounded fractions, deliberately NOT a probability
/// distribution; they are never renormalized to sum to 1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Fully scored token as published to the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredToken {
    pub identity: TokenIdentity,
    pub onchain: OnChainMetrics,
    pub social: SocialMetrics,
    /// All pairs, sorted by descending liquidity
    pub raw_pairs: Vec<TokenPair>,
    pub on_chain_death_score: f64,
    pub social_death_score: f64,
    pub death_score: f64,
    pub recovery_value: f64,
    pub is_dead: bool,
    pub last_updated: DateTime<Utc>,
}
