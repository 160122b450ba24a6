/// DexScreener trading pair client
///
/// Single endpoint: /latest/dex/tokens/{address} returns every pair the
/// token trades in. Response fields are frequently missing for illiquid
/// tokens, so the raw structs are fully optional and conversion defaults
/// everything to zero/empty.
use serde::Deserialize;

use crate::apis::client::{get_json, HttpClient, RateLimiter};
use crate::config::ApisConfig;
use crate::errors::GatewayError;
use crate::logger::{self, LogTag};
use crate::tokens::types::TokenPair;

const DEXSCREENER_BASE_URL: &str = "https://api.dexscreener.com";

// ============================================================================
// RAW RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TokenPairsResponse {
    pub pairs: Option<Vec<DexPairRaw>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPairRaw {
    pub chain_id: Option<String>,
    pub dex_id: Option<String>,
    pub pair_address: Option<String>,
    pub base_token: Option<PairTokenRaw>,
    /// Price serialized as a string by the API
    pub price_usd: Option<String>,
    pub txns: Option<PairTxnsRaw>,
    pub volume: Option<PairVolumeRaw>,
    pub price_change: Option<PairPriceChangeRaw>,
    pub liquidity: Option<PairLiquidityRaw>,
    pub fdv: Option<f64>,
    pub market_cap: Option<f64>,
    pub pair_created_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairTokenRaw {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairTxnsRaw {
    pub h24: Option<TxnBucketRaw>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxnBucketRaw {
    pub buys: Option<u64>,
    pub sells: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairVolumeRaw {
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairPriceChangeRaw {
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairLiquidityRaw {
    pub usd: Option<f64>,
}

impl DexPairRaw {
    /// Convert to a complete pair record, defaulting every missing field
    pub fn to_pair(self) -> TokenPair {
        let base = self.base_token.unwrap_or(PairTokenRaw {
            address: None,
            name: None,
            symbol: None,
        });

        TokenPair {
            pair_address: self.pair_address.unwrap_or_default(),
            base_name: base.name.unwrap_or_default(),
            base_symbol: base.symbol.unwrap_or_default(),
            price_usd: self
                .price_usd
                .as_deref()
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(0.0),
            price_change_h24: self.price_change.and_then(|p| p.h24).unwrap_or(0.0),
            liquidity_usd: self.liquidity.and_then(|l| l.usd).unwrap_or(0.0),
            volume_h24: self.volume.and_then(|v| v.h24).unwrap_or(0.0),
            fdv: self.fdv.unwrap_or(0.0),
            market_cap: self.market_cap.unwrap_or(0.0),
            txns_h24: self
                .txns
                .and_then(|t| t.h24)
                .map(|b| b.buys.unwrap_or(0) + b.sells.unwrap_or(0))
                .unwrap_or(0),
            pair_created_at: self.pair_created_at,
        }
    }
}

// ============================================================================
// CLIENT IMPLEMENTATION
// ============================================================================

/// DexScreener API client
pub struct DexScreenerClient {
    http: HttpClient,
    limiter: RateLimiter,
}

impl DexScreenerClient {
    pub fn new(config: &ApisConfig) -> Result<Self, String> {
        Ok(Self {
            http: HttpClient::new(config.request_timeout_secs)?,
            limiter: RateLimiter::new(
                config.dexscreener_min_interval_ms,
                config.max_concurrent_requests,
            ),
        })
    }

    /// Fetch ALL pairs a token trades in
    ///
    /// A token with no pairs returns an empty vec, not an error.
    pub async fn fetch_token_pairs(&self, address: &str) -> Result<Vec<TokenPair>, GatewayError> {
        let endpoint = format!("latest/dex/tokens/{}", address);
        let url = format!("{}/{}", DEXSCREENER_BASE_URL, endpoint);

        logger::debug(
            LogTag::Api,
            &format!("[DEXSCREENER] Fetching token pairs: address={}", address),
        );

        let response: TokenPairsResponse =
            get_json(&self.http, &self.limiter, &endpoint, &url).await?;

        Ok(response
            .pairs
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.to_pair())
            .collect())
    }
}
