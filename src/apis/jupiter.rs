/// Jupiter token registry client
///
/// Endpoints:
/// 1. /tokens/v1/all - full registry listing
/// 2. /tokens/v1/token/{address} - single token lookup (404 = unknown)
/// 3. /tokens/v1/tagged/{tag} - tokens carrying a registry tag
/// 4. /tokens/v1/mints/tradable - bare mint list, fallback when /all fails
use serde::Deserialize;

use crate::apis::client::{get_json, HttpClient, RateLimiter};
use crate::config::ApisConfig;
use crate::errors::GatewayError;
use crate::logger::{self, LogTag};
use crate::tokens::types::RegistryEntry;

const JUPITER_BASE_URL: &str = "https://lite-api.jup.ag";

/// Raw registry token as returned by Jupiter, all fields optional
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryTokenRaw {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u32>,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Registry supply in base units, serialized as string or number
    pub supply: Option<serde_json::Value>,
    pub created_at: Option<String>,
}

impl RegistryTokenRaw {
    /// Convert to a complete entry, defaulting every missing field.
    /// Returns None only when the address itself is missing.
    pub fn to_entry(self) -> Option<RegistryEntry> {
        let address = self.address?;

        let supply = match &self.supply {
            Some(serde_json::Value::String(s)) => s.parse::<f64>().unwrap_or(0.0),
            Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            _ => 0.0,
        };

        let created_at = self
            .created_at
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc));

        Some(RegistryEntry {
            address,
            name: self.name.unwrap_or_else(|| "Unknown".to_string()),
            symbol: self.symbol.unwrap_or_else(|| "Unknown".to_string()),
            decimals: self.decimals.unwrap_or(9),
            tags: self.tags.unwrap_or_default(),
            logo_uri: self.logo_uri,
            supply,
            created_at,
        })
    }
}

/// Jupiter registry API client
pub struct JupiterClient {
    http: HttpClient,
    limiter: RateLimiter,
}

impl JupiterClient {
    pub fn new(config: &ApisConfig) -> Result<Self, String> {
        Ok(Self {
            http: HttpClient::new(config.request_timeout_secs)?,
            limiter: RateLimiter::new(
                config.jupiter_min_interval_ms,
                config.max_concurrent_requests,
            ),
        })
    }

    /// Fetch the full token registry
    pub async fn fetch_all_tokens(&self) -> Result<Vec<RegistryEntry>, GatewayError> {
        let endpoint = "tokens/v1/all";
        let url = format!("{}/{}", JUPITER_BASE_URL, endpoint);

        logger::debug(LogTag::Api, "[JUPITER] Fetching full token registry");

        let raw: Vec<RegistryTokenRaw> =
            get_json(&self.http, &self.limiter, endpoint, &url).await?;

        Ok(raw.into_iter().filter_map(|t| t.to_entry()).collect())
    }

    /// Fetch a single token by mint address, None when the registry does not
    /// know the address
    pub async fn fetch_token(&self, address: &str) -> Result<Option<RegistryEntry>, GatewayError> {
        let endpoint = format!("tokens/v1/token/{}", address);
        let url = format!("{}/{}", JUPITER_BASE_URL, endpoint);

        logger::debug(
            LogTag::Api,
            &format!("[JUPITER] Fetching token info: address={}", address),
        );

        match get_json::<RegistryTokenRaw>(&self.http, &self.limiter, &endpoint, &url).await {
            Ok(raw) => Ok(raw.to_entry()),
            Err(GatewayError::HttpStatus { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch the tradable mint address list, used as a fallback universe
    /// source when the full registry listing is unavailable
    pub async fn fetch_tradable_mints(&self) -> Result<Vec<String>, GatewayError> {
        let endpoint = "tokens/v1/mints/tradable";
        let url = format!("{}/{}", JUPITER_BASE_URL, endpoint);

        logger::debug(LogTag::Api, "[JUPITER] Fetching tradable mint list");

        get_json(&self.http, &self.limiter, endpoint, &url).await
    }

    /// Fetch tokens carrying a registry tag (used to supplement a thin universe)
    pub async fn fetch_tagged(&self, tag: &str) -> Result<Vec<RegistryEntry>, GatewayError> {
        let endpoint = format!("tokens/v1/tagged/{}", tag);
        let url = format!("{}/{}", JUPITER_BASE_URL, endpoint);

        logger::debug(
            LogTag::Api,
            &format!("[JUPITER] Fetching tagged tokens: tag={}", tag),
        );

        let raw: Vec<RegistryTokenRaw> =
            get_json(&self.http, &self.limiter, &endpoint, &url).await?;

        Ok(raw.into_iter().filter_map(|t| t.to_entry()).collect())
    }
}
