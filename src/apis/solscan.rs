/// Solscan holder count client
///
/// Single endpoint used for the holder total. Failures of any kind degrade
/// to a zero count at the call site.
use serde::Deserialize;

use crate::apis::client::{get_json_with_auth, HttpClient, RateLimiter};
use crate::config::ApisConfig;
use crate::errors::GatewayError;
use crate::logger::{self, LogTag};

const SOLSCAN_BASE_URL: &str = "https://public-api.solscan.io";

#[derive(Debug, Clone, Deserialize)]
pub struct HoldersResponseRaw {
    pub total: Option<u64>,
}

/// Solscan public API client
pub struct SolscanClient {
    http: HttpClient,
    limiter: RateLimiter,
    api_key: String,
}

impl SolscanClient {
    pub fn new(config: &ApisConfig) -> Result<Self, String> {
        Ok(Self {
            http: HttpClient::new(config.request_timeout_secs)?,
            limiter: RateLimiter::new(
                config.solscan_min_interval_ms,
                config.max_concurrent_requests,
            ),
            api_key: config.solscan_api_key.clone(),
        })
    }

    /// Authentication header sent when a key is configured
    fn auth_header(&self) -> Option<(&str, &str)> {
        if self.api_key.is_empty() {
            None
        } else {
            Some(("token", self.api_key.as_str()))
        }
    }

    /// Fetch the total holder count for a token mint
    pub async fn fetch_holder_count(&self, address: &str) -> Result<u64, GatewayError> {
        let endpoint = "token/holders";
        let url = format!(
            "{}/{}?tokenAddress={}&limit=10",
            SOLSCAN_BASE_URL, endpoint, address
        );

        logger::debug(
            LogTag::Api,
            &format!("[SOLSCAN] Fetching holder count: address={}", address),
        );

        let response: HoldersResponseRaw =
            get_json_with_auth(&self.http, &self.limiter, endpoint, &url, self.auth_header())
                .await?;

        Ok(response.total.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_total_defaults_to_zero() {
        let raw: HoldersResponseRaw = serde_json::from_str("{}").unwrap();
        assert_eq!(raw.total.unwrap_or(0), 0);
    }

    #[test]
    fn auth_header_requires_a_configured_key() {
        let unauthenticated = SolscanClient::new(&ApisConfig::default()).unwrap();
        assert!(unauthenticated.auth_header().is_none());

        let config = ApisConfig {
            solscan_api_key: "secret".to_string(),
            ..ApisConfig::default()
        };
        let authenticated = SolscanClient::new(&config).unwrap();
        assert_eq!(authenticated.auth_header(), Some(("token", "secret")));
    }
}
