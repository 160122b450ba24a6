/// Configuration schemas with embedded defaults
///
/// All structs are defined through `config_struct!` so defaults live next to
/// the field declarations and missing TOML keys fall back automatically.

use crate::config_struct;

// ============================================================================
// API CONFIGURATION
// ============================================================================

config_struct! {
    /// Upstream API client configuration
    pub struct ApisConfig {
        /// Per-request timeout in seconds
        request_timeout_secs: u64 = 10,

        /// Maximum concurrent in-flight requests per endpoint
        max_concurrent_requests: usize = 10,

        /// Minimum interval between Jupiter registry requests (ms)
        jupiter_min_interval_ms: u64 = 200,

        /// Minimum interval between DexScreener requests (ms)
        dexscreener_min_interval_ms: u64 = 250,

        /// Minimum interval between CryptoCompare requests (ms)
        social_min_interval_ms: u64 = 500,

        /// Minimum interval between Solscan requests (ms)
        solscan_min_interval_ms: u64 = 300,

        /// CryptoCompare API key (empty = unauthenticated, fallback data used on failure)
        cryptocompare_api_key: String = String::new(),

        /// Solscan API key (empty = unauthenticated)
        solscan_api_key: String = String::new(),
    }
}

// ============================================================================
// AGGREGATOR CONFIGURATION
// ============================================================================

config_struct! {
    /// Refresh pipeline configuration
    pub struct AggregatorConfig {
        /// Maximum tokens enriched per refresh cycle
        max_tokens_per_cycle: usize = 100,

        /// Tokens enriched concurrently within one batch
        batch_size: usize = 10,

        /// Seconds between periodic refresh cycles
        refresh_interval_secs: u64 = 900,

        /// If fewer candidates than this match the primary universe rules,
        /// supplement with trending-tagged tokens
        min_universe_size: usize = 10,
    }
}

// ============================================================================
// DASHBOARD CONFIGURATION
// ============================================================================

config_struct! {
    /// Query layer configuration
    pub struct DashboardConfig {
        /// Tokens per page
        page_size: usize = 20,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sub-configurations
    pub struct Config {
        /// API client configuration
        apis: ApisConfig = ApisConfig::default(),

        /// Refresh pipeline configuration
        aggregator: AggregatorConfig = AggregatorConfig::default(),

        /// Query layer configuration
        dashboard: DashboardConfig = DashboardConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_policies() {
        let config = Config::default();
        assert_eq!(config.aggregator.max_tokens_per_cycle, 100);
        assert_eq!(config.aggregator.batch_size, 10);
        assert_eq!(config.aggregator.refresh_interval_secs, 900);
        assert_eq!(config.dashboard.page_size, 20);
        assert_eq!(config.apis.request_timeout_secs, 10);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [aggregator]
            batch_size = 5
            "#,
        )
        .unwrap();
        assert_eq!(parsed.aggregator.batch_size, 5);
        assert_eq!(parsed.aggregator.max_tokens_per_cycle, 100);
        assert_eq!(parsed.dashboard.page_size, 20);
    }
}
