/// Shared API manager owning one client per upstream
///
/// Built once from configuration and shared by the aggregation pipeline so
/// rate limiters are global per endpoint, not per token.
use crate::apis::dexscreener::DexScreenerClient;
use crate::apis::jupiter::JupiterClient;
use crate::apis::social::SocialClient;
use crate::apis::solscan::SolscanClient;
use crate::config::ApisConfig;

pub struct ApiManager {
    pub jupiter: JupiterClient,
    pub dexscreener: DexScreenerClient,
    pub social: SocialClient,
    pub solscan: SolscanClient,
}

impl ApiManager {
    pub fn new(config: &ApisConfig) -> Result<Self, String> {
        Ok(Self {
            jupiter: JupiterClient::new(config)?,
            dexscreener: DexScreenerClient::new(config)?,
            social: SocialClient::new(config)?,
            solscan: SolscanClient::new(config)?,
        })
    }
}
