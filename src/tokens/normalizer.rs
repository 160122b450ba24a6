/// Field normalizer: registry entry + pair list -> complete on-chain record
///
/// Upstream data for dead tokens is full of holes, so every field is
/// defaulted and the unobservable peak values are estimated with fixed
/// heuristics. The multipliers and floors here are exact contracts shared
/// with the scoring engine; changing them changes every score.
use chrono::{DateTime, Utc};

use crate::tokens::types::{OnChainMetrics, RegistryEntry, TokenPair};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Default token age in days when no creation timestamp is known
const DEFAULT_AGE_DAYS: f64 = 30.0;

/// Normalized record: complete metrics plus the sorted pair list
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub onchain: OnChainMetrics,
    /// All pairs, sorted by descending liquidity (best pair first)
    pub pairs: Vec<TokenPair>,
}

/// Build a complete on-chain record from a registry entry and its pairs
///
/// With zero pairs the record is all zeros. The peak invariants
/// (peak >= current * 1.1) hold for every input, zeros included.
pub fn normalize_onchain(
    entry: &RegistryEntry,
    mut pairs: Vec<TokenPair>,
    holders: u64,
    now: DateTime<Utc>,
) -> NormalizedRecord {
    for pair in &mut pairs {
        sanitize_pair(pair);
    }

    // Most liquid pair first; it drives the record
    pairs.sort_by(|a, b| {
        b.liquidity_usd
            .partial_cmp(&a.liquidity_usd)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if pairs.is_empty() {
        let supply = registry_supply(entry);
        return NormalizedRecord {
            onchain: OnChainMetrics {
                supply,
                age_days: DEFAULT_AGE_DAYS,
                created_at: entry.created_at,
                last_active: Some(now),
                ..OnChainMetrics::default()
            },
            pairs,
        };
    }

    let best = &pairs[0];

    let current_liquidity = best.liquidity_usd;
    let current_market_cap = best.market_cap;
    let price = best.price_usd;
    let price_change_24h = best.price_change_h24 / 100.0;

    let supply = if price > 0.0 {
        current_market_cap / price
    } else {
        registry_supply(entry)
    };

    // pairCreatedAt arrives in seconds despite the field naming; zero means
    // unset and the registry timestamp is the fallback
    let created_at_ms = best
        .pair_created_at
        .filter(|&secs| secs != 0)
        .map(|secs| secs * 1000)
        .or_else(|| entry.created_at.map(|dt| dt.timestamp_millis()));
    let age_days = token_age_days(created_at_ms, now);
    let created_at = created_at_ms.and_then(DateTime::<Utc>::from_timestamp_millis);

    let highest_pair_market_cap = pairs
        .iter()
        .map(|p| p.market_cap)
        .fold(current_market_cap, f64::max);
    let peak_market_cap =
        estimate_peak_market_cap(best.fdv, highest_pair_market_cap, current_market_cap);

    let market_cap_ratio = if current_market_cap > 0.0 {
        peak_market_cap / current_market_cap
    } else {
        1.5
    };

    let peak_liquidity =
        estimate_peak_liquidity(current_liquidity, price_change_24h, age_days, market_cap_ratio);

    NormalizedRecord {
        onchain: OnChainMetrics {
            current_market_cap,
            peak_market_cap,
            liquidity_usd: current_liquidity,
            peak_liquidity,
            volume_24h: best.volume_h24,
            price_usd: price,
            price_change_24h,
            tx_count_24h: best.txns_h24,
            supply,
            holders,
            holder_change_rate: 0.0,
            age_days,
            created_at,
            last_active: Some(now),
        },
        pairs,
    }
}

/// Display name for a token: registry symbol, then registry name, then the
/// best pair's base symbol, then "Unknown"
pub fn display_name(entry: &RegistryEntry, pairs: &[TokenPair]) -> String {
    for candidate in [&entry.symbol, &entry.name] {
        if !candidate.is_empty() && candidate != "Unknown" {
            return candidate.clone();
        }
    }
    if let Some(best) = pairs.first() {
        if !best.base_symbol.is_empty() {
            return best.base_symbol.clone();
        }
    }
    "Unknown".to_string()
}

/// Peak market cap estimate
///
/// fdv when it exceeds the current cap; otherwise the highest cap seen
/// across all pairs; otherwise current * 1.5. Always floored at
/// current * 1.1.
pub fn estimate_peak_market_cap(
    fdv: f64,
    highest_pair_market_cap: f64,
    current_market_cap: f64,
) -> f64 {
    let peak = if fdv > 0.0 && fdv > current_market_cap {
        fdv
    } else if highest_pair_market_cap > current_market_cap {
        highest_pair_market_cap
    } else {
        current_market_cap * 1.5
    };

    peak.max(current_market_cap * 1.1)
}

/// Peak liquidity estimate
///
/// current liquidity scaled by age, drawdown and market cap ratio
/// multipliers, floored at current * 1.1. price_change is the 24h change
/// as a fraction.
pub fn estimate_peak_liquidity(
    current_liquidity: f64,
    price_change: f64,
    age_days: f64,
    market_cap_ratio: f64,
) -> f64 {
    // Older tokens are assumed to have been through a cycle
    let age_multiplier = (1.0 + age_days / 60.0).min(2.5);

    // A deep 24h drawdown implies much higher historical liquidity
    let price_change_multiplier = if price_change < 0.0 {
        1.0 + (price_change.abs() * 8.0).min(3.0)
    } else {
        1.2
    };

    let market_cap_multiplier = if market_cap_ratio > 1.0 {
        market_cap_ratio.sqrt().min(2.0)
    } else {
        1.0
    };

    let estimated =
        current_liquidity * age_multiplier * price_change_multiplier * market_cap_multiplier;

    estimated.max(current_liquidity * 1.1)
}

/// Whole days since creation, minimum 1, defaulting to 30 when unknown
pub fn token_age_days(created_at_ms: Option<i64>, now: DateTime<Utc>) -> f64 {
    match created_at_ms {
        Some(ms) if ms != 0 => {
            let age_ms = (now.timestamp_millis() - ms) as f64;
            (age_ms / MS_PER_DAY).floor().max(1.0)
        }
        _ => DEFAULT_AGE_DAYS,
    }
}

fn registry_supply(entry: &RegistryEntry) -> f64 {
    if entry.supply > 0.0 {
        entry.supply / 10f64.powi(entry.decimals as i32)
    } else {
        0.0
    }
}

fn sanitize_pair(pair: &mut TokenPair) {
    for value in [
        &mut pair.price_usd,
        &mut pair.price_change_h24,
        &mut pair.liquidity_usd,
        &mut pair.volume_h24,
        &mut pair.fdv,
        &mut pair.market_cap,
    ] {
        if !value.is_finite() {
            *value = 0.0;
        }
    }
}
