//! Scoring engine
//!
//! Pure functions computing the composite death score and recovery value.
//! The weights and thresholds are exact contracts; zero-valued records take
//! the full penalty on every ratio term instead of producing NaN.

use crate::tokens::types::{OnChainMetrics, SocialMetrics};

/// A token is classified dead strictly below this liquidity
pub const DEAD_LIQUIDITY_THRESHOLD_USD: f64 = 200_000.0;

/// Tokens below this liquidity are dust and excluded at the query layer
pub const DUST_LIQUIDITY_FLOOR_USD: f64 = 1_000.0;

/// Combined score weights
const ON_CHAIN_WEIGHT: f64 = 0.7;
const SOCIAL_WEIGHT: f64 = 0.3;

/// On-chain death score in [0, 100]; higher = more dead
///
/// Components: market cap decline from peak (40), liquidity relative to
/// market cap (20), volume relative to market cap (20), holder outflow (20).
pub fn on_chain_death_score(m: &OnChainMetrics) -> f64 {
    let mut score = 0.0;

    // Market cap decline from peak; a zero-cap record is a full decline
    let decline = if m.peak_market_cap > 0.0 {
        1.0 - m.current_market_cap / m.peak_market_cap
    } else {
        1.0
    };
    score += decline * 40.0;

    // Low liquidity relative to market cap; zero cap takes the full penalty
    let liquidity_ratio = if m.current_market_cap > 0.0 {
        m.liquidity_usd / m.current_market_cap
    } else {
        0.0
    };
    score += (1.0 - (liquidity_ratio * 10.0).min(1.0)) * 20.0;

    // Low trading volume
    let volume_ratio = if m.current_market_cap > 0.0 {
        m.volume_24h / m.current_market_cap
    } else {
        0.0
    };
    score += (1.0 - (volume_ratio * 50.0).min(1.0)) * 20.0;

    // Holder change rate (negative = losing holders)
    score += (-m.holder_change_rate).max(0.0) * 20.0;

    score.clamp(0.0, 100.0)
}

/// Social death score in [0, 100]; higher = more dead
pub fn social_death_score(s: &SocialMetrics) -> f64 {
    let mut score = 0.0;

    score += (1.0 - (s.twitter_volume_24h / 1000.0).min(1.0)) * 30.0;
    score += (1.0 - (s.reddit_posts_24h / 10.0).min(1.0)) * 20.0;
    score += (1.0 - (s.discord_messages_24h / 100.0).min(1.0)) * 20.0;
    score += (1.0 - (s.telegram_messages_24h / 200.0).min(1.0)) * 10.0;
    score += s.sentiment.negative * 20.0;

    score.clamp(0.0, 100.0)
}

/// Combined death score and recovery value
///
/// The recovery value has a floor of 0.1 and no ceiling; values above 1.0
/// are possible and the display layer clamps for star rendering only.
pub fn total_score(on_chain_score: f64, social_score: f64, m: &OnChainMetrics) -> (f64, f64) {
    let death_score = on_chain_score * ON_CHAIN_WEIGHT + social_score * SOCIAL_WEIGHT;

    let market_cap_ratio = if m.current_market_cap > 0.0 {
        m.peak_market_cap / m.current_market_cap
    } else {
        1.5
    };
    let liquidity_ratio = if m.current_market_cap > 0.0 {
        m.liquidity_usd / m.current_market_cap
    } else {
        0.0
    };

    // Fallen giants with tradeable liquidity recover best
    let mut recovery_value = (market_cap_ratio.min(100.0) / 50.0) * 0.5;
    recovery_value += (liquidity_ratio * 5.0).min(1.0) * 0.3;

    // Bonus for the sweet spot of death score (peaks at 75)
    let death_score_bonus = if death_score > 60.0 && death_score < 90.0 {
        0.2 * (1.0 - (75.0 - death_score).abs() / 15.0)
    } else {
        0.0
    };
    recovery_value += death_score_bonus;

    (death_score, recovery_value.max(0.1))
}

/// Dead classification: strictly below the liquidity threshold
pub fn is_dead_coin(m: &OnChainMetrics) -> bool {
    m.liquidity_usd < DEAD_LIQUIDITY_THRESHOLD_USD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::types::SentimentBreakdown;

    fn metrics(current: f64, peak: f64, liquidity: f64, volume: f64) -> OnChainMetrics {
        OnChainMetrics {
            current_market_cap: current,
            peak_market_cap: peak,
            liquidity_usd: liquidity,
            volume_24h: volume,
            ..OnChainMetrics::default()
        }
    }

    fn social(tw: f64, rd: f64, dc: f64, tg: f64, negative: f64) -> SocialMetrics {
        SocialMetrics {
            twitter_volume_24h: tw,
            reddit_posts_24h: rd,
            discord_messages_24h: dc,
            telegram_messages_24h: tg,
            sentiment: SentimentBreakdown {
                positive: 0.0,
                neutral: 0.0,
                negative,
            },
        }
    }

    #[test]
    fn on_chain_score_stays_in_bounds() {
        let cases = [
            metrics(0.0, 0.0, 0.0, 0.0),
            metrics(100_000.0, 110_000.0, 1_000_000.0, 1_000_000.0),
            metrics(1.0, 1_000_000.0, 0.0, 0.0),
        ];
        for m in &cases {
            let score = on_chain_death_score(m);
            assert!((0.0..=100.0).contains(&score), "score {} out of bounds", score);
        }
    }

    #[test]
    fn zero_record_takes_full_penalties() {
        // Full decline (40) + full liquidity penalty (20) + full volume
        // penalty (20), no holder outflow
        let score = on_chain_death_score(&metrics(0.0, 0.0, 0.0, 0.0));
        assert_eq!(score, 80.0);
    }

    #[test]
    fn healthy_token_scores_low() {
        // No decline beyond the floor, rich liquidity and volume
        let m = metrics(1_000_000.0, 1_100_000.0, 500_000.0, 500_000.0);
        let score = on_chain_death_score(&m);
        // Only the 1.1 floor decline contributes
        assert!((score - 40.0 * (1.0 - 1.0 / 1.1)).abs() < 1e-9);
    }

    #[test]
    fn holder_outflow_adds_points() {
        let mut m = metrics(0.0, 0.0, 0.0, 0.0);
        m.holder_change_rate = -1.0;
        assert_eq!(on_chain_death_score(&m), 100.0);

        m.holder_change_rate = 1.0; // gaining holders adds nothing
        assert_eq!(on_chain_death_score(&m), 80.0);
    }

    #[test]
    fn social_score_bounds_and_extremes() {
        // Completely silent token with max negative sentiment
        let dead = social(0.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(social_death_score(&dead), 100.0);

        // Fully active token with no negativity
        let alive = social(1000.0, 10.0, 100.0, 200.0, 0.0);
        assert_eq!(social_death_score(&alive), 0.0);
    }

    #[test]
    fn death_score_weighting() {
        let m = metrics(100_000.0, 150_000.0, 50_000.0, 10_000.0);
        let (death, _) = total_score(80.0, 40.0, &m);
        assert!((death - (80.0 * 0.7 + 40.0 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn bonus_peaks_at_75_and_vanishes_outside_window() {
        let m = metrics(0.0, 0.0, 0.0, 0.0);
        // on-chain 75/0.7 is awkward; drive death score via weights directly
        let (death, recovery) = total_score(75.0 / 0.7, 0.0, &m);
        assert!((death - 75.0).abs() < 1e-9);
        // mcap ratio fallback 1.5 => 0.015, liquidity 0, bonus 0.2
        assert!((recovery - (1.5 / 50.0 * 0.5 + 0.2)).abs() < 1e-9);

        let (death, recovery) = total_score(50.0 / 0.7, 0.0, &m);
        assert!((death - 50.0).abs() < 1e-9);
        assert!((recovery - (1.5_f64 / 50.0 * 0.5).max(0.1)).abs() < 1e-9);

        let (death, recovery) = total_score(95.0 / 0.7, 0.0, &m);
        assert!((death - 95.0).abs() < 1e-9);
        assert!((recovery - (1.5_f64 / 50.0 * 0.5).max(0.1)).abs() < 1e-9);
    }

    #[test]
    fn recovery_floor_applies() {
        let m = metrics(0.0, 0.0, 0.0, 0.0);
        let (_, recovery) = total_score(0.0, 0.0, &m);
        assert_eq!(recovery, 0.1);
    }

    #[test]
    fn recovery_has_no_ceiling() {
        // Extreme fallen giant with deep liquidity and sweet-spot score
        let m = metrics(1_000.0, 1_000_000.0, 10_000.0, 0.0);
        let (_, recovery) = total_score(75.0 / 0.7, 0.0, &m);
        // 100/50*0.5 + 0.3 + 0.2 = 1.5
        assert!((recovery - 1.5).abs() < 1e-9);
        assert!(recovery > 1.0);
    }

    #[test]
    fn dead_classification_is_strict() {
        assert!(is_dead_coin(&metrics(0.0, 0.0, 199_999.0, 0.0)));
        assert!(!is_dead_coin(&metrics(0.0, 0.0, 200_000.0, 0.0)));
    }
}
