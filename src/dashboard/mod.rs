//! Dashboard query layer
//!
//! Pure filter/sort/paginate functions over scored tokens, plus the display
//! helpers the dashboard uses for rendering. No state lives here; callers
//! pass the store snapshot in.

use crate::config::with_config;
use crate::scoring::{is_dead_coin, DUST_LIQUIDITY_FLOOR_USD};
use crate::tokens::types::ScoredToken;

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Chain,
    Liquidity,
    Volume,
    Holders,
    PriceChange,
    DeathScore,
    RecoveryValue,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortField::Name),
            "chain" => Some(SortField::Chain),
            "liquidity" => Some(SortField::Liquidity),
            "volume" => Some(SortField::Volume),
            "holders" => Some(SortField::Holders),
            "priceChange" => Some(SortField::PriceChange),
            "deathScore" => Some(SortField::DeathScore),
            "recoveryValue" => Some(SortField::RecoveryValue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Query parameters for one dashboard view
#[derive(Debug, Clone)]
pub struct TokenQuery {
    /// Chain filter, None = all chains
    pub chain: Option<String>,
    /// Case-insensitive substring match on name/address/chain
    pub search: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Default for TokenQuery {
    fn default() -> Self {
        Self {
            chain: None,
            search: None,
            sort_field: SortField::DeathScore,
            sort_direction: SortDirection::Desc,
        }
    }
}

/// Apply the dead-coin classification, dust floor and user filters, then
/// sort by the requested column (stable sort)
pub fn filter_and_sort(tokens: &[ScoredToken], query: &TokenQuery) -> Vec<ScoredToken> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<ScoredToken> = tokens
        .iter()
        .filter(|t| {
            if !t.is_dead {
                return false;
            }
            // Needs at least some liquidity to be tradeable
            if t.onchain.liquidity_usd < DUST_LIQUIDITY_FLOOR_USD {
                return false;
            }
            if let Some(chain) = &query.chain {
                if &t.identity.chain != chain {
                    return false;
                }
            }
            if let Some(term) = &search {
                return t.identity.name.to_lowercase().contains(term)
                    || t.identity.address.to_lowercase().contains(term)
                    || t.identity.chain.to_lowercase().contains(term);
            }
            true
        })
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = match query.sort_field {
            SortField::Name => a.identity.name.cmp(&b.identity.name),
            SortField::Chain => a.identity.chain.cmp(&b.identity.chain),
            SortField::Liquidity => cmp_f64(a.onchain.liquidity_usd, b.onchain.liquidity_usd),
            SortField::Volume => cmp_f64(a.onchain.volume_24h, b.onchain.volume_24h),
            SortField::Holders => a.onchain.holders.cmp(&b.onchain.holders),
            SortField::PriceChange => cmp_f64(a.onchain.price_change_24h, b.onchain.price_change_24h),
            SortField::DeathScore => cmp_f64(a.death_score, b.death_score),
            SortField::RecoveryValue => cmp_f64(a.recovery_value, b.recovery_value),
        };
        match query.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    filtered
}

fn cmp_f64(a: f64, b: f64) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}

/// Configured page size
pub fn page_size() -> usize {
    with_config(|cfg| cfg.dashboard.page_size)
}

/// Number of pages for a result set (0 when empty)
pub fn total_pages(result_count: usize, page_size: usize) -> usize {
    if result_count == 0 || page_size == 0 {
        0
    } else {
        (result_count + page_size - 1) / page_size
    }
}

/// One page of results, 1-based page number, out-of-range pages clamped
pub fn paginate(tokens: &[ScoredToken], page: usize, page_size: usize) -> &[ScoredToken] {
    if tokens.is_empty() || page_size == 0 {
        return &[];
    }

    let total = total_pages(tokens.len(), page_size);
    let page = page.clamp(1, total);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(tokens.len());
    &tokens[start..end]
}

/// Up to 5 page-button numbers centered on the current page, clamped at
/// both ends
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }

    let count = total_pages.min(5);
    (0..count)
        .map(|i| {
            if total_pages <= 5 || current_page <= 3 {
                i + 1
            } else if current_page >= total_pages - 2 {
                total_pages - 4 + i
            } else {
                current_page - 2 + i
            }
        })
        .collect()
}

/// Recovery stars: recovery value clamped to [0, 1], mapped to 0-5 stars
pub fn recovery_stars(recovery_value: f64) -> u8 {
    (recovery_value.clamp(0.0, 1.0) * 5.0).round() as u8
}

/// Human-readable number with K/M/B suffixes
pub fn format_number(num: f64) -> String {
    if num == 0.0 || !num.is_finite() {
        "0".to_string()
    } else if num < 1.0 {
        format!("{:.6}", num)
    } else if num < 1_000.0 {
        format!("{:.2}", num)
    } else if num < 1_000_000.0 {
        format!("{:.2}K", num / 1_000.0)
    } else if num < 1_000_000_000.0 {
        format!("{:.2}M", num / 1_000_000.0)
    } else {
        format!("{:.2}B", num / 1_000_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::types::{OnChainMetrics, SocialMetrics, TokenIdentity};
    use chrono::Utc;

    fn token(name: &str, liquidity: f64, death_score: f64) -> ScoredToken {
        ScoredToken {
            identity: TokenIdentity {
                address: format!("{}pump", name.to_lowercase()),
                name: name.to_string(),
                chain: "Solana".to_string(),
                logo_uri: None,
                tags: Vec::new(),
            },
            onchain: OnChainMetrics {
                liquidity_usd: liquidity,
                ..OnChainMetrics::default()
            },
            social: SocialMetrics::default(),
            raw_pairs: Vec::new(),
            on_chain_death_score: death_score,
            social_death_score: death_score,
            death_score,
            recovery_value: 0.1,
            is_dead: liquidity < crate::scoring::DEAD_LIQUIDITY_THRESHOLD_USD,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn filter_drops_alive_and_dust_tokens() {
        let tokens = vec![
            token("ALIVE", 500_000.0, 10.0),
            token("DEAD", 50_000.0, 80.0),
            token("DUST", 500.0, 95.0),
        ];

        let result = filter_and_sort(&tokens, &TokenQuery::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].identity.name, "DEAD");
    }

    #[test]
    fn search_matches_name_address_and_chain() {
        let tokens = vec![token("BONK", 50_000.0, 80.0), token("WIF", 60_000.0, 70.0)];

        let by_name = filter_and_sort(
            &tokens,
            &TokenQuery {
                search: Some("bonk".to_string()),
                ..TokenQuery::default()
            },
        );
        assert_eq!(by_name.len(), 1);

        let by_chain = filter_and_sort(
            &tokens,
            &TokenQuery {
                search: Some("SOLANA".to_string()),
                ..TokenQuery::default()
            },
        );
        assert_eq!(by_chain.len(), 2);
    }

    #[test]
    fn sort_directions_are_honored() {
        let tokens = vec![
            token("A", 50_000.0, 60.0),
            token("B", 40_000.0, 90.0),
            token("C", 30_000.0, 75.0),
        ];

        let desc = filter_and_sort(&tokens, &TokenQuery::default());
        assert_eq!(desc[0].identity.name, "B");
        assert_eq!(desc[2].identity.name, "A");

        let asc = filter_and_sort(
            &tokens,
            &TokenQuery {
                sort_field: SortField::Liquidity,
                sort_direction: SortDirection::Asc,
                ..TokenQuery::default()
            },
        );
        assert_eq!(asc[0].identity.name, "C");
    }

    #[test]
    fn pagination_slices_and_clamps() {
        let tokens: Vec<ScoredToken> = (0..45)
            .map(|i| token(&format!("T{:02}", i), 50_000.0, 50.0))
            .collect();

        assert_eq!(total_pages(45, 20), 3);

        let page1 = paginate(&tokens, 1, 20);
        assert_eq!(page1.len(), 20);
        assert_eq!(page1[0].identity.name, "T00");

        let page3 = paginate(&tokens, 3, 20);
        assert_eq!(page3.len(), 5);
        assert_eq!(page3[0].identity.name, "T40");

        // Out-of-range pages clamp to the nearest valid page
        assert_eq!(paginate(&tokens, 99, 20).len(), 5);
        assert_eq!(paginate(&tokens, 0, 20).len(), 20);
        assert!(paginate(&[], 1, 20).is_empty());
    }

    #[test]
    fn page_window_centers_and_clamps() {
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(2, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(9, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn recovery_stars_clamp_above_one() {
        assert_eq!(recovery_stars(0.1), 1);
        assert_eq!(recovery_stars(0.5), 3);
        assert_eq!(recovery_stars(1.0), 5);
        // Stored values can exceed 1.0; display clamps
        assert_eq!(recovery_stars(1.5), 5);
    }

    #[test]
    fn number_formatting_suffixes() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(0.000042), "0.000042");
        assert_eq!(format_number(42.5), "42.50");
        assert_eq!(format_number(52_000.0), "52.00K");
        assert_eq!(format_number(2_500_000.0), "2.50M");
        assert_eq!(format_number(3_000_000_000.0), "3.00B");
    }
}
