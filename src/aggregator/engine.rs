/// Aggregation pipeline
///
/// One pass: fetch the candidate universe from the registry, cap it, enrich
/// tokens in sequential batches (all-settle inside each batch), score them
/// and publish progressively to the store. A per-token failure drops only
/// that token; a universe fetch failure fails the whole pass and leaves the
/// previous token set intact.
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::apis::social::fallback_social_metrics;
use crate::apis::ApiManager;
use crate::config::with_config;
use crate::dashboard::{self, TokenQuery};
use crate::logger::{self, LogTag};
use crate::scoring;
use crate::tokens::normalizer::{self, normalize_onchain};
use crate::tokens::types::{RegistryEntry, ScoredToken, SocialMetrics, TokenIdentity, TokenPair};

use super::store::{global_store, TokenStore};

/// Registry tag used to supplement a thin universe
const TRENDING_TAG: &str = "birdeye-trending";

/// Mints resolved from the tradable list when the registry is down
const TRADABLE_FALLBACK_LIMIT: usize = 20;

/// Select the candidate universe: tokens whose address contains "pump"
/// (case-insensitive) or carrying a "meme" tag
pub fn select_universe(tokens: Vec<RegistryEntry>) -> Vec<RegistryEntry> {
    tokens
        .into_iter()
        .filter(|t| {
            t.address.to_lowercase().contains("pump") || t.tags.iter().any(|tag| tag == "meme")
        })
        .collect()
}

/// Fetch the universe, supplementing with trending tokens when the primary
/// selection is too thin. The trending call failing is not fatal. A registry
/// listing failure falls back to resolving the tradable mint list; only when
/// that fails too does the pass error out.
async fn fetch_universe(manager: &ApiManager) -> Result<Vec<RegistryEntry>, String> {
    let min_universe_size = with_config(|cfg| cfg.aggregator.min_universe_size);

    let all = match manager.jupiter.fetch_all_tokens().await {
        Ok(all) => all,
        Err(e) => {
            logger::warning(
                LogTag::Aggregator,
                &format!("Registry listing failed, trying tradable mints: {}", e),
            );
            return fallback_universe(manager)
                .await
                .map_err(|fallback_err| {
                    format!("Universe fetch failed: {} (fallback: {})", e, fallback_err)
                });
        }
    };

    let mut universe = select_universe(all);
    logger::info(
        LogTag::Aggregator,
        &format!("Universe selected: candidates={}", universe.len()),
    );

    if universe.len() < min_universe_size {
        match manager.jupiter.fetch_tagged(TRENDING_TAG).await {
            Ok(trending) => {
                for entry in trending {
                    if !universe.iter().any(|t| t.address == entry.address) {
                        universe.push(entry);
                    }
                }
                logger::info(
                    LogTag::Aggregator,
                    &format!(
                        "Universe supplemented from trending: candidates={}",
                        universe.len()
                    ),
                );
            }
            Err(e) => {
                logger::warning(
                    LogTag::Aggregator,
                    &format!("Trending supplement failed: {}", e),
                );
            }
        }
    }

    Ok(universe)
}

/// Resolve a small universe from the tradable mint list
///
/// Each mint is looked up individually; lookup failures and mints the
/// registry does not know are dropped. The result skips the pump/meme
/// selection since these are the only candidates available.
async fn fallback_universe(manager: &ApiManager) -> Result<Vec<RegistryEntry>, String> {
    let mints = manager
        .jupiter
        .fetch_tradable_mints()
        .await
        .map_err(|e| e.to_string())?;

    let lookups = join_all(
        mints
            .iter()
            .take(TRADABLE_FALLBACK_LIMIT)
            .map(|mint| manager.jupiter.fetch_token(mint)),
    )
    .await;

    let universe = collect_resolved_entries(lookups);
    logger::info(
        LogTag::Aggregator,
        &format!("Universe from tradable mints: candidates={}", universe.len()),
    );
    Ok(universe)
}

/// Keep successfully resolved entries, dropping failures and unknown mints
fn collect_resolved_entries<E>(
    lookups: Vec<Result<Option<RegistryEntry>, E>>,
) -> Vec<RegistryEntry> {
    lookups
        .into_iter()
        .filter_map(|result| result.ok().flatten())
        .collect()
}

/// Assemble a scored token from its normalized inputs
pub fn build_scored_token(
    entry: &RegistryEntry,
    pairs: Vec<TokenPair>,
    holders: u64,
    social: SocialMetrics,
    now: DateTime<Utc>,
) -> ScoredToken {
    let name = normalizer::display_name(entry, &pairs);
    let record = normalize_onchain(entry, pairs, holders, now);

    let on_chain_score = scoring::on_chain_death_score(&record.onchain);
    let social_score = scoring::social_death_score(&social);
    let (death_score, recovery_value) =
        scoring::total_score(on_chain_score, social_score, &record.onchain);
    let is_dead = scoring::is_dead_coin(&record.onchain);

    ScoredToken {
        identity: TokenIdentity {
            address: entry.address.clone(),
            name,
            chain: "Solana".to_string(),
            logo_uri: entry.logo_uri.clone(),
            tags: entry.tags.clone(),
        },
        onchain: record.onchain,
        social,
        raw_pairs: record.pairs,
        on_chain_death_score: on_chain_score,
        social_death_score: social_score,
        death_score,
        recovery_value,
        is_dead,
        last_updated: now,
    }
}

/// Enrich one token: pairs are required, holder count and social counters
/// degrade to their documented defaults
async fn enrich_token(manager: &ApiManager, entry: RegistryEntry) -> Result<ScoredToken, String> {
    let pairs = manager
        .dexscreener
        .fetch_token_pairs(&entry.address)
        .await
        .map_err(|e| format!("{}: {}", entry.address, e))?;

    let holders = match manager.solscan.fetch_holder_count(&entry.address).await {
        Ok(count) => count,
        Err(e) => {
            logger::debug(
                LogTag::Aggregator,
                &format!("Holder count unavailable: address={} error={}", entry.address, e),
            );
            0
        }
    };

    let social = match manager.social.fetch_social_metrics(&entry.symbol).await {
        Ok(metrics) => metrics,
        Err(e) => {
            logger::debug(
                LogTag::Aggregator,
                &format!("Social stats unavailable: symbol={} error={}", entry.symbol, e),
            );
            fallback_social_metrics()
        }
    };

    Ok(build_scored_token(&entry, pairs, holders, social, Utc::now()))
}

/// Enrich entries in sequential batches, publishing after every batch
///
/// Within a batch all futures are awaited to completion (all-settle); a
/// failed token is logged and dropped without affecting its siblings.
/// Returns early when the store reports the generation superseded.
pub async fn run_batches<F, Fut>(
    store: &TokenStore,
    generation: u64,
    entries: Vec<RegistryEntry>,
    batch_size: usize,
    enrich: F,
) -> Vec<ScoredToken>
where
    F: Fn(RegistryEntry) -> Fut,
    Fut: Future<Output = Result<ScoredToken, String>>,
{
    let batch_size = batch_size.max(1);
    let mut collected: Vec<ScoredToken> = Vec::with_capacity(entries.len());

    for batch in entries.chunks(batch_size) {
        let results = join_all(batch.iter().cloned().map(&enrich)).await;

        for result in results {
            match result {
                Ok(token) => collected.push(token),
                Err(e) => {
                    logger::warning(LogTag::Aggregator, &format!("Token enrichment failed: {}", e));
                }
            }
        }

        // Progressive delivery: partial results are visible immediately
        if !store.publish(generation, collected.clone()).await {
            logger::info(
                LogTag::Aggregator,
                &format!("Pass superseded, stopping: generation={}", generation),
            );
            break;
        }
    }

    collected
}

/// Run one full aggregation pass against the global store
pub async fn refresh(manager: &ApiManager) -> Result<usize, String> {
    let store = global_store();
    let (max_tokens, batch_size) = with_config(|cfg| {
        (
            cfg.aggregator.max_tokens_per_cycle,
            cfg.aggregator.batch_size,
        )
    });

    let generation = store.begin_refresh().await;
    logger::info(
        LogTag::Aggregator,
        &format!("Starting aggregation pass: generation={}", generation),
    );

    let mut universe = match fetch_universe(manager).await {
        Ok(universe) => universe,
        Err(e) => {
            logger::error(LogTag::Aggregator, &e);
            store.finish(generation, Err(e.clone())).await;
            return Err(e);
        }
    };
    universe.truncate(max_tokens);

    let collected = run_batches(&store, generation, universe, batch_size, |entry| {
        enrich_token(manager, entry)
    })
    .await;

    let count = collected.len();
    store.finish(generation, Ok(())).await;
    logger::info(
        LogTag::Aggregator,
        &format!(
            "Aggregation pass complete: generation={} tokens={}",
            generation, count
        ),
    );

    Ok(count)
}

/// Log page 1 of the dead token ranking
pub async fn log_ranked_summary() {
    let tokens = global_store().tokens().await;
    let ranked = dashboard::filter_and_sort(&tokens, &TokenQuery::default());
    let page_size = dashboard::page_size();
    let page = dashboard::paginate(&ranked, 1, page_size);

    logger::info(
        LogTag::Dashboard,
        &format!(
            "Ranking: dead_tokens={} pages={}",
            ranked.len(),
            dashboard::total_pages(ranked.len(), page_size)
        ),
    );

    for (i, token) in page.iter().enumerate() {
        logger::info(
            LogTag::Dashboard,
            &format!(
                "#{:<3} {:<12} death={:<5.1} recovery={:.2} liquidity=${} volume=${}",
                i + 1,
                token.identity.name,
                token.death_score,
                token.recovery_value,
                dashboard::format_number(token.onchain.liquidity_usd),
                dashboard::format_number(token.onchain.volume_24h),
            ),
        );
    }
}

/// Periodic refresh service; runs until the store is torn down
pub async fn run_refresh_service(manager: Arc<ApiManager>) {
    let interval_secs = with_config(|cfg| cfg.aggregator.refresh_interval_secs);
    let store = global_store();

    logger::info(
        LogTag::Aggregator,
        &format!("Refresh service started: interval={}s", interval_secs),
    );

    loop {
        tokio::select! {
            _ = store.wait_for_teardown() => {
                logger::info(LogTag::Aggregator, "Refresh service stopping");
                break;
            }
            _ = tokio::time::sleep(std::time::Duration::from_secs(interval_secs)) => {
                match refresh(&manager).await {
                    Ok(_) => log_ranked_summary().await,
                    Err(e) => {
                        logger::warning(
                            LogTag::Aggregator,
                            &format!("Periodic refresh failed: {}", e),
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::types::SentimentBreakdown;

    fn entry(address: &str, tags: &[&str]) -> RegistryEntry {
        RegistryEntry {
            address: address.to_string(),
            name: address.to_string(),
            symbol: address.to_string(),
            decimals: 9,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            logo_uri: None,
            supply: 0.0,
            created_at: None,
        }
    }

    fn pair(liquidity: f64, volume: f64, market_cap: f64) -> TokenPair {
        TokenPair {
            pair_address: "PAIR".to_string(),
            base_name: String::new(),
            base_symbol: String::new(),
            price_usd: 0.001,
            price_change_h24: -20.0,
            liquidity_usd: liquidity,
            volume_h24: volume,
            fdv: 0.0,
            market_cap,
            txns_h24: 5,
            pair_created_at: None,
        }
    }

    fn quiet_social() -> SocialMetrics {
        SocialMetrics {
            twitter_volume_24h: 0.0,
            reddit_posts_24h: 0.0,
            discord_messages_24h: 0.0,
            telegram_messages_24h: 0.0,
            sentiment: SentimentBreakdown::default(),
        }
    }

    #[test]
    fn resolved_entries_drop_failures_and_unknown_mints() {
        let lookups: Vec<Result<Option<RegistryEntry>, String>> = vec![
            Ok(Some(entry("MINT1", &[]))),
            Ok(None),
            Err("lookup failed".to_string()),
            Ok(Some(entry("MINT2", &[]))),
        ];

        let entries = collect_resolved_entries(lookups);
        let addresses: Vec<&str> = entries.iter().map(|t| t.address.as_str()).collect();
        assert_eq!(addresses, vec!["MINT1", "MINT2"]);
    }

    #[test]
    fn universe_matches_pump_addresses_and_meme_tags() {
        let tokens = vec![
            entry("abcPUMPxyz", &[]),
            entry("MINT1", &["meme"]),
            entry("MINT2", &["defi"]),
            entry("MINT3", &[]),
        ];

        let universe = select_universe(tokens);
        let addresses: Vec<&str> = universe.iter().map(|t| t.address.as_str()).collect();
        assert_eq!(addresses, vec!["abcPUMPxyz", "MINT1"]);
    }

    #[tokio::test]
    async fn batch_failures_drop_only_failed_tokens() {
        let store = TokenStore::new();
        let generation = store.begin_refresh().await;

        let entries: Vec<RegistryEntry> =
            (0..10).map(|i| entry(&format!("MINT{}", i), &["meme"])).collect();

        let collected = run_batches(&store, generation, entries, 10, |e| async move {
            // Two of ten fail
            if e.address == "MINT3" || e.address == "MINT7" {
                Err(format!("{}: simulated upstream failure", e.address))
            } else {
                Ok(build_scored_token(
                    &e,
                    vec![pair(50_000.0, 100.0, 80_000.0)],
                    0,
                    quiet_social(),
                    Utc::now(),
                ))
            }
        })
        .await;

        assert_eq!(collected.len(), 8);
        assert_eq!(store.tokens().await.len(), 8);
    }

    #[tokio::test]
    async fn batches_publish_progressively() {
        let store = TokenStore::new();
        let generation = store.begin_refresh().await;

        let entries: Vec<RegistryEntry> =
            (0..4).map(|i| entry(&format!("MINT{}", i), &["meme"])).collect();

        run_batches(&store, generation, entries, 2, |e| async move {
            Ok(build_scored_token(
                &e,
                vec![pair(50_000.0, 100.0, 80_000.0)],
                0,
                quiet_social(),
                Utc::now(),
            ))
        })
        .await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.tokens.len(), 4);
        assert!(snapshot.last_updated.is_some());
    }

    #[tokio::test]
    async fn superseded_generation_stops_the_pass() {
        let store = TokenStore::new();
        let old_generation = store.begin_refresh().await;
        store.begin_refresh().await;

        let entries: Vec<RegistryEntry> =
            (0..4).map(|i| entry(&format!("MINT{}", i), &["meme"])).collect();

        let collected = run_batches(&store, old_generation, entries, 2, |e| async move {
            Ok(build_scored_token(&e, Vec::new(), 0, quiet_social(), Utc::now()))
        })
        .await;

        // First publish is rejected, so only one batch was processed
        assert_eq!(collected.len(), 2);
        assert!(store.tokens().await.is_empty());
    }

    #[tokio::test]
    async fn end_to_end_filtering_scenario() {
        // A: too liquid to be dead. B: dead with zero volume. C: dust.
        let store = TokenStore::new();
        let generation = store.begin_refresh().await;

        let inputs = vec![
            (entry("A", &["meme"]), pair(500_000.0, 1_000.0, 1_000_000.0)),
            (entry("B", &["meme"]), pair(50_000.0, 0.0, 100_000.0)),
            (entry("C", &["meme"]), pair(500.0, 0.0, 1_000.0)),
        ];
        let entries: Vec<RegistryEntry> = inputs.iter().map(|(e, _)| e.clone()).collect();
        let pairs_by_address: std::collections::HashMap<String, TokenPair> = inputs
            .into_iter()
            .map(|(e, p)| (e.address.clone(), p))
            .collect();

        let collected = run_batches(&store, generation, entries, 10, |e| {
            let pair = pairs_by_address.get(&e.address).cloned().unwrap();
            async move {
                Ok(build_scored_token(&e, vec![pair], 0, quiet_social(), Utc::now()))
            }
        })
        .await;
        store.finish(generation, Ok(())).await;

        assert_eq!(collected.len(), 3);

        let visible = crate::dashboard::filter_and_sort(
            &store.tokens().await,
            &crate::dashboard::TokenQuery::default(),
        );
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].identity.address, "B");
        assert!(visible[0].death_score > 0.0);
    }
}
