use std::sync::Arc;

use alloy::{network::Ethereum, providers::RootProvider};
use eyre::Result;
use serde::Serialize;
use shd::{
    dex::UniswapV3Pools,
    misc::{self, format_address_link},
    oracles::ChainlinkFeed,
    pairs::{PairStats, TradingPair, find_by_symbol, pair_labels, print_pairs, validate_pairs},
    types::{EnvConfig, PairsConfig, load_pairs_config},
    validation::check_pairs,
};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TableExport<'a> {
    pairs: &'a [TradingPair],
    pair_labels: Vec<String>,
    pair_stats: PairStats,
}

/// Cross-checks every Chainlink feed against its Uniswap V3 pool
async fn validate_oracles(config: &PairsConfig, env: &EnvConfig, pairs: &[TradingPair]) -> Result<bool> {
    let provider = match config.rpc_endpoint(Some(env)).parse() {
        Ok(parsed) => Arc::new(RootProvider::<Ethereum>::new_http(parsed)),
        Err(e) => {
            tracing::error!("Failed to parse RPC URL: {}", e);
            return Ok(false);
        }
    };
    let current = misc::block(&*provider).await?;
    let block = config.validation.block_number();
    tracing::info!("🚀 Connected to {} at block #{}", config.global.network_name, current);

    let chainlink = ChainlinkFeed::new(provider.clone()).at_block(block);
    let tokens: Vec<_> = pairs
        .iter()
        .filter_map(|p| config.token_address(&p.symbol).map(|address| (p.symbol.clone(), address)))
        .collect();
    if tokens.len() < pairs.len() {
        tracing::warn!("Only {}/{} pairs have a token address configured", tokens.len(), pairs.len());
    }
    let uniswap = UniswapV3Pools::new(provider.clone(), config.factory_address()?, config.weth_address()?)
        .with_tokens(tokens)
        .at_block(block);

    // Feed freshness, relative to the block being read
    let now = chainlink.block_timestamp().await?;
    let max_age = config.validation.max_feed_age_secs;
    let snapshot = chainlink.snapshot(pairs).await;
    for (symbol, round) in snapshot.rounds() {
        match round {
            Ok(round) if round.is_stale(now, max_age) => {
                tracing::warn!("⏳ {} feed is stale: last update {:?} ({} s old)", symbol, round.updated_at, round.age_secs(now).unwrap_or_default());
            }
            Ok(round) => tracing::debug!("{} feed updated {} s ago", symbol, round.age_secs(now).unwrap_or_default()),
            Err(e) => tracing::warn!("Failed to read {} feed: {}", symbol, e),
        }
    }

    let report = check_pairs(&snapshot, &uniswap, pairs, config.validation.tolerance(), block).await;
    report.print();
    for check in report.failed() {
        if let Some(feed) = find_by_symbol(pairs, &check.symbol).and_then(|pair| pair.feed_address()) {
            tracing::warn!("   {} feed: {}", check.pair_label, format_address_link(&config.global.explorer_base_url, &feed));
        }
    }

    Ok(report.is_success())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber and load configurations
    let filter = EnvFilter::from_default_env();
    fmt()
        .with_max_level(Level::TRACE)
        .with_env_filter(filter)
        .init();
    dotenv::from_filename("config/.env").ok();
    let env = EnvConfig::new();
    tracing::info!("Loading configuration from: {}", env.config_path);
    let config = match load_pairs_config(&env.config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let pairs = config.load_pairs()?;
    if let Err(e) = validate_pairs(&pairs) {
        tracing::error!("Pair table is invalid: {}", e);
        std::process::exit(1);
    }
    tracing::info!("✅ {} pairs passed table checks", pairs.len());

    print_pairs(&pairs);
    let stats = PairStats::from_pairs(&pairs);
    stats.print();
    let labels = pair_labels(&pairs);
    tracing::info!("Pairs: {}", labels.join(", "));

    if let Some(file) = &config.table.export_file {
        let export = TableExport {
            pairs: &pairs,
            pair_labels: labels,
            pair_stats: stats,
        };
        misc::save(&export, file)?;
        tracing::info!("💾 Table exported to {}", file);
    }

    if !config.validation.enabled {
        tracing::info!("Oracle validation disabled, done");
        return Ok(());
    }

    if !validate_oracles(&config, &env, &pairs).await? {
        tracing::error!("Oracle validation failed");
        std::process::exit(1);
    }
    tracing::info!("✅ All pairs within oracle tolerance");
    Ok(())
}
