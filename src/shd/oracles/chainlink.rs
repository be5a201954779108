use std::sync::Arc;

use alloy::{
    eips::{BlockId, BlockNumberOrTag},
    network::Ethereum,
    primitives::{Address, I256},
    providers::{Provider, RootProvider},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use futures::future::join_all;

use super::PriceSource;
use crate::{pairs::TradingPair, sol::IAggregatorV3};

/// Latest round reported by a Chainlink aggregator
#[derive(Debug, Clone)]
pub struct FeedRound {
    pub feed: Address,
    pub description: String,
    pub decimals: u8,
    pub round_id: u128,
    pub answer: f64, // Scaled by the feed decimals
    pub updated_at: Option<DateTime<Utc>>,
}

impl FeedRound {
    pub fn age_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        self.updated_at.map(|t| (now - t).num_seconds())
    }

    /// A round without a usable timestamp is always stale
    pub fn is_stale(&self, now: DateTime<Utc>, max_age_secs: u64) -> bool {
        match self.age_secs(now) {
            Some(age) => age > max_age_secs as i64,
            None => true,
        }
    }
}

/// Converts a raw aggregator answer into a decimal price
pub fn scale_answer(answer: I256, decimals: u8) -> f64 {
    answer.to_string().parse::<f64>().unwrap_or(0.0) / 10_f64.powi(decimals as i32)
}

pub struct ChainlinkFeed {
    provider: Arc<RootProvider<Ethereum>>,
    // Block reads are pinned to, latest when None
    block: Option<u64>,
}

impl ChainlinkFeed {
    pub fn new(provider: Arc<RootProvider<Ethereum>>) -> Self {
        Self { provider, block: None }
    }

    pub fn at_block(mut self, block: Option<u64>) -> Self {
        self.block = block;
        self
    }

    fn block_id(&self) -> BlockId {
        match self.block {
            Some(number) => BlockId::number(number),
            None => BlockId::latest(),
        }
    }

    /// Timestamp of the block reads are made at, used as "now" for staleness checks
    pub async fn block_timestamp(&self) -> Result<DateTime<Utc>> {
        let tag = match self.block {
            Some(number) => BlockNumberOrTag::Number(number),
            None => BlockNumberOrTag::Latest,
        };
        let block = self.provider.get_block_by_number(tag).await?.ok_or_else(|| eyre::eyre!("Block {} not found", tag))?;
        DateTime::from_timestamp(block.header.timestamp as i64, 0).ok_or_else(|| eyre::eyre!("Invalid timestamp for block {}", tag))
    }

    pub async fn latest_round(&self, feed: Address) -> Result<FeedRound> {
        let aggregator = IAggregatorV3::new(feed, self.provider.clone());
        let block = self.block_id();

        let decimals = aggregator.decimals().block(block).call().await?;
        let description = aggregator.description().block(block).call().await?;
        let round = aggregator.latestRoundData().block(block).call().await?;

        if round.answer <= I256::ZERO {
            return Err(eyre::eyre!("Feed 0x{:x} returned a non-positive answer: {}", feed, round.answer));
        }

        let updated_at = u64::try_from(round.updatedAt).ok().and_then(|secs| DateTime::from_timestamp(secs as i64, 0));

        Ok(FeedRound {
            feed,
            description,
            decimals,
            round_id: round.roundId.to::<u128>(),
            answer: scale_answer(round.answer, decimals),
            updated_at,
        })
    }

    /// Reads the latest round of every pair concurrently, keeping table order
    pub async fn read_rounds(&self, pairs: &[TradingPair]) -> Vec<(String, Result<FeedRound>)> {
        let reads = pairs.iter().map(|pair| async move {
            let round = match pair.feed_address() {
                Some(feed) => self.latest_round(feed).await,
                None => Err(eyre::eyre!("Invalid feed address '{}' for {}", pair.price_feed_address, pair.symbol)),
            };
            (pair.symbol.clone(), round)
        });
        join_all(reads).await
    }

    /// Reads every pair's feed once; the snapshot then serves both staleness and price checks
    pub async fn snapshot(&self, pairs: &[TradingPair]) -> FeedSnapshot {
        let rounds = self
            .read_rounds(pairs)
            .await
            .into_iter()
            .map(|(symbol, round)| (symbol, round.map_err(|e| format!("{:#}", e))))
            .collect();
        FeedSnapshot::new(rounds)
    }
}

/// Rounds already read from the feeds, keyed by pair symbol in table order
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    rounds: Vec<(String, std::result::Result<FeedRound, String>)>,
}

impl FeedSnapshot {
    pub fn new(rounds: Vec<(String, std::result::Result<FeedRound, String>)>) -> Self {
        Self { rounds }
    }

    pub fn rounds(&self) -> impl Iterator<Item = (&str, &std::result::Result<FeedRound, String>)> {
        self.rounds.iter().map(|(symbol, round)| (symbol.as_str(), round))
    }

    pub fn get(&self, symbol: &str) -> Option<&std::result::Result<FeedRound, String>> {
        self.rounds.iter().find(|(s, _)| s.eq_ignore_ascii_case(symbol)).map(|(_, round)| round)
    }
}

#[async_trait]
impl PriceSource for FeedSnapshot {
    fn name(&self) -> &str {
        "chainlink"
    }

    async fn price_in_eth(&self, pair: &TradingPair) -> Result<f64> {
        let round = match self.get(&pair.symbol) {
            Some(Ok(round)) => round,
            Some(Err(e)) => return Err(eyre::eyre!("{}", e)),
            None => return Err(eyre::eyre!("No round read for {}", pair.symbol)),
        };
        let expected = pair.feed_description();
        if round.description != expected {
            tracing::warn!("🔺 Feed {} reports '{}', expected '{}'", pair.format_log_info(), round.description, expected);
        }
        tracing::debug!("Chainlink {}: {:.10} ETH (round {})", pair.pair_label, round.answer, round.round_id);
        Ok(round.answer)
    }
}
