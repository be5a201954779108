// Price sources used to validate the pair table

pub mod chainlink;

pub use chainlink::{ChainlinkFeed, FeedRound, FeedSnapshot};

use async_trait::async_trait;
use eyre::Result;

use crate::pairs::TradingPair;

/// Anything able to price the token of a pair in ETH
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Price of one token of the pair, expressed in ETH
    async fn price_in_eth(&self, pair: &TradingPair) -> Result<f64>;
}
