use alloy::primitives::Address;
use thiserror::Error;

/// Authoring errors found when checking a pair table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairError {
    #[error("Entry #{0} has an empty symbol")]
    EmptySymbol(usize),

    #[error("Duplicate symbol '{0}'. Each symbol can only be listed once.")]
    DuplicateSymbol(String),

    #[error("Pair label '{label}' for {symbol} must be of the form '{symbol}/{base}'")]
    MalformedLabel {
        symbol: String,
        label: String,
        base: String,
    },

    #[error("Unknown fee tier {fee} for {symbol} (expected 500, 3000 or 10000)")]
    UnknownFeeTier { symbol: String, fee: u32 },

    #[error("Price feed '{feed}' for {symbol} is not a valid address")]
    MalformedFeed { symbol: String, feed: String },

    #[error("Price feed for {0} cannot be the zero address")]
    ZeroFeed(String),

    #[error("Duplicate price feed {feed} used by {first} and {second}")]
    DuplicateFeed {
        feed: Address,
        first: String,
        second: String,
    },
}
