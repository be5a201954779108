// Production ETH trading pairs and the views derived from them

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::{error::PairError, misc::BASIS_POINT_DENOMINATOR};

/// Asset every pair is quoted against
pub const BASE_ASSET: &str = "ETH";
/// Block at which the table was last validated against the oracles
pub const OPTIMIZED_FOR_BLOCK: u64 = 23_620_206;
/// Maximum oracle vs pool deviation accepted when the table was curated
pub const ORACLE_VALIDATION_TOLERANCE: &str = "5%";

/// Uniswap V3 fee tiers, in the basis points the table lists (500 = 0.05%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum FeeTier {
    /// 0.05%, stablecoins
    Low,
    /// 0.30%, standard pools
    Medium,
    /// 1.00%, volatile or exotic pools
    High,
}

impl FeeTier {
    pub fn bps(&self) -> u32 {
        match self {
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10000,
        }
    }

    /// Fee expressed in percent (500 -> 0.05)
    pub fn percent(&self) -> f64 {
        self.bps() as f64 / BASIS_POINT_DENOMINATOR
    }

    /// Label used as key in the fee distribution
    pub fn label(&self) -> &'static str {
        match self {
            FeeTier::Low => "0.05%",
            FeeTier::Medium => "0.30%",
            FeeTier::High => "1.00%",
        }
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = u32;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        FeeTier::iter().find(|tier| tier.bps() == bps).ok_or(bps)
    }
}

impl std::fmt::Display for FeeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the pair table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPair {
    pub symbol: String,
    pub pair_label: String,
    /// Feed address as written in the table, checksum casing preserved
    pub price_feed_address: String,
    pub fee_tier_basis_points: u32,
    pub description: String,
}

impl TradingPair {
    pub fn new(symbol: &str, pair_label: &str, price_feed_address: &str, fee_tier_basis_points: u32, description: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            pair_label: pair_label.to_string(),
            price_feed_address: price_feed_address.to_string(),
            fee_tier_basis_points,
            description: description.to_string(),
        }
    }

    /// Parsed feed address, None when the table text is not a valid address
    pub fn feed_address(&self) -> Option<Address> {
        self.price_feed_address.parse().ok()
    }

    /// Recognised fee tier, None when the entry carries an unknown value
    pub fn fee_tier(&self) -> Option<FeeTier> {
        FeeTier::try_from(self.fee_tier_basis_points).ok()
    }

    /// Asset on the right-hand side of the pair label
    pub fn base_asset(&self) -> Option<&str> {
        self.pair_label.split_once('/').map(|(_, base)| base)
    }

    /// Description a Chainlink aggregator reports for this pair, e.g. "LINK / ETH"
    pub fn feed_description(&self) -> String {
        self.pair_label.replace('/', " / ")
    }

    /// Format: "LINK/ETH-0xdc530d9"
    pub fn format_log_info(&self) -> String {
        let feed = self.price_feed_address.to_lowercase();
        format!("{}-{}", self.pair_label, feed.get(..9).unwrap_or(&feed))
    }
}

/// The 13 pairs validated for a 5% oracle tolerance at block 23620206.
/// All use Chainlink TOKEN/ETH feeds and the Uniswap V3 fee tier with the deepest liquidity.
fn production_pairs() -> Vec<TradingPair> {
    vec![
        // 1.00%
        TradingPair::new("1INCH", "1INCH/ETH", "0x72AFAECF99C9d9C8215fF44C77B94B99C28741e8", 10000, "1inch Network - DEX aggregator token"),
        TradingPair::new("SHIB", "SHIB/ETH", "0x8dD1CD88F43aF196ae478e91b9F5E4Ac69A97C61", 10000, "Shiba Inu - Volatile memecoin"),
        // 0.30%
        TradingPair::new("AAVE", "AAVE/ETH", "0x6Df09E975c830ECae5bd4eD9d90f3A95a4f88012", 3000, "Aave Protocol - Lending platform"),
        TradingPair::new("APE", "APE/ETH", "0xc7de7f4d4C9c991fF62a07D18b3E31e349833A18", 3000, "ApeCoin - NFT ecosystem token"),
        TradingPair::new("BAT", "BAT/ETH", "0x0d16d4528239e9ee52fa531af613AcdB23D88c94", 3000, "Basic Attention Token - Browser rewards"),
        TradingPair::new("COMP", "COMP/ETH", "0x1B39Ee86Ec5979ba5C322b826B3ECb8C79991699", 3000, "Compound - Lending protocol governance"),
        TradingPair::new("CRV", "CRV/ETH", "0x8a12Be339B0cD1829b91Adc01977caa5E9ac121e", 3000, "Curve DAO - DEX for stablecoins"),
        TradingPair::new("LDO", "LDO/ETH", "0x4e844125952D32AcdF339BE976c98E22F6F318dB", 3000, "Lido DAO - Liquid staking governance"),
        TradingPair::new("LINK", "LINK/ETH", "0xDC530D9457755926550b59e8ECcdaE7624181557", 3000, "Chainlink - Oracle network"),
        TradingPair::new("MKR", "MKR/ETH", "0x24551a8Fb2A7211A25a17B1481f043A8a8adC7f2", 3000, "Maker - DAI stablecoin governance"),
        TradingPair::new("UNI", "UNI/ETH", "0xD6aA3D25116d8dA79Ea0246c4826EB951872e02e", 3000, "Uniswap - DEX governance token"),
        TradingPair::new("ZRX", "ZRX/ETH", "0x2Da4983a622a8498bb1a21FaE9D8F6C664939962", 3000, "0x Protocol - DEX infrastructure"),
        // 0.05%
        TradingPair::new("USDT", "USDT/ETH", "0xEe9F2375b4bdF6387aa8265dD4FB8F16512A1d46", 500, "Tether USD - Leading stablecoin"),
    ]
}

// Lazily built on first access rather than at load, then read-only. Construction takes no
// input and cannot fail, so readers see the same values either way.
pub static PRODUCTION_PAIRS: LazyLock<Vec<TradingPair>> = LazyLock::new(production_pairs);
pub static PAIR_LABELS: LazyLock<Vec<String>> = LazyLock::new(|| pair_labels(&PRODUCTION_PAIRS));
pub static PAIR_STATS: LazyLock<PairStats> = LazyLock::new(|| PairStats::from_pairs(&PRODUCTION_PAIRS));

/// Pair labels in table order
pub fn pair_labels(pairs: &[TradingPair]) -> Vec<String> {
    pairs.iter().map(|p| p.pair_label.clone()).collect()
}

/// Number of pairs per recognised fee tier
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDistribution {
    #[serde(rename = "0.05%")]
    pub low: usize,
    #[serde(rename = "0.30%")]
    pub medium: usize,
    #[serde(rename = "1.00%")]
    pub high: usize,
}

impl FeeDistribution {
    /// Entries with an unrecognised tier are not counted in any bucket
    pub fn from_pairs(pairs: &[TradingPair]) -> Self {
        let count = |tier: FeeTier| pairs.iter().filter(|p| p.fee_tier_basis_points == tier.bps()).count();
        Self {
            low: count(FeeTier::Low),
            medium: count(FeeTier::Medium),
            high: count(FeeTier::High),
        }
    }

    pub fn count(&self, tier: FeeTier) -> usize {
        match tier {
            FeeTier::Low => self.low,
            FeeTier::Medium => self.medium,
            FeeTier::High => self.high,
        }
    }

    /// Lookup by tier label ("0.05%", "0.30%", "1.00%")
    pub fn get(&self, label: &str) -> Option<usize> {
        FeeTier::iter().find(|tier| tier.label() == label).map(|tier| self.count(tier))
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// Summary statistics of a pair table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairStats {
    pub total_pairs: usize,
    pub fee_distribution: FeeDistribution,
    pub optimized_for_block: u64,
    pub oracle_validation_tolerance: String,
}

impl PairStats {
    pub fn from_pairs(pairs: &[TradingPair]) -> Self {
        Self {
            total_pairs: pairs.len(),
            fee_distribution: FeeDistribution::from_pairs(pairs),
            optimized_for_block: OPTIMIZED_FOR_BLOCK,
            oracle_validation_tolerance: ORACLE_VALIDATION_TOLERANCE.to_string(),
        }
    }

    /// Entries left out of the distribution because of an unknown fee tier
    pub fn unclassified(&self) -> usize {
        self.total_pairs.saturating_sub(self.fee_distribution.total())
    }

    pub fn print(&self) {
        tracing::info!("📊 {} pairs (optimized for block #{}, oracle tolerance {})", self.total_pairs, self.optimized_for_block, self.oracle_validation_tolerance);
        for tier in FeeTier::iter() {
            tracing::info!("   {} ({} bps): {} pairs", tier.label(), tier.bps(), self.fee_distribution.count(tier));
        }
        if self.unclassified() > 0 {
            tracing::warn!("   {} pairs use an unknown fee tier", self.unclassified());
        }
    }
}

/// Checks the authoring invariants of a pair table, returning the first violation
pub fn validate_pairs(pairs: &[TradingPair]) -> Result<(), PairError> {
    let mut seen_symbols = HashSet::new();
    let mut seen_feeds: HashMap<Address, &str> = HashMap::new();

    for (i, pair) in pairs.iter().enumerate() {
        if pair.symbol.trim().is_empty() {
            return Err(PairError::EmptySymbol(i));
        }
        if !seen_symbols.insert(pair.symbol.to_uppercase()) {
            return Err(PairError::DuplicateSymbol(pair.symbol.clone()));
        }

        if pair.pair_label != format!("{}/{}", pair.symbol, BASE_ASSET) {
            return Err(PairError::MalformedLabel {
                symbol: pair.symbol.clone(),
                label: pair.pair_label.clone(),
                base: BASE_ASSET.to_string(),
            });
        }

        if pair.fee_tier().is_none() {
            return Err(PairError::UnknownFeeTier {
                symbol: pair.symbol.clone(),
                fee: pair.fee_tier_basis_points,
            });
        }

        let feed = pair.feed_address().ok_or_else(|| PairError::MalformedFeed {
            symbol: pair.symbol.clone(),
            feed: pair.price_feed_address.clone(),
        })?;
        if feed.is_zero() {
            return Err(PairError::ZeroFeed(pair.symbol.clone()));
        }
        if let Some(first) = seen_feeds.insert(feed, &pair.symbol) {
            return Err(PairError::DuplicateFeed {
                feed,
                first: first.to_string(),
                second: pair.symbol.clone(),
            });
        }
    }

    Ok(())
}

/// Case-insensitive lookup by token symbol
pub fn find_by_symbol<'a>(pairs: &'a [TradingPair], symbol: &str) -> Option<&'a TradingPair> {
    pairs.iter().find(|p| p.symbol.eq_ignore_ascii_case(symbol))
}

pub fn find_by_feed(pairs: &[TradingPair], feed: Address) -> Option<&TradingPair> {
    pairs.iter().find(|p| p.feed_address() == Some(feed))
}

/// Pairs using the given fee tier, in table order
pub fn pairs_in_tier(pairs: &[TradingPair], tier: FeeTier) -> Vec<&TradingPair> {
    pairs.iter().filter(|p| p.fee_tier_basis_points == tier.bps()).collect()
}

/// Logs one line per pair
pub fn print_pairs(pairs: &[TradingPair]) {
    for pair in pairs {
        let tier = pair.fee_tier().map(|t| t.label().to_string()).unwrap_or_else(|| format!("{} bps (unknown)", pair.fee_tier_basis_points));
        tracing::info!("• {:<10} | fee {:<6} | feed {} | {}", pair.pair_label, tier, pair.price_feed_address, pair.description);
    }
}
