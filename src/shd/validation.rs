// Oracle vs pool cross-check of the pair table

use eyre::{Result, WrapErr};
use futures::future::join_all;
use serde::Serialize;

use crate::{misc::deviation_percent, oracles::PriceSource, pairs::TradingPair};

/// Outcome of comparing the oracle price of a pair with its pool price
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleCheck {
    pub symbol: String,
    pub pair_label: String,
    pub oracle_price: f64,
    pub pool_price: f64,
    pub deviation_percent: f64,
    pub tolerance_percent: f64,
    pub within_tolerance: bool,
}

impl OracleCheck {
    pub fn new(pair: &TradingPair, oracle_price: f64, pool_price: f64, tolerance_percent: f64) -> Self {
        let deviation = deviation_percent(pool_price, oracle_price);
        Self {
            symbol: pair.symbol.clone(),
            pair_label: pair.pair_label.clone(),
            oracle_price,
            pool_price,
            deviation_percent: deviation,
            tolerance_percent,
            within_tolerance: deviation <= tolerance_percent,
        }
    }
}

/// Prices one pair with both sources and compares them
pub async fn check_pair(oracle: &dyn PriceSource, reference: &dyn PriceSource, pair: &TradingPair, tolerance_percent: f64) -> Result<OracleCheck> {
    let (oracle_price, pool_price) = futures::join!(oracle.price_in_eth(pair), reference.price_in_eth(pair));
    let oracle_price = oracle_price.wrap_err_with(|| format!("{} price unavailable for {}", oracle.name(), pair.pair_label))?;
    let pool_price = pool_price.wrap_err_with(|| format!("{} price unavailable for {}", reference.name(), pair.pair_label))?;
    Ok(OracleCheck::new(pair, oracle_price, pool_price, tolerance_percent))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckError {
    pub symbol: String,
    pub error: String,
}

/// Aggregated result of a validation run, in table order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub block: Option<u64>,
    pub tolerance_percent: f64,
    pub checks: Vec<OracleCheck>,
    pub errors: Vec<CheckError>,
}

impl ValidationReport {
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.within_tolerance).count()
    }

    pub fn failed(&self) -> Vec<&OracleCheck> {
        self.checks.iter().filter(|c| !c.within_tolerance).collect()
    }

    /// Every pair was priced and stayed within tolerance
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.checks.iter().all(|c| c.within_tolerance)
    }

    pub fn print(&self) {
        match self.block {
            Some(block) => tracing::info!("🔎 Oracle validation at block #{} (tolerance {}%)", block, self.tolerance_percent),
            None => tracing::info!("🔎 Oracle validation at latest block (tolerance {}%)", self.tolerance_percent),
        }
        for check in &self.checks {
            let mark = if check.within_tolerance { "✅" } else { "❌" };
            tracing::info!(
                "{} {:<10} oracle={:.10} pool={:.10} deviation={:.3}%",
                mark,
                check.pair_label,
                check.oracle_price,
                check.pool_price,
                check.deviation_percent
            );
        }
        for err in &self.errors {
            tracing::error!("⚠️  {}: {}", err.symbol, err.error);
        }
        tracing::info!("{} passed, {} failed, {} errored", self.passed(), self.failed().len(), self.errors.len());
    }
}

/// Checks every pair concurrently
pub async fn check_pairs(oracle: &dyn PriceSource, reference: &dyn PriceSource, pairs: &[TradingPair], tolerance_percent: f64, block: Option<u64>) -> ValidationReport {
    let results = join_all(pairs.iter().map(|pair| check_pair(oracle, reference, pair, tolerance_percent))).await;

    let mut report = ValidationReport {
        block,
        tolerance_percent,
        ..Default::default()
    };
    for (pair, result) in pairs.iter().zip(results) {
        match result {
            Ok(check) => report.checks.push(check),
            Err(e) => report.errors.push(CheckError {
                symbol: pair.symbol.clone(),
                error: format!("{:#}", e),
            }),
        }
    }
    report
}
