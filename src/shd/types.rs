// Configuration structures

use std::collections::BTreeMap;
use std::{env, fs};

use alloy::primitives::Address;
use eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::{
    misc::{self, is_address_format, parse_percent},
    pairs::{OPTIMIZED_FOR_BLOCK, ORACLE_VALIDATION_TOLERANCE, PRODUCTION_PAIRS, TradingPair},
};

pub const DEFAULT_CONFIG_PATH: &str = "config/pairs.toml";
pub const DEFAULT_MAX_FEED_AGE_SECS: u64 = 86_400;

/// Environment configuration loaded from .env file
#[derive(Debug, Deserialize, Clone)]
pub struct EnvConfig {
    /// Overrides `global.rpc_endpoint` when set
    pub rpc_url: Option<String>,
    /// Path of the TOML configuration
    pub config_path: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvConfig {
    pub fn new() -> Self {
        let rpc_url = env::var("RPC_URL").ok().filter(|v| !v.trim().is_empty());
        let config_path = env::var("PAIRS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let output = Self { rpc_url, config_path };
        output.print();
        output
    }

    pub fn print(&self) {
        tracing::info!("Loaded environment variables:");
        tracing::info!("   Config path = {}", self.config_path);
        match &self.rpc_url {
            Some(url) => tracing::info!("   RPC override = 🔗 (size: {})", url.len()),
            None => tracing::info!("   RPC override = none"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PairsConfig {
    pub global: GlobalConfig,
    pub uniswap: UniswapConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub table: TableConfig,
    /// ERC20 address per token symbol, needed to locate the Uniswap pools
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalConfig {
    pub network_name: String,      // Network identifier
    pub rpc_endpoint: String,      // RPC endpoint used for oracle and pool reads
    pub explorer_base_url: String, // Blockchain explorer URL
}

#[derive(Debug, Deserialize, Clone)]
pub struct UniswapConfig {
    pub factory: String, // Uniswap V3 factory
    pub weth: String,    // Wrapped ETH, the base token of every pool
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    #[serde(default)]
    pub enabled: bool,
    pub block: Option<u64>,             // Block to pin reads at (defaults to the curation block)
    #[serde(default)]
    pub latest: bool,                   // Read at the latest block instead of a pinned one
    pub tolerance_percent: Option<f64>, // Max oracle vs pool deviation (defaults to 5%)
    #[serde(default = "default_max_feed_age")]
    pub max_feed_age_secs: u64, // Oracle rounds older than this are reported stale
}

fn default_max_feed_age() -> u64 {
    DEFAULT_MAX_FEED_AGE_SECS
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            block: None,
            latest: false,
            tolerance_percent: None,
            max_feed_age_secs: DEFAULT_MAX_FEED_AGE_SECS,
        }
    }
}

impl ValidationConfig {
    /// Block reads are pinned to, None for latest
    pub fn block_number(&self) -> Option<u64> {
        if self.latest { None } else { Some(self.block.unwrap_or(OPTIMIZED_FOR_BLOCK)) }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance_percent.or_else(|| parse_percent(ORACLE_VALIDATION_TOLERANCE)).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TableConfig {
    pub pairs_file: Option<String>,  // JSON table replacing the built-in one
    pub export_file: Option<String>, // Where to write the table and stats as JSON
}

impl PairsConfig {
    pub fn print(&self) {
        tracing::debug!(" >>> Config <<<");
        tracing::debug!("  Network:                {}", self.global.network_name);
        tracing::debug!("  RPC Endpoint:           {}", self.global.rpc_endpoint);
        tracing::debug!("  Explorer URL:           {}", self.global.explorer_base_url);
        tracing::debug!("  Uniswap V3 Factory:     {}", self.uniswap.factory);
        tracing::debug!("  WETH:                   {}", self.uniswap.weth);
        tracing::debug!("  Validation Enabled:     {}", self.validation.enabled);
        match self.validation.block_number() {
            Some(block) => tracing::debug!("  Validation Block:       #{}", block),
            None => tracing::debug!("  Validation Block:       latest"),
        }
        tracing::debug!("  Oracle Tolerance:       {}%", self.validation.tolerance());
        tracing::debug!("  Max Feed Age:           {} s", self.validation.max_feed_age_secs);
        if let Some(file) = &self.table.pairs_file {
            tracing::debug!("  Pairs File:             {}", file);
        }
        if let Some(file) = &self.table.export_file {
            tracing::debug!("  Export File:            {}", file);
        }
        if !self.tokens.is_empty() {
            tracing::debug!("  Token Addresses:");
            for (symbol, address) in &self.tokens {
                tracing::debug!("   - {:<6} {}", symbol, address);
            }
        }
        tracing::debug!(" >>> End of Config <<<");
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.global.network_name.is_empty() {
            return Err("Network name cannot be empty".to_string());
        }
        if self.global.rpc_endpoint.is_empty() {
            return Err("RPC endpoint cannot be empty".to_string());
        }
        if let Err(e) = url::Url::parse(&self.global.rpc_endpoint) {
            return Err(format!("RPC endpoint '{}' is not a valid URL: {}", self.global.rpc_endpoint, e));
        }
        if !is_address_format(&self.uniswap.factory) {
            return Err("Uniswap factory must be a valid Ethereum address".to_string());
        }
        if !is_address_format(&self.uniswap.weth) {
            return Err("WETH address must be a valid Ethereum address".to_string());
        }

        let tolerance = self.validation.tolerance();
        if tolerance <= 0.0 || tolerance > 100.0 {
            return Err(format!("Oracle tolerance must be within (0, 100] percent, got {}", tolerance));
        }
        if self.validation.max_feed_age_secs == 0 {
            return Err("Max feed age must be positive".to_string());
        }

        if let Some(file) = &self.table.pairs_file {
            if file.trim().is_empty() {
                return Err("Pairs file cannot be an empty path".to_string());
            }
        }

        for (symbol, address) in &self.tokens {
            if !is_address_format(address) {
                return Err(format!("Token address for {} must be a valid Ethereum address", symbol));
            }
        }

        Ok(())
    }

    /// RPC endpoint, preferring the environment override
    pub fn rpc_endpoint<'a>(&'a self, env: Option<&'a EnvConfig>) -> &'a str {
        env.and_then(|e| e.rpc_url.as_deref()).unwrap_or(self.global.rpc_endpoint.as_str())
    }

    /// ERC20 address of a token, matched case-insensitively on the symbol
    pub fn token_address(&self, symbol: &str) -> Option<Address> {
        self.tokens
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
            .and_then(|(_, address)| address.parse().ok())
    }

    pub fn weth_address(&self) -> Result<Address> {
        self.uniswap.weth.parse().wrap_err("Invalid WETH address")
    }

    pub fn factory_address(&self) -> Result<Address> {
        self.uniswap.factory.parse().wrap_err("Invalid Uniswap factory address")
    }

    /// Pair table to work with: the JSON override when configured, the built-in table otherwise
    pub fn load_pairs(&self) -> Result<Vec<TradingPair>> {
        match &self.table.pairs_file {
            Some(file) => {
                let pairs: Vec<TradingPair> = misc::read(file)?;
                tracing::info!("Loaded {} pairs from {}", pairs.len(), file);
                Ok(pairs)
            }
            None => Ok(PRODUCTION_PAIRS.clone()),
        }
    }
}

pub fn parse_pairs_config(contents: &str) -> Result<PairsConfig> {
    let config: PairsConfig = toml::from_str(contents).wrap_err("Failed to parse TOML configuration (required sections: [global], [uniswap])")?;
    config.validate().map_err(|e| eyre::eyre!("Configuration validation failed: {}", e))?;
    Ok(config)
}

pub fn load_pairs_config(path: &str) -> Result<PairsConfig> {
    let contents = fs::read_to_string(path).wrap_err_with(|| format!("Failed to read config file '{}'", path))?;
    let config = parse_pairs_config(&contents).wrap_err_with(|| format!("Invalid configuration in '{}'", path))?;
    config.print();
    Ok(config)
}
