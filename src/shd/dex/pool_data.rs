use std::{collections::HashMap, sync::Arc};

use alloy::{
    eips::BlockId,
    network::Ethereum,
    primitives::{Address, U256, aliases::U24},
    providers::{Provider, RootProvider},
};
use async_trait::async_trait;
use eyre::Result;

use crate::{oracles::PriceSource, pairs::TradingPair, sol::IUniswapV3Factory};

// ===== POOL DATA STRUCTURES =====

/// Pool state needed to price one token against the other
#[derive(Debug, Clone)]
pub struct PoolInfo {
    pub token0: Address,
    pub token1: Address,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub token0_decimals: u8,
    pub token1_decimals: u8,
}

/// Pool price data
#[derive(Debug, Clone)]
pub struct PoolPrice {
    pub token0_price: f64, // Price of token0 in terms of token1
    pub token1_price: f64, // Price of token1 in terms of token0
}

impl PoolPrice {
    /// Price of `token` expressed in the other token of the pool
    pub fn price_of(&self, pool_info: &PoolInfo, token: Address) -> Option<f64> {
        if token == pool_info.token0 {
            Some(self.token0_price)
        } else if token == pool_info.token1 {
            Some(self.token1_price)
        } else {
            None
        }
    }
}

// ===== UNISWAP V3 POOL ABI =====

// Minimal ABI for Uniswap V3 Pool
alloy::sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    IUniswapV3Pool,
    r#"[
        {
            "inputs": [],
            "name": "slot0",
            "outputs": [
                {"internalType": "uint160", "name": "sqrtPriceX96", "type": "uint160"},
                {"internalType": "int24", "name": "tick", "type": "int24"},
                {"internalType": "uint16", "name": "observationIndex", "type": "uint16"},
                {"internalType": "uint16", "name": "observationCardinality", "type": "uint16"},
                {"internalType": "uint16", "name": "observationCardinalityNext", "type": "uint16"},
                {"internalType": "uint8", "name": "feeProtocol", "type": "uint8"},
                {"internalType": "bool", "name": "unlocked", "type": "bool"}
            ],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "token0",
            "outputs": [{"internalType": "address", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "token1",
            "outputs": [{"internalType": "address", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        }
    ]"#
);

// ERC20 decimals, needed to scale pool prices
alloy::sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    IERC20Metadata,
    r#"[
        {
            "inputs": [],
            "name": "decimals",
            "outputs": [{"internalType": "uint8", "name": "", "type": "uint8"}],
            "stateMutability": "view",
            "type": "function"
        }
    ]"#
);

// ===== POOL DATA EXTRACTION FUNCTIONS =====

/// Get the address of the token/base pool for a fee tier, zero when the pool does not exist
pub async fn get_pool_address<P: Provider + Clone>(provider: P, factory: Address, token: Address, base: Address, fee: u32, block: BlockId) -> Result<Address> {
    let factory = IUniswapV3Factory::new(factory, provider);
    let pool = factory.getPool(token, base, U24::from(fee)).block(block).call().await?;
    Ok(pool)
}

/// Get pool information from Uniswap V3 pool
pub async fn get_pool_info<P: Provider + Clone>(provider: P, pool_address: Address, block: BlockId) -> Result<PoolInfo> {
    let pool = IUniswapV3Pool::new(pool_address, provider.clone());

    // Get pool slot0 data
    let slot0 = pool.slot0().block(block).call().await?;
    let token0 = pool.token0().block(block).call().await?;
    let token1 = pool.token1().block(block).call().await?;

    // Get token decimals
    let token0_contract = IERC20Metadata::new(token0, provider.clone());
    let token1_contract = IERC20Metadata::new(token1, provider.clone());

    let token0_decimals = token0_contract.decimals().block(block).call().await?;
    let token1_decimals = token1_contract.decimals().block(block).call().await?;

    Ok(PoolInfo {
        token0,
        token1,
        sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
        tick: slot0.tick.as_i32(),
        token0_decimals,
        token1_decimals,
    })
}

/// Calculate pool prices from sqrt price
pub fn calculate_pool_prices(pool_info: &PoolInfo) -> PoolPrice {
    // price = (sqrtPriceX96 / 2^96)^2 * (10^decimals0 / 10^decimals1)

    let sqrt_price_f64 = if let Ok(as_u128) = u128::try_from(pool_info.sqrt_price_x96) {
        as_u128 as f64
    } else {
        // Beyond u128, go through the decimal string
        pool_info.sqrt_price_x96.to_string().parse::<f64>().unwrap_or(0.0)
    };

    let sqrt_price_normalized = sqrt_price_f64 / (2_f64.powf(96.0));
    let price_raw = sqrt_price_normalized.powi(2);

    // How much token1 per token0
    let decimal_adjustment = 10_f64.powf((pool_info.token0_decimals as f64) - (pool_info.token1_decimals as f64));
    let price_token1_per_token0 = price_raw * decimal_adjustment;

    let price_token0_per_token1 = if price_token1_per_token0 != 0.0 && price_token1_per_token0.is_finite() {
        1.0 / price_token1_per_token0
    } else {
        0.0
    };

    PoolPrice {
        token0_price: price_token1_per_token0,
        token1_price: price_token0_per_token1,
    }
}

// ===== PRICE SOURCE =====

/// Prices a pair's token from its Uniswap V3 pool against WETH, at the pair's fee tier
pub struct UniswapV3Pools {
    provider: Arc<RootProvider<Ethereum>>,
    factory: Address,
    weth: Address,
    tokens: HashMap<String, Address>,
    block: Option<u64>,
}

impl UniswapV3Pools {
    pub fn new(provider: Arc<RootProvider<Ethereum>>, factory: Address, weth: Address) -> Self {
        Self {
            provider,
            factory,
            weth,
            tokens: HashMap::new(),
            block: None,
        }
    }

    /// Token addresses keyed by symbol
    pub fn with_tokens<I: IntoIterator<Item = (String, Address)>>(mut self, tokens: I) -> Self {
        self.tokens.extend(tokens.into_iter().map(|(symbol, address)| (symbol.to_uppercase(), address)));
        self
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

    /// Token and pool addresses used for a pair
    pub async fn pool_for(&self, pair: &TradingPair) -> Result<(Address, Address)> {
        let token = *self
            .tokens
            .get(&pair.symbol.to_uppercase())
            .ok_or_else(|| eyre::eyre!("No token address configured for {}", pair.symbol))?;
        let tier = pair
            .fee_tier()
            .ok_or_else(|| eyre::eyre!("Unknown fee tier {} for {}", pair.fee_tier_basis_points, pair.symbol))?;

        let pool = get_pool_address(self.provider.clone(), self.factory, token, self.weth, tier.bps(), self.block_id()).await?;
        if pool.is_zero() {
            return Err(eyre::eyre!("No Uniswap V3 pool for {} at {}", pair.pair_label, tier));
        }
        Ok((token, pool))
    }
}

#[async_trait]
impl PriceSource for UniswapV3Pools {
    fn name(&self) -> &str {
        "uniswap-v3"
    }

    async fn price_in_eth(&self, pair: &TradingPair) -> Result<f64> {
        let (token, pool) = self.pool_for(pair).await?;
        let info = get_pool_info(self.provider.clone(), pool, self.block_id()).await?;
        let prices = calculate_pool_prices(&info);

        let price = prices
            .price_of(&info, token)
            .ok_or_else(|| eyre::eyre!("Pool 0x{:x} does not hold {}", pool, pair.symbol))?;
        tracing::debug!("Uniswap {} (pool 0x{:x}, tick {}): {:.10} ETH", pair.pair_label, pool, info.tick, price);
        Ok(price)
    }
}
