// Uniswap V3 pool reads

pub mod pool_data;

pub use pool_data::UniswapV3Pools;
