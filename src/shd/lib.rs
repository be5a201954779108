/// Uniswap V3 pool reads
pub mod dex;
/// Pair table authoring errors
pub mod error;
/// Oracle price sources
pub mod oracles;
/// Production trading pairs and derived views
pub mod pairs;
/// Solidity ABIs
pub mod sol;
/// Configuration structures
pub mod types;
/// Utilities and helper functions
pub mod utils;
/// Oracle vs pool validation
pub mod validation;

pub use utils::misc;
