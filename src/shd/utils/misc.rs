// File helpers, formatting and small numeric utilities

use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
};

use alloy::{
    network::Network,
    primitives::Address,
    providers::{Provider, RootProvider},
};
use eyre::{Result, WrapErr};
use serde::{Serialize, de::DeserializeOwned};

/// Constants
pub const BASIS_POINT_DENOMINATOR: f64 = 10000.0;

/// Reads a JSON array from disk
pub fn read<T: DeserializeOwned>(file: &str) -> Result<Vec<T>> {
    let mut f = File::open(file).wrap_err_with(|| format!("Failed to open '{}'", file))?;
    let mut buffer = String::new();
    f.read_to_string(&mut buffer)?;
    let db: Vec<T> = serde_json::from_str(&buffer).wrap_err_with(|| format!("Failed to parse JSON in '{}'", file))?;
    Ok(db)
}

/// Writes any serializable value as JSON, followed by a newline
pub fn save<T: Serialize + ?Sized>(output: &T, file: &str) -> Result<()> {
    tracing::debug!("Saving to file: {}", file);
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(file)
        .wrap_err_with(|| format!("Failed to open or create '{}'", file))?;
    let json = serde_json::to_string_pretty(output)?;
    f.write_all(json.as_bytes())?;
    f.write_all(b"\n")?;
    f.flush()?;
    Ok(())
}

/**
 * Get current block number from provider
 */
pub async fn block<T: Network>(provider: &RootProvider<T>) -> Result<u64> {
    Ok(provider.get_block_number().await?)
}

/**
 * Format address link using explorer base URL
 */
pub fn format_address_link(explorer_url: &str, address: &Address) -> String {
    if explorer_url.ends_with('/') {
        format!("{}address/0x{:x}", explorer_url, address)
    } else {
        format!("{}/address/0x{:x}", explorer_url, address)
    }
}

/// Parses a percentage such as "5%" or "0.30%" into 5.0 / 0.3
pub fn parse_percent(value: &str) -> Option<f64> {
    let number = value.trim().trim_end_matches('%').trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Absolute deviation of `value` from `reference`, in percent
pub fn deviation_percent(value: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return f64::INFINITY;
    }
    ((value - reference) / reference).abs() * 100.0
}

/// True for "0x" followed by 40 hex characters
pub fn is_address_format(value: &str) -> bool {
    value.starts_with("0x") && value.len() == 42 && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}
