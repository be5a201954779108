use std::collections::HashSet;

use shd::pairs::{
    FeeTier, OPTIMIZED_FOR_BLOCK, ORACLE_VALIDATION_TOLERANCE, PAIR_LABELS, PAIR_STATS, PRODUCTION_PAIRS, find_by_feed, find_by_symbol, pairs_in_tier,
    validate_pairs,
};

#[test]
fn table_has_thirteen_pairs() {
    assert_eq!(PRODUCTION_PAIRS.len(), 13);
    assert_eq!(PAIR_STATS.total_pairs, 13);
}

#[test]
fn symbols_are_unique() {
    let symbols: HashSet<_> = PRODUCTION_PAIRS.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols.len(), PRODUCTION_PAIRS.len());
}

#[test]
fn every_fee_tier_is_recognised() {
    for pair in PRODUCTION_PAIRS.iter() {
        assert!(
            [500, 3000, 10000].contains(&pair.fee_tier_basis_points),
            "{} uses fee {}",
            pair.symbol,
            pair.fee_tier_basis_points
        );
        assert!(pair.fee_tier().is_some());
    }
}

#[test]
fn built_in_table_passes_checks() {
    assert_eq!(validate_pairs(&PRODUCTION_PAIRS), Ok(()));
}

#[test]
fn labels_follow_table_order() {
    assert_eq!(PAIR_LABELS.len(), PRODUCTION_PAIRS.len());
    for (label, pair) in PAIR_LABELS.iter().zip(PRODUCTION_PAIRS.iter()) {
        assert_eq!(label, &pair.pair_label);
    }
    assert_eq!(PAIR_LABELS.first().map(String::as_str), Some("1INCH/ETH"));
    assert_eq!(PAIR_LABELS.last().map(String::as_str), Some("USDT/ETH"));
}

#[test]
fn known_entries() {
    let usdt = find_by_symbol(&PRODUCTION_PAIRS, "USDT").expect("USDT listed");
    assert_eq!(usdt.fee_tier_basis_points, 500);
    assert_eq!(usdt.fee_tier(), Some(FeeTier::Low));

    let link = find_by_symbol(&PRODUCTION_PAIRS, "link").expect("LINK listed");
    assert_eq!(link.fee_tier_basis_points, 3000);
    assert_eq!(link.pair_label, "LINK/ETH");
    assert_eq!(link.description, "Chainlink - Oracle network");
    assert_eq!(link.base_asset(), Some("ETH"));
    assert_eq!(link.feed_description(), "LINK / ETH");

    assert!(find_by_symbol(&PRODUCTION_PAIRS, "DOGE").is_none());
}

const SOURCE_ROWS: [(&str, &str, &str, u32, &str); 13] = [
    ("1INCH", "1INCH/ETH", "0x72AFAECF99C9d9C8215fF44C77B94B99C28741e8", 10000, "1inch Network - DEX aggregator token"),
    ("SHIB", "SHIB/ETH", "0x8dD1CD88F43aF196ae478e91b9F5E4Ac69A97C61", 10000, "Shiba Inu - Volatile memecoin"),
    ("AAVE", "AAVE/ETH", "0x6Df09E975c830ECae5bd4eD9d90f3A95a4f88012", 3000, "Aave Protocol - Lending platform"),
    ("APE", "APE/ETH", "0xc7de7f4d4C9c991fF62a07D18b3E31e349833A18", 3000, "ApeCoin - NFT ecosystem token"),
    ("BAT", "BAT/ETH", "0x0d16d4528239e9ee52fa531af613AcdB23D88c94", 3000, "Basic Attention Token - Browser rewards"),
    ("COMP", "COMP/ETH", "0x1B39Ee86Ec5979ba5C322b826B3ECb8C79991699", 3000, "Compound - Lending protocol governance"),
    ("CRV", "CRV/ETH", "0x8a12Be339B0cD1829b91Adc01977caa5E9ac121e", 3000, "Curve DAO - DEX for stablecoins"),
    ("LDO", "LDO/ETH", "0x4e844125952D32AcdF339BE976c98E22F6F318dB", 3000, "Lido DAO - Liquid staking governance"),
    ("LINK", "LINK/ETH", "0xDC530D9457755926550b59e8ECcdaE7624181557", 3000, "Chainlink - Oracle network"),
    ("MKR", "MKR/ETH", "0x24551a8Fb2A7211A25a17B1481f043A8a8adC7f2", 3000, "Maker - DAI stablecoin governance"),
    ("UNI", "UNI/ETH", "0xD6aA3D25116d8dA79Ea0246c4826EB951872e02e", 3000, "Uniswap - DEX governance token"),
    ("ZRX", "ZRX/ETH", "0x2Da4983a622a8498bb1a21FaE9D8F6C664939962", 3000, "0x Protocol - DEX infrastructure"),
    ("USDT", "USDT/ETH", "0xEe9F2375b4bdF6387aa8265dD4FB8F16512A1d46", 500, "Tether USD - Leading stablecoin"),
];

#[test]
fn every_row_matches_the_source_table() {
    assert_eq!(PRODUCTION_PAIRS.len(), SOURCE_ROWS.len());
    for (pair, (symbol, label, feed, fee, description)) in PRODUCTION_PAIRS.iter().zip(SOURCE_ROWS) {
        assert_eq!(pair.symbol, symbol);
        assert_eq!(pair.pair_label, label);
        assert_eq!(pair.price_feed_address, feed, "{} feed text", symbol);
        assert_eq!(pair.fee_tier_basis_points, fee);
        assert_eq!(pair.description, description);
        assert!(pair.feed_address().is_some(), "{} feed parses", symbol);
    }

    let json = serde_json::to_value(&*PRODUCTION_PAIRS).unwrap();
    for (entry, (symbol, _, feed, _, _)) in json.as_array().unwrap().iter().zip(SOURCE_ROWS) {
        assert_eq!(entry["symbol"], symbol);
        assert_eq!(entry["priceFeedAddress"], feed);
    }
}

#[test]
fn lookup_by_feed() {
    let feed = "0xDC530D9457755926550b59e8ECcdaE7624181557".parse().unwrap();
    let pair = find_by_feed(&PRODUCTION_PAIRS, feed).expect("feed listed");
    assert_eq!(pair.symbol, "LINK");
    assert_eq!(pair.format_log_info(), "LINK/ETH-0xdc530d9");
}

#[test]
fn fee_distribution() {
    let distribution = PAIR_STATS.fee_distribution;
    assert_eq!(distribution.get("0.05%"), Some(1));
    assert_eq!(distribution.get("0.30%"), Some(10));
    assert_eq!(distribution.get("1.00%"), Some(2));
    assert_eq!(distribution.get("0.01%"), None);
    assert_eq!(distribution.total(), PAIR_STATS.total_pairs);

    let high: Vec<_> = pairs_in_tier(&PRODUCTION_PAIRS, FeeTier::High).iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(high, vec!["1INCH", "SHIB"]);
}

#[test]
fn summary_metadata_constants() {
    assert_eq!(PAIR_STATS.optimized_for_block, 23620206);
    assert_eq!(PAIR_STATS.oracle_validation_tolerance, "5%");
    assert_eq!(OPTIMIZED_FOR_BLOCK, 23620206);
    assert_eq!(ORACLE_VALIDATION_TOLERANCE, "5%");
    assert_eq!(PAIR_STATS.unclassified(), 0);
}

#[test]
fn stats_serialize_with_tier_labels() {
    let json = serde_json::to_value(&*PAIR_STATS).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "totalPairs": 13,
            "feeDistribution": { "0.05%": 1, "0.30%": 10, "1.00%": 2 },
            "optimizedForBlock": 23620206,
            "oracleValidationTolerance": "5%"
        })
    );
}
