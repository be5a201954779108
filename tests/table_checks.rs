use alloy::primitives::Address;
use proptest::prelude::*;
use shd::{
    error::PairError,
    pairs::{FeeDistribution, PairStats, TradingPair, pair_labels, validate_pairs},
};

fn feed(n: u8) -> String {
    Address::with_last_byte(n).to_string()
}

fn pair(symbol: &str, fee: u32, n: u8) -> TradingPair {
    TradingPair::new(symbol, &format!("{}/ETH", symbol), &feed(n), fee, "test token")
}

#[test]
fn unknown_tier_is_left_out_of_distribution() {
    let pairs = vec![pair("AAA", 500, 1), pair("BBB", 2500, 2), pair("CCC", 10000, 3)];
    let stats = PairStats::from_pairs(&pairs);

    assert_eq!(stats.total_pairs, 3);
    assert_eq!(stats.fee_distribution, FeeDistribution { low: 1, medium: 0, high: 1 });
    assert_eq!(stats.unclassified(), 1);
}

#[test]
fn unknown_tier_is_rejected_by_checks() {
    let pairs = vec![pair("AAA", 500, 1), pair("BBB", 2500, 2)];
    assert_eq!(
        validate_pairs(&pairs),
        Err(PairError::UnknownFeeTier {
            symbol: "BBB".to_string(),
            fee: 2500
        })
    );
}

#[test]
fn duplicate_symbol_is_rejected() {
    let pairs = vec![pair("AAA", 500, 1), pair("aaa", 3000, 2)];
    assert_eq!(validate_pairs(&pairs), Err(PairError::DuplicateSymbol("aaa".to_string())));
}

#[test]
fn empty_symbol_is_rejected() {
    let pairs = vec![pair("AAA", 500, 1), TradingPair::new(" ", "/ETH", &feed(2), 500, "")];
    assert_eq!(validate_pairs(&pairs), Err(PairError::EmptySymbol(1)));
}

#[test]
fn label_must_match_symbol_and_base() {
    let wrong_base = vec![TradingPair::new("AAA", "AAA/USD", &feed(1), 500, "")];
    assert!(matches!(validate_pairs(&wrong_base), Err(PairError::MalformedLabel { .. })));

    let wrong_symbol = vec![TradingPair::new("AAA", "BBB/ETH", &feed(1), 500, "")];
    assert!(matches!(validate_pairs(&wrong_symbol), Err(PairError::MalformedLabel { .. })));
}

#[test]
fn feeds_must_be_set_and_distinct() {
    let zero = vec![TradingPair::new("AAA", "AAA/ETH", "0x0000000000000000000000000000000000000000", 500, "")];
    assert_eq!(validate_pairs(&zero), Err(PairError::ZeroFeed("AAA".to_string())));

    let shared = vec![pair("AAA", 500, 7), pair("BBB", 3000, 7)];
    assert_eq!(
        validate_pairs(&shared),
        Err(PairError::DuplicateFeed {
            feed: Address::with_last_byte(7),
            first: "AAA".to_string(),
            second: "BBB".to_string(),
        })
    );

    // Same address written with different casing is still the same feed
    let cased = vec![
        TradingPair::new("AAA", "AAA/ETH", "0xDC530D9457755926550b59e8ECcdaE7624181557", 500, ""),
        TradingPair::new("BBB", "BBB/ETH", "0xdc530d9457755926550b59e8eccdae7624181557", 3000, ""),
    ];
    assert!(matches!(validate_pairs(&cased), Err(PairError::DuplicateFeed { .. })));
}

#[test]
fn empty_table() {
    assert_eq!(validate_pairs(&[]), Ok(()));
    let stats = PairStats::from_pairs(&[]);
    assert_eq!(stats.total_pairs, 0);
    assert_eq!(stats.fee_distribution.total(), 0);
    assert!(pair_labels(&[]).is_empty());
}

#[test]
fn table_json_uses_camel_case_fields() {
    let pairs = vec![pair("AAA", 3000, 1)];
    let json = serde_json::to_value(&pairs).unwrap();
    let entry = &json[0];
    assert_eq!(entry["symbol"], "AAA");
    assert_eq!(entry["pairLabel"], "AAA/ETH");
    assert_eq!(entry["feeTierBasisPoints"], 3000);
    assert_eq!(entry["description"], "test token");
    assert_eq!(entry["priceFeedAddress"], feed(1));

    let back: Vec<TradingPair> = serde_json::from_value(json).unwrap();
    assert_eq!(back, pairs);
}

#[test]
fn feed_text_is_kept_as_written() {
    let json = r#"[{"symbol":"AAA","pairLabel":"AAA/ETH","priceFeedAddress":"0x72AFAECF99C9d9C8215fF44C77B94B99C28741e8","feeTierBasisPoints":500,"description":""}]"#;
    let pairs: Vec<TradingPair> = serde_json::from_str(json).unwrap();
    assert_eq!(pairs[0].price_feed_address, "0x72AFAECF99C9d9C8215fF44C77B94B99C28741e8");
    assert_eq!(pairs[0].feed_address(), "0x72afaecf99c9d9c8215ff44c77b94b99c28741e8".parse::<Address>().ok());
    assert_eq!(serde_json::to_string(&pairs).unwrap(), json);
}

#[test]
fn malformed_feed_address_is_rejected_by_checks() {
    let json = r#"[{"symbol":"AAA","pairLabel":"AAA/ETH","priceFeedAddress":"0x1234","feeTierBasisPoints":500,"description":""}]"#;
    let pairs: Vec<TradingPair> = serde_json::from_str(json).unwrap();
    assert_eq!(pairs[0].feed_address(), None);
    assert_eq!(
        validate_pairs(&pairs),
        Err(PairError::MalformedFeed {
            symbol: "AAA".to_string(),
            feed: "0x1234".to_string(),
        })
    );
}

proptest! {
    #[test]
    fn recognised_tiers_sum_to_total(fees in prop::collection::vec(prop::sample::select(vec![500u32, 3000, 10000]), 0..40)) {
        let pairs: Vec<_> = fees.iter().enumerate().map(|(i, fee)| pair(&format!("T{}", i), *fee, i as u8)).collect();
        let stats = PairStats::from_pairs(&pairs);
        prop_assert_eq!(stats.fee_distribution.total(), stats.total_pairs);
        prop_assert_eq!(pair_labels(&pairs).len(), pairs.len());
    }

    #[test]
    fn unclassified_accounts_for_the_rest(fees in prop::collection::vec(any::<u32>(), 0..40)) {
        let pairs: Vec<_> = fees.iter().enumerate().map(|(i, fee)| pair(&format!("T{}", i), *fee, i as u8)).collect();
        let stats = PairStats::from_pairs(&pairs);
        let unknown = fees.iter().filter(|f| ![500, 3000, 10000].contains(*f)).count();
        prop_assert_eq!(stats.unclassified(), unknown);
        prop_assert_eq!(stats.fee_distribution.total() + unknown, stats.total_pairs);
    }
}
