//! tests/digg_utils_tests.rs
//!
//! Tests for `RatioConverter` and `DiggContract` using ethers' MockProvider.

use badger_utils::core::constants::DIGG;
use badger_utils::{ChainConfig, DiggContract, FragmentSource, RatioConverter, UtilsError};
use ethers::providers::{MockProvider, MockResponse, Provider};
use ethers::types::{Address, U256};
use serde_json::json;
use std::sync::Arc;
use test_case::test_case;

fn word(value: U256) -> serde_json::Value {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    let hex: String = buf.iter().map(|b| format!("{:02x}", b)).collect();
    json!(format!("0x{}", hex))
}

fn digg_address() -> Address {
    DIGG.parse().unwrap()
}

/// Both reads answer with `value`, so response ordering does not matter.
fn mock_contract(value: U256) -> DiggContract<Provider<MockProvider>> {
    let mock = MockProvider::new();
    mock.push_response(MockResponse::Value(word(value)));
    mock.push_response(MockResponse::Value(word(value)));
    DiggContract::new(Arc::new(Provider::new(mock)), digg_address())
}

#[tokio::test]
async fn test_converter_caches_contract_values() {
    let ratio = U256::from_dec_str("58039863746413614660051888441913").unwrap();
    let contract = mock_contract(ratio);

    let converter = RatioConverter::from_source(&contract).await.unwrap();

    assert_eq!(converter.shares_per_fragment(), ratio);
    assert_eq!(converter.initial_shares_per_fragment(), ratio);
}

#[tokio::test]
async fn test_converter_construction_propagates_read_failure() {
    // no responses queued: the provider errors on the first call
    let mock = MockProvider::new();
    let contract = DiggContract::new(Arc::new(Provider::new(mock)), digg_address());

    let err = RatioConverter::from_source(&contract).await.unwrap_err();
    assert!(matches!(err, UtilsError::Contract(_)), "unexpected err: {}", err);
    assert!(err.to_string().contains("_sharesPerFragment()"));
}

#[tokio::test]
async fn test_converter_from_custom_source() {
    struct Fixed;

    #[async_trait::async_trait]
    impl FragmentSource for Fixed {
        async fn shares_per_fragment(&self) -> badger_utils::Result<U256> {
            Ok(U256::from(900u64))
        }

        async fn initial_shares_per_fragment(&self) -> badger_utils::Result<U256> {
            Ok(U256::from(1_000u64))
        }
    }

    let converter = RatioConverter::from_source(&Fixed).await.unwrap();
    assert_eq!(converter.initial_shares_per_fragment(), U256::from(1_000u64));
    assert_eq!(converter.shares_to_fragments(3u64), 300.0);
}

#[test_case(1_000, 0 => 0.0 ; "zero shares")]
#[test_case(1_000, 4 => 250.0 ; "exact division")]
#[test_case(1, 2 => 0.5 ; "fractional result")]
#[test_case(0, 5 => 0.0 ; "zero ratio")]
fn test_shares_to_fragments(ratio: u64, shares: u64) -> f64 {
    RatioConverter::from_values(U256::from(ratio), U256::from(ratio)).shares_to_fragments(shares)
}

#[test]
fn test_shares_to_fragments_large_values() {
    let ratio = U256::from_dec_str("58039863746413614660051888441913").unwrap();
    let shares = U256::from_dec_str("1000000000000000000000").unwrap();
    let converter = RatioConverter::from_values(ratio, ratio);

    assert_eq!(converter.shares_to_fragments(shares), 58039863746.41361);
    assert_eq!(converter.shares_to_fragments(3u64), 1.9346621248804538e31);
    assert_eq!(converter.shares_to_fragments(U256::zero()), 0.0);
}

#[test]
fn test_shares_to_fragments_is_correctly_rounded() {
    // 2^64 + 2^63 + 6143 sits just below a rounding midpoint
    let ratio = U256::from_dec_str("27670116110564333567").unwrap();
    let converter = RatioConverter::from_values(ratio, ratio);
    assert_eq!(converter.shares_to_fragments(1u64), 2.767011611056433e19);

    // rounding both operands before dividing would give 1.4242267729088792e22
    let ratio =
        U256::from_dec_str("1441008282123858376827740924670906913962249362422670620962").unwrap();
    let shares = U256::from_dec_str("101178289127419221945301652128890859").unwrap();
    let converter = RatioConverter::from_values(ratio, ratio);
    assert_eq!(converter.shares_to_fragments(shares), 1.4242267729088794e22);
}

#[tokio::test]
async fn test_connect_with_invalid_rpc_url_is_config_error() {
    let config = ChainConfig::new("definitely not a url", digg_address());
    let err = RatioConverter::connect(&config).await.unwrap_err();
    assert!(matches!(err, UtilsError::Config(_)));
}

#[tokio::test]
async fn test_connect_with_unreachable_node_is_contract_error() {
    let config = ChainConfig::new("http://127.0.0.1:9", digg_address());
    let err = RatioConverter::connect(&config).await.unwrap_err();
    assert!(matches!(err, UtilsError::Contract(_)), "unexpected err: {}", err);
}
