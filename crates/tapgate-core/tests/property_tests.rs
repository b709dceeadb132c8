//! Property-based tests for card data invariants.
//!
//! These tests use proptest to generate random valid inputs and verify that
//! the uid rendering and token sanitization invariants hold for all of them.

use proptest::prelude::*;
use tapgate_core::{CardUid, ProgrammedToken};

/// Strategy for generating valid uid byte sequences (4-10 bytes).
fn valid_uid_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 4..=10)
}

/// Strategy for generating arbitrary block content of block length.
fn block_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 16)
}

proptest! {
    /// Property: the hex rendering is exactly two uppercase hex digits per
    /// byte and parses back to the original bytes.
    #[test]
    fn prop_uid_hex_round_trip(bytes in valid_uid_bytes()) {
        let uid = CardUid::new(bytes.clone()).unwrap();
        let hex = uid.to_hex();

        prop_assert_eq!(hex.len(), bytes.len() * 2);
        prop_assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));

        let parsed = CardUid::parse_hex(&hex).unwrap();
        prop_assert_eq!(parsed.as_bytes(), bytes.as_slice());
    }

    /// Property: sanitizing a block keeps only printable ASCII and is
    /// idempotent.
    #[test]
    fn prop_token_sanitization_idempotent(raw in block_bytes()) {
        let once = ProgrammedToken::from_block_bytes(&raw);

        prop_assert!(once.as_str().bytes().all(|b| (32..=126).contains(&b)));

        let twice = ProgrammedToken::from_block_bytes(once.as_str().as_bytes());
        prop_assert_eq!(once, twice);
    }

    /// Property: sanitization preserves the relative order of kept bytes.
    #[test]
    fn prop_token_preserves_order(raw in block_bytes()) {
        let token = ProgrammedToken::from_block_bytes(&raw);
        let expected: String = raw
            .iter()
            .copied()
            .filter(|b| (32..=126).contains(b))
            .map(char::from)
            .collect();
        prop_assert_eq!(token.as_str(), expected.as_str());
    }
}
