use proptest::prelude::*;

use idlink_types::{Digest, Identity, Timestamp, VerificationCode};

proptest! {
    /// Digest roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn digest_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let digest = Digest::new(bytes);
        prop_assert_eq!(digest.as_bytes(), &bytes);
    }

    /// Digest hex rendering is always 64 lowercase hex characters.
    #[test]
    fn digest_hex_shape(bytes in prop::array::uniform32(0u8..)) {
        let hex = Digest::new(bytes).to_hex();
        prop_assert_eq!(hex.len(), 64);
        prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    /// Digest bincode serialization roundtrip.
    #[test]
    fn digest_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let digest = Digest::new(bytes);
        let encoded = bincode::serialize(&digest).unwrap();
        let decoded: Digest = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, digest);
    }

    /// Identities serialize as bare JSON strings.
    #[test]
    fn identity_is_transparent_in_json(raw in "[0-9]{1,20}") {
        let json = serde_json::to_string(&Identity::new(raw.clone())).unwrap();
        prop_assert_eq!(json, format!("\"{raw}\""));
    }

    /// A code never matches a submission that differs from it.
    #[test]
    fn code_matches_only_itself(code in "[0-9A-F]{8}", other in "[0-9A-Za-z]{0,10}") {
        let stored = VerificationCode::new(code.clone());
        prop_assert_eq!(stored.matches(&other), other == code);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }
}
