//! Property tests for the session registry over the in-memory store.

use std::sync::Arc;

use idlink_crypto::sha256_str;
use idlink_nullables::{NullClock, NullCodes, NullStore};
use idlink_verification::{RegistryConfig, SessionRegistry, VerificationError, VerifyRequest};
use proptest::prelude::*;

fn registry(codes: Vec<String>) -> SessionRegistry {
    SessionRegistry::with_parts(
        Arc::new(NullStore::new()),
        Arc::new(NullClock::new(1_700_000_000)),
        Arc::new(NullCodes::new(codes)),
        RegistryConfig::default(),
    )
}

fn request<'a>(identity: &'a str, code: &'a str, fingerprint: &'a str, ip: &'a str) -> VerifyRequest<'a> {
    VerifyRequest {
        identity,
        code,
        external_username: "bob",
        fingerprint,
        ip,
    }
}

proptest! {
    /// Status is false before any redemption and true after one.
    #[test]
    fn status_flips_only_on_redemption(identity in "[0-9]{1,19}", code in "[0-9A-F]{8}") {
        let reg = registry(vec![code.clone()]);
        prop_assert!(!reg.query_status(&identity).unwrap());
        reg.issue_code(&identity).unwrap();
        prop_assert!(!reg.query_status(&identity).unwrap());
        reg.verify_with_payload(&request(&identity, &code, "fp", "1.1.1.1")).unwrap();
        prop_assert!(reg.query_status(&identity).unwrap());
    }

    /// Any submission other than the issued code fails, whether it differs by
    /// case, by a prefix, or entirely.
    #[test]
    fn only_the_issued_code_redeems(code in "[0-9A-F]{8}", other in "[0-9A-Za-z]{1,10}") {
        prop_assume!(other != code);
        let reg = registry(vec![code.clone()]);
        reg.issue_code("u1").unwrap();

        let variants = [other.clone(), code.to_lowercase(), code[..7].to_string()];
        for wrong in variants.iter().filter(|w| **w != code) {
            prop_assert!(matches!(
                reg.confirm_by_click("u1", wrong),
                Err(VerificationError::InvalidCode)
            ));
            prop_assert!(matches!(
                reg.verify_with_payload(&request("u1", wrong, "fp", "ip")),
                Err(VerificationError::InvalidCode)
            ));
        }
        prop_assert!(!reg.query_status("u1").unwrap());
    }

    /// A payload redemption is single-use.
    #[test]
    fn payload_redemption_is_single_use(code in "[0-9A-F]{8}") {
        let reg = registry(vec![code.clone()]);
        reg.issue_code("u1").unwrap();
        prop_assert!(reg.verify_with_payload(&request("u1", &code, "fp", "ip")).is_ok());
        prop_assert!(matches!(
            reg.verify_with_payload(&request("u1", &code, "fp", "ip")),
            Err(VerificationError::InvalidCode)
        ));
    }

    /// Re-issuing invalidates the earlier code.
    #[test]
    fn reissue_invalidates(first in "[0-9A-F]{8}", second in "[0-9A-F]{8}") {
        prop_assume!(first != second);
        let reg = registry(vec![first.clone(), second.clone()]);
        reg.issue_code("u1").unwrap();
        reg.issue_code("u1").unwrap();
        prop_assert!(matches!(
            reg.verify_with_payload(&request("u1", &first, "fp", "ip")),
            Err(VerificationError::InvalidCode)
        ));
        prop_assert!(reg.verify_with_payload(&request("u1", &second, "fp", "ip")).is_ok());
    }

    /// Stored hashes are the digests of the exact submitted bytes.
    #[test]
    fn record_hashes_exact_input(fingerprint in "\\PC{1,64}", ip in "[0-9a-f:.]{1,39}") {
        let reg = registry(vec!["C0DEC0DE".to_string()]);
        reg.issue_code("u1").unwrap();
        reg.verify_with_payload(&request("u1", "C0DEC0DE", &fingerprint, &ip)).unwrap();

        let record = reg.verification_record("u1").unwrap().unwrap();
        prop_assert_eq!(record.fingerprint_hash, sha256_str(&fingerprint));
        prop_assert_eq!(record.ip_hash, sha256_str(&ip));
    }

    /// Sessions for different identities do not interfere.
    #[test]
    fn identities_are_independent(a in "[0-9]{1,10}", b in "[0-9]{1,10}") {
        prop_assume!(a != b);
        let reg = registry(vec!["AAAAAAAA".to_string(), "BBBBBBBB".to_string()]);
        reg.issue_code(&a).unwrap();
        reg.issue_code(&b).unwrap();
        prop_assert!(reg.verify_with_payload(&request(&a, "BBBBBBBB", "fp", "ip")).is_err());
        prop_assert!(reg.verify_with_payload(&request(&a, "AAAAAAAA", "fp", "ip")).is_ok());
        prop_assert!(!reg.query_status(&b).unwrap());
    }
}
