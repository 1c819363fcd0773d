//! SHA-256 hashing for privacy-sensitive fields.

use idlink_types::Digest;
use sha2::{Digest as _, Sha256};

/// Compute the SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> Digest {
    let result = Sha256::digest(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    Digest::new(output)
}

/// Hash the UTF-8 bytes of a string exactly as submitted (no trimming or case folding).
pub fn sha256_str(data: &str) -> Digest {
    sha256(data.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_deterministic() {
        assert_eq!(sha256(b"fp-xyz"), sha256(b"fp-xyz"));
    }

    #[test]
    fn sha256_different_inputs() {
        assert_ne!(sha256(b"9.9.9.9"), sha256(b"9.9.9.8"));
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            sha256(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_empty() {
        assert_eq!(
            sha256(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn str_variant_hashes_raw_bytes() {
        assert_eq!(sha256_str("1.2.3.4"), sha256(b"1.2.3.4"));
        assert_ne!(sha256_str(" 1.2.3.4"), sha256(b"1.2.3.4"));
    }
}
