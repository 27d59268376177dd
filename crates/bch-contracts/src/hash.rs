//! Hash helpers for script and address derivation.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// RIPEMD-160 of SHA-256, used for P2PKH and P2SH20 hashes.
pub(crate) fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

/// Double SHA-256, used for P2SH32 hashes.
pub(crate) fn hash256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify hash160 against a known vector (hash160 of empty input).
    #[test]
    fn test_hash160_empty() {
        assert_eq!(
            hex::encode(hash160(&[])),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
    }

    /// Verify hash256 against a known vector (double SHA-256 of empty input).
    #[test]
    fn test_hash256_empty() {
        assert_eq!(
            hex::encode(hash256(&[])),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }
}
