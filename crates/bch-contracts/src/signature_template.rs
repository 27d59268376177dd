//! Placeholder signature templates for P2PKH inputs.
//!
//! A signature template holds a private key and stands in for a real
//! signer: it derives the compressed public key and P2PKH locking
//! bytecode, and produces a fixed-size placeholder signature in unlocking
//! bytecode. Actual signing is the domain of wallet tooling and the
//! external VM evaluator, not this SDK.

use bch_script::opcodes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160};
use bch_script::Script;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;

use crate::hash::hash160;
use crate::ContractError;

/// Byte length of a placeholder transaction signature (64-byte Schnorr
/// signature plus one hash-type byte).
pub const PLACEHOLDER_SIGNATURE_LENGTH: usize = 65;

/// A signature capability bound to a single private key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureTemplate {
    private_key: [u8; 32],
    public_key: [u8; 33],
}

impl SignatureTemplate {
    /// Create a template from a raw 32-byte private key.
    ///
    /// # Arguments
    /// * `private_key` - The secp256k1 private key bytes.
    ///
    /// # Returns
    /// A template with the derived compressed public key, or a validation
    /// error if the key is not a valid scalar.
    pub fn new(private_key: [u8; 32]) -> Result<Self, ContractError> {
        let secret = SecretKey::from_slice(&private_key)
            .map_err(|_| ContractError::Validation("invalid private key".to_string()))?;
        let point = secret.public_key().to_encoded_point(true);
        let mut public_key = [0u8; 33];
        public_key.copy_from_slice(point.as_bytes());
        Ok(SignatureTemplate { private_key, public_key })
    }

    /// Return the compressed public key derived from the private key.
    ///
    /// # Returns
    /// The 33-byte SEC1 compressed public key.
    pub fn public_key(&self) -> [u8; 33] {
        self.public_key
    }

    /// Return the hash160 of the compressed public key.
    ///
    /// # Returns
    /// The 20-byte public key hash.
    pub fn public_key_hash(&self) -> [u8; 20] {
        hash160(&self.public_key)
    }

    /// Return the private key as a lowercase hex string.
    ///
    /// Used when exporting keys into a debugging template scenario.
    ///
    /// # Returns
    /// A 64-character hex string.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key)
    }

    /// Produce a placeholder transaction signature.
    ///
    /// # Returns
    /// A 65-byte zero-filled vector standing in for a real signature.
    pub fn placeholder_signature(&self) -> Vec<u8> {
        vec![0u8; PLACEHOLDER_SIGNATURE_LENGTH]
    }

    /// Generate the P2PKH locking bytecode for this key.
    ///
    /// # Returns
    /// `OP_DUP OP_HASH160 <pkh> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn generate_locking_bytecode(&self) -> Result<Script, ContractError> {
        let mut script = Script::new();
        script.append_opcodes(&[OP_DUP, OP_HASH160])?;
        script.append_push_data(&self.public_key_hash())?;
        script.append_opcodes(&[OP_EQUALVERIFY, OP_CHECKSIG])?;
        Ok(script)
    }

    /// Generate placeholder P2PKH unlocking bytecode.
    ///
    /// # Returns
    /// `<placeholder signature> <public key>`.
    pub fn generate_unlocking_bytecode(&self) -> Result<Script, ContractError> {
        let mut script = Script::new();
        script.append_push_data(&self.placeholder_signature())?;
        script.append_push_data(&self.public_key)?;
        Ok(script)
    }

    /// The signature algorithm name used in template script annotations.
    pub fn signature_algorithm_name() -> &'static str {
        "schnorr_signature"
    }

    /// The hash-type name used in template script annotations.
    pub fn hash_type_name() -> &'static str {
        "all_outputs"
    }
}
