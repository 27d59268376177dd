//! CashTokens output prefix encoding and decoding.
//!
//! Token-carrying outputs serialize a token prefix in front of the locking
//! bytecode, inside the same VarInt-prefixed field. The prefix starts with
//! the marker byte `0xef`, followed by the 32-byte category, a bitfield,
//! and optional commitment and fungible amount fields.

use crate::wire::{TxReader, TxWriter, VarInt};
use crate::TransactionError;

/// Marker byte that introduces a token prefix in an output's script field.
pub const PREFIX_TOKEN: u8 = 0xef;

/// Bitfield flag: the prefix carries a commitment length and commitment.
const HAS_COMMITMENT_LENGTH: u8 = 0x40;
/// Bitfield flag: the prefix describes a non-fungible token.
const HAS_NFT: u8 = 0x20;
/// Bitfield flag: the prefix carries a fungible token amount.
const HAS_AMOUNT: u8 = 0x10;
/// Bitfield mask for the NFT capability nibble.
const CAPABILITY_MASK: u8 = 0x0f;
/// Bitfield mask for the reserved high bit, which must be unset.
const RESERVED_BIT: u8 = 0x80;

/// Maximum fungible token amount (2^63 - 1).
pub const MAX_TOKEN_AMOUNT: u64 = 0x7fff_ffff_ffff_ffff;

/// Capability of a non-fungible token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NftCapability {
    /// The NFT is immutable.
    None,
    /// The NFT's commitment may be changed when spent.
    Mutable,
    /// The NFT can mint new tokens of its category.
    Minting,
}

impl NftCapability {
    fn to_bits(self) -> u8 {
        match self {
            NftCapability::None => 0x00,
            NftCapability::Mutable => 0x01,
            NftCapability::Minting => 0x02,
        }
    }

    fn from_bits(bits: u8) -> Result<Self, TransactionError> {
        match bits {
            0x00 => Ok(NftCapability::None),
            0x01 => Ok(NftCapability::Mutable),
            0x02 => Ok(NftCapability::Minting),
            other => Err(TransactionError::InvalidTokenPrefix(format!(
                "unknown NFT capability bits 0x{:02x}",
                other
            ))),
        }
    }
}

/// The non-fungible part of a token-carrying output.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NonFungibleTokenData {
    /// The NFT's capability.
    pub capability: NftCapability,
    /// The NFT's commitment bytes (may be empty).
    #[serde(with = "hex_bytes")]
    pub commitment: Vec<u8>,
}

/// Token data attached to a transaction output.
///
/// The category is held in display order (as shown in hex APIs); it is
/// byte-reversed when written to the wire, matching txid conventions.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenData {
    /// The 32-byte token category, in display byte order.
    #[serde(with = "hex_array")]
    pub category: [u8; 32],
    /// The fungible token amount. Zero when the output carries only an NFT.
    pub amount: u64,
    /// Optional non-fungible token data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft: Option<NonFungibleTokenData>,
}

impl TokenData {
    /// Encode this token data as a wire-format prefix.
    ///
    /// # Returns
    /// The prefix bytes starting with the `0xef` marker, or an error if
    /// the token data violates the consensus limits.
    pub fn encoded_prefix(&self) -> Result<Vec<u8>, TransactionError> {
        if self.amount > MAX_TOKEN_AMOUNT {
            return Err(TransactionError::InvalidTokenPrefix(format!(
                "token amount {} exceeds maximum",
                self.amount
            )));
        }
        if self.amount == 0 && self.nft.is_none() {
            return Err(TransactionError::InvalidTokenPrefix(
                "token prefix must carry an NFT or a positive amount".to_string(),
            ));
        }

        let mut bitfield = 0u8;
        if self.amount > 0 {
            bitfield |= HAS_AMOUNT;
        }
        if let Some(ref nft) = self.nft {
            bitfield |= HAS_NFT;
            bitfield |= nft.capability.to_bits();
            if !nft.commitment.is_empty() {
                bitfield |= HAS_COMMITMENT_LENGTH;
            }
        }

        let mut writer = TxWriter::with_capacity(34);
        writer.write_u8(PREFIX_TOKEN);
        let mut category = self.category;
        category.reverse();
        writer.write_bytes(&category);
        writer.write_u8(bitfield);

        if let Some(ref nft) = self.nft {
            if !nft.commitment.is_empty() {
                writer.write_varint(VarInt::from(nft.commitment.len()));
                writer.write_bytes(&nft.commitment);
            }
        }
        if self.amount > 0 {
            writer.write_varint(VarInt(self.amount));
        }

        Ok(writer.into_bytes())
    }
}

/// Split an output's script field into its token prefix and locking bytecode.
///
/// If the field does not begin with the `0xef` marker, the entire field is
/// returned as locking bytecode with no token data.
///
/// # Arguments
/// * `field` - The complete VarInt-delimited script field of an output.
///
/// # Returns
/// A tuple of optional token data and the locking bytecode, or an error
/// if a present prefix is malformed.
pub fn split_prefix(field: &[u8]) -> Result<(Option<TokenData>, Vec<u8>), TransactionError> {
    if field.first() != Some(&PREFIX_TOKEN) {
        return Ok((None, field.to_vec()));
    }

    let mut reader = TxReader::new(&field[1..]);

    let category_bytes = reader.read_bytes(32).map_err(|e| {
        TransactionError::InvalidTokenPrefix(format!("reading category: {}", e))
    })?;
    let mut category = [0u8; 32];
    category.copy_from_slice(category_bytes);
    category.reverse();

    let bitfield = reader.read_u8().map_err(|e| {
        TransactionError::InvalidTokenPrefix(format!("reading bitfield: {}", e))
    })?;

    if bitfield & RESERVED_BIT != 0 {
        return Err(TransactionError::InvalidTokenPrefix(
            "reserved bitfield bit is set".to_string(),
        ));
    }
    let has_nft = bitfield & HAS_NFT != 0;
    let has_commitment = bitfield & HAS_COMMITMENT_LENGTH != 0;
    let has_amount = bitfield & HAS_AMOUNT != 0;
    let capability_bits = bitfield & CAPABILITY_MASK;

    if !has_nft && !has_amount {
        return Err(TransactionError::InvalidTokenPrefix(
            "token prefix carries neither an NFT nor an amount".to_string(),
        ));
    }
    if !has_nft && (has_commitment || capability_bits != 0) {
        return Err(TransactionError::InvalidTokenPrefix(
            "commitment or capability set without NFT flag".to_string(),
        ));
    }

    let nft = if has_nft {
        let capability = NftCapability::from_bits(capability_bits)?;
        let commitment = if has_commitment {
            let len = reader.read_varint().map_err(|e| {
                TransactionError::InvalidTokenPrefix(format!("reading commitment length: {}", e))
            })?;
            if len.value() == 0 {
                return Err(TransactionError::InvalidTokenPrefix(
                    "commitment length must be at least 1".to_string(),
                ));
            }
            reader
                .read_bytes(len.value() as usize)
                .map_err(|e| {
                    TransactionError::InvalidTokenPrefix(format!("reading commitment: {}", e))
                })?
                .to_vec()
        } else {
            Vec::new()
        };
        Some(NonFungibleTokenData { capability, commitment })
    } else {
        None
    };

    let amount = if has_amount {
        let amount = reader
            .read_varint()
            .map_err(|e| {
                TransactionError::InvalidTokenPrefix(format!("reading amount: {}", e))
            })?
            .value();
        if amount == 0 || amount > MAX_TOKEN_AMOUNT {
            return Err(TransactionError::InvalidTokenPrefix(format!(
                "token amount {} out of range",
                amount
            )));
        }
        amount
    } else {
        0
    };

    let bytecode_len = reader.remaining();
    let locking_bytecode = reader
        .read_bytes(bytecode_len)
        .map_err(|e| TransactionError::InvalidTokenPrefix(format!("reading bytecode: {}", e)))?
        .to_vec();

    Ok((Some(TokenData { category, amount, nft }), locking_bytecode))
}

mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    //! Tests for CashTokens prefix encoding and decoding.

    use super::*;

    fn category() -> [u8; 32] {
        let mut cat = [0u8; 32];
        for (i, b) in cat.iter_mut().enumerate() {
            *b = i as u8;
        }
        cat
    }

    /// Verify a fungible-only prefix encodes marker, reversed category,
    /// the HAS_AMOUNT bit, and the varint amount.
    #[test]
    fn test_encode_fungible_only() {
        let token = TokenData { category: category(), amount: 100, nft: None };
        let prefix = token.encoded_prefix().expect("valid token");

        assert_eq!(prefix[0], PREFIX_TOKEN);
        let mut expected_cat = category();
        expected_cat.reverse();
        assert_eq!(&prefix[1..33], &expected_cat);
        assert_eq!(prefix[33], HAS_AMOUNT);
        assert_eq!(prefix[34], 100);
        assert_eq!(prefix.len(), 35);
    }

    /// Verify an NFT with commitment and amount sets all bitfield flags
    /// and serializes the commitment with its length.
    #[test]
    fn test_encode_nft_with_commitment_and_amount() {
        let token = TokenData {
            category: category(),
            amount: 1000,
            nft: Some(NonFungibleTokenData {
                capability: NftCapability::Mutable,
                commitment: vec![0x01, 0x02],
            }),
        };
        let prefix = token.encoded_prefix().expect("valid token");

        assert_eq!(prefix[33], HAS_AMOUNT | HAS_NFT | HAS_COMMITMENT_LENGTH | 0x01);
        assert_eq!(prefix[34], 2);
        assert_eq!(&prefix[35..37], &[0x01, 0x02]);
        // 1000 encodes as fd e8 03
        assert_eq!(&prefix[37..], &[0xfd, 0xe8, 0x03]);
    }

    /// Verify encode/split roundtrips preserve token data and bytecode.
    #[test]
    fn test_prefix_roundtrip() {
        let tokens = [
            TokenData { category: category(), amount: 1, nft: None },
            TokenData {
                category: category(),
                amount: 0,
                nft: Some(NonFungibleTokenData {
                    capability: NftCapability::None,
                    commitment: Vec::new(),
                }),
            },
            TokenData {
                category: category(),
                amount: MAX_TOKEN_AMOUNT,
                nft: Some(NonFungibleTokenData {
                    capability: NftCapability::Minting,
                    commitment: vec![0xaa; 40],
                }),
            },
        ];
        let bytecode = hex::decode("76a914e2a623699e81b291c0327f408fea765d534baa2a88ac")
            .expect("valid hex");

        for token in tokens {
            let mut field = token.encoded_prefix().expect("valid token");
            field.extend_from_slice(&bytecode);

            let (parsed, parsed_bytecode) = split_prefix(&field).expect("should split");
            assert_eq!(parsed.as_ref(), Some(&token));
            assert_eq!(parsed_bytecode, bytecode);
        }
    }

    /// Verify a field without the marker byte yields no token data.
    #[test]
    fn test_split_no_prefix() {
        let bytecode = hex::decode("76a914e2a623699e81b291c0327f408fea765d534baa2a88ac")
            .expect("valid hex");
        let (token, parsed) = split_prefix(&bytecode).expect("should split");
        assert!(token.is_none());
        assert_eq!(parsed, bytecode);
    }

    /// Verify malformed prefixes are rejected.
    #[test]
    fn test_split_rejects_malformed() {
        // truncated category
        let mut field = vec![PREFIX_TOKEN];
        field.extend_from_slice(&[0u8; 10]);
        assert!(split_prefix(&field).is_err());

        // neither NFT nor amount flag
        let mut field = vec![PREFIX_TOKEN];
        field.extend_from_slice(&[0u8; 32]);
        field.push(0x00);
        assert!(split_prefix(&field).is_err());

        // reserved bit set
        let mut field = vec![PREFIX_TOKEN];
        field.extend_from_slice(&[0u8; 32]);
        field.push(0x90);
        assert!(split_prefix(&field).is_err());

        // capability bits without NFT flag
        let mut field = vec![PREFIX_TOKEN];
        field.extend_from_slice(&[0u8; 32]);
        field.push(HAS_AMOUNT | 0x01);
        field.push(0x05);
        assert!(split_prefix(&field).is_err());

        // amount of zero
        let mut field = vec![PREFIX_TOKEN];
        field.extend_from_slice(&[0u8; 32]);
        field.push(HAS_AMOUNT);
        field.push(0x00);
        assert!(split_prefix(&field).is_err());
    }

    /// Verify invalid token data is rejected at encode time.
    #[test]
    fn test_encode_rejects_invalid() {
        let empty = TokenData { category: category(), amount: 0, nft: None };
        assert!(empty.encoded_prefix().is_err());

        let oversized = TokenData {
            category: category(),
            amount: MAX_TOKEN_AMOUNT + 1,
            nft: None,
        };
        assert!(oversized.encoded_prefix().is_err());
    }
}
