//! Transaction output with satoshi value, locking script, and optional
//! CashTokens data.
//!
//! On the wire the token prefix and locking bytecode share a single
//! VarInt-delimited field; `read_from`/`write_to` handle the combined
//! encoding transparently.

use bch_script::Script;

use crate::token::{self, TokenData};
use crate::wire::{TxReader, TxWriter, VarInt};
use crate::TransactionError;

/// A single output in a Bitcoin Cash transaction.
///
/// Each output specifies a satoshi `satoshis` value and a `locking_script`
/// (scriptPubKey) that defines the conditions under which the funds may be
/// spent. Token-carrying outputs additionally hold `token` data, which is
/// serialized as a prefix inside the script field.
///
/// # Wire format
///
/// | Field                          | Size           |
/// |--------------------------------|----------------|
/// | satoshis                       | 8 bytes (LE)   |
/// | field length                   | VarInt         |
/// | [token prefix] locking_script  | variable       |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// The number of satoshis locked by this output.
    pub satoshis: u64,

    /// The locking script (scriptPubKey) that defines spending conditions.
    pub locking_script: Script,

    /// Optional CashTokens data carried by this output.
    pub token: Option<TokenData>,
}

impl TransactionOutput {
    /// Create a new `TransactionOutput` with zero satoshis, an empty script,
    /// and no token data.
    ///
    /// # Returns
    /// A default `TransactionOutput`.
    pub fn new() -> Self {
        TransactionOutput {
            satoshis: 0,
            locking_script: Script::new(),
            token: None,
        }
    }

    /// Deserialize a `TransactionOutput` from a `TxReader`.
    ///
    /// Reads 8-byte LE satoshis and the VarInt-delimited script field,
    /// then splits a leading token prefix from the locking bytecode.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded output.
    ///
    /// # Returns
    /// `Ok(TransactionOutput)` on success, or a `TransactionError` if the
    /// data is truncated or a token prefix is malformed.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, TransactionError> {
        let satoshis = reader.read_u64_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading satoshis: {}", e))
        })?;

        let field_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading script length: {}", e))
        })?;

        let field = reader.read_bytes(field_len.value() as usize).map_err(|e| {
            TransactionError::SerializationError(format!("reading locking script: {}", e))
        })?;

        let (token, bytecode) = token::split_prefix(field)?;

        Ok(TransactionOutput {
            satoshis,
            locking_script: Script::from_bytes(&bytecode),
            token,
        })
    }

    /// Serialize this `TransactionOutput` into a `TxWriter`.
    ///
    /// # Arguments
    /// * `writer` - The writer to append serialized bytes to.
    ///
    /// # Returns
    /// `Ok(())` on success, or an error if the token data is invalid.
    pub fn write_to(&self, writer: &mut TxWriter) -> Result<(), TransactionError> {
        writer.write_u64_le(self.satoshis);

        let mut field = match &self.token {
            Some(token) => token.encoded_prefix()?,
            None => Vec::new(),
        };
        field.extend_from_slice(self.locking_script.to_bytes());

        writer.write_varint(VarInt::from(field.len()));
        writer.write_bytes(&field);
        Ok(())
    }

    /// Serialize this output to a byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` containing the wire-format bytes, or an error if the
    /// token data is invalid.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let mut writer = TxWriter::new();
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

impl Default for TransactionOutput {
    fn default() -> Self {
        Self::new()
    }
}
