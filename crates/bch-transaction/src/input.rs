//! Transaction input referencing a previous output.
//!
//! Contains the source transaction ID, output index, unlocking script,
//! and sequence number, with binary serialization following the Bitcoin
//! Cash wire format.

use bch_script::Script;

use crate::wire::{TxReader, TxWriter, VarInt};
use crate::TransactionError;

/// Default sequence number for new inputs.
///
/// `0xFFFFFFFE` disables relative time locks on the input while keeping
/// absolute lock times (`nLockTime`) enforceable.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFE;

/// A single input in a Bitcoin Cash transaction.
///
/// Each input references an output from a previous transaction by its
/// transaction ID (`source_txid`) and output index (`source_output_index`).
/// The `unlocking_script` (scriptSig) supplies the data required to satisfy
/// the referenced output's locking script.
///
/// # Wire format
///
/// | Field               | Size             |
/// |---------------------|------------------|
/// | source_txid         | 32 bytes (LE)    |
/// | source_output_index | 4 bytes (LE)     |
/// | script length       | VarInt           |
/// | unlocking_script    | variable         |
/// | sequence_number     | 4 bytes (LE)     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// The 32-byte transaction ID of the output being spent, in internal
    /// (little-endian) byte order.
    pub source_txid: [u8; 32],

    /// Index of the output within the source transaction.
    pub source_output_index: u32,

    /// Sequence number. Defaults to `0xFFFFFFFE`.
    pub sequence_number: u32,

    /// The unlocking script (scriptSig) that proves authorization.
    /// Empty when the input has not yet been unlocked.
    pub unlocking_script: Script,
}

impl TransactionInput {
    /// Create a new `TransactionInput` with default values.
    ///
    /// The source txid is zeroed, output index is 0, sequence is the
    /// default, and the unlocking script is empty.
    ///
    /// # Returns
    /// A default `TransactionInput`.
    pub fn new() -> Self {
        TransactionInput {
            source_txid: [0u8; 32],
            source_output_index: 0,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: Script::new(),
        }
    }

    /// Create an input spending a given outpoint, identified by its
    /// display-order txid hex.
    ///
    /// # Arguments
    /// * `txid_hex` - The txid of the source transaction, in display order.
    /// * `vout` - The index of the output being spent.
    ///
    /// # Returns
    /// An input with an empty unlocking script, or an error if the txid
    /// hex is invalid.
    pub fn from_outpoint(txid_hex: &str, vout: u32) -> Result<Self, TransactionError> {
        let bytes = hex::decode(txid_hex).map_err(|e| {
            TransactionError::SerializationError(format!("invalid txid hex: {}", e))
        })?;
        let mut source_txid: [u8; 32] = bytes.try_into().map_err(|_| {
            TransactionError::SerializationError("txid must be 32 bytes".to_string())
        })?;
        source_txid.reverse();

        Ok(TransactionInput {
            source_txid,
            source_output_index: vout,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: Script::new(),
        })
    }

    /// Return the source txid as a display-order hex string.
    ///
    /// # Returns
    /// A 64-character hex string.
    pub fn source_txid_hex(&self) -> String {
        let mut id = self.source_txid;
        id.reverse();
        hex::encode(id)
    }

    /// Deserialize a `TransactionInput` from a `TxReader`.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded input.
    ///
    /// # Returns
    /// `Ok(TransactionInput)` on success, or a `TransactionError` if the
    /// data is truncated or malformed.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, TransactionError> {
        let txid_bytes = reader.read_bytes(32).map_err(|e| {
            TransactionError::SerializationError(format!("reading source txid: {}", e))
        })?;
        let mut source_txid = [0u8; 32];
        source_txid.copy_from_slice(txid_bytes);

        let source_output_index = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading script length: {}", e))
        })?;

        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            TransactionError::SerializationError(format!("reading unlocking script: {}", e))
        })?;

        let sequence_number = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        Ok(TransactionInput {
            source_txid,
            source_output_index,
            sequence_number,
            unlocking_script: Script::from_bytes(script_bytes),
        })
    }

    /// Serialize this `TransactionInput` into a `TxWriter`.
    ///
    /// # Arguments
    /// * `writer` - The writer to append serialized bytes to.
    pub fn write_to(&self, writer: &mut TxWriter) {
        writer.write_bytes(&self.source_txid);
        writer.write_u32_le(self.source_output_index);

        let script_bytes = self.unlocking_script.to_bytes();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(script_bytes);

        writer.write_u32_le(self.sequence_number);
    }
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self::new()
    }
}
