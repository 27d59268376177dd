//! Core transaction type for the BCH blockchain.
//!
//! Represents a complete transaction with version, inputs, outputs, and
//! locktime. Supports binary and hex serialization and transaction ID
//! computation.

use sha2::{Digest, Sha256};

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::wire::{TxReader, TxWriter, VarInt};
use crate::TransactionError;

/// Default transaction format version for newly built transactions.
pub const DEFAULT_VERSION: u32 = 2;

/// A BCH transaction consisting of a version, a set of inputs, a set of
/// outputs, and a lock time.
///
/// # Wire format
///
/// | Field        | Size                      |
/// |--------------|---------------------------|
/// | version      | 4 bytes (LE)              |
/// | input count  | VarInt                    |
/// | inputs       | variable (per input)      |
/// | output count | VarInt                    |
/// | outputs      | variable (per output)     |
/// | lock_time    | 4 bytes (LE)              |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. If non-zero, the transaction is not valid until the
    /// specified block height or Unix timestamp.
    pub lock_time: u32,
}

impl Transaction {
    /// Create a new empty transaction with version 2 and lock time 0.
    ///
    /// # Returns
    /// A `Transaction` with no inputs or outputs.
    pub fn new() -> Self {
        Transaction {
            version: DEFAULT_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of the raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the hex is
    /// invalid or the bytes do not form a valid transaction.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// The byte slice must contain exactly one complete transaction with no
    /// trailing data.
    ///
    /// # Arguments
    /// * `bytes` - The raw transaction bytes.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` if the data
    /// is truncated, malformed, or has trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = TxReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `TxReader`.
    ///
    /// Reads the version, input count, inputs, output count, outputs, and
    /// lock time in standard wire format.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of a serialized transaction.
    ///
    /// # Returns
    /// `Ok(Transaction)` on success, or a `TransactionError` on format errors.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let input_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading input count: {}", e))
        })?;

        let mut inputs = Vec::with_capacity(input_count.value() as usize);
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading output count: {}", e))
        })?;

        let mut outputs = Vec::with_capacity(output_count.value() as usize);
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        Ok(Transaction { version, inputs, outputs, lock_time })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction to raw bytes.
    ///
    /// # Returns
    /// A `Vec<u8>` containing the standard wire-format bytes, or an error
    /// if an output's token data is invalid.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        let mut writer = TxWriter::with_capacity(256);
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer)?;
        }

        writer.write_u32_le(self.lock_time);
        Ok(writer.into_bytes())
    }

    /// Serialize this transaction to a hex string.
    ///
    /// # Returns
    /// A lowercase hex-encoded string of the raw bytes, or an error if
    /// serialization fails.
    pub fn to_hex(&self) -> Result<String, TransactionError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    // -----------------------------------------------------------------
    // Transaction ID
    // -----------------------------------------------------------------

    /// Compute the transaction ID (double SHA-256 of serialized bytes).
    ///
    /// The txid bytes are in internal (little-endian) order. To get the
    /// conventional display string, use `tx_id_hex()`.
    ///
    /// # Returns
    /// A 32-byte array containing the txid in internal byte order.
    pub fn tx_id(&self) -> Result<[u8; 32], TransactionError> {
        Ok(sha256d(&self.to_bytes()?))
    }

    /// Compute the transaction ID as a human-readable hex string.
    ///
    /// The hex string is byte-reversed from the internal hash, following
    /// Bitcoin's convention where txids are displayed in big-endian order.
    ///
    /// # Returns
    /// A 64-character hex string of the txid.
    pub fn tx_id_hex(&self) -> Result<String, TransactionError> {
        let mut id = self.tx_id()?;
        id.reverse();
        Ok(hex::encode(id))
    }

    // -----------------------------------------------------------------
    // Inputs and outputs
    // -----------------------------------------------------------------

    /// Append a `TransactionInput` to this transaction.
    ///
    /// # Arguments
    /// * `input` - The input to add.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Append a `TransactionOutput` to this transaction.
    ///
    /// # Arguments
    /// * `output` - The output to add.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Compute the sum of all output satoshi values.
    ///
    /// # Returns
    /// The total satoshis across all outputs.
    pub fn total_output_satoshis(&self) -> u64 {
        self.outputs.iter().map(|o| o.satoshis).sum()
    }

    /// Return the size of this transaction in bytes.
    ///
    /// # Returns
    /// The byte length of the serialized transaction, or an error if
    /// serialization fails.
    pub fn size(&self) -> Result<usize, TransactionError> {
        Ok(self.to_bytes()?.len())
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the double SHA-256 hash of the given data.
fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    second.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bch_script::Script;

    fn sample_tx() -> Transaction {
        let mut tx = Transaction::new();
        tx.add_input(
            TransactionInput::from_outpoint(
                "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b",
                0,
            )
            .expect("valid txid"),
        );
        tx.add_output(TransactionOutput {
            satoshis: 9_000,
            locking_script: Script::from_hex(
                "76a914e2a623699e81b291c0327f408fea765d534baa2a88ac",
            )
            .expect("valid hex"),
            token: None,
        });
        tx
    }

    /// Verify a new transaction defaults to version 2 and lock time 0.
    #[test]
    fn test_new_defaults() {
        let tx = Transaction::new();
        assert_eq!(tx.version, 2);
        assert_eq!(tx.lock_time, 0);
        assert!(tx.inputs.is_empty());
        assert!(tx.outputs.is_empty());
    }

    /// Verify hex serialization roundtrips exactly.
    #[test]
    fn test_hex_roundtrip() {
        let tx = sample_tx();
        let hex_str = tx.to_hex().expect("should serialize");
        let parsed = Transaction::from_hex(&hex_str).expect("should parse");
        assert_eq!(parsed, tx);
        assert_eq!(parsed.to_hex().expect("should serialize"), hex_str);
    }

    /// Verify trailing bytes after a complete transaction are rejected.
    #[test]
    fn test_rejects_trailing_bytes() {
        let mut bytes = sample_tx().to_bytes().expect("should serialize");
        bytes.push(0x00);
        assert!(Transaction::from_bytes(&bytes).is_err());
    }

    /// Verify truncated transactions are rejected.
    #[test]
    fn test_rejects_truncated() {
        let bytes = sample_tx().to_bytes().expect("should serialize");
        assert!(Transaction::from_bytes(&bytes[..bytes.len() - 2]).is_err());
    }

    /// Verify the txid is the byte-reversed double SHA-256 of the body.
    #[test]
    fn test_tx_id_display_order() {
        let tx = sample_tx();
        let internal = tx.tx_id().expect("should hash");
        let display = tx.tx_id_hex().expect("should hash");

        let mut reversed = internal;
        reversed.reverse();
        assert_eq!(display, hex::encode(reversed));
        assert_eq!(display.len(), 64);
    }

    /// Verify the txid changes when any serialized field changes.
    #[test]
    fn test_tx_id_sensitivity() {
        let tx = sample_tx();
        let base = tx.tx_id_hex().expect("should hash");

        let mut changed = tx.clone();
        changed.lock_time = 100;
        assert_ne!(changed.tx_id_hex().expect("should hash"), base);

        let mut changed = tx;
        changed.outputs[0].satoshis += 1;
        assert_ne!(changed.tx_id_hex().expect("should hash"), base);
    }

    /// Verify total_output_satoshis sums across outputs.
    #[test]
    fn test_total_output_satoshis() {
        let mut tx = sample_tx();
        tx.add_output(TransactionOutput {
            satoshis: 1_000,
            locking_script: Script::new(),
            token: None,
        });
        assert_eq!(tx.total_output_satoshis(), 10_000);
    }
}
