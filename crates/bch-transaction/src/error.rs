use crate::wire::WireError;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Binary serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// The transaction structure is invalid.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// A CashTokens output prefix is malformed.
    #[error("invalid token prefix: {0}")]
    InvalidTokenPrefix(String),

    /// A script-level error occurred.
    #[error(transparent)]
    Script(#[from] bch_script::ScriptError),

    /// A low-level wire read failed.
    #[error(transparent)]
    Wire(#[from] WireError),
}
