use crate::debugging::RequireFailure;
use crate::provider::ProviderError;

/// Error types for contract and transaction-building operations.
///
/// All variants surface to the caller unmodified; only transient lookup
/// failures during confirmation polling are swallowed and retried.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// Malformed input during construction or build: invalid output,
    /// inconsistent unlocker assignment, or fee exceeding the ceiling.
    #[error("validation error: {0}")]
    Validation(String),

    /// A contract input's unlocker could not be matched to any of the
    /// contract's declared functions during template compilation.
    #[error("could not find matching unlock function for input {input_index}")]
    UnresolvedUnlocker {
        /// The index of the offending input.
        input_index: usize,
    },

    /// VM evaluation of a contract input failed a `require` statement.
    #[error("{0}")]
    FailedRequire(RequireFailure),

    /// The network provider rejected the broadcast.
    #[error("transaction failed: {0}")]
    FailedTransaction(String),

    /// The post-broadcast polling loop exhausted its retry budget without
    /// retrieving the transaction.
    #[error("could not retrieve transaction after {attempts} attempts")]
    ConfirmationTimeout {
        /// The number of lookup attempts made before giving up.
        attempts: u32,
    },

    /// The artifact or its debug info is malformed.
    #[error("invalid artifact: {0}")]
    Artifact(String),

    /// A network provider operation failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A transaction-level error occurred.
    #[error(transparent)]
    Transaction(#[from] bch_transaction::TransactionError),

    /// A script-level error occurred.
    #[error(transparent)]
    Script(#[from] bch_script::ScriptError),
}
