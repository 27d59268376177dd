//! Network providers: UTXO lookup, broadcast, and transaction retrieval.

use bch_script::Script;

use crate::utxo::Utxo;

mod http;
mod mock;

pub use http::{HttpNetworkProvider, HttpProviderConfig};
pub use mock::MockNetworkProvider;

/// Error type for network provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP transport failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The node rejected a broadcast transaction.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// The requested transaction is not known to the provider.
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// The provider returned a response the client could not interpret.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Read and broadcast access to the network.
///
/// Implementations are shared-state safe; the builder only needs `&self`.
pub trait NetworkProvider: Send + Sync {
    /// List the unspent outputs paying a locking script.
    ///
    /// # Arguments
    /// * `locking_script` - The locking bytecode to query.
    ///
    /// # Returns
    /// The unspent outputs, in provider order.
    fn get_utxos(
        &self,
        locking_script: &Script,
    ) -> impl std::future::Future<Output = Result<Vec<Utxo>, ProviderError>> + Send;

    /// Sum the unspent value paying a locking script.
    ///
    /// # Arguments
    /// * `locking_script` - The locking bytecode to query.
    ///
    /// # Returns
    /// The total balance in satoshis.
    fn get_balance(
        &self,
        locking_script: &Script,
    ) -> impl std::future::Future<Output = Result<u64, ProviderError>> + Send;

    /// Broadcast a raw transaction.
    ///
    /// # Arguments
    /// * `transaction_hex` - The serialized transaction as hex.
    ///
    /// # Returns
    /// The broadcast transaction's id, or `Rejected` with the node's
    /// reason.
    fn send_raw_transaction(
        &self,
        transaction_hex: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;

    /// Retrieve a raw transaction by id.
    ///
    /// # Arguments
    /// * `txid` - The transaction id in display order.
    ///
    /// # Returns
    /// The serialized transaction as hex, or `NotFound`.
    fn get_raw_transaction(
        &self,
        txid: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;
}
