//! In-memory network provider for tests and offline template compilation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bch_script::Script;
use bch_transaction::Transaction;

use crate::provider::{NetworkProvider, ProviderError};
use crate::utxo::Utxo;

#[derive(Debug, Default)]
struct MockState {
    /// UTXO sets keyed by locking bytecode.
    utxos: HashMap<Vec<u8>, Vec<Utxo>>,
    /// Accepted broadcasts, keyed by txid hex.
    transactions: HashMap<String, String>,
    /// When set, the next broadcast is rejected with this reason.
    reject_reason: Option<String>,
    /// When false, accepted broadcasts are not retrievable afterwards.
    confirm_broadcasts: bool,
}

/// A deterministic in-memory provider.
///
/// Clones share state, so a test can keep a handle while the builder owns
/// another.
#[derive(Clone, Debug)]
pub struct MockNetworkProvider {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockNetworkProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNetworkProvider {
    /// Create an empty provider that confirms every accepted broadcast.
    pub fn new() -> Self {
        MockNetworkProvider {
            state: Arc::new(Mutex::new(MockState {
                confirm_broadcasts: true,
                ..MockState::default()
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register an unspent output for a locking script.
    ///
    /// # Arguments
    /// * `locking_script` - The locking bytecode holding the UTXO.
    /// * `utxo` - The output to register.
    pub fn add_utxo(&self, locking_script: &Script, utxo: Utxo) {
        self.lock().utxos.entry(locking_script.to_bytes().to_vec()).or_default().push(utxo);
    }

    /// Reject the next broadcast with the given node reason.
    ///
    /// # Arguments
    /// * `reason` - The rejection message.
    pub fn reject_next_broadcast(&self, reason: &str) {
        self.lock().reject_reason = Some(reason.to_string());
    }

    /// Control whether accepted broadcasts become retrievable.
    ///
    /// # Arguments
    /// * `confirm` - `false` makes every lookup return `NotFound`.
    pub fn set_confirm_broadcasts(&self, confirm: bool) {
        self.lock().confirm_broadcasts = confirm;
    }

    /// The txids of all accepted broadcasts, in no particular order.
    pub fn broadcast_txids(&self) -> Vec<String> {
        self.lock().transactions.keys().cloned().collect()
    }
}

impl NetworkProvider for MockNetworkProvider {
    async fn get_utxos(&self, locking_script: &Script) -> Result<Vec<Utxo>, ProviderError> {
        Ok(self.lock().utxos.get(locking_script.to_bytes()).cloned().unwrap_or_default())
    }

    async fn get_balance(&self, locking_script: &Script) -> Result<u64, ProviderError> {
        let utxos = self.get_utxos(locking_script).await?;
        Ok(utxos.iter().map(|utxo| utxo.satoshis).sum())
    }

    async fn send_raw_transaction(&self, transaction_hex: &str) -> Result<String, ProviderError> {
        let transaction = Transaction::from_hex(transaction_hex)
            .map_err(|e| ProviderError::Rejected(e.to_string()))?;
        let txid = transaction
            .tx_id_hex()
            .map_err(|e| ProviderError::Rejected(e.to_string()))?;

        let mut state = self.lock();
        if let Some(reason) = state.reject_reason.take() {
            return Err(ProviderError::Rejected(reason));
        }
        if state.confirm_broadcasts {
            state.transactions.insert(txid.clone(), transaction_hex.to_string());
        }
        Ok(txid)
    }

    async fn get_raw_transaction(&self, txid: &str) -> Result<String, ProviderError> {
        self.lock()
            .transactions
            .get(txid)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(txid.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> Script {
        Script::from_hex("76a914e2a623699e81b291c0327f408fea765d534baa2a88ac").expect("valid hex")
    }

    fn utxo(satoshis: u64) -> Utxo {
        Utxo { txid: [0xab; 32], vout: 0, satoshis, token: None }
    }

    /// Verify registered UTXOs are returned for their locking script only.
    #[tokio::test]
    async fn test_utxo_lookup() {
        let provider = MockNetworkProvider::new();
        provider.add_utxo(&script(), utxo(1000));
        provider.add_utxo(&script(), utxo(2000));

        assert_eq!(provider.get_utxos(&script()).await.expect("should query").len(), 2);
        assert_eq!(provider.get_balance(&script()).await.expect("should query"), 3000);

        let other = Script::from_hex("51").expect("valid hex");
        assert!(provider.get_utxos(&other).await.expect("should query").is_empty());
    }

    /// Verify accepted broadcasts are retrievable by txid.
    #[tokio::test]
    async fn test_broadcast_roundtrip() {
        let provider = MockNetworkProvider::new();
        let hex = Transaction::default().to_hex().expect("should serialize");

        let txid = provider.send_raw_transaction(&hex).await.expect("should accept");
        assert_eq!(provider.get_raw_transaction(&txid).await.expect("should find"), hex);
    }

    /// Verify queued rejections surface once and then clear.
    #[tokio::test]
    async fn test_queued_rejection() {
        let provider = MockNetworkProvider::new();
        provider.reject_next_broadcast("mandatory-script-verify-flag-failed");
        let hex = Transaction::default().to_hex().expect("should serialize");

        let err = provider.send_raw_transaction(&hex).await.expect_err("should reject");
        assert!(matches!(err, ProviderError::Rejected(_)));
        assert!(provider.send_raw_transaction(&hex).await.is_ok());
    }

    /// Verify unconfirmed broadcasts stay unretrievable.
    #[tokio::test]
    async fn test_unconfirmed_broadcast() {
        let provider = MockNetworkProvider::new();
        provider.set_confirm_broadcasts(false);
        let hex = Transaction::default().to_hex().expect("should serialize");

        let txid = provider.send_raw_transaction(&hex).await.expect("should accept");
        let err = provider.get_raw_transaction(&txid).await.expect_err("should miss");
        assert!(matches!(err, ProviderError::NotFound(_)));
    }
}
