//! Two-phase transaction builder.
//!
//! The builder accumulates unlockable inputs and output requests, then
//! `build()` runs two phases: first it assembles the complete transaction
//! skeleton with empty unlocking scripts and reconstructs every source
//! output from its unlocker, then it asks each unlocker for its unlocking
//! bytecode against that finished skeleton. The same input list always
//! yields byte-identical transactions.

use bch_script::Script;
use bch_transaction::{
    Transaction, TransactionInput, TransactionOutput, DEFAULT_SEQUENCE_NUMBER,
};

use crate::provider::NetworkProvider;
use crate::retry::{Delay, RetryPolicy, TokioDelay};
use crate::unlocker::{UnlockContext, Unlocker};
use crate::utxo::{
    create_op_return_output, validate_output, InputOptions, InputSource, Output, UnlockableUtxo,
    Utxo,
};
use crate::ContractError;

/// A broadcast transaction, as retrieved back from the network.
#[derive(Clone, Debug)]
pub struct TransactionDetails {
    /// The transaction id in display order.
    pub txid: String,
    /// The serialized transaction as hex.
    pub hex: String,
    /// The decoded transaction.
    pub transaction: Transaction,
}

/// Builds, serializes, and broadcasts contract transactions.
#[derive(Debug)]
pub struct TransactionBuilder<P: NetworkProvider> {
    /// The network provider used for broadcast and retrieval.
    pub provider: P,
    inputs: Vec<UnlockableUtxo>,
    outputs: Vec<Output>,
    locktime: u32,
    max_fee: Option<u64>,
}

impl<P: NetworkProvider> TransactionBuilder<P> {
    /// Create an empty builder.
    ///
    /// # Arguments
    /// * `provider` - The network provider for broadcast and retrieval.
    pub fn new(provider: P) -> Self {
        TransactionBuilder { provider, inputs: Vec::new(), outputs: Vec::new(), locktime: 0, max_fee: None }
    }

    /// The accumulated inputs, in transaction order.
    pub fn inputs(&self) -> &[UnlockableUtxo] {
        &self.inputs
    }

    /// The accumulated output requests, in transaction order.
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// The transaction locktime.
    pub fn locktime(&self) -> u32 {
        self.locktime
    }

    /// Add one input with default options.
    ///
    /// The input's provenance for template compilation is derived from the
    /// unlocker.
    ///
    /// # Arguments
    /// * `utxo` - The output to spend.
    /// * `unlocker` - The unlocker producing its unlocking bytecode.
    pub fn add_input(&mut self, utxo: Utxo, unlocker: Unlocker) -> &mut Self {
        let source = source_from_unlocker(&unlocker);
        self.inputs.push(UnlockableUtxo {
            utxo,
            unlocker,
            options: InputOptions { sequence_number: None, source },
        });
        self
    }

    /// Add one input with explicit options.
    ///
    /// # Arguments
    /// * `utxo` - The output to spend.
    /// * `unlocker` - The unlocker producing its unlocking bytecode.
    /// * `options` - Sequence number and provenance overrides.
    pub fn add_input_with_options(
        &mut self,
        utxo: Utxo,
        unlocker: Unlocker,
        options: InputOptions,
    ) -> &mut Self {
        self.inputs.push(UnlockableUtxo { utxo, unlocker, options });
        self
    }

    /// Add a batch of inputs, either each with its own unlocker or all
    /// sharing one.
    ///
    /// # Arguments
    /// * `utxos` - The outputs to spend, each optionally paired with an
    ///   unlocker.
    /// * `shared_unlocker` - An unlocker applied to every UTXO in the
    ///   batch. Must be present exactly when the per-UTXO unlockers are
    ///   absent.
    ///
    /// # Returns
    /// The builder, or a validation error when per-UTXO and shared
    /// unlockers are mixed.
    pub fn add_inputs(
        &mut self,
        utxos: Vec<(Utxo, Option<Unlocker>)>,
        shared_unlocker: Option<Unlocker>,
    ) -> Result<&mut Self, ContractError> {
        let own_count = utxos.iter().filter(|(_, unlocker)| unlocker.is_some()).count();
        let consistent = match shared_unlocker {
            Some(_) => own_count == 0,
            None => own_count == utxos.len(),
        };
        if !consistent {
            return Err(ContractError::Validation(
                "either all inputs must carry their own unlocker or a shared unlocker must be \
                 provided for the whole batch"
                    .to_string(),
            ));
        }

        for (utxo, own_unlocker) in utxos {
            // One of the two is present after the consistency check.
            let unlocker = match own_unlocker.or_else(|| shared_unlocker.clone()) {
                Some(unlocker) => unlocker,
                None => continue,
            };
            self.add_input(utxo, unlocker);
        }
        Ok(self)
    }

    /// Add a validated output request.
    ///
    /// # Arguments
    /// * `output` - The output to add.
    ///
    /// # Returns
    /// The builder, or a validation error for a malformed output.
    pub fn add_output(&mut self, output: Output) -> Result<&mut Self, ContractError> {
        validate_output(&output)?;
        self.outputs.push(output);
        Ok(self)
    }

    /// Add several validated output requests.
    ///
    /// # Arguments
    /// * `outputs` - The outputs to add, in order.
    pub fn add_outputs(&mut self, outputs: Vec<Output>) -> Result<&mut Self, ContractError> {
        for output in outputs {
            self.add_output(output)?;
        }
        Ok(self)
    }

    /// Add a zero-value `OP_RETURN` data carrier output.
    ///
    /// # Arguments
    /// * `chunks` - Data chunks; `0x`-prefixed chunks are decoded as hex.
    pub fn add_op_return_output(&mut self, chunks: &[&str]) -> Result<&mut Self, ContractError> {
        let output = create_op_return_output(chunks)?;
        self.outputs.push(output);
        Ok(self)
    }

    /// Set the transaction locktime.
    pub fn set_locktime(&mut self, locktime: u32) -> &mut Self {
        self.locktime = locktime;
        self
    }

    /// Set a fee ceiling enforced at build time.
    ///
    /// # Arguments
    /// * `max_fee` - The maximum allowed fee in satoshis.
    pub fn set_max_fee(&mut self, max_fee: u64) -> &mut Self {
        self.max_fee = Some(max_fee);
        self
    }

    /// Reject builds whose implicit fee exceeds the configured ceiling.
    fn check_max_fee(&self) -> Result<(), ContractError> {
        let Some(max_fee) = self.max_fee else { return Ok(()) };

        let input_total: i128 = self.inputs.iter().map(|input| input.utxo.satoshis as i128).sum();
        let output_total: i128 = self.outputs.iter().map(|output| output.amount() as i128).sum();
        let fee = input_total - output_total;

        if fee > max_fee as i128 {
            return Err(ContractError::Validation(format!(
                "transaction fee of {fee} is higher than max fee of {max_fee}"
            )));
        }
        Ok(())
    }

    /// Run both build phases and return the finished transaction together
    /// with the reconstructed source outputs (one per input).
    ///
    /// # Returns
    /// The fully unlocked transaction and its source outputs.
    pub fn build_transaction(&self) -> Result<(Transaction, Vec<TransactionOutput>), ContractError> {
        self.check_max_fee()?;

        // Phase one: full skeleton with empty unlocking scripts, plus the
        // source outputs reconstructed from each input's unlocker.
        let mut transaction = Transaction::default();
        transaction.lock_time = self.locktime;

        let mut source_outputs = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let mut source_txid = input.utxo.txid;
            source_txid.reverse();
            transaction.add_input(TransactionInput {
                source_txid,
                source_output_index: input.utxo.vout,
                sequence_number: input
                    .options
                    .sequence_number
                    .unwrap_or(DEFAULT_SEQUENCE_NUMBER),
                unlocking_script: Script::new(),
            });
            source_outputs.push(TransactionOutput {
                satoshis: input.utxo.satoshis,
                locking_script: input.unlocker.generate_locking_bytecode()?,
                token: input.utxo.token.clone(),
            });
        }
        for output in &self.outputs {
            transaction.add_output(TransactionOutput {
                satoshis: output.amount(),
                locking_script: output.locking_script().clone(),
                token: output.token().cloned(),
            });
        }

        // Phase two: every unlocker sees the same finished skeleton.
        let unlocking_scripts = self
            .inputs
            .iter()
            .enumerate()
            .map(|(input_index, input)| {
                input.unlocker.generate_unlocking_bytecode(&UnlockContext {
                    transaction: &transaction,
                    source_outputs: &source_outputs,
                    input_index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (input, script) in transaction.inputs.iter_mut().zip(unlocking_scripts) {
            input.unlocking_script = script;
        }

        Ok((transaction, source_outputs))
    }

    /// Build and serialize the transaction.
    ///
    /// # Returns
    /// The serialized transaction as hex.
    pub fn build(&self) -> Result<String, ContractError> {
        let (transaction, _) = self.build_transaction()?;
        Ok(transaction.to_hex()?)
    }

    /// Build, broadcast, and wait for the transaction with default
    /// polling (500ms intervals, 1200 attempts).
    ///
    /// # Returns
    /// The broadcast transaction's details.
    pub async fn send(&self) -> Result<TransactionDetails, ContractError> {
        self.send_with(RetryPolicy::default(), &TokioDelay).await
    }

    /// Build, broadcast, and wait for the transaction with an explicit
    /// retry policy.
    ///
    /// A broadcast rejection surfaces as `FailedTransaction`. Lookup
    /// errors during polling are swallowed and retried; an exhausted
    /// budget surfaces as `ConfirmationTimeout`.
    ///
    /// # Arguments
    /// * `policy` - Polling interval and attempt budget.
    /// * `delay` - The sleep primitive between attempts.
    ///
    /// # Returns
    /// The broadcast transaction's details.
    pub async fn send_with<D: Delay>(
        &self,
        policy: RetryPolicy,
        delay: &D,
    ) -> Result<TransactionDetails, ContractError> {
        let hex = self.build()?;
        let txid = self.provider.send_raw_transaction(&hex).await.map_err(|e| match e {
            crate::provider::ProviderError::Rejected(reason) => {
                ContractError::FailedTransaction(reason)
            }
            other => ContractError::Provider(other),
        })?;

        for _ in 0..policy.max_attempts {
            match self.provider.get_raw_transaction(&txid).await {
                Ok(hex) => {
                    let transaction = Transaction::from_hex(&hex)?;
                    return Ok(TransactionDetails { txid, hex, transaction });
                }
                // Transient lookup failures are retried until the budget
                // runs out.
                Err(_) => delay.sleep(policy.interval).await,
            }
        }
        Err(ContractError::ConfirmationTimeout { attempts: policy.max_attempts })
    }
}

/// Derive template-compilation provenance from an unlocker.
fn source_from_unlocker(unlocker: &Unlocker) -> InputSource {
    match unlocker {
        Unlocker::Contract(contract_unlocker) => InputSource::Contract {
            contract: std::sync::Arc::clone(&contract_unlocker.contract),
            selector: contract_unlocker.selector,
            params: contract_unlocker.params.clone(),
        },
        Unlocker::SignatureTemplate(template) => InputSource::SignatureTemplate(template.clone()),
    }
}
