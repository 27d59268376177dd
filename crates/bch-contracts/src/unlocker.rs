//! Unlockers: deferred unlocking-bytecode generation for inputs.
//!
//! An unlocker is created up front (by `Contract::unlock` or from a
//! `SignatureTemplate`) but only produces bytecode during the second
//! build phase, when the full transaction skeleton and all source
//! outputs are known.

use std::sync::Arc;

use bch_script::{scriptnum, Script};
use bch_transaction::{Transaction, TransactionOutput};

use crate::argument::{encode_arguments, Argument};
use crate::contract::Contract;
use crate::signature_template::SignatureTemplate;
use crate::ContractError;

/// Everything an unlocker may inspect when generating unlocking bytecode.
///
/// Borrowed from the builder during the second build phase: the complete
/// transaction skeleton, the source outputs for every input (aligned by
/// index), and the index of the input being unlocked.
#[derive(Clone, Copy, Debug)]
pub struct UnlockContext<'a> {
    /// The transaction skeleton with all inputs and outputs in place.
    pub transaction: &'a Transaction,
    /// The outputs being spent, one per transaction input.
    pub source_outputs: &'a [TransactionOutput],
    /// The index of the input this unlocker is assigned to.
    pub input_index: usize,
}

/// The closed set of unlocking strategies an input can carry.
#[derive(Clone, Debug)]
pub enum Unlocker {
    /// Spend a contract UTXO by calling one of its functions.
    Contract(ContractUnlocker),
    /// Spend a P2PKH UTXO controlled by a signature template.
    SignatureTemplate(SignatureTemplate),
}

impl Unlocker {
    /// Generate the locking bytecode of the output this unlocker spends.
    ///
    /// Used in the first build phase to reconstruct source outputs.
    ///
    /// # Returns
    /// The contract's or key's locking bytecode.
    pub fn generate_locking_bytecode(&self) -> Result<Script, ContractError> {
        match self {
            Unlocker::Contract(unlocker) => Ok(unlocker.contract.locking_bytecode().clone()),
            Unlocker::SignatureTemplate(template) => template.generate_locking_bytecode(),
        }
    }

    /// Generate the unlocking bytecode for one input of a finished skeleton.
    ///
    /// # Arguments
    /// * `context` - The transaction skeleton and source outputs.
    ///
    /// # Returns
    /// The unlocking bytecode for `context.input_index`.
    pub fn generate_unlocking_bytecode(
        &self,
        context: &UnlockContext<'_>,
    ) -> Result<Script, ContractError> {
        match self {
            Unlocker::Contract(unlocker) => unlocker.generate_unlocking_bytecode(context),
            Unlocker::SignatureTemplate(template) => template.generate_unlocking_bytecode(),
        }
    }
}

/// An unlocker bound to a specific contract function call.
#[derive(Clone, Debug)]
pub struct ContractUnlocker {
    /// The contract whose UTXO is being spent.
    pub contract: Arc<Contract>,
    /// The called function's index in the contract's ABI.
    pub selector: usize,
    /// The call arguments, in declaration order.
    pub params: Vec<Argument>,
}

impl ContractUnlocker {
    /// Generate P2SH unlocking bytecode for this function call.
    ///
    /// Layout: function arguments pushed in reverse order, then the
    /// function selector (omitted for single-function contracts), then
    /// the full redeem script as the final push.
    fn generate_unlocking_bytecode(
        &self,
        context: &UnlockContext<'_>,
    ) -> Result<Script, ContractError> {
        let function = self
            .contract
            .artifact
            .function(self.selector)
            .ok_or(ContractError::UnresolvedUnlocker { input_index: context.input_index })?;
        let encoded = encode_arguments(function, &self.params)?;

        let mut script = Script::new();
        for operand in encoded.iter().rev() {
            script.append_push_data(&operand.operand_bytes())?;
        }
        if self.contract.artifact.abi.len() > 1 {
            script.append_push_data(&scriptnum::encode(self.selector as i64))?;
        }
        script.append_push_data(&self.contract.redeem_script().to_bytes())?;
        Ok(script)
    }
}
