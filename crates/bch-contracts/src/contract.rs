//! Contract instantiation from compiled artifacts.
//!
//! A contract binds an artifact to concrete constructor arguments. The
//! redeem script is the reversed encoded constructor arguments followed
//! by the compiled bytecode; the locking bytecode commits to the redeem
//! script's hash (P2SH20 or P2SH32).

use std::sync::Arc;

use bch_script::opcodes::{OP_EQUAL, OP_HASH160, OP_HASH256};
use bch_script::Script;

use crate::argument::{encode_arguments, encode_constructor_arguments, Argument};
use crate::artifact::Artifact;
use crate::hash::{hash160, hash256};
use crate::unlocker::{ContractUnlocker, Unlocker};
use crate::ContractError;

/// The hash commitment used by a contract's locking bytecode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressType {
    /// 20-byte script hash: `OP_HASH160 <hash160(redeem)> OP_EQUAL`.
    P2sh20,
    /// 32-byte script hash: `OP_HASH256 <hash256(redeem)> OP_EQUAL`.
    P2sh32,
}

impl AddressType {
    /// The locking-type string used in template documents.
    ///
    /// # Returns
    /// `"p2sh20"` or `"p2sh32"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::P2sh20 => "p2sh20",
            AddressType::P2sh32 => "p2sh32",
        }
    }
}

/// An instantiated contract: artifact plus encoded constructor arguments.
///
/// Immutable after instantiation. Shared via `Arc` so unlockers can
/// reference their originating contract by identity.
#[derive(Debug)]
pub struct Contract {
    /// The compiled artifact this contract was instantiated from.
    pub artifact: Artifact,
    /// The constructor arguments, ABI-encoded in declaration order.
    pub encoded_constructor_args: Vec<Vec<u8>>,
    /// The hash commitment type of the locking bytecode.
    pub address_type: AddressType,
    redeem_script: Script,
    locking_bytecode: Script,
}

impl Contract {
    /// Instantiate a contract from an artifact and constructor arguments.
    ///
    /// # Arguments
    /// * `artifact` - The compiled artifact.
    /// * `constructor_args` - Arguments matching `artifact.constructorInputs`.
    /// * `address_type` - The hash commitment type for the locking bytecode.
    ///
    /// # Returns
    /// A shared contract instance, or a validation error if the arguments
    /// do not match the constructor signature or the bytecode is invalid.
    pub fn new(
        artifact: Artifact,
        constructor_args: &[Argument],
        address_type: AddressType,
    ) -> Result<Arc<Self>, ContractError> {
        let encoded_constructor_args =
            encode_constructor_arguments(&artifact.constructor_inputs, constructor_args)?;

        // Constructor arguments are pushed in reverse declaration order so
        // the first parameter ends up deepest on the stack.
        let mut redeem_script = Script::new();
        for arg in encoded_constructor_args.iter().rev() {
            redeem_script.append_push_data(arg)?;
        }
        redeem_script.append_script(&Script::from_asm(&artifact.bytecode)?);

        let locking_bytecode = lock_script_for(&redeem_script, address_type)?;

        Ok(Arc::new(Contract {
            artifact,
            encoded_constructor_args,
            address_type,
            redeem_script,
            locking_bytecode,
        }))
    }

    /// The full redeem script (constructor pushes + compiled bytecode).
    ///
    /// # Returns
    /// A reference to the redeem script.
    pub fn redeem_script(&self) -> &Script {
        &self.redeem_script
    }

    /// The locking bytecode committing to this contract's redeem script.
    ///
    /// # Returns
    /// A reference to the locking bytecode.
    pub fn locking_bytecode(&self) -> &Script {
        &self.locking_bytecode
    }

    /// Create an unlocker bound to one of this contract's functions.
    ///
    /// The arguments are type-checked against the function signature here;
    /// the actual unlocking bytecode is generated during `build()`.
    ///
    /// # Arguments
    /// * `selector` - The function's index in the ABI.
    /// * `params` - Call arguments matching the function's inputs.
    ///
    /// # Returns
    /// An unlocker carrying this contract, the selector, and the
    /// arguments, or a validation error.
    pub fn unlock(
        self: &Arc<Self>,
        selector: usize,
        params: Vec<Argument>,
    ) -> Result<Unlocker, ContractError> {
        let function = self.artifact.function(selector).ok_or_else(|| {
            ContractError::Validation(format!(
                "contract \"{}\" has no function at index {}",
                self.artifact.contract_name, selector
            ))
        })?;
        encode_arguments(function, &params)?;

        Ok(Unlocker::Contract(ContractUnlocker {
            contract: Arc::clone(self),
            selector,
            params,
        }))
    }
}

/// Build the locking bytecode committing to a redeem script.
fn lock_script_for(redeem_script: &Script, address_type: AddressType) -> Result<Script, ContractError> {
    let mut script = Script::new();
    match address_type {
        AddressType::P2sh20 => {
            script.append_opcodes(&[OP_HASH160])?;
            script.append_push_data(&hash160(redeem_script.to_bytes()))?;
        }
        AddressType::P2sh32 => {
            script.append_opcodes(&[OP_HASH256])?;
            script.append_push_data(&hash256(redeem_script.to_bytes()))?;
        }
    }
    script.append_opcodes(&[OP_EQUAL])?;
    Ok(script)
}
