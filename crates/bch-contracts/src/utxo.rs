//! Spendable outputs, input options, and output requests.

use std::sync::Arc;

use bch_script::opcodes::OP_RETURN;
use bch_script::Script;
use bch_transaction::TokenData;

use crate::argument::Argument;
use crate::contract::Contract;
use crate::signature_template::SignatureTemplate;
use crate::unlocker::Unlocker;
use crate::ContractError;

/// An unspent transaction output, as reported by a network provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utxo {
    /// The funding transaction id, in display byte order.
    pub txid: [u8; 32],
    /// The output index within the funding transaction.
    pub vout: u32,
    /// The output value in satoshis.
    pub satoshis: u64,
    /// CashToken data carried by the output, if any.
    pub token: Option<TokenData>,
}

impl Utxo {
    /// The txid as a lowercase hex string in display order.
    pub fn txid_hex(&self) -> String {
        hex::encode(self.txid)
    }
}

/// How an input's spending authority is described for template compilation.
///
/// `Plain` inputs carry no extra provenance; `Contract` and
/// `SignatureTemplate` inputs identify the script or key that controls the
/// spent output so the compiled template can reference it symbolically.
#[derive(Clone, Debug, Default)]
pub enum InputSource {
    /// No provenance recorded.
    #[default]
    Plain,
    /// The input spends a UTXO held by a contract.
    Contract {
        /// The contract holding the UTXO.
        contract: Arc<Contract>,
        /// The called function's index in the contract's ABI.
        selector: usize,
        /// The call arguments.
        params: Vec<Argument>,
    },
    /// The input spends a P2PKH UTXO held by a signature template's key.
    SignatureTemplate(SignatureTemplate),
}

/// Per-input overrides applied when the input is added to a builder.
#[derive(Clone, Debug, Default)]
pub struct InputOptions {
    /// Sequence number override; `DEFAULT_SEQUENCE_NUMBER` when unset.
    pub sequence_number: Option<u32>,
    /// Spending-authority provenance for template compilation.
    pub source: InputSource,
}

/// A UTXO paired with the unlocker that can spend it.
#[derive(Clone, Debug)]
pub struct UnlockableUtxo {
    /// The output being spent.
    pub utxo: Utxo,
    /// The unlocker producing this input's unlocking bytecode.
    pub unlocker: Unlocker,
    /// Per-input options.
    pub options: InputOptions,
}

/// A requested transaction output.
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    /// A value-carrying output paying a locking script.
    Standard {
        /// The destination locking bytecode.
        to: Script,
        /// The output value in satoshis.
        amount: u64,
        /// CashToken data to attach, if any.
        token: Option<TokenData>,
    },
    /// A zero-value data carrier output.
    OpReturn {
        /// The full `OP_RETURN`-prefixed script.
        data: Script,
    },
}

impl Output {
    /// The satoshi value this output carries.
    ///
    /// # Returns
    /// The amount for standard outputs, zero for data carriers.
    pub fn amount(&self) -> u64 {
        match self {
            Output::Standard { amount, .. } => *amount,
            Output::OpReturn { .. } => 0,
        }
    }

    /// The locking bytecode this output pays to.
    pub fn locking_script(&self) -> &Script {
        match self {
            Output::Standard { to, .. } => to,
            Output::OpReturn { data } => data,
        }
    }

    /// The token data this output carries, if any.
    pub fn token(&self) -> Option<&TokenData> {
        match self {
            Output::Standard { token, .. } => token.as_ref(),
            Output::OpReturn { .. } => None,
        }
    }
}

/// Validate an output request before it enters a builder.
///
/// # Arguments
/// * `output` - The requested output.
///
/// # Returns
/// `Ok` for well-formed outputs, a validation error for an empty
/// destination script or a zero-category token.
pub fn validate_output(output: &Output) -> Result<(), ContractError> {
    match output {
        Output::Standard { to, .. } if to.is_empty() => Err(ContractError::Validation(
            "output destination script must not be empty".to_string(),
        )),
        Output::Standard { token: Some(token), .. } if token.category == [0u8; 32] => {
            Err(ContractError::Validation(
                "token output must carry a non-zero category".to_string(),
            ))
        }
        _ => Ok(()),
    }
}

/// Build an `OP_RETURN` data-carrier output from string chunks.
///
/// Chunks prefixed with `0x` are decoded as hex; all others are pushed as
/// UTF-8 bytes.
///
/// # Arguments
/// * `chunks` - The data chunks to push after `OP_RETURN`.
///
/// # Returns
/// A zero-value `OpReturn` output.
pub fn create_op_return_output(chunks: &[&str]) -> Result<Output, ContractError> {
    let mut script = Script::new();
    script.append_opcodes(&[OP_RETURN])?;
    for chunk in chunks {
        match chunk.strip_prefix("0x") {
            Some(hex_data) => script.append_push_data_hex(hex_data)?,
            None => script.append_push_data(chunk.as_bytes())?,
        }
    }
    Ok(Output::OpReturn { data: script })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify OP_RETURN outputs mix hex and UTF-8 chunks.
    #[test]
    fn test_create_op_return_output() {
        let output = create_op_return_output(&["0x6d02", "hello"]).expect("should build");
        assert_eq!(output.amount(), 0);

        let script = output.locking_script();
        assert!(script.is_op_return());

        let chunks = script.chunks().expect("should parse");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].op, OP_RETURN);
        assert_eq!(chunks[1].data.as_deref(), Some(&[0x6d, 0x02][..]));
        assert_eq!(chunks[2].data.as_deref(), Some(&b"hello"[..]));
    }

    /// Verify invalid hex chunks are rejected.
    #[test]
    fn test_op_return_invalid_hex() {
        assert!(create_op_return_output(&["0xzz"]).is_err());
    }

    /// Verify empty destination scripts are rejected.
    #[test]
    fn test_validate_output() {
        let empty = Output::Standard { to: Script::new(), amount: 1000, token: None };
        assert!(validate_output(&empty).is_err());

        let ok = Output::Standard {
            to: Script::from_hex("76a914e2a623699e81b291c0327f408fea765d534baa2a88ac")
                .expect("valid hex"),
            amount: 1000,
            token: None,
        };
        assert!(validate_output(&ok).is_ok());
    }

    /// Verify zero-category tokens are rejected.
    #[test]
    fn test_validate_zero_category_token() {
        let to = Script::from_hex("76a914e2a623699e81b291c0327f408fea765d534baa2a88ac")
            .expect("valid hex");
        let bad = Output::Standard {
            to: to.clone(),
            amount: 1000,
            token: Some(TokenData { category: [0u8; 32], amount: 1, nft: None }),
        };
        assert!(validate_output(&bad).is_err());

        let ok = Output::Standard {
            to,
            amount: 1000,
            token: Some(TokenData { category: [0x11; 32], amount: 1, nft: None }),
        };
        assert!(validate_output(&ok).is_ok());
    }

    /// Verify txid hex export stays in display order.
    #[test]
    fn test_txid_hex() {
        let mut txid = [0u8; 32];
        txid[0] = 0xab;
        let utxo = Utxo { txid, vout: 0, satoshis: 1000, token: None };
        assert!(utxo.txid_hex().starts_with("ab"));
    }
}
