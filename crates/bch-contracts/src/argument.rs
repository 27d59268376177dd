//! ABI argument encoding.
//!
//! Converts high-level call arguments (numbers, booleans, strings, byte
//! strings, signature templates) into the push operands a contract's
//! compiled bytecode expects, type-checked against the ABI parameter
//! type strings.

use bch_script::scriptnum;

use crate::artifact::{AbiFunction, AbiParam};
use crate::signature_template::{SignatureTemplate, PLACEHOLDER_SIGNATURE_LENGTH};
use crate::ContractError;

/// A high-level argument to a contract function or constructor.
#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    /// A script integer.
    Int(i64),
    /// A boolean.
    Bool(bool),
    /// A UTF-8 string, encoded as its raw bytes.
    String(String),
    /// Raw bytes (also used for pubkey/sig/datasig byte literals).
    Bytes(Vec<u8>),
    /// A signature template, valid only for `sig` parameters.
    Signature(SignatureTemplate),
}

/// An argument after ABI encoding.
///
/// Signature templates stay symbolic so template compilation can type the
/// corresponding entity variable as a key and export its private key; all
/// other arguments become literal byte strings.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodedArgument {
    /// A fully encoded literal operand.
    Literal(Vec<u8>),
    /// A symbolic signature operand backed by a template.
    Sig(SignatureTemplate),
}

impl EncodedArgument {
    /// Return the bytes this operand contributes to unlocking bytecode.
    ///
    /// Signature operands contribute a fixed-size placeholder signature.
    ///
    /// # Returns
    /// The operand bytes.
    pub fn operand_bytes(&self) -> Vec<u8> {
        match self {
            EncodedArgument::Literal(bytes) => bytes.clone(),
            EncodedArgument::Sig(template) => template.placeholder_signature(),
        }
    }

    /// Check whether this operand is a symbolic signature.
    ///
    /// # Returns
    /// `true` for `Sig` operands.
    pub fn is_signature(&self) -> bool {
        matches!(self, EncodedArgument::Sig(_))
    }
}

/// Encode one argument against an ABI parameter type string.
fn encode_argument(
    argument: &Argument,
    param: &AbiParam,
) -> Result<EncodedArgument, ContractError> {
    let type_name = param.type_name.as_str();

    match (argument, type_name) {
        (Argument::Int(value), "int") => Ok(EncodedArgument::Literal(scriptnum::encode(*value))),
        (Argument::Bool(value), "bool") => {
            Ok(EncodedArgument::Literal(if *value { vec![1] } else { Vec::new() }))
        }
        (Argument::String(value), "string") => {
            Ok(EncodedArgument::Literal(value.as_bytes().to_vec()))
        }
        (Argument::Signature(template), "sig") => Ok(EncodedArgument::Sig(template.clone())),
        (Argument::Bytes(bytes), _) => {
            check_bytes_type(bytes, type_name, &param.name)?;
            Ok(EncodedArgument::Literal(bytes.clone()))
        }
        _ => Err(ContractError::Validation(format!(
            "argument \"{}\" does not match parameter type \"{}\"",
            param.name, type_name
        ))),
    }
}

/// Validate a byte argument against a byte-like parameter type.
fn check_bytes_type(bytes: &[u8], type_name: &str, param_name: &str) -> Result<(), ContractError> {
    let expected_length = match type_name {
        "pubkey" => Some(33),
        "sig" => Some(PLACEHOLDER_SIGNATURE_LENGTH),
        "datasig" => Some(64),
        "byte" => Some(1),
        "bytes" => None,
        other => match other.strip_prefix("bytes") {
            Some(suffix) => Some(suffix.parse::<usize>().map_err(|_| {
                ContractError::Validation(format!(
                    "parameter \"{}\" has unknown type \"{}\"",
                    param_name, other
                ))
            })?),
            None => {
                return Err(ContractError::Validation(format!(
                    "argument \"{}\" does not match parameter type \"{}\"",
                    param_name, type_name
                )))
            }
        },
    };

    if let Some(expected) = expected_length {
        if bytes.len() != expected {
            return Err(ContractError::Validation(format!(
                "parameter \"{}\" of type \"{}\" expects {} bytes, got {}",
                param_name,
                type_name,
                expected,
                bytes.len()
            )));
        }
    }
    Ok(())
}

/// Encode call arguments for an ABI function.
///
/// Performs arity and per-parameter type checking; signature templates are
/// kept symbolic.
///
/// # Arguments
/// * `function` - The ABI function being called.
/// * `args` - The call arguments, in declaration order.
///
/// # Returns
/// The encoded operands, or a validation error.
pub fn encode_arguments(
    function: &AbiFunction,
    args: &[Argument],
) -> Result<Vec<EncodedArgument>, ContractError> {
    if function.inputs.len() != args.len() {
        return Err(ContractError::Validation(format!(
            "function \"{}\" expects {} arguments, got {}",
            function.name,
            function.inputs.len(),
            args.len()
        )));
    }

    args.iter()
        .zip(&function.inputs)
        .map(|(arg, param)| encode_argument(arg, param))
        .collect()
}

/// Encode constructor arguments for contract instantiation.
///
/// Constructor parameters cannot be signature templates: the constructor
/// fixes the contract's locking bytecode and cannot contain symbolic
/// operands.
///
/// # Arguments
/// * `params` - The constructor parameters, in declaration order.
/// * `args` - The constructor arguments.
///
/// # Returns
/// The encoded literal byte strings, or a validation error.
pub fn encode_constructor_arguments(
    params: &[AbiParam],
    args: &[Argument],
) -> Result<Vec<Vec<u8>>, ContractError> {
    if params.len() != args.len() {
        return Err(ContractError::Validation(format!(
            "constructor expects {} arguments, got {}",
            params.len(),
            args.len()
        )));
    }

    args.iter()
        .zip(params)
        .map(|(arg, param)| match encode_argument(arg, param)? {
            EncodedArgument::Literal(bytes) => Ok(bytes),
            EncodedArgument::Sig(_) => Err(ContractError::Validation(format!(
                "constructor parameter \"{}\" cannot be a signature template",
                param.name
            ))),
        })
        .collect()
}
