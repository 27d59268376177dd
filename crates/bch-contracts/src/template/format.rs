//! Identifier and script-text formatting for template compilation.

use std::collections::BTreeMap;

use bch_script::Script;

use crate::argument::EncodedArgument;
use crate::artifact::{AbiParam, Artifact};
use crate::signature_template::SignatureTemplate;
use crate::ContractError;

/// Convert a camel-case identifier to snake case.
///
/// An underscore is inserted before every uppercase letter that follows a
/// lowercase letter or digit; the result is lowercased.
///
/// # Arguments
/// * `input` - The identifier to convert.
pub fn snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut previous_breaks = false;
    for c in input.chars() {
        if c.is_ascii_uppercase() && previous_breaks {
            out.push('_');
        }
        out.extend(c.to_lowercase());
        previous_breaks = c.is_ascii_lowercase() || c.is_ascii_digit();
    }
    out
}

/// Render function or constructor parameters as annotated script pushes.
///
/// Parameters appear in reverse declaration order, matching their order
/// in the bytecode. Signature parameters render as key references, all
/// others as named pushes annotated with their literal value.
///
/// # Arguments
/// * `params` - The parameters, in declaration order.
/// * `args` - The encoded arguments, aligned with `params`.
pub fn format_parameters_for_debugging(params: &[AbiParam], args: &[EncodedArgument]) -> String {
    if params.is_empty() {
        return "// none".to_string();
    }

    params
        .iter()
        .zip(args)
        .rev()
        .map(|(param, arg)| match arg {
            EncodedArgument::Sig(_) => format!(
                "<{}.{}.{}> // {}",
                snake_case(&param.name),
                SignatureTemplate::signature_algorithm_name(),
                SignatureTemplate::hash_type_name(),
                param.type_name,
            ),
            EncodedArgument::Literal(bytes) => {
                let type_name = if param.type_name == "bytes" {
                    format!("bytes{}", bytes.len())
                } else {
                    param.type_name.clone()
                };
                format!("<{}> // {} = <0x{}>", snake_case(&param.name), type_name, hex::encode(bytes))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a contract's bytecode one operation per line.
///
/// Uses the debug bytecode when the artifact carries it, the ASM field
/// otherwise.
///
/// # Arguments
/// * `artifact` - The contract artifact.
pub fn format_bytecode_for_debugging(artifact: &Artifact) -> Result<String, ContractError> {
    if let Some(debug) = &artifact.debug {
        let script = Script::from_hex(&debug.bytecode)?;
        let lines = script
            .chunks()?
            .iter()
            .map(|chunk| chunk.to_asm_string())
            .collect::<Vec<_>>();
        return Ok(lines.join("\n"));
    }
    Ok(artifact.bytecode.split_whitespace().collect::<Vec<_>>().join("\n"))
}

/// Collect scenario bytecode values for non-signature parameters.
///
/// # Arguments
/// * `params` - The parameters, in declaration order.
/// * `args` - The encoded arguments, aligned with `params`.
///
/// # Returns
/// Variable identifiers mapped to `0x`-prefixed hex values.
pub fn scenario_parameter_values(
    params: &[AbiParam],
    args: &[EncodedArgument],
) -> BTreeMap<String, String> {
    params
        .iter()
        .zip(args)
        .filter_map(|(param, arg)| match arg {
            EncodedArgument::Literal(bytes) => {
                Some((snake_case(&param.name), format!("0x{}", hex::encode(bytes))))
            }
            EncodedArgument::Sig(_) => None,
        })
        .collect()
}

/// Collect scenario private keys for signature parameters.
///
/// # Arguments
/// * `params` - The parameters, in declaration order.
/// * `args` - The encoded arguments, aligned with `params`.
///
/// # Returns
/// Variable identifiers mapped to private keys as hex.
pub fn scenario_keys(params: &[AbiParam], args: &[EncodedArgument]) -> BTreeMap<String, String> {
    params
        .iter()
        .zip(args)
        .filter_map(|(param, arg)| match arg {
            EncodedArgument::Sig(template) => {
                Some((snake_case(&param.name), template.private_key_hex()))
            }
            EncodedArgument::Literal(_) => None,
        })
        .collect()
}
