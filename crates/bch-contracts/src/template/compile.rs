//! Template compilation from a transaction builder.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use bch_transaction::{Transaction, TransactionOutput};

use crate::argument::{encode_arguments, EncodedArgument};
use crate::artifact::{AbiFunction, Artifact};
use crate::builder::TransactionBuilder;
use crate::contract::Contract;
use crate::provider::NetworkProvider;
use crate::signature_template::SignatureTemplate;
use crate::template::allocator::NameAllocator;
use crate::template::format::{
    format_bytecode_for_debugging, format_parameters_for_debugging, scenario_keys,
    scenario_parameter_values, snake_case,
};
use crate::template::model::{
    ScenarioBytecode, ScenarioData, ScenarioInput, ScenarioKeys, ScenarioOutput,
    ScenarioOverrides, ScenarioToken, ScenarioTransaction, TemplateEntity, TemplateScenario,
    TemplateScript, TemplateVariable, VariableType, WalletTemplate,
};
use crate::unlocker::Unlocker;
use crate::utxo::{InputSource, UnlockableUtxo};
use crate::ContractError;

/// One contract input's place in a compiled template.
#[derive(Clone, Debug)]
pub struct ContractScenario {
    /// The scenario identifier evaluating this input.
    pub scenario_id: String,
    /// The artifact of the contract spent by this input.
    pub artifact: Artifact,
    /// The input's index in the transaction.
    pub input_index: usize,
}

/// The output of template compilation.
#[derive(Clone, Debug)]
pub struct CompiledTemplates {
    /// The complete template document.
    pub template: WalletTemplate,
    /// One entry per contract input, in input order.
    pub contracts: Vec<ContractScenario>,
}

/// Compile a builder's transaction into a wallet template.
///
/// The builder's inputs and outputs are built first (both phases run), so
/// the scenarios reference the exact transaction the builder would
/// broadcast. Each contract input yields one scenario whose evaluation
/// slot sits at that input; signature-template inputs become placeholder
/// P2PKH entities and scripts.
///
/// # Arguments
/// * `builder` - The fully specified builder.
/// * `current_time` - Unix timestamp exported as the scenarios' block
///   time.
///
/// # Returns
/// The template and one scenario record per contract input.
pub fn compile_templates<P: NetworkProvider>(
    builder: &TransactionBuilder<P>,
    current_time: u64,
) -> Result<CompiledTemplates, ContractError> {
    let (transaction, _source_outputs) = builder.build_transaction()?;

    // Placeholder indices are assigned per signature-template input up
    // front so entity allocation and scenario references agree.
    let placeholder_indices: HashMap<usize, usize> = builder
        .inputs()
        .iter()
        .enumerate()
        .filter(|(_, input)| matches!(input.options.source, InputSource::SignatureTemplate(_)))
        .enumerate()
        .map(|(placeholder_index, (input_index, _))| (input_index, placeholder_index))
        .collect();

    let mut entities: BTreeMap<String, TemplateEntity> = BTreeMap::new();
    let mut scripts: BTreeMap<String, TemplateScript> = BTreeMap::new();
    let mut scenarios: BTreeMap<String, TemplateScenario> = BTreeMap::new();
    let mut p2pkh_entities: BTreeMap<String, TemplateEntity> = BTreeMap::new();
    let mut p2pkh_scripts: BTreeMap<String, TemplateScript> = BTreeMap::new();

    // Bytecode-to-script-name maps driving the symbolic resolution pass.
    let mut unlocking_identifiers: HashMap<String, String> = HashMap::new();
    let mut locking_identifiers: HashMap<String, String> = HashMap::new();

    let mut scenario_ids = NameAllocator::new();
    let mut contracts = Vec::new();

    for (input_index, input) in builder.inputs().iter().enumerate() {
        match &input.options.source {
            InputSource::Plain => {}
            InputSource::SignatureTemplate(_) => {
                let placeholder_index = placeholder_indices[&input_index];
                let (entity_id, entity) = p2pkh_entity(placeholder_index);
                p2pkh_entities.insert(entity_id, entity);
                for (script_id, script) in p2pkh_scripts_for(placeholder_index) {
                    p2pkh_scripts.insert(script_id, script);
                }
            }
            InputSource::Contract { contract, selector, params } => {
                verify_unlocker(input, contract, *selector, input_index)?;
                let artifact = &contract.artifact;
                let function = artifact
                    .function(*selector)
                    .ok_or(ContractError::UnresolvedUnlocker { input_index })?;
                let encoded_args = encode_arguments(function, params)?;

                let scenario_id = scenario_ids.allocate(&format!(
                    "{}_{}EvaluateFunction",
                    artifact.contract_name, function.name
                ));

                let scenario = generate_scenario(
                    contract,
                    function,
                    *selector,
                    &encoded_args,
                    &transaction,
                    builder,
                    input_index,
                    &placeholder_indices,
                    current_time,
                )?;
                scenarios.insert(scenario_id.clone(), scenario);

                let (entity_id, entity) = contract_entity(artifact, function, &encoded_args);
                entities.insert(entity_id, entity);
                for (script_id, script) in
                    contract_scripts(contract, function, *selector, &encoded_args, &scenario_id)?
                {
                    scripts.insert(script_id, script);
                }

                let lock_script_name = snake_case(&format!("{}_lock", artifact.contract_name));
                let unlocking_hex =
                    hex::encode(transaction.inputs[input_index].unlocking_script.to_bytes());
                unlocking_identifiers.insert(unlocking_hex, lock_script_name.clone());
                locking_identifiers.insert(
                    hex::encode(contract.locking_bytecode().to_bytes()),
                    lock_script_name,
                );

                contracts.push(ContractScenario {
                    scenario_id,
                    artifact: artifact.clone(),
                    input_index,
                });
            }
        }
    }

    // Placeholder signers participate in every contract script.
    let contract_script_ids: Vec<String> = scripts.keys().cloned().collect();
    for entity in p2pkh_entities.values_mut() {
        let mut all = contract_script_ids.clone();
        all.append(&mut entity.scripts);
        entity.scripts = all;
    }
    entities.append(&mut p2pkh_entities);
    scripts.append(&mut p2pkh_scripts);

    resolve_backreferences(
        &mut scenarios,
        &transaction,
        &unlocking_identifiers,
        &locking_identifiers,
    );

    let mut template = WalletTemplate::advanced_debugging();
    template.entities = entities;
    template.scripts = scripts;
    template.scenarios = scenarios;

    Ok(CompiledTemplates { template, contracts })
}

/// Check that an input's unlocker is the one its provenance names.
fn verify_unlocker(
    input: &UnlockableUtxo,
    contract: &Arc<Contract>,
    selector: usize,
    input_index: usize,
) -> Result<(), ContractError> {
    let matches = match &input.unlocker {
        Unlocker::Contract(unlocker) => {
            Arc::ptr_eq(&unlocker.contract, contract) && unlocker.selector == selector
        }
        Unlocker::SignatureTemplate(_) => false,
    };
    if !matches {
        return Err(ContractError::UnresolvedUnlocker { input_index });
    }
    Ok(())
}

/// Replace resolvable raw bytecode positions with script references.
///
/// Positions already holding the evaluation slot are left alone, in every
/// scenario.
fn resolve_backreferences(
    scenarios: &mut BTreeMap<String, TemplateScenario>,
    transaction: &Transaction,
    unlocking_identifiers: &HashMap<String, String>,
    locking_identifiers: &HashMap<String, String>,
) {
    for scenario in scenarios.values_mut() {
        for (index, tx_input) in transaction.inputs.iter().enumerate() {
            let unlocking_hex = hex::encode(tx_input.unlocking_script.to_bytes());
            let Some(name) = unlocking_identifiers.get(&unlocking_hex) else { continue };
            let Some(source_output) = scenario.source_outputs.get_mut(index) else { continue };
            if source_output.locking_bytecode.is_slot() {
                continue;
            }
            source_output.locking_bytecode =
                ScenarioBytecode::ScriptRef { script: name.clone(), overrides: None };
        }

        for (index, tx_output) in transaction.outputs.iter().enumerate() {
            let locking_hex = hex::encode(tx_output.locking_script.to_bytes());
            let Some(name) = locking_identifiers.get(&locking_hex) else { continue };
            let Some(output) = scenario.transaction.outputs.get_mut(index) else { continue };
            if output.locking_bytecode.is_slot() {
                continue;
            }
            output.locking_bytecode =
                ScenarioBytecode::ScriptRef { script: name.clone(), overrides: None };
        }
    }
}

/// The entity for one placeholder P2PKH signer.
fn p2pkh_entity(index: usize) -> (String, TemplateEntity) {
    let key_name = format!("placeholder_key_{index}");
    let mut variables = BTreeMap::new();
    variables.insert(
        key_name.clone(),
        TemplateVariable {
            description: String::new(),
            name: format!("Placeholder key {index}"),
            variable_type: VariableType::HdKey,
        },
    );
    (
        format!("signer_{index}"),
        TemplateEntity {
            description: key_name,
            name: format!("Signer {index}"),
            scripts: vec![
                format!("p2pkh_placeholder_lock_{index}"),
                format!("p2pkh_placeholder_unlock_{index}"),
            ],
            variables,
        },
    )
}

/// The placeholder lock and unlock scripts for one P2PKH signer.
fn p2pkh_scripts_for(index: usize) -> Vec<(String, TemplateScript)> {
    let lock_name = format!("p2pkh_placeholder_lock_{index}");
    let unlock_name = format!("p2pkh_placeholder_unlock_{index}");
    let key_name = format!("placeholder_key_{index}");
    let signature = format!(
        "{key_name}.{}.{}",
        SignatureTemplate::signature_algorithm_name(),
        SignatureTemplate::hash_type_name(),
    );

    vec![
        (
            unlock_name.clone(),
            TemplateScript::Unlocking {
                passes: Vec::new(),
                name: unlock_name,
                script: format!("<{signature}>\n<{key_name}.public_key>"),
                unlocks: lock_name.clone(),
            },
        ),
        (
            lock_name.clone(),
            TemplateScript::Locking {
                locking_type: "standard".to_string(),
                name: lock_name,
                script: format!(
                    "OP_DUP\nOP_HASH160 <$(<{key_name}.public_key> OP_HASH160\n)> \
                     OP_EQUALVERIFY\nOP_CHECKSIG"
                ),
            },
        ),
    ]
}

/// The entity holding one contract's creation and call parameters.
fn contract_entity(
    artifact: &Artifact,
    function: &AbiFunction,
    encoded_args: &[EncodedArgument],
) -> (String, TemplateEntity) {
    let mut variables = BTreeMap::new();
    for (param, arg) in function.inputs.iter().zip(encoded_args) {
        variables.insert(
            snake_case(&param.name),
            TemplateVariable {
                description: format!(
                    "\"{}\" parameter of function \"{}\"",
                    param.name, function.name
                ),
                name: param.name.clone(),
                variable_type: if arg.is_signature() {
                    VariableType::Key
                } else {
                    VariableType::WalletData
                },
            },
        );
    }
    for param in &artifact.constructor_inputs {
        variables.insert(
            snake_case(&param.name),
            TemplateVariable {
                description: format!("\"{}\" parameter of this contract", param.name),
                name: param.name.clone(),
                variable_type: VariableType::WalletData,
            },
        );
    }
    if artifact.abi.len() > 1 {
        variables.insert(
            "function_index".to_string(),
            TemplateVariable {
                description: "Script function index to execute".to_string(),
                name: "function_index".to_string(),
                variable_type: VariableType::WalletData,
            },
        );
    }

    (
        snake_case(&format!("{}Parameters", artifact.contract_name)),
        TemplateEntity {
            description: "Contract creation and function parameters".to_string(),
            name: artifact.contract_name.clone(),
            scripts: vec![
                snake_case(&format!("{}_lock", artifact.contract_name)),
                snake_case(&format!("{}_{}_unlock", artifact.contract_name, function.name)),
            ],
            variables,
        },
    )
}

/// The unlocking and locking scripts for one contract function call.
fn contract_scripts(
    contract: &Contract,
    function: &AbiFunction,
    selector: usize,
    encoded_args: &[EncodedArgument],
    scenario_id: &str,
) -> Result<Vec<(String, TemplateScript)>, ContractError> {
    let artifact = &contract.artifact;
    let lock_name = snake_case(&format!("{}_lock", artifact.contract_name));
    let unlock_name =
        snake_case(&format!("{}_{}_unlock", artifact.contract_name, function.name));

    let mut unlock_lines = vec![
        format!("// \"{}\" function parameters", function.name),
        format_parameters_for_debugging(&function.inputs, encoded_args),
        String::new(),
    ];
    if artifact.abi.len() > 1 {
        unlock_lines.push("// function index in contract".to_string());
        unlock_lines.push(format!("<function_index> // int = <{selector}>"));
        unlock_lines.push(String::new());
    }

    let encoded_constructor_args: Vec<EncodedArgument> = contract
        .encoded_constructor_args
        .iter()
        .map(|bytes| EncodedArgument::Literal(bytes.clone()))
        .collect();
    let lock_script = [
        format!("// \"{}\" contract constructor parameters", artifact.contract_name),
        format_parameters_for_debugging(&artifact.constructor_inputs, &encoded_constructor_args),
        String::new(),
        "// bytecode".to_string(),
        format_bytecode_for_debugging(artifact)?,
    ]
    .join("\n");

    Ok(vec![
        (
            unlock_name,
            TemplateScript::Unlocking {
                passes: vec![scenario_id.to_string()],
                name: function.name.clone(),
                script: unlock_lines.join("\n"),
                unlocks: lock_name.clone(),
            },
        ),
        (
            lock_name,
            TemplateScript::Locking {
                locking_type: contract.address_type.as_str().to_string(),
                name: artifact.contract_name.clone(),
                script: lock_script,
            },
        ),
    ])
}

/// The scenario bytecode position for one transaction input or source
/// output.
fn scenario_position(
    input: &UnlockableUtxo,
    input_index: usize,
    slot_index: usize,
    placeholder_indices: &HashMap<usize, usize>,
    p2pkh_script_prefix: &str,
) -> ScenarioBytecode {
    if input_index == slot_index {
        return ScenarioBytecode::slot();
    }
    match &input.options.source {
        InputSource::SignatureTemplate(template) => {
            let placeholder_index = placeholder_indices.get(&input_index).copied().unwrap_or(0);
            let mut private_keys = BTreeMap::new();
            private_keys.insert(
                format!("placeholder_key_{placeholder_index}"),
                template.private_key_hex(),
            );
            ScenarioBytecode::ScriptRef {
                script: format!("{p2pkh_script_prefix}_{placeholder_index}"),
                overrides: Some(ScenarioOverrides {
                    keys: ScenarioKeys { private_keys },
                }),
            }
        }
        _ => ScenarioBytecode::Default {},
    }
}

/// One scenario evaluating one contract input.
#[allow(clippy::too_many_arguments)]
fn generate_scenario<P: NetworkProvider>(
    contract: &Contract,
    function: &AbiFunction,
    selector: usize,
    encoded_args: &[EncodedArgument],
    transaction: &Transaction,
    builder: &TransactionBuilder<P>,
    slot_index: usize,
    placeholder_indices: &HashMap<usize, usize>,
    current_time: u64,
) -> Result<TemplateScenario, ContractError> {
    let artifact = &contract.artifact;

    let mut bytecode = scenario_parameter_values(&function.inputs, encoded_args);
    let encoded_constructor_args: Vec<EncodedArgument> = contract
        .encoded_constructor_args
        .iter()
        .map(|bytes| EncodedArgument::Literal(bytes.clone()))
        .collect();
    bytecode.append(&mut scenario_parameter_values(
        &artifact.constructor_inputs,
        &encoded_constructor_args,
    ));
    if artifact.abi.len() > 1 {
        bytecode.insert("function_index".to_string(), selector.to_string());
    }

    let inputs = transaction
        .inputs
        .iter()
        .zip(builder.inputs())
        .enumerate()
        .map(|(index, (tx_input, builder_input))| ScenarioInput {
            outpoint_index: tx_input.source_output_index,
            outpoint_transaction_hash: tx_input.source_txid_hex(),
            sequence_number: tx_input.sequence_number,
            unlocking_bytecode: scenario_position(
                builder_input,
                index,
                slot_index,
                placeholder_indices,
                "p2pkh_placeholder_unlock",
            ),
        })
        .collect();

    let outputs = transaction
        .outputs
        .iter()
        .map(|tx_output: &TransactionOutput| ScenarioOutput {
            locking_bytecode: if &tx_output.locking_script == contract.locking_bytecode() {
                ScenarioBytecode::slot()
            } else {
                ScenarioBytecode::Hex(hex::encode(tx_output.locking_script.to_bytes()))
            },
            token: ScenarioToken::from_token_data(tx_output.token.as_ref()),
            value_satoshis: tx_output.satoshis,
        })
        .collect();

    let source_outputs = builder
        .inputs()
        .iter()
        .enumerate()
        .map(|(index, builder_input)| ScenarioOutput {
            locking_bytecode: scenario_position(
                builder_input,
                index,
                slot_index,
                placeholder_indices,
                "p2pkh_placeholder_lock",
            ),
            token: ScenarioToken::from_token_data(builder_input.utxo.token.as_ref()),
            value_satoshis: builder_input.utxo.satoshis,
        })
        .collect();

    Ok(TemplateScenario {
        name: snake_case(&format!("{}_{}Evaluate", artifact.contract_name, function.name)),
        description: "An example evaluation where this script execution passes.".to_string(),
        data: ScenarioData {
            bytecode,
            current_block_height: 2,
            current_block_time: current_time,
            keys: ScenarioKeys { private_keys: scenario_keys(&function.inputs, encoded_args) },
        },
        transaction: ScenarioTransaction {
            inputs,
            locktime: transaction.lock_time,
            outputs,
            version: transaction.version,
        },
        source_outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Argument;
    use crate::artifact::{AbiParam, CompilerInfo};
    use crate::contract::AddressType;
    use crate::provider::MockNetworkProvider;
    use crate::utxo::{Output, Utxo};
    use bch_script::Script;

    fn artifact() -> Artifact {
        Artifact {
            contract_name: "TransferWithTimeout".to_string(),
            constructor_inputs: vec![
                AbiParam { name: "sender".to_string(), type_name: "pubkey".to_string() },
                AbiParam { name: "recipient".to_string(), type_name: "pubkey".to_string() },
                AbiParam { name: "timeout".to_string(), type_name: "int".to_string() },
            ],
            abi: vec![
                AbiFunction {
                    name: "transfer".to_string(),
                    inputs: vec![AbiParam {
                        name: "recipientSig".to_string(),
                        type_name: "sig".to_string(),
                    }],
                },
                AbiFunction {
                    name: "timeout".to_string(),
                    inputs: vec![AbiParam {
                        name: "senderSig".to_string(),
                        type_name: "sig".to_string(),
                    }],
                },
            ],
            bytecode: "OP_3 OP_PICK OP_0 OP_NUMEQUAL".to_string(),
            source: String::new(),
            debug: None,
            compiler: CompilerInfo { name: "cashc".to_string(), version: "0.10.4".to_string() },
            updated_at: "2024-12-03T13:57:10.112Z".to_string(),
        }
    }

    fn sig_template(byte: u8) -> SignatureTemplate {
        let mut key = [0u8; 32];
        key[31] = byte;
        SignatureTemplate::new(key).expect("valid key")
    }

    fn builder_with_contract_and_p2pkh()
    -> (TransactionBuilder<MockNetworkProvider>, Arc<Contract>) {
        let contract = Contract::new(
            artifact(),
            &[
                Argument::Bytes(vec![0x02; 33]),
                Argument::Bytes(vec![0x03; 33]),
                Argument::Int(500_000),
            ],
            AddressType::P2sh20,
        )
        .expect("should instantiate");

        let mut builder = TransactionBuilder::new(MockNetworkProvider::new());
        let unlocker = contract
            .unlock(0, vec![Argument::Signature(sig_template(1))])
            .expect("should unlock");
        builder.add_input(
            Utxo { txid: [0xab; 32], vout: 0, satoshis: 10_000, token: None },
            unlocker,
        );
        builder.add_input(
            Utxo { txid: [0xcd; 32], vout: 1, satoshis: 5_000, token: None },
            Unlocker::SignatureTemplate(sig_template(2)),
        );
        builder
            .add_output(Output::Standard {
                to: contract.locking_bytecode().clone(),
                amount: 14_000,
                token: None,
            })
            .expect("valid output");
        (builder, contract)
    }

    /// Verify the compiled template carries the contract entity, both
    /// contract scripts, the placeholder signer, and one scenario.
    #[test]
    fn test_compile_shape() {
        let (builder, _) = builder_with_contract_and_p2pkh();
        let compiled = compile_templates(&builder, 1_700_000_000).expect("should compile");
        let template = &compiled.template;

        assert!(template.entities.contains_key("transfer_with_timeout_parameters"));
        assert!(template.entities.contains_key("signer_0"));
        assert!(template.scripts.contains_key("transfer_with_timeout_lock"));
        assert!(template.scripts.contains_key("transfer_with_timeout_transfer_unlock"));
        assert!(template.scripts.contains_key("p2pkh_placeholder_lock_0"));
        assert!(template.scripts.contains_key("p2pkh_placeholder_unlock_0"));
        assert_eq!(template.scenarios.len(), 1);
        assert_eq!(compiled.contracts.len(), 1);
        assert_eq!(
            compiled.contracts[0].scenario_id,
            "transfer_with_timeout_transfer_evaluate_function"
        );
        assert_eq!(compiled.contracts[0].input_index, 0);
    }

    /// Verify the scenario slots sit at the contract input and the output
    /// paying the contract.
    #[test]
    fn test_scenario_slots() {
        let (builder, _) = builder_with_contract_and_p2pkh();
        let compiled = compile_templates(&builder, 1_700_000_000).expect("should compile");
        let scenario = compiled
            .template
            .scenarios
            .get("transfer_with_timeout_transfer_evaluate_function")
            .expect("scenario present");

        assert!(scenario.transaction.inputs[0].unlocking_bytecode.is_slot());
        assert!(!scenario.transaction.inputs[1].unlocking_bytecode.is_slot());
        assert!(scenario.source_outputs[0].locking_bytecode.is_slot());
        assert!(scenario.transaction.outputs[0].locking_bytecode.is_slot());
        assert_eq!(scenario.data.current_block_height, 2);
        assert_eq!(scenario.data.current_block_time, 1_700_000_000);
        assert_eq!(scenario.data.bytecode.get("function_index").map(String::as_str), Some("0"));
    }

    /// Verify p2pkh positions reference the placeholder scripts with key
    /// overrides.
    #[test]
    fn test_p2pkh_references() {
        let (builder, _) = builder_with_contract_and_p2pkh();
        let compiled = compile_templates(&builder, 1_700_000_000).expect("should compile");
        let scenario = compiled
            .template
            .scenarios
            .values()
            .next()
            .expect("scenario present");

        match &scenario.transaction.inputs[1].unlocking_bytecode {
            ScenarioBytecode::ScriptRef { script, overrides } => {
                assert_eq!(script, "p2pkh_placeholder_unlock_0");
                let overrides = overrides.as_ref().expect("overrides present");
                assert_eq!(
                    overrides.keys.private_keys.get("placeholder_key_0"),
                    Some(&sig_template(2).private_key_hex())
                );
            }
            other => panic!("unexpected position: {other:?}"),
        }
        match &scenario.source_outputs[1].locking_bytecode {
            ScenarioBytecode::ScriptRef { script, .. } => {
                assert_eq!(script, "p2pkh_placeholder_lock_0")
            }
            other => panic!("unexpected position: {other:?}"),
        }
    }

    /// Verify the placeholder signer participates in the contract scripts.
    #[test]
    fn test_signer_script_list() {
        let (builder, _) = builder_with_contract_and_p2pkh();
        let compiled = compile_templates(&builder, 1_700_000_000).expect("should compile");
        let signer = compiled.template.entities.get("signer_0").expect("signer present");

        assert!(signer.scripts.contains(&"transfer_with_timeout_lock".to_string()));
        assert!(signer.scripts.contains(&"transfer_with_timeout_transfer_unlock".to_string()));
        assert!(signer.scripts.contains(&"p2pkh_placeholder_lock_0".to_string()));
        assert!(signer.scripts.contains(&"p2pkh_placeholder_unlock_0".to_string()));
    }

    /// Verify a provenance/unlocker mismatch is rejected with the input
    /// index.
    #[test]
    fn test_unlocker_mismatch() {
        let (mut builder, contract) = builder_with_contract_and_p2pkh();
        let other_unlocker = contract
            .unlock(1, vec![Argument::Signature(sig_template(1))])
            .expect("should unlock");
        builder.add_input_with_options(
            Utxo { txid: [0xee; 32], vout: 0, satoshis: 1_000, token: None },
            other_unlocker,
            crate::utxo::InputOptions {
                sequence_number: None,
                source: InputSource::Contract {
                    contract: Arc::clone(&contract),
                    selector: 0,
                    params: vec![Argument::Signature(sig_template(1))],
                },
            },
        );

        let err = compile_templates(&builder, 1_700_000_000).expect_err("should fail");
        assert!(matches!(err, ContractError::UnresolvedUnlocker { input_index: 2 }));
    }

    /// Verify plain outputs stay raw hex in scenarios.
    #[test]
    fn test_plain_output_stays_hex() {
        let (mut builder, _) = builder_with_contract_and_p2pkh();
        let destination =
            Script::from_hex("76a914e2a623699e81b291c0327f408fea765d534baa2a88ac")
                .expect("valid hex");
        builder
            .add_output(Output::Standard { to: destination.clone(), amount: 500, token: None })
            .expect("valid output");

        let compiled = compile_templates(&builder, 1_700_000_000).expect("should compile");
        let scenario = compiled.template.scenarios.values().next().expect("scenario present");
        assert_eq!(
            scenario.transaction.outputs[1].locking_bytecode,
            ScenarioBytecode::Hex(destination.to_hex())
        );
    }
}
