//! Wallet template document model.
//!
//! Serializes to the authentication-template JSON consumed by external
//! IDE debuggers. Maps are `BTreeMap` so serialization order is
//! deterministic.

use std::collections::BTreeMap;

use bch_transaction::{NftCapability, TokenData};

use crate::ContractError;

/// Schema identifier carried by every compiled template.
pub const TEMPLATE_SCHEMA: &str = "https://ide.bitauth.com/authentication-template-v0.schema.json";

/// VM version every compiled template declares support for.
pub const SUPPORTED_VM: &str = "BCH_2023_05";

/// A complete wallet template document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WalletTemplate {
    /// JSON schema identifier.
    #[serde(rename = "$schema")]
    pub schema: String,
    /// Human-readable template description.
    pub description: String,
    /// Human-readable template name.
    pub name: String,
    /// Supported VM versions.
    pub supported: Vec<String>,
    /// Template format version.
    pub version: u32,
    /// Entities keyed by identifier.
    pub entities: BTreeMap<String, TemplateEntity>,
    /// Scripts keyed by identifier.
    pub scripts: BTreeMap<String, TemplateScript>,
    /// Scenarios keyed by identifier.
    pub scenarios: BTreeMap<String, TemplateScenario>,
}

impl WalletTemplate {
    /// The empty base document every compilation starts from.
    pub fn advanced_debugging() -> Self {
        WalletTemplate {
            schema: TEMPLATE_SCHEMA.to_string(),
            description: "Imported from cashscript".to_string(),
            name: "Advanced Debugging".to_string(),
            supported: vec![SUPPORTED_VM.to_string()],
            version: 0,
            entities: BTreeMap::new(),
            scripts: BTreeMap::new(),
            scenarios: BTreeMap::new(),
        }
    }

    /// Serialize this template to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ContractError> {
        serde_json::to_string_pretty(self).map_err(|e| ContractError::Artifact(e.to_string()))
    }
}

/// The type of a template variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VariableType {
    /// A private key the debugger can sign with.
    Key,
    /// An HD key placeholder.
    HdKey,
    /// An opaque data value.
    WalletData,
}

/// One variable owned by a template entity.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateVariable {
    /// Human-readable description.
    pub description: String,
    /// Human-readable name.
    pub name: String,
    /// The variable's type.
    #[serde(rename = "type")]
    pub variable_type: VariableType,
}

/// One entity: a named owner of variables referenced by scripts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateEntity {
    /// Human-readable description.
    pub description: String,
    /// Human-readable name.
    pub name: String,
    /// Identifiers of the scripts this entity participates in.
    pub scripts: Vec<String>,
    /// The entity's variables, keyed by identifier.
    pub variables: BTreeMap<String, TemplateVariable>,
}

/// One template script, either unlocking or locking.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TemplateScript {
    /// An unlocking script paired with the locking script it unlocks.
    Unlocking {
        /// Scenario identifiers this script must pass.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        passes: Vec<String>,
        /// Human-readable name.
        name: String,
        /// The script text.
        script: String,
        /// Identifier of the locking script this unlocks.
        unlocks: String,
    },
    /// A locking script.
    Locking {
        /// The locking type ("standard", "p2sh20", "p2sh32").
        #[serde(rename = "lockingType")]
        locking_type: String,
        /// Human-readable name.
        name: String,
        /// The script text.
        script: String,
    },
}

/// Private keys exported into a scenario, keyed by variable identifier.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioKeys {
    /// Private keys as hex strings.
    pub private_keys: BTreeMap<String, String>,
}

/// Variable overrides attached to a scenario script reference.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioOverrides {
    /// Key overrides.
    pub keys: ScenarioKeys,
}

/// A bytecode position inside a scenario.
///
/// Either the evaluation slot, a reference to a named template script, a
/// raw hex literal, or the enclosing script's default (`{}`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ScenarioBytecode {
    /// The script under evaluation: `["slot"]`.
    Slot(Vec<String>),
    /// A reference to another template script, with optional overrides.
    ScriptRef {
        /// The referenced script identifier.
        script: String,
        /// Variable overrides for the referenced script.
        #[serde(skip_serializing_if = "Option::is_none")]
        overrides: Option<ScenarioOverrides>,
    },
    /// Raw bytecode as a hex string.
    Hex(String),
    /// The enclosing script's default bytecode.
    Default {},
}

impl ScenarioBytecode {
    /// The evaluation slot marker.
    pub fn slot() -> Self {
        ScenarioBytecode::Slot(vec!["slot".to_string()])
    }

    /// Whether this position is the evaluation slot.
    pub fn is_slot(&self) -> bool {
        matches!(self, ScenarioBytecode::Slot(_))
    }
}

/// Non-fungible token data inside a scenario output.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioNft {
    /// The NFT capability name.
    pub capability: String,
    /// The commitment as a hex string.
    pub commitment: String,
}

/// Token data inside a scenario output.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioToken {
    /// The fungible amount as a decimal string.
    pub amount: String,
    /// The token category in display order.
    pub category: String,
    /// Attached NFT data, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft: Option<ScenarioNft>,
}

impl ScenarioToken {
    /// Convert wire-level token data into its scenario representation.
    ///
    /// # Arguments
    /// * `token` - The token data, if the output carries any.
    pub fn from_token_data(token: Option<&TokenData>) -> Option<Self> {
        let token = token?;
        Some(ScenarioToken {
            amount: token.amount.to_string(),
            category: hex::encode(token.category),
            nft: token.nft.as_ref().map(|nft| ScenarioNft {
                capability: match nft.capability {
                    NftCapability::None => "none".to_string(),
                    NftCapability::Mutable => "mutable".to_string(),
                    NftCapability::Minting => "minting".to_string(),
                },
                commitment: hex::encode(&nft.commitment),
            }),
        })
    }
}

/// One input of a scenario transaction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    /// The spent output's index.
    pub outpoint_index: u32,
    /// The spent output's txid in display order.
    pub outpoint_transaction_hash: String,
    /// The input's sequence number.
    pub sequence_number: u32,
    /// The input's unlocking bytecode position.
    pub unlocking_bytecode: ScenarioBytecode,
}

/// One output of a scenario transaction or source-output list.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutput {
    /// The output's locking bytecode position.
    pub locking_bytecode: ScenarioBytecode,
    /// Attached token data, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<ScenarioToken>,
    /// The output value in satoshis.
    pub value_satoshis: u64,
}

/// The transaction under evaluation inside a scenario.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioTransaction {
    /// The transaction's inputs.
    pub inputs: Vec<ScenarioInput>,
    /// The transaction's locktime.
    pub locktime: u32,
    /// The transaction's outputs.
    pub outputs: Vec<ScenarioOutput>,
    /// The transaction's version.
    pub version: u32,
}

/// Scenario evaluation data: variable values, environment, and keys.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioData {
    /// Bytecode values keyed by variable identifier, as `0x`-prefixed hex.
    pub bytecode: BTreeMap<String, String>,
    /// Block height the evaluation runs at.
    pub current_block_height: u32,
    /// Block time the evaluation runs at, as a Unix timestamp.
    pub current_block_time: u64,
    /// Exported private keys.
    pub keys: ScenarioKeys,
}

/// One example evaluation of an unlocking script.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateScenario {
    /// Human-readable name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Evaluation data.
    pub data: ScenarioData,
    /// The transaction under evaluation.
    pub transaction: ScenarioTransaction,
    /// The outputs being spent, one per transaction input.
    pub source_outputs: Vec<ScenarioOutput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify the base document carries the fixed header fields.
    #[test]
    fn test_base_document() {
        let template = WalletTemplate::advanced_debugging();
        let json = template.to_json().expect("should serialize");
        assert!(json.contains("\"$schema\": \"https://ide.bitauth.com/authentication-template-v0.schema.json\""));
        assert!(json.contains("\"name\": \"Advanced Debugging\""));
        assert!(json.contains("BCH_2023_05"));
    }

    /// Verify the bytecode forms serialize to their distinct JSON shapes.
    #[test]
    fn test_scenario_bytecode_forms() {
        let slot = serde_json::to_value(ScenarioBytecode::slot()).expect("should serialize");
        assert_eq!(slot, serde_json::json!(["slot"]));

        let default = serde_json::to_value(ScenarioBytecode::Default {}).expect("should serialize");
        assert_eq!(default, serde_json::json!({}));

        let hex = serde_json::to_value(ScenarioBytecode::Hex("76a9".to_string()))
            .expect("should serialize");
        assert_eq!(hex, serde_json::json!("76a9"));

        let mut private_keys = BTreeMap::new();
        private_keys.insert("placeholder_key_0".to_string(), "11".repeat(32));
        let script_ref = serde_json::to_value(ScenarioBytecode::ScriptRef {
            script: "p2pkh_placeholder_unlock_0".to_string(),
            overrides: Some(ScenarioOverrides { keys: ScenarioKeys { private_keys } }),
        })
        .expect("should serialize");
        assert_eq!(
            script_ref,
            serde_json::json!({
                "script": "p2pkh_placeholder_unlock_0",
                "overrides": { "keys": { "privateKeys": { "placeholder_key_0": "11".repeat(32) } } }
            })
        );
    }

    /// Verify untagged bytecode forms roundtrip through JSON.
    #[test]
    fn test_scenario_bytecode_roundtrip() {
        for form in [
            ScenarioBytecode::slot(),
            ScenarioBytecode::Default {},
            ScenarioBytecode::Hex("51".to_string()),
            ScenarioBytecode::ScriptRef { script: "x".to_string(), overrides: None },
        ] {
            let json = serde_json::to_string(&form).expect("should serialize");
            let back: ScenarioBytecode = serde_json::from_str(&json).expect("should parse");
            assert_eq!(back, form);
        }
    }

    /// Verify token data converts with and without NFT payloads.
    #[test]
    fn test_scenario_token_conversion() {
        assert!(ScenarioToken::from_token_data(None).is_none());

        let token = TokenData {
            category: [0x11; 32],
            amount: 5,
            nft: Some(bch_transaction::NonFungibleTokenData {
                capability: NftCapability::Minting,
                commitment: vec![0xab, 0xcd],
            }),
        };
        let scenario_token =
            ScenarioToken::from_token_data(Some(&token)).expect("should convert");
        assert_eq!(scenario_token.amount, "5");
        assert_eq!(scenario_token.category, "11".repeat(32));
        let nft = scenario_token.nft.expect("nft present");
        assert_eq!(nft.capability, "minting");
        assert_eq!(nft.commitment, "abcd");
    }

    /// Verify locking and unlocking scripts keep their distinct shapes
    /// through an untagged roundtrip.
    #[test]
    fn test_template_script_roundtrip() {
        let unlocking = TemplateScript::Unlocking {
            passes: vec!["scenario_0".to_string()],
            name: "transfer".to_string(),
            script: "<recipient_sig>".to_string(),
            unlocks: "transfer_with_timeout_lock".to_string(),
        };
        let locking = TemplateScript::Locking {
            locking_type: "p2sh32".to_string(),
            name: "TransferWithTimeout".to_string(),
            script: "// bytecode".to_string(),
        };

        for script in [unlocking, locking] {
            let json = serde_json::to_string(&script).expect("should serialize");
            let back: TemplateScript = serde_json::from_str(&json).expect("should parse");
            assert_eq!(back, script);
        }
    }
}
