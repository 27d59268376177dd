//! Compiled contract artifact model.
//!
//! An artifact is the read-only output of the external contract compiler:
//! contract name, constructor and function ABIs, bytecode (ASM), original
//! source, and debug information (compiled bytecode hex, source map, and
//! require-statement locations).

use crate::ContractError;

/// A single named, typed parameter of a constructor or ABI function.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AbiParam {
    /// The parameter name as written in the contract source.
    pub name: String,
    /// The parameter type string (e.g. "int", "pubkey", "sig", "bytes20").
    #[serde(rename = "type")]
    pub type_name: String,
}

/// One callable entry point of a contract.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AbiFunction {
    /// The function name.
    pub name: String,
    /// The function's parameters, in declaration order.
    pub inputs: Vec<AbiParam>,
}

/// Source location of a `require` statement within the compiled bytecode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequireLocation {
    /// Instruction pointer of the compiled requirement check.
    pub ip: usize,
    /// 1-based source line of the `require(...)` statement.
    pub line: usize,
}

/// Debug information emitted by the compiler alongside the bytecode.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// The compiled bytecode as a hex string.
    pub bytecode: String,
    /// Compact source map (instruction pointer to source range).
    pub source_map: String,
    /// Compiler-emitted log instrumentation. Kept opaque.
    #[serde(default)]
    pub logs: Vec<serde_json::Value>,
    /// Instruction pointers and source lines of require statements.
    #[serde(default)]
    pub requires: Vec<RequireLocation>,
}

/// Identity of the compiler that produced an artifact.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompilerInfo {
    /// Compiler name (e.g. "cashc").
    pub name: String,
    /// Compiler version string.
    pub version: String,
}

/// A compiled contract artifact, as produced by the external compiler.
///
/// Read-only once loaded; the SDK never mutates artifacts.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// The contract's name.
    pub contract_name: String,
    /// Constructor parameters, in declaration order.
    pub constructor_inputs: Vec<AbiParam>,
    /// The contract's callable functions.
    pub abi: Vec<AbiFunction>,
    /// The compiled bytecode in ASM form (space-separated opcodes).
    pub bytecode: String,
    /// The original contract source text.
    pub source: String,
    /// Optional debug information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
    /// The compiler that produced this artifact.
    pub compiler: CompilerInfo,
    /// ISO-8601 timestamp of artifact generation.
    pub updated_at: String,
}

impl Artifact {
    /// Parse an artifact from its JSON representation.
    ///
    /// # Arguments
    /// * `json` - The artifact JSON text.
    ///
    /// # Returns
    /// The parsed artifact, or an error describing the malformation.
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        serde_json::from_str(json).map_err(|e| ContractError::Artifact(e.to_string()))
    }

    /// Serialize this artifact to pretty-printed JSON.
    ///
    /// # Returns
    /// The JSON text, or an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ContractError> {
        serde_json::to_string_pretty(self).map_err(|e| ContractError::Artifact(e.to_string()))
    }

    /// The conventional source file name of this contract.
    ///
    /// # Returns
    /// `{contractName}.cash`.
    pub fn source_file(&self) -> String {
        format!("{}.cash", self.contract_name)
    }

    /// Look up an ABI function by selector index.
    ///
    /// # Arguments
    /// * `selector` - The function's index in the ABI.
    ///
    /// # Returns
    /// The function, or `None` if the selector is out of range.
    pub fn function(&self, selector: usize) -> Option<&AbiFunction> {
        self.abi.get(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT_JSON: &str = r#"{
        "contractName": "TransferWithTimeout",
        "constructorInputs": [
            { "name": "sender", "type": "pubkey" },
            { "name": "recipient", "type": "pubkey" },
            { "name": "timeout", "type": "int" }
        ],
        "abi": [
            { "name": "transfer", "inputs": [{ "name": "recipientSig", "type": "sig" }] },
            { "name": "timeout", "inputs": [{ "name": "senderSig", "type": "sig" }] }
        ],
        "bytecode": "OP_3 OP_PICK OP_0 OP_NUMEQUAL",
        "source": "contract TransferWithTimeout(...) {}",
        "debug": {
            "bytecode": "5379009c",
            "sourceMap": "7:4:9:5;;;;",
            "logs": [],
            "requires": [
                { "ip": 13, "line": 8 },
                { "ip": 27, "line": 13 }
            ]
        },
        "compiler": { "name": "cashc", "version": "0.10.4" },
        "updatedAt": "2024-12-03T13:57:10.112Z"
    }"#;

    /// Verify a full artifact JSON document parses with all fields.
    #[test]
    fn test_from_json() {
        let artifact = Artifact::from_json(ARTIFACT_JSON).expect("should parse");
        assert_eq!(artifact.contract_name, "TransferWithTimeout");
        assert_eq!(artifact.constructor_inputs.len(), 3);
        assert_eq!(artifact.abi.len(), 2);
        assert_eq!(artifact.abi[0].name, "transfer");
        assert_eq!(artifact.abi[0].inputs[0].type_name, "sig");

        let debug = artifact.debug.as_ref().expect("debug info present");
        assert_eq!(debug.bytecode, "5379009c");
        assert_eq!(debug.requires.len(), 2);
        assert_eq!(debug.requires[0], RequireLocation { ip: 13, line: 8 });

        assert_eq!(artifact.compiler.name, "cashc");
        assert_eq!(artifact.source_file(), "TransferWithTimeout.cash");
    }

    /// Verify artifacts roundtrip through JSON with camelCase field names.
    #[test]
    fn test_json_roundtrip() {
        let artifact = Artifact::from_json(ARTIFACT_JSON).expect("should parse");
        let json = artifact.to_json().expect("should serialize");
        assert!(json.contains("contractName"));
        assert!(json.contains("constructorInputs"));
        assert!(json.contains("sourceMap"));
        let reparsed = Artifact::from_json(&json).expect("should reparse");
        assert_eq!(reparsed, artifact);
    }

    /// Verify an artifact without debug info still parses.
    #[test]
    fn test_without_debug_info() {
        let json = r#"{
            "contractName": "Simple",
            "constructorInputs": [],
            "abi": [{ "name": "spend", "inputs": [] }],
            "bytecode": "OP_1",
            "source": "contract Simple() { function spend() { require(true); } }",
            "compiler": { "name": "cashc", "version": "0.10.4" },
            "updatedAt": "2024-12-03T13:57:10.112Z"
        }"#;
        let artifact = Artifact::from_json(json).expect("should parse");
        assert!(artifact.debug.is_none());
        assert!(artifact.function(0).is_some());
        assert!(artifact.function(1).is_none());
    }

    /// Verify malformed JSON yields an Artifact error.
    #[test]
    fn test_malformed_json() {
        assert!(Artifact::from_json("{").is_err());
        assert!(Artifact::from_json(r#"{"contractName": 5}"#).is_err());
    }
}
