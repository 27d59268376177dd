//! Mapping VM evaluation traces back to contract source.
//!
//! VM evaluation itself is external; this module consumes its outcome (a
//! [`VmTrace`]) together with an artifact's debug info and resolves the
//! failing instruction pointer to the `require` statement that caused it.

use std::fmt;

use crate::artifact::Artifact;
use crate::ContractError;

/// One source range covered by a compiled instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-based start line.
    pub start_line: usize,
    /// 0-based start column.
    pub start_col: usize,
    /// 1-based end line.
    pub end_line: usize,
    /// 0-based end column.
    pub end_col: usize,
}

/// A parsed compiler source map: one source range per instruction.
///
/// The compact form is `;`-separated per-instruction entries of
/// `startLine:startCol:endLine:endCol`, where an empty entry or field
/// repeats the previous entry's value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceMap {
    entries: Vec<SourceLocation>,
}

impl SourceMap {
    /// Parse the compact source-map format.
    ///
    /// # Arguments
    /// * `compact` - The compact source-map text.
    ///
    /// # Returns
    /// The parsed map, or an artifact error for malformed entries.
    pub fn parse(compact: &str) -> Result<Self, ContractError> {
        let mut entries = Vec::new();
        let mut previous = [0usize; 4];

        for entry in compact.split(';') {
            let mut fields = previous;
            for (index, field) in entry.split(':').take(4).enumerate() {
                if !field.is_empty() {
                    fields[index] = field.parse().map_err(|_| {
                        ContractError::Artifact(format!("malformed source map entry \"{entry}\""))
                    })?;
                }
            }
            entries.push(SourceLocation {
                start_line: fields[0],
                start_col: fields[1],
                end_line: fields[2],
                end_col: fields[3],
            });
            previous = fields;
        }

        Ok(SourceMap { entries })
    }

    /// The number of mapped instructions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The source range of an instruction pointer, clamped to the last
    /// mapped instruction.
    ///
    /// # Arguments
    /// * `ip` - The instruction pointer.
    ///
    /// # Returns
    /// The mapped range, or `None` for an empty map.
    pub fn location_at(&self, ip: usize) -> Option<&SourceLocation> {
        self.entries.get(ip).or_else(|| self.entries.last())
    }
}

/// The outcome of one externally evaluated contract input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VmTrace {
    /// Whether the input's script evaluation succeeded.
    pub passed: bool,
    /// The instruction pointer of the failed instruction. Ignored when
    /// the evaluation passed.
    pub failing_ip: usize,
    /// The index of the evaluated input.
    pub input_index: usize,
}

/// A resolved `require` statement failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequireFailure {
    /// The contract source file name.
    pub contract_file: String,
    /// The 1-based source line of the failed statement.
    pub line: usize,
    /// The index of the failing input.
    pub input_index: usize,
    /// The failed statement's source text, when the source carries it.
    pub statement: Option<String>,
}

impl fmt::Display for RequireFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{file}:{line} Require statement failed at input {input} in contract {file} at line {line}.",
            file = self.contract_file,
            line = self.line,
            input = self.input_index,
        )?;
        if let Some(ref statement) = self.statement {
            write!(f, "\nFailing statement: {statement}")?;
        }
        Ok(())
    }
}

/// Resolve an evaluation trace to the `require` statement that failed.
///
/// The failing line comes from the last `require` location at or before
/// the failing instruction pointer; when the artifact declares none, the
/// source map line is used instead.
///
/// # Arguments
/// * `trace` - The externally produced evaluation outcome.
/// * `artifact` - The artifact of the contract that was evaluated.
///
/// # Returns
/// The resolved failure, or `None` when the evaluation passed or the
/// artifact carries no usable debug info.
pub fn resolve_failure(trace: &VmTrace, artifact: &Artifact) -> Option<RequireFailure> {
    if trace.passed {
        return None;
    }
    let debug = artifact.debug.as_ref()?;

    let line = debug
        .requires
        .iter()
        .filter(|require| require.ip <= trace.failing_ip)
        .last()
        .map(|require| require.line)
        .or_else(|| {
            let map = SourceMap::parse(&debug.source_map).ok()?;
            Some(map.location_at(trace.failing_ip)?.start_line)
        })?;

    let statement = artifact
        .source
        .lines()
        .nth(line.checked_sub(1)?)
        .map(|text| text.trim().trim_end_matches(';').to_string());

    Some(RequireFailure {
        contract_file: artifact.source_file(),
        line,
        input_index: trace.input_index,
        statement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{AbiFunction, CompilerInfo, DebugInfo, RequireLocation};

    fn artifact_with_debug() -> Artifact {
        let source = "\
contract Mecenas(bytes20 recipient, bytes20 funder, int pledge) {
    function receive() {
        require(checkSequence(this.age));
        require(tx.outputs[0].value == pledge);
    }
}";
        Artifact {
            contract_name: "Mecenas".to_string(),
            constructor_inputs: vec![],
            abi: vec![AbiFunction { name: "receive".to_string(), inputs: vec![] }],
            bytecode: "OP_1".to_string(),
            source: source.to_string(),
            debug: Some(DebugInfo {
                bytecode: "51".to_string(),
                source_map: "1:0:6:1;2:4:5:5;3:8:3:41;;4:8:4:47;".to_string(),
                logs: vec![],
                requires: vec![
                    RequireLocation { ip: 2, line: 3 },
                    RequireLocation { ip: 5, line: 4 },
                ],
            }),
            compiler: CompilerInfo { name: "cashc".to_string(), version: "0.10.4".to_string() },
            updated_at: "2024-12-03T13:57:10.112Z".to_string(),
        }
    }

    /// Verify compact source maps parse with inherited empty fields.
    #[test]
    fn test_source_map_parse() {
        let map = SourceMap::parse("3:8:3:41;;4:8::47").expect("should parse");
        assert_eq!(map.len(), 3);
        assert_eq!(
            map.location_at(1),
            Some(&SourceLocation { start_line: 3, start_col: 8, end_line: 3, end_col: 41 })
        );
        assert_eq!(
            map.location_at(2),
            Some(&SourceLocation { start_line: 4, start_col: 8, end_line: 3, end_col: 47 })
        );
    }

    /// Verify out-of-range instruction pointers clamp to the last entry.
    #[test]
    fn test_source_map_clamps() {
        let map = SourceMap::parse("1:0:1:5;2:0:2:5").expect("should parse");
        assert_eq!(map.location_at(99), map.location_at(1));
    }

    /// Verify malformed entries are rejected.
    #[test]
    fn test_source_map_malformed() {
        assert!(SourceMap::parse("a:b:c:d").is_err());
    }

    /// Verify the failing ip resolves to the nearest preceding require.
    #[test]
    fn test_resolve_failure_line() {
        let artifact = artifact_with_debug();

        let failure = resolve_failure(
            &VmTrace { passed: false, failing_ip: 6, input_index: 0 },
            &artifact,
        )
        .expect("should resolve");
        assert_eq!(failure.line, 4);
        assert_eq!(
            failure.statement.as_deref(),
            Some("require(tx.outputs[0].value == pledge)")
        );

        let failure = resolve_failure(
            &VmTrace { passed: false, failing_ip: 3, input_index: 0 },
            &artifact,
        )
        .expect("should resolve");
        assert_eq!(failure.line, 3);
    }

    /// Verify the full two-line failure message format.
    #[test]
    fn test_failure_message_format() {
        let artifact = artifact_with_debug();
        let failure = resolve_failure(
            &VmTrace { passed: false, failing_ip: 6, input_index: 0 },
            &artifact,
        )
        .expect("should resolve");

        assert_eq!(
            failure.to_string(),
            "Mecenas.cash:4 Require statement failed at input 0 in contract Mecenas.cash at \
             line 4.\nFailing statement: require(tx.outputs[0].value == pledge)"
        );
    }

    /// Verify passing traces and missing debug info yield no failure.
    #[test]
    fn test_no_failure_cases() {
        let mut artifact = artifact_with_debug();
        assert!(resolve_failure(
            &VmTrace { passed: true, failing_ip: 0, input_index: 0 },
            &artifact
        )
        .is_none());

        artifact.debug = None;
        assert!(resolve_failure(
            &VmTrace { passed: false, failing_ip: 6, input_index: 0 },
            &artifact
        )
        .is_none());
    }
}
