//! Debug-template compiler.
//!
//! Compiles a fully specified [`TransactionBuilder`](crate::TransactionBuilder)
//! into a wallet template document: entities and scripts for every
//! contract and P2PKH input, one scenario per contract input, and
//! symbolic cross-references so an external IDE debugger can evaluate
//! each contract input in place.

pub mod allocator;
pub mod compile;
pub mod format;
pub mod model;

pub use allocator::NameAllocator;
pub use compile::{compile_templates, CompiledTemplates, ContractScenario};
pub use model::{
    ScenarioBytecode, ScenarioData, ScenarioInput, ScenarioKeys, ScenarioOutput,
    ScenarioOverrides, ScenarioToken, ScenarioTransaction, TemplateEntity, TemplateScenario,
    TemplateScript, TemplateVariable, VariableType, WalletTemplate,
};
