//! Contract SDK for the BCH blockchain.
//!
//! Builds multi-input transactions whose inputs are unlocked by
//! heterogeneous mechanisms (plain signatures, contract-script execution
//! with ABI-encoded arguments) and compiles built transactions into
//! declarative wallet templates for VM-level debugging.
//!
//! The main entry points are [`Contract`] (instantiate a compiled artifact),
//! [`TransactionBuilder`] (assemble and broadcast transactions), and
//! [`template::compile_templates`] (produce a debugging template from a
//! builder).

pub mod argument;
pub mod artifact;
pub mod builder;
pub mod contract;
pub mod debugging;
pub mod error;
pub mod provider;
pub mod retry;
pub mod signature_template;
pub mod template;
pub mod unlocker;
pub mod utxo;

mod hash;

pub use argument::{encode_arguments, encode_constructor_arguments, Argument, EncodedArgument};
pub use artifact::{AbiFunction, AbiParam, Artifact};
pub use builder::{TransactionBuilder, TransactionDetails};
pub use contract::{AddressType, Contract};
pub use debugging::{resolve_failure, RequireFailure, SourceMap, VmTrace};
pub use error::ContractError;
pub use provider::{
    HttpNetworkProvider, HttpProviderConfig, MockNetworkProvider, NetworkProvider, ProviderError,
};
pub use retry::{Delay, NoopDelay, RetryPolicy, TokioDelay};
pub use signature_template::SignatureTemplate;
pub use template::{compile_templates, CompiledTemplates, ContractScenario};
pub use unlocker::{UnlockContext, Unlocker};
pub use utxo::{InputOptions, InputSource, Output, UnlockableUtxo, Utxo};
