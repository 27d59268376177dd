/// BCH Contract SDK - Script parsing and construction.
///
/// Provides the Bitcoin Cash Script type, opcode definitions, script chunk
/// parsing, and script number (stack integer) encoding.

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod scriptnum;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use chunk::ScriptChunk;
