#![deny(missing_docs)]

//! BCH Contract SDK - Complete SDK.
//!
//! Re-exports all SDK components for convenient single-crate usage.

pub use bch_script as script;
pub use bch_transaction as transaction;
pub use bch_contracts as contracts;
