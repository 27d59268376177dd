//! Bitcoin Cash transaction construction and serialization.
//!
//! Provides the [`Transaction`], [`TransactionInput`], and
//! [`TransactionOutput`] types with full wire-format encoding and decoding,
//! including the CashTokens output prefix, plus transaction ID computation.

pub mod error;
pub mod input;
pub mod output;
pub mod token;
pub mod transaction;
pub mod wire;

pub use error::TransactionError;
pub use input::{TransactionInput, DEFAULT_SEQUENCE_NUMBER};
pub use output::TransactionOutput;
pub use token::{NftCapability, NonFungibleTokenData, TokenData};
pub use transaction::Transaction;
