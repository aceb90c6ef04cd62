//! Resolved transactions
//!
//! - `types`: the [`TransactionDetail`] model the classifier and formatters read
//! - `resolver`: [`TransactionResolver`] and its JSON-RPC implementation

pub mod resolver;
pub mod types;

pub use resolver::{parse_rpc_response, RpcResolver, TransactionResolver};
pub use types::{InstructionRef, TransactionDetail};

#[cfg(test)]
pub(crate) use types::fixtures;
