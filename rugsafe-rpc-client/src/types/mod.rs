//! Data types for the rugsafe RPC client

pub mod account;
pub mod common;
pub mod transaction;

// Re-export commonly used types
pub use account::{Account, AccountInfoResponse};
pub use common::{LatestBlockhash, ResponseContext, RpcResponse, Version};
pub use transaction::{SignatureStatus, TransactionErrorValue};
