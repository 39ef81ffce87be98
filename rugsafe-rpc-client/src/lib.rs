//! Async client for the rugsafe vault program
//!
//! This crate reads the vault registry and submits vault instructions over
//! a Solana-style JSON-RPC endpoint.
//!
//! # Example
//!
//! ```no_run
//! use rugsafe_rpc_client::{Client, Pubkey, VaultClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .http_endpoint(url::Url::parse("http://localhost:8899")?)
//!         .build()?;
//!
//!     let program_id = Pubkey::new(rugsafe_base::DEFAULT_VAULT_PROGRAM_ID.to_string())?;
//!     let vaults = VaultClient::new(client, program_id);
//!     for vault in vaults.list_vaults().await?.iter() {
//!         println!("{} holds {}", vault.vault_account, vault.mint_token_a);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod client;
pub mod error;
pub mod http;
pub mod registry;
pub mod submit;
pub mod types;
pub mod vault;

// Re-export main types and traits
pub use client::{Client, ClientBuilder, ClientConfig};
pub use error::{ClientError, Result};
pub use registry::{fetch_registry, fetch_registry_with_layout};
pub use submit::{LedgerQuery, LedgerSubmit, build_signed_transaction, submit};
pub use vault::VaultClient;

// Re-export base types for convenience
pub use rugsafe_base::rpc_types::{AccountInfoConfig, CommitmentLevel, SendTransactionConfig};
pub use rugsafe_base::{Hash, KeyPair, Pubkey, Signature, TransactionSigner};
pub use types::{
    Account, AccountInfoResponse, LatestBlockhash, ResponseContext, RpcResponse, SignatureStatus,
    Version,
};

// Version information
/// Get the version of this client library
pub fn client_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
