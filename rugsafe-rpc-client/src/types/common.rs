//! Common types used across the client

use serde::{Deserialize, Serialize};

use rugsafe_base::Hash;

/// Response context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseContext {
    /// The slot number
    pub slot: u64,
    /// Version of the RPC API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// Standard `{context, value}` envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcResponse<T> {
    /// The context of the response
    pub context: ResponseContext,
    /// The payload
    pub value: T,
}

/// Recent block reference returned by getLatestBlockhash
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    /// Base58 block hash
    pub blockhash: String,
    /// Last block height at which the hash is accepted
    pub last_valid_block_height: u64,
}

impl LatestBlockhash {
    /// Parse the base58 hash
    pub fn hash(&self) -> anyhow::Result<Hash> {
        Hash::new(self.blockhash.clone())
    }
}

/// Version information for the RPC node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// The node software version
    #[serde(rename = "solana-core")]
    pub solana_core: String,
    /// Active feature set identifier
    #[serde(rename = "feature-set", default, skip_serializing_if = "Option::is_none")]
    pub feature_set: Option<u32>,
}
