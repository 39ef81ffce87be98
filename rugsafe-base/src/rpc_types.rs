use serde::{Deserialize, Serialize};

/// How far the ledger must have progressed before a read or status is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentLevel {
    /// Latest block seen by the node
    Processed,
    /// Voted on by a supermajority
    #[default]
    Confirmed,
    /// Rooted
    Finalized,
}

impl std::str::FromStr for CommitmentLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            other => Err(format!("unknown commitment level '{}'", other)),
        }
    }
}

impl std::fmt::Display for CommitmentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        };
        write!(f, "{}", s)
    }
}

/// Account data encodings accepted by getAccountInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEncoding {
    #[serde(rename = "base64")]
    Base64,
    #[serde(rename = "base58")]
    Base58,
}

/// Configuration for getAccountInfo
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccountInfoConfig {
    pub encoding: AccountEncoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment: Option<CommitmentLevel>,
}

impl Default for AccountInfoConfig {
    fn default() -> Self {
        Self {
            encoding: AccountEncoding::Base64,
            commitment: None,
        }
    }
}

/// Configuration for sendTransaction
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionConfig {
    /// Encoding of the transaction string; always base64 from this client
    pub encoding: AccountEncoding,
    /// Skip the node's simulation pass
    pub skip_preflight: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preflight_commitment: Option<CommitmentLevel>,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        Self {
            encoding: AccountEncoding::Base64,
            skip_preflight: false,
            preflight_commitment: None,
        }
    }
}

/// Commitment-only configuration used by several read methods
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CommitmentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment: Option<CommitmentLevel>,
}
