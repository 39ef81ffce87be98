//! Transaction-related types

use serde::{Deserialize, Serialize};

use rugsafe_base::rpc_types::CommitmentLevel;

/// Raw error object reported by the ledger for a failed transaction
pub type TransactionErrorValue = serde_json::Value;

/// Status entry from getSignatureStatuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    /// Slot the transaction was processed in
    pub slot: u64,
    /// Number of confirmations; null once rooted
    pub confirmations: Option<u64>,
    /// Execution error, null on success
    pub err: Option<TransactionErrorValue>,
    /// Commitment the cluster has reached for this transaction
    #[serde(default)]
    pub confirmation_status: Option<CommitmentLevel>,
}

impl SignatureStatus {
    /// Whether the transaction has reached at least `commitment`
    pub fn satisfies(&self, commitment: CommitmentLevel) -> bool {
        let rank = |level: CommitmentLevel| match level {
            CommitmentLevel::Processed => 0,
            CommitmentLevel::Confirmed => 1,
            CommitmentLevel::Finalized => 2,
        };
        match self.confirmation_status {
            Some(status) => rank(status) >= rank(commitment),
            // Older nodes omit the status; null confirmations means rooted
            None => self.confirmations.is_none() || commitment != CommitmentLevel::Finalized,
        }
    }
}
