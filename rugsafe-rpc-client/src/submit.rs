//! Ledger contracts and the transaction submission adapter

use rugsafe_base::{Hash, Instruction, Message, Pubkey, Signature, Transaction, TransactionSigner};

use crate::error::Result;

/// Read access to raw account data
#[allow(async_fn_in_trait)]
pub trait LedgerQuery {
    /// Raw data of the account at `address`, or `None` if it does not exist
    async fn get_account_bytes(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;
}

/// Write access to the ledger
#[allow(async_fn_in_trait)]
pub trait LedgerSubmit {
    /// A block reference recent enough to make a new transaction valid
    async fn get_recent_blockref(&self) -> Result<Hash>;

    /// Broadcast a serialized, signed transaction
    async fn send_wire_transaction(&self, transaction: &[u8]) -> Result<Signature>;
}

/// Compile, sign and broadcast `instructions` with `fee_payer` paying fees.
///
/// Every key marked as signer must have a matching entry in `signers`,
/// otherwise nothing is sent. Errors from the ledger are returned unchanged.
pub async fn submit<L: LedgerSubmit>(
    ledger: &L,
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    signers: &[&dyn TransactionSigner],
) -> Result<Signature> {
    let blockref = ledger.get_recent_blockref().await?;
    let wire = build_signed_transaction(instructions, fee_payer, signers, blockref)?;

    let signature = ledger.send_wire_transaction(&wire).await?;
    tracing::info!(
        "Submitted transaction {} ({} instructions, {} bytes)",
        signature,
        instructions.len(),
        wire.len()
    );
    Ok(signature)
}

/// Build and sign the wire bytes without touching the network
pub fn build_signed_transaction(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    signers: &[&dyn TransactionSigner],
    blockref: Hash,
) -> Result<Vec<u8>> {
    let message = Message::compile(instructions, fee_payer, blockref)?;
    let mut transaction = Transaction::new_unsigned(message);
    transaction.sign(signers)?;
    Ok(transaction.to_wire()?)
}
