//! High-level vault operations for wallet front ends

use std::time::Duration;

use rugsafe_base::{
    InstructionBuilder, Pubkey, RegistryLayout, Signature, TransactionSigner, Vault,
    VaultRegistry, vault_registry_address,
};

use crate::client::Client;
use crate::error::Result;
use crate::registry::fetch_registry_with_layout;
use crate::submit::{LedgerQuery, LedgerSubmit, submit};
use crate::types::SignatureStatus;

/// Vault program bound to a ledger connection.
///
/// Mutating calls return as soon as the ledger accepts the transaction; use
/// [`VaultClient::confirm_signature`] to wait for it to land.
#[derive(Debug, Clone)]
pub struct VaultClient<L> {
    ledger: L,
    program_id: Pubkey,
    layout: RegistryLayout,
}

impl<L> VaultClient<L> {
    /// Bind `program_id` to `ledger` with the default registry layout
    pub fn new(ledger: L, program_id: Pubkey) -> Self {
        Self {
            ledger,
            program_id,
            layout: RegistryLayout::default(),
        }
    }

    /// Override the registry layout
    pub fn with_layout(mut self, layout: RegistryLayout) -> Self {
        self.layout = layout;
        self
    }

    /// The vault program
    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// The underlying ledger connection
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Address of the program's registry account
    pub fn registry_address(&self) -> Result<Pubkey> {
        Ok(vault_registry_address(&self.program_id)?.0)
    }
}

impl<L: LedgerQuery> VaultClient<L> {
    /// Every vault in the registry, in stored order
    pub async fn list_vaults(&self) -> Result<VaultRegistry> {
        let registry = self.registry_address()?;
        fetch_registry_with_layout(&registry, &self.ledger, &self.layout).await
    }
}

impl<L: LedgerSubmit> VaultClient<L> {
    /// Create a vault for `token_a_mint`, minting receipts from the fresh
    /// `receipt_mint` keypair
    pub async fn create_vault(
        &self,
        payer: &dyn TransactionSigner,
        token_a_mint: &Pubkey,
        receipt_mint: &dyn TransactionSigner,
    ) -> Result<Signature> {
        let payer_key = payer.pubkey();
        let ix = InstructionBuilder::build_create_vault(
            &self.program_id,
            Some(&payer_key),
            token_a_mint,
            &receipt_mint.pubkey(),
        )?;
        submit(&self.ledger, &[ix], &payer_key, &[payer, receipt_mint]).await
    }

    /// Deposit `amount` of Token-A into `vault` from the payer's associated
    /// token accounts
    pub async fn deposit(
        &self,
        payer: &dyn TransactionSigner,
        vault: &Vault,
        amount: u64,
    ) -> Result<Signature> {
        let payer_key = payer.pubkey();
        let ix = InstructionBuilder::build_deposit_for_vault(
            &self.program_id,
            Some(&payer_key),
            vault,
            amount,
        )?;
        submit(&self.ledger, &[ix], &payer_key, &[payer]).await
    }

    /// Deposit with explicitly supplied accounts
    #[allow(clippy::too_many_arguments)]
    pub async fn deposit_with_accounts(
        &self,
        payer: &dyn TransactionSigner,
        token_a_mint: &Pubkey,
        receipt_mint: &Pubkey,
        vault: &Pubkey,
        user_token_a: &Pubkey,
        user_receipt: &Pubkey,
        amount: u64,
    ) -> Result<Signature> {
        let payer_key = payer.pubkey();
        let ix = InstructionBuilder::build_deposit(
            &self.program_id,
            Some(&payer_key),
            token_a_mint,
            receipt_mint,
            vault,
            user_token_a,
            user_receipt,
            amount,
        )?;
        submit(&self.ledger, &[ix], &payer_key, &[payer]).await
    }

    /// Mint the fixed faucet amount of test tokens to the caller
    pub async fn request_faucet(&self, caller: &dyn TransactionSigner) -> Result<Signature> {
        let caller_key = caller.pubkey();
        let ix = InstructionBuilder::build_faucet(&self.program_id, Some(&caller_key))?;
        submit(&self.ledger, &[ix], &caller_key, &[caller]).await
    }
}

impl VaultClient<Client> {
    /// Wait until `signature` reaches the client's commitment level
    pub async fn confirm_signature(
        &self,
        signature: &Signature,
        timeout: Duration,
    ) -> Result<SignatureStatus> {
        self.ledger.confirm_signature(signature, timeout).await
    }
}
