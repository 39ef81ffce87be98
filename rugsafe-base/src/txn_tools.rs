use crate::{
    account::{AccountMeta, Instruction},
    address::{
        ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
        derive_associated_token_address, faucet_mint_address, vault_registry_address,
    },
    error::{Result, VaultError},
    instruction_data::{FAUCET_AMOUNT, VaultInstruction},
    keys::Pubkey,
    vault_state::Vault,
};
use tracing::debug;

/// Mainnet deployment of the vault program
pub const DEFAULT_VAULT_PROGRAM_ID: &str = "FobNvbQsK5BAniZC2oJhXakjcPiArpsthTGDnX9eHDVY";

fn require_signer<'a>(key: Option<&'a Pubkey>, role: &str) -> Result<&'a Pubkey> {
    key.ok_or_else(|| VaultError::precondition(format!("no {} connected", role)))
}

/// Builds vault program instructions. Every call returns a fresh value.
#[derive(Debug, Clone)]
pub struct InstructionBuilder {}

impl InstructionBuilder {
    /// Build the create-vault instruction (opcode 0)
    ///
    /// The vault's Token-A account is the associated token account of the
    /// program itself for `token_a_mint`. The receipt mint is a fresh
    /// keypair that must co-sign.
    ///
    /// # Arguments
    /// * `program_id` - The vault program
    /// * `payer` - Funds the new accounts; `None` if no wallet is connected
    /// * `token_a_mint` - Mint of the deposit token
    /// * `receipt_mint` - Address of the receipt-token mint to create
    pub fn build_create_vault(
        program_id: &Pubkey,
        payer: Option<&Pubkey>,
        token_a_mint: &Pubkey,
        receipt_mint: &Pubkey,
    ) -> Result<Instruction> {
        let payer = require_signer(payer, "payer")?;

        let vault_token_account =
            derive_associated_token_address(program_id, token_a_mint, &TOKEN_PROGRAM_ID)?;
        let (registry, _) = vault_registry_address(program_id)?;
        debug!(
            "create-vault: token_a={} vault_account={} registry={}",
            token_a_mint, vault_token_account, registry
        );

        let accounts = vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*token_a_mint, false),
            AccountMeta::new(*receipt_mint, true),
            AccountMeta::new(vault_token_account, false),
            AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new(registry, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
        ];

        Ok(Instruction::new(
            *program_id,
            accounts,
            VaultInstruction::CreateVault.pack(),
        ))
    }

    /// Build the deposit instruction (opcode 1)
    ///
    /// Both user token accounts must already exist; this builder does not
    /// create them.
    #[allow(clippy::too_many_arguments)]
    pub fn build_deposit(
        program_id: &Pubkey,
        payer: Option<&Pubkey>,
        token_a_mint: &Pubkey,
        receipt_mint: &Pubkey,
        vault: &Pubkey,
        user_token_a: &Pubkey,
        user_receipt: &Pubkey,
        amount: u64,
    ) -> Result<Instruction> {
        let payer = require_signer(payer, "payer")?;

        let accounts = vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*token_a_mint, false),
            AccountMeta::new(*receipt_mint, false),
            AccountMeta::new(*vault, false),
            AccountMeta::new(*user_token_a, false),
            AccountMeta::new(*user_receipt, false),
            AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
        ];

        Ok(Instruction::new(
            *program_id,
            accounts,
            VaultInstruction::Deposit { amount }.pack(),
        ))
    }

    /// Build a deposit into a decoded registry entry, using the payer's
    /// associated token accounts for both mints
    pub fn build_deposit_for_vault(
        program_id: &Pubkey,
        payer: Option<&Pubkey>,
        vault: &Vault,
        amount: u64,
    ) -> Result<Instruction> {
        let owner = require_signer(payer, "payer")?;

        let user_token_a =
            derive_associated_token_address(owner, &vault.mint_token_a, &TOKEN_PROGRAM_ID)?;
        let user_receipt =
            derive_associated_token_address(owner, &vault.mint_a_token_a, &TOKEN_PROGRAM_ID)?;

        Self::build_deposit(
            program_id,
            Some(owner),
            &vault.mint_token_a,
            &vault.mint_a_token_a,
            &vault.vault_account,
            &user_token_a,
            &user_receipt,
            amount,
        )
    }

    /// Build the faucet instruction (opcode 4), minting [`FAUCET_AMOUNT`]
    /// test tokens into the caller's associated token account
    pub fn build_faucet(program_id: &Pubkey, caller: Option<&Pubkey>) -> Result<Instruction> {
        let caller = require_signer(caller, "caller")?;

        let (mint, _) = faucet_mint_address(program_id)?;
        let caller_token_account =
            derive_associated_token_address(caller, &mint, &TOKEN_PROGRAM_ID)?;

        let accounts = vec![
            AccountMeta::new(*caller, true),
            AccountMeta::new(caller_token_account, false),
            AccountMeta::new(mint, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ];

        Ok(Instruction::new(
            *program_id,
            accounts,
            VaultInstruction::Faucet {
                amount: FAUCET_AMOUNT,
            }
            .pack(),
        ))
    }
}
