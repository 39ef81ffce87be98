//! Offline address derivation commands

use rugsafe_base::{
    TOKEN_PROGRAM_ID, derive_associated_token_address, faucet_mint_address, vault_registry_address,
};

use crate::cli::DeriveCommands;
use crate::config::Config;
use crate::error::CliError;
use crate::output;
use crate::utils::{parse_pubkey, resolve_account_input};

/// Handle derive subcommands
pub async fn handle_derive_command(
    config: &Config,
    subcommand: DeriveCommands,
    json_format: bool,
) -> Result<(), CliError> {
    let program_id = config.vault_program_pubkey()?;

    let response = match subcommand {
        DeriveCommands::Registry => {
            let (address, bump) = vault_registry_address(&program_id)?;
            output::create_derived_address_response("registry", &address.to_string(), Some(bump))
        }
        DeriveCommands::FaucetMint => {
            let (address, bump) = faucet_mint_address(&program_id)?;
            output::create_derived_address_response(
                "faucet-mint",
                &address.to_string(),
                Some(bump),
            )
        }
        DeriveCommands::Ata { owner, mint } => {
            let owner = resolve_account_input(Some(&owner), config).await?;
            let mint = parse_pubkey(&mint, "mint")?;
            let address = derive_associated_token_address(&owner, &mint, &TOKEN_PROGRAM_ID)?;
            output::create_derived_address_response("ata", &address.to_string(), None)
        }
    };

    output::print_output(response, json_format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_derive_commands_succeed_offline() {
        let config = Config::default();
        assert!(
            handle_derive_command(&config, DeriveCommands::Registry, true)
                .await
                .is_ok()
        );
        assert!(
            handle_derive_command(&config, DeriveCommands::FaucetMint, true)
                .await
                .is_ok()
        );
        assert!(
            handle_derive_command(
                &config,
                DeriveCommands::Ata {
                    owner: "default".to_string(),
                    mint: "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi".to_string(),
                },
                true,
            )
            .await
            .is_ok()
        );
    }

    #[tokio::test]
    async fn test_derive_ata_rejects_bad_mint() {
        let config = Config::default();
        let result = handle_derive_command(
            &config,
            DeriveCommands::Ata {
                owner: "default".to_string(),
                mint: "0OIl".to_string(),
            },
            true,
        )
        .await;
        assert!(matches!(result, Err(CliError::Validation(_))));
    }
}
