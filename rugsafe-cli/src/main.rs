//! rugsafe CLI - Command-line interface for the rugsafe vault program
//!
//! Lists the vault registry, creates vaults, deposits Token-A and drips
//! test tokens from the program faucet.

use anyhow::Result;

use clap::Parser;
use rugsafe_rpc_client::ClientError;
use serde_json::{Value, json};
use std::process;

mod cli;
mod commands;
mod config;
mod error;
mod output;
mod utils;

use cli::{Cli, Commands};
use config::Config;
use error::CliError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let json_format = cli.json;

    if let Err(err) = run(cli).await {
        if json_format {
            output::print_output(format_error_json(&err), true);
        } else {
            output::print_error(&err.to_string());
        }
        process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut stored = Config::load().await?;
    let config = stored.with_overrides(cli.url, cli.keypair)?;

    match cli.command {
        Commands::GetVersion => commands::rpc::get_version(&config, cli.json).await,
        Commands::GetHealth => commands::rpc::get_health(&config, cli.json).await,
        Commands::GetAccountInfo { account } => {
            commands::rpc::get_account_info(&config, account.as_deref(), cli.json).await
        }
        Commands::GetBalance { account } => {
            commands::rpc::get_balance(&config, account.as_deref(), cli.json).await
        }
        Commands::ListVaults => commands::vault::list_vaults(&config, cli.json).await,
        Commands::CreateVault {
            token_a_mint,
            signing,
        } => commands::vault::create_vault(&config, &token_a_mint, &signing, cli.json).await,
        Commands::Deposit {
            vault,
            amount,
            signing,
        } => commands::vault::deposit(&config, &vault, amount, &signing, cli.json).await,
        Commands::Faucet { signing } => {
            commands::faucet::request_faucet(&config, &signing, cli.json).await
        }
        Commands::Derive { subcommand } => {
            commands::derive::handle_derive_command(&config, subcommand, cli.json).await
        }
        // Edits the stored file, so per-invocation overrides stay out of it
        Commands::Keys { subcommand } => {
            commands::keys::handle_keys_command(&mut stored, subcommand, cli.json).await
        }
    }
}

fn format_error_json(err: &CliError) -> Value {
    let (kind, extra) = match err {
        CliError::Config(_) => ("config", Value::Null),
        CliError::Rpc(client_error) => match client_error {
            ClientError::AccountNotFound(address) => (
                "account_not_found",
                json!({ "account": address.to_string() }),
            ),
            ClientError::TransactionFailed { signature, .. } => (
                "transaction_failed",
                json!({ "signature": signature.to_string() }),
            ),
            ClientError::Vault(_) => ("vault", Value::Null),
            ClientError::Timeout(duration) => (
                "timeout",
                json!({ "timeout_seconds": duration.as_secs_f64() }),
            ),
            other => (
                "rpc",
                json!({ "code": other.rpc_code(), "retryable": other.is_retryable() }),
            ),
        },
        CliError::Vault(_) => ("vault", Value::Null),
        CliError::Validation(_) => ("validation", Value::Null),
        CliError::Io(io_error) => ("io", json!({ "kind": format!("{:?}", io_error.kind()) })),
        CliError::Crypto(_) => ("crypto", Value::Null),
        CliError::Generic { .. } => ("generic", Value::Null),
    };

    let mut error_obj = json!({
        "type": kind,
        "message": err.to_string(),
    });
    if let (Some(obj), Value::Object(extra)) = (error_obj.as_object_mut(), extra) {
        obj.extend(extra);
    }

    json!({ "error": error_obj })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rugsafe_base::Pubkey;

    #[test]
    fn test_format_error_json() {
        let err = CliError::Rpc(ClientError::AccountNotFound(Pubkey::from_bytes(&[1u8; 32])));
        let payload = format_error_json(&err);
        assert_eq!(payload["error"]["type"], "account_not_found");
        assert_eq!(
            payload["error"]["account"],
            "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi"
        );

        let payload = format_error_json(&CliError::Validation("bad".to_string()));
        assert_eq!(payload["error"]["type"], "validation");
        assert_eq!(payload["error"]["message"], "Validation error: bad");
    }
}
