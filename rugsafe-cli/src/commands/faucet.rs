//! Faucet command implementation

use serde_json::json;

use rugsafe_base::{
    FAUCET_AMOUNT, TOKEN_PROGRAM_ID, derive_associated_token_address, faucet_mint_address,
};

use crate::cli::SigningArgs;
use crate::commands::vault::{finish_transaction, vault_client};
use crate::config::Config;
use crate::error::CliError;

/// Mint the fixed faucet amount to the signer's associated token account
pub async fn request_faucet(
    config: &Config,
    signing: &SigningArgs,
    json_format: bool,
) -> Result<(), CliError> {
    let caller = config.signer(signing.signer.as_deref()).await?;
    let vaults = vault_client(config)?;

    let (mint, _) = faucet_mint_address(vaults.program_id())?;
    let recipient = derive_associated_token_address(&caller.pubkey(), &mint, &TOKEN_PROGRAM_ID)?;

    let signature = vaults.request_faucet(&caller).await?;

    finish_transaction(
        config,
        &vaults,
        "faucet",
        &caller,
        signature,
        signing.confirm,
        json!({
            "mint": mint.to_string(),
            "recipient": recipient.to_string(),
            "amount": FAUCET_AMOUNT,
        }),
        json_format,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rugsafe_base::Signature;
    use serde_json::Value;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rpc_result(result: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
    }

    #[tokio::test]
    async fn test_request_faucet_submits_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "getLatestBlockhash"})))
            .respond_with(rpc_result(json!({
                "context": {"slot": 1},
                "value": {
                    "blockhash": "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N",
                    "lastValidBlockHeight": 100
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "sendTransaction"})))
            .respond_with(rpc_result(json!(
                Signature::from_bytes(&[5u8; 64]).to_string()
            )))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config {
            rpc_base_url: server.uri(),
            ..Config::default()
        };
        request_faucet(&config, &SigningArgs::default(), true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_request_faucet_unknown_signer() {
        let config = Config::default();
        let signing = SigningArgs {
            signer: Some("missing".to_string()),
            confirm: false,
        };
        assert!(matches!(
            request_faucet(&config, &signing, true).await,
            Err(CliError::Validation(_))
        ));
    }
}
