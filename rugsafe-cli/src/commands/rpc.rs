//! RPC command implementations

use serde_json::json;

use crate::config::Config;
use crate::error::CliError;
use crate::output;
use crate::utils::resolve_account_input;

/// Execute the getVersion command
pub async fn get_version(config: &Config, json_format: bool) -> Result<(), CliError> {
    let client = config.create_rpc_client()?;
    let version = client.get_version().await?;

    let response = output::create_version_response(&version.solana_core, version.feature_set);
    output::print_output(response, json_format);
    Ok(())
}

/// Execute the getHealth command
pub async fn get_health(config: &Config, json_format: bool) -> Result<(), CliError> {
    let client = config.create_rpc_client()?;
    let status = client.get_health().await?;

    output::print_output(output::create_health_response(&status), json_format);

    if status != "ok" {
        return Err(CliError::Validation(format!(
            "node not healthy: {}",
            status
        )));
    }
    Ok(())
}

/// Execute the getBalance command
pub async fn get_balance(
    config: &Config,
    account_input: Option<&str>,
    json_format: bool,
) -> Result<(), CliError> {
    let pubkey = resolve_account_input(account_input, config).await?;
    let client = config.create_rpc_client()?;
    let balance = client.get_balance(&pubkey).await?;

    let response = output::create_balance_response(&pubkey.to_string(), balance);
    output::print_output(response, json_format);
    Ok(())
}

/// Execute the getAccountInfo command
pub async fn get_account_info(
    config: &Config,
    account_input: Option<&str>,
    json_format: bool,
) -> Result<(), CliError> {
    let pubkey = resolve_account_input(account_input, config).await?;
    let client = config.create_rpc_client()?;

    let account = client
        .get_account_info(&pubkey, None)
        .await?
        .ok_or_else(|| rugsafe_rpc_client::ClientError::AccountNotFound(pubkey))?;

    let response = output::create_account_info_response(json!({
        "pubkey": pubkey.to_string(),
        "lamports": account.lamports,
        "owner": account.owner.to_string(),
        "dataSize": account.data.len(),
        "executable": account.executable,
        "rentEpoch": account.rent_epoch,
        "data": hex::encode(&account.data),
    }));
    output::print_output(response, json_format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rugsafe_rpc_client::ClientError;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        Config {
            rpc_base_url: server.uri(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_get_account_info_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "getAccountInfo"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"context": {"slot": 1}, "value": null}
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        assert_matches!(
            get_account_info(&config, None, true).await,
            Err(CliError::Rpc(ClientError::AccountNotFound(_)))
        );
    }

    #[tokio::test]
    async fn test_get_health_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": "behind"
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        assert_matches!(
            get_health(&config, true).await,
            Err(CliError::Validation(msg)) if msg.contains("behind")
        );
    }
}
