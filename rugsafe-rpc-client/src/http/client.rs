//! HTTP client implementation

use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::client::ClientConfig;
use crate::error::{ClientError, HttpError, Result, SerializationError, ValidationError};
use crate::submit::{LedgerQuery, LedgerSubmit};
use crate::types::{
    Account, AccountInfoResponse, LatestBlockhash, RpcResponse, SignatureStatus, Version,
};
use rugsafe_base::rpc_types::{AccountInfoConfig, CommitmentConfig, SendTransactionConfig};
use rugsafe_base::{Hash, Pubkey, Signature};

/// JSON-RPC request structure
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: u64,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    data: Option<Value>,
}

/// HTTP client for RPC requests
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    request_id: Arc<AtomicU64>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .zstd(true)
            .pool_max_idle_per_host(config.max_connections)
            .build()
            .map_err(HttpError::RequestBuilder)?;

        Ok(Self {
            client,
            config,
            request_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Get the next request ID
    fn next_request_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }

    fn commitment(&self) -> CommitmentConfig {
        CommitmentConfig {
            commitment: Some(self.config.commitment),
        }
    }

    /// Send a JSON-RPC request
    async fn send_request<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: self.next_request_id(),
            method: method.to_string(),
            params,
        };
        tracing::trace!("request: {:?}", request);

        let mut request_builder = self
            .client
            .post(self.config.http_endpoint.as_str())
            .json(&request);

        if let Some(ref token) = self.config.auth_token {
            request_builder = request_builder.bearer_auth(token);
        }

        let response = request_builder
            .send()
            .await
            .map_err(HttpError::RequestBuilder)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::RequestFailed {
                status: status.as_u16(),
                message: if body.is_empty() {
                    format!("HTTP {} error", status)
                } else {
                    body
                },
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| HttpError::ResponseParsing { source: e })?;

        tracing::trace!("response: {:?}", body);

        let rpc_response: JsonRpcResponse<T> =
            serde_json::from_str(&body).map_err(|e| SerializationError::JsonDeserialize {
                source: e,
                data: body.clone(),
            })?;

        if let Some(error) = rpc_response.error {
            return Err(HttpError::from_rpc_error(error.code, error.message, error.data).into());
        }

        rpc_response.result.ok_or_else(|| {
            ClientError::Http(HttpError::RpcError {
                code: -32603,
                message: "Internal error: missing result".to_string(),
                data: None,
            })
        })
    }

    /// Send a signed transaction; returns its first signature
    pub async fn send_transaction(&self, transaction: &[u8]) -> Result<Signature> {
        if transaction.is_empty() {
            return Err(ClientError::Validation(ValidationError::InvalidTransaction(
                "transaction bytes are empty".to_string(),
            )));
        }

        let encoded = general_purpose::STANDARD.encode(transaction);
        let config = SendTransactionConfig {
            preflight_commitment: Some(self.config.commitment),
            ..Default::default()
        };
        let params = json!([encoded, config]);

        let response: String = self.send_request("sendTransaction", Some(params)).await?;
        Signature::new(response)
            .map_err(|e| ClientError::Validation(ValidationError::InvalidSignature(e.to_string())))
    }

    /// Poll getSignatureStatuses until the transaction reaches the configured
    /// commitment, fails, or `timeout_duration` elapses
    pub async fn confirm_signature(
        &self,
        signature: &Signature,
        timeout_duration: Duration,
    ) -> Result<SignatureStatus> {
        let commitment = self.config.commitment;

        let poll_result = timeout(timeout_duration, async {
            const POLL_INTERVAL: Duration = Duration::from_millis(500);

            loop {
                let statuses = self.get_signature_statuses(&[*signature]).await?;
                match statuses.into_iter().next().flatten() {
                    Some(status) if status.err.is_some() => {
                        return Err(ClientError::TransactionFailed {
                            signature: *signature,
                            message: status
                                .err
                                .as_ref()
                                .map(|e| e.to_string())
                                .unwrap_or_default(),
                        });
                    }
                    Some(status) if status.satisfies(commitment) => return Ok(status),
                    _ => sleep(POLL_INTERVAL).await,
                }
            }
        })
        .await;

        match poll_result {
            Ok(result) => result,
            Err(_) => Err(ClientError::timeout(timeout_duration)),
        }
    }

    /// Get account balance in lamports
    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        let params = json!([pubkey.to_string(), self.commitment()]);
        let response: RpcResponse<u64> = self.send_request("getBalance", Some(params)).await?;
        Ok(response.value)
    }

    /// Get account information
    pub async fn get_account_info(
        &self,
        pubkey: &Pubkey,
        config: Option<AccountInfoConfig>,
    ) -> Result<Option<Account>> {
        Ok(self
            .get_account_info_with_context(pubkey, config)
            .await?
            .value)
    }

    /// Get account information with context
    pub async fn get_account_info_with_context(
        &self,
        pubkey: &Pubkey,
        config: Option<AccountInfoConfig>,
    ) -> Result<AccountInfoResponse> {
        let config = config.unwrap_or_else(|| AccountInfoConfig {
            commitment: Some(self.config.commitment),
            ..Default::default()
        });
        let params = json!([pubkey.to_string(), config]);

        self.send_request("getAccountInfo", Some(params)).await
    }

    /// Get a block hash recent enough for a new transaction
    pub async fn get_latest_blockhash(&self) -> Result<LatestBlockhash> {
        let params = json!([self.commitment()]);
        let response: RpcResponse<LatestBlockhash> = self
            .send_request("getLatestBlockhash", Some(params))
            .await?;
        Ok(response.value)
    }

    /// Get the status of each signature; `None` for unknown signatures
    pub async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<SignatureStatus>>> {
        let signature_strings: Vec<String> = signatures.iter().map(|s| s.to_string()).collect();
        let params = json!([signature_strings, {"searchTransactionHistory": false}]);

        let response: RpcResponse<Vec<Option<SignatureStatus>>> = self
            .send_request("getSignatureStatuses", Some(params))
            .await?;
        Ok(response.value)
    }

    /// Get version information
    pub async fn get_version(&self) -> Result<Version> {
        self.send_request("getVersion", None).await
    }

    /// Get health status
    pub async fn get_health(&self) -> Result<String> {
        self.send_request("getHealth", None).await
    }
}

impl LedgerQuery for HttpClient {
    async fn get_account_bytes(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.get_account_info(address, None).await?.map(|a| a.data))
    }
}

impl LedgerSubmit for HttpClient {
    async fn get_recent_blockref(&self) -> Result<Hash> {
        let latest = self.get_latest_blockhash().await?;
        Hash::new(latest.blockhash).map_err(ClientError::from)
    }

    async fn send_wire_transaction(&self, transaction: &[u8]) -> Result<Signature> {
        self.send_transaction(transaction).await
    }
}
