//! Main client implementation

use std::time::Duration;
use url::Url;

use crate::error::Result;
use crate::http::HttpClient;
use crate::submit::{LedgerQuery, LedgerSubmit};
use crate::types::{Account, AccountInfoResponse, LatestBlockhash, SignatureStatus, Version};
use rugsafe_base::rpc_types::{AccountInfoConfig, CommitmentLevel};
use rugsafe_base::{Hash, Pubkey, Signature};

/// Public mainnet RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Configuration for the rugsafe RPC client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP endpoint for RPC calls
    pub http_endpoint: Url,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of idle connections kept per host
    pub max_connections: usize,
    /// Optional authorization token for HTTP requests
    pub auth_token: Option<String>,
    /// Commitment used for reads and confirmation
    pub commitment: CommitmentLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http_endpoint: Url::parse(DEFAULT_RPC_URL).expect("default RPC URL is valid"),
            timeout: Duration::from_secs(30),
            max_connections: 100,
            auth_token: None,
            commitment: CommitmentLevel::default(),
        }
    }
}

/// Builder for creating a configured rugsafe RPC client
#[derive(Debug)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the HTTP endpoint
    pub fn http_endpoint(mut self, url: Url) -> Self {
        self.config.http_endpoint = url;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum number of idle connections per host
    pub fn max_connections(mut self, max: usize) -> Self {
        self.config.max_connections = max;
        self
    }

    /// Set authorization token for HTTP requests
    pub fn auth_token(mut self, token: Option<String>) -> Self {
        self.config.auth_token = token;
        self
    }

    /// Set the commitment level
    pub fn commitment(mut self, commitment: CommitmentLevel) -> Self {
        self.config.commitment = commitment;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Client> {
        Client::new(self.config)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main rugsafe RPC client
#[derive(Clone, Debug)]
pub struct Client {
    config: ClientConfig,
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        tracing::info!(
            "Creating new client for {} (commitment {})",
            config.http_endpoint,
            config.commitment
        );
        let http_client = HttpClient::new(config.clone())?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Create a client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http_client
    }

    /// Get the client configuration
    pub fn get_config(&self) -> &ClientConfig {
        &self.config
    }
}

// Re-export HTTP methods for convenience
impl Client {
    /// Send a signed transaction
    pub async fn send_transaction(&self, transaction: &[u8]) -> Result<Signature> {
        self.http_client.send_transaction(transaction).await
    }

    /// Wait until a submitted transaction reaches the configured commitment
    pub async fn confirm_signature(
        &self,
        signature: &Signature,
        timeout_duration: Duration,
    ) -> Result<SignatureStatus> {
        self.http_client
            .confirm_signature(signature, timeout_duration)
            .await
    }

    /// Get account balance
    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        self.http_client.get_balance(pubkey).await
    }

    /// Get account information
    pub async fn get_account_info(
        &self,
        pubkey: &Pubkey,
        config: Option<AccountInfoConfig>,
    ) -> Result<Option<Account>> {
        self.http_client.get_account_info(pubkey, config).await
    }

    /// Get account information with context
    pub async fn get_account_info_with_context(
        &self,
        pubkey: &Pubkey,
        config: Option<AccountInfoConfig>,
    ) -> Result<AccountInfoResponse> {
        self.http_client
            .get_account_info_with_context(pubkey, config)
            .await
    }

    /// Get the latest block hash
    pub async fn get_latest_blockhash(&self) -> Result<LatestBlockhash> {
        self.http_client.get_latest_blockhash().await
    }

    /// Get signature statuses
    pub async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<SignatureStatus>>> {
        self.http_client.get_signature_statuses(signatures).await
    }

    /// Get version information
    pub async fn get_version(&self) -> Result<Version> {
        self.http_client.get_version().await
    }

    /// Get health status
    pub async fn get_health(&self) -> Result<String> {
        self.http_client.get_health().await
    }
}

impl LedgerQuery for Client {
    async fn get_account_bytes(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        self.http_client.get_account_bytes(address).await
    }
}

impl LedgerSubmit for Client {
    async fn get_recent_blockref(&self) -> Result<Hash> {
        self.http_client.get_recent_blockref().await
    }

    async fn send_wire_transaction(&self, transaction: &[u8]) -> Result<Signature> {
        self.http_client.send_wire_transaction(transaction).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = Client::builder()
            .http_endpoint(Url::parse("http://example.com:8899").unwrap())
            .timeout(Duration::from_secs(60))
            .max_connections(200)
            .auth_token(Some("secret".to_string()))
            .commitment(CommitmentLevel::Finalized)
            .build()
            .unwrap();

        assert_eq!(
            client.config.http_endpoint.as_str(),
            "http://example.com:8899/"
        );
        assert_eq!(client.config.timeout, Duration::from_secs(60));
        assert_eq!(client.config.max_connections, 200);
        assert_eq!(client.config.auth_token.as_deref(), Some("secret"));
        assert_eq!(client.config.commitment, CommitmentLevel::Finalized);
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(
            config.http_endpoint.as_str(),
            "https://api.mainnet-beta.solana.com/"
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_connections, 100);
        assert!(config.auth_token.is_none());
        assert_eq!(config.commitment, CommitmentLevel::Confirmed);
    }
}
