//! Configuration management for the rugsafe CLI

use anyhow::Result;
use rand::RngCore;
use rugsafe_base::rpc_types::CommitmentLevel;
use rugsafe_base::{DEFAULT_VAULT_PROGRAM_ID, KeyPair, Pubkey, REGISTRY_HEADER_LEN, RegistryLayout};
use rugsafe_rpc_client::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{CliError, ConfigError};

/// Named ed25519 seeds stored as 64-character hex strings
#[derive(Debug, Clone)]
pub struct KeyManager {
    keys: HashMap<String, String>,
}

impl Serialize for KeyManager {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.keys.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KeyManager {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let keys = HashMap::deserialize(deserializer)?;
        Ok(KeyManager { keys })
    }
}

impl Default for KeyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyManager {
    /// Create a new KeyManager holding a freshly generated `default` key
    pub fn new() -> Self {
        let mut keys = HashMap::new();
        keys.insert("default".to_string(), random_private_key_hex());
        Self { keys }
    }

    /// List all key names
    pub fn list_keys(&self) -> Vec<String> {
        let mut key_names: Vec<String> = self.keys.keys().cloned().collect();
        key_names.sort();
        key_names
    }

    /// Add a new key
    pub fn add_key(&mut self, name: &str, key: &str, overwrite: bool) -> Result<(), CliError> {
        let normalized_name = Self::normalize_key_name(name);

        if key.len() != 64 {
            return Err(CliError::Validation(
                "Key must be exactly 64 hexadecimal characters".to_string(),
            ));
        }

        hex::decode(key)
            .map_err(|_| CliError::Validation("Invalid hexadecimal key format".to_string()))?;

        if self.keys.contains_key(&normalized_name) && !overwrite {
            return Err(CliError::Validation(format!(
                "Key '{}' already exists. Use --overwrite to replace it",
                normalized_name
            )));
        }

        self.keys.insert(normalized_name, key.to_string());
        Ok(())
    }

    /// Get a key value
    pub fn get_key(&self, name: &str) -> Result<&str, CliError> {
        let normalized_name = Self::normalize_key_name(name);
        self.keys
            .get(&normalized_name)
            .map(|s| s.as_str())
            .ok_or_else(|| CliError::Validation(format!("Key '{}' not found", normalized_name)))
    }

    /// Generate a new random key
    pub fn generate_key(&mut self, name: &str, overwrite: bool) -> Result<String, CliError> {
        let normalized_name = Self::normalize_key_name(name);

        if self.keys.contains_key(&normalized_name) && !overwrite {
            return Err(CliError::Validation(format!(
                "Key '{}' already exists. Use --overwrite to replace it",
                normalized_name
            )));
        }

        let private_key_hex = random_private_key_hex();
        self.keys.insert(normalized_name, private_key_hex.clone());
        Ok(private_key_hex)
    }

    /// Remove a key
    pub fn remove_key(&mut self, name: &str) -> Result<(), CliError> {
        let normalized_name = Self::normalize_key_name(name);

        if self.keys.remove(&normalized_name).is_none() {
            return Err(CliError::Validation(format!(
                "Key '{}' not found",
                normalized_name
            )));
        }
        Ok(())
    }

    /// Get the default key
    pub fn get_default_key(&self) -> Result<&str, CliError> {
        self.get_key("default")
    }

    /// Build the keypair stored under `name`
    pub fn keypair(&self, name: &str) -> Result<KeyPair, CliError> {
        let private_key = self.get_key(name)?;
        KeyPair::from_hex_private_key(&Self::normalize_key_name(name), private_key)
            .map_err(|e| CliError::Crypto(format!("Failed to load key '{}': {}", name, e)))
    }

    /// Normalize key name to lowercase
    fn normalize_key_name(name: &str) -> String {
        name.to_lowercase()
    }
}

fn random_private_key_hex() -> String {
    let mut private_key_bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut private_key_bytes);
    hex::encode(private_key_bytes)
}

/// Configuration structure for the rugsafe CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint (e.g. http://127.0.0.1:8899)
    pub rpc_base_url: String,

    /// Key management
    pub keys: KeyManager,

    /// Solana JSON keypair used as signer instead of the `default` key
    #[serde(default)]
    pub keypair_path: Option<PathBuf>,

    /// Vault program public key
    pub vault_program_id: String,

    /// Bytes before the first vault record in the registry account
    #[serde(default = "default_registry_header_len")]
    pub registry_header_len: usize,

    /// Commitment used for reads and confirmation
    #[serde(default)]
    pub commitment: CommitmentLevel,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Optional authorization token for HTTP requests
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_registry_header_len() -> usize {
    REGISTRY_HEADER_LEN
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_base_url: "http://127.0.0.1:8899".to_string(),
            keys: KeyManager::new(),
            keypair_path: None,
            vault_program_id: DEFAULT_VAULT_PROGRAM_ID.to_string(),
            registry_header_len: REGISTRY_HEADER_LEN,
            commitment: CommitmentLevel::default(),
            timeout_seconds: 30,
            auth_token: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub async fn load() -> Result<Self, CliError> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path).await?;
        }

        Self::load_from(&config_path).await
    }

    /// Load and validate configuration from `path`
    pub async fn load_from(path: &Path) -> Result<Self, CliError> {
        let config_content = tokio::fs::read_to_string(path).await?;
        let config: Config =
            serde_yaml::from_str(&config_content).map_err(ConfigError::InvalidFormat)?;

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<(), CliError> {
        self.save_to(&Self::get_config_path()?).await
    }

    /// Save configuration to `path`
    pub async fn save_to(&self, path: &Path) -> Result<(), CliError> {
        let config_content = Self::generate_config_template(self)?;
        tokio::fs::write(path, config_content).await?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CliError> {
        self.get_rpc_url()?;

        if self.keypair_path.is_none() {
            self.keys
                .get_default_key()
                .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;
        }

        self.vault_program_pubkey()?;
        self.registry_layout()?;

        Ok(())
    }

    /// Copy with per-invocation `--url` / `--keypair` overrides applied, validated
    pub fn with_overrides(
        &self,
        url: Option<String>,
        keypair_path: Option<PathBuf>,
    ) -> Result<Config, CliError> {
        let mut config = self.clone();
        if let Some(url) = url {
            config.rpc_base_url = url;
        }
        if keypair_path.is_some() {
            config.keypair_path = keypair_path;
        }
        config.validate()?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn get_config_path() -> Result<PathBuf, CliError> {
        Ok(Self::get_config_dir()?.join("config.yaml"))
    }

    /// Get the configuration directory path
    pub fn get_config_dir() -> Result<PathBuf, CliError> {
        let home_dir = dirs::home_dir().ok_or_else(|| CliError::Generic {
            message: "Could not find home directory".to_string(),
        })?;

        Ok(home_dir.join(".rugsafe").join("cli"))
    }

    /// Create a default configuration file at `config_path`
    pub async fn create_default_config(config_path: &Path) -> Result<(), CliError> {
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                tokio::fs::create_dir_all(config_dir)
                    .await
                    .map_err(ConfigError::DirectoryCreation)?;
            }
        }

        Config::default().save_to(config_path).await?;

        eprintln!(
            "Created default configuration at: {}",
            config_path.display()
        );

        Ok(())
    }

    /// Generate a configuration template with comments
    fn generate_config_template(config: &Config) -> Result<String, CliError> {
        let yaml_content = serde_yaml::to_string(config).map_err(ConfigError::InvalidFormat)?;

        Ok(format!(
            r#"# rugsafe CLI Configuration File
# WARNING: Keep this file secure and never share your private keys

{}"#,
            yaml_content
        ))
    }

    /// Parse the RPC endpoint
    pub fn get_rpc_url(&self) -> Result<Url, CliError> {
        let url =
            Url::parse(&self.rpc_base_url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::InvalidUrl(format!(
                "unsupported scheme '{}'; expected http or https",
                scheme
            ))
            .into()),
        }
    }

    /// Get the vault program public key
    pub fn vault_program_pubkey(&self) -> Result<Pubkey, CliError> {
        Pubkey::new(self.vault_program_id.clone())
            .map_err(|e| ConfigError::InvalidPublicKey(e.to_string()).into())
    }

    /// Registry layout for the configured header width
    pub fn registry_layout(&self) -> Result<RegistryLayout, CliError> {
        RegistryLayout::new(self.registry_header_len)
            .map_err(|e| ConfigError::InvalidLayout(e.to_string()).into())
    }

    /// Resolve the signing keypair.
    ///
    /// An explicit key name wins, then `keypair_path`, then the `default` key.
    pub async fn signer(&self, key_name: Option<&str>) -> Result<KeyPair, CliError> {
        match (key_name, &self.keypair_path) {
            (Some(name), _) => self.keys.keypair(name),
            (None, Some(path)) => load_keypair_file(path).await,
            (None, None) => self.keys.keypair("default"),
        }
    }

    /// Build an RPC client for the configured endpoint
    pub fn create_rpc_client(&self) -> Result<Client, CliError> {
        let client = ClientBuilder::new()
            .http_endpoint(self.get_rpc_url()?)
            .timeout(Duration::from_secs(self.timeout_seconds))
            .auth_token(self.auth_token.clone())
            .commitment(self.commitment)
            .build()?;

        Ok(client)
    }
}

/// Read a Solana JSON keypair file
pub async fn load_keypair_file(path: &Path) -> Result<KeyPair, CliError> {
    let content = tokio::fs::read_to_string(path).await?;
    KeyPair::from_solana_keypair_json("keypair", &content).map_err(|e| {
        ConfigError::InvalidKeypairFile {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.registry_layout().unwrap(),
            RegistryLayout::default()
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let mut config = Config::default();
        assert!(config.keys.add_key("default", "invalid", true).is_err());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.rpc_base_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.rpc_base_url = "ws://127.0.0.1:8900".to_string();
        assert_matches!(
            config.validate(),
            Err(CliError::Config(ConfigError::InvalidUrl(_)))
        );
    }

    #[test]
    fn test_invalid_program_and_layout() {
        let mut config = Config::default();
        config.vault_program_id = "not-base58-0OIl".to_string();
        assert_matches!(
            config.validate(),
            Err(CliError::Config(ConfigError::InvalidPublicKey(_)))
        );

        let mut config = Config::default();
        config.registry_header_len = 2;
        assert_matches!(
            config.validate(),
            Err(CliError::Config(ConfigError::InvalidLayout(_)))
        );
    }

    #[test]
    fn test_key_manager_operations() {
        let mut keys = KeyManager::new();
        let generated = keys.generate_key("Alice", false).unwrap();
        assert_eq!(generated.len(), 64);
        assert_eq!(keys.get_key("alice").unwrap(), generated);
        assert!(keys.generate_key("alice", false).is_err());

        keys.add_key("bob", &"11".repeat(32), false).unwrap();
        assert_eq!(keys.list_keys(), vec!["alice", "bob", "default"]);

        keys.remove_key("bob").unwrap();
        assert!(keys.remove_key("bob").is_err());
        assert_eq!(
            keys.keypair("alice").unwrap().pubkey(),
            KeyPair::from_hex_private_key("alice", &generated)
                .unwrap()
                .pubkey()
        );
    }

    #[test]
    fn test_overrides_do_not_touch_stored_config() {
        let stored = Config::default();
        let effective = stored
            .with_overrides(
                Some("https://api.devnet.solana.com".to_string()),
                Some(PathBuf::from("/tmp/id.json")),
            )
            .unwrap();

        assert_eq!(effective.rpc_base_url, "https://api.devnet.solana.com");
        assert_eq!(effective.keypair_path, Some(PathBuf::from("/tmp/id.json")));
        assert_eq!(stored.rpc_base_url, "http://127.0.0.1:8899");
        assert!(stored.keypair_path.is_none());

        assert!(stored.with_overrides(Some("nope".to_string()), None).is_err());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = Config::default();
        config.rpc_base_url = "https://api.devnet.solana.com".to_string();
        config.commitment = CommitmentLevel::Finalized;
        config.auth_token = Some("token".to_string());
        config.save_to(&path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# rugsafe CLI Configuration File"));
        assert!(content.contains("commitment: finalized"));

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded.rpc_base_url, config.rpc_base_url);
        assert_eq!(loaded.commitment, CommitmentLevel::Finalized);
        assert_eq!(loaded.auth_token.as_deref(), Some("token"));
        assert_eq!(
            loaded.keys.get_default_key().unwrap(),
            config.keys.get_default_key().unwrap()
        );
    }

    #[tokio::test]
    async fn test_optional_fields_default_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let yaml = format!(
            "rpc_base_url: http://127.0.0.1:8899\nkeys:\n  default: {}\nvault_program_id: {}\ntimeout_seconds: 10\n",
            "22".repeat(32),
            DEFAULT_VAULT_PROGRAM_ID
        );
        std::fs::write(&path, yaml).unwrap();

        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config.registry_header_len, REGISTRY_HEADER_LEN);
        assert_eq!(config.commitment, CommitmentLevel::Confirmed);
        assert!(config.keypair_path.is_none());
        assert!(config.auth_token.is_none());
    }

    #[tokio::test]
    async fn test_create_default_config_makes_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".rugsafe").join("cli").join("config.yaml");

        Config::create_default_config(&path).await.unwrap();
        assert!(path.exists());
        assert!(Config::load_from(&path).await.is_ok());
    }

    #[tokio::test]
    async fn test_signer_resolution() {
        let dir = TempDir::new().unwrap();
        let keypair_path = dir.path().join("id.json");
        let file_key = KeyPair::from_hex_private_key("file", "33".repeat(32)).unwrap();
        let mut bytes = file_key.private_key.to_vec();
        bytes.extend_from_slice(&file_key.public_key);
        let json = format!(
            "[{}]",
            bytes
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<_>>()
                .join(",")
        );
        std::fs::write(&keypair_path, json).unwrap();

        let mut config = Config::default();
        let default_key = config.keys.keypair("default").unwrap();
        assert_eq!(config.signer(None).await.unwrap().pubkey(), default_key.pubkey());

        config.keypair_path = Some(keypair_path);
        assert_eq!(config.signer(None).await.unwrap().pubkey(), file_key.pubkey());
        assert_eq!(
            config.signer(Some("default")).await.unwrap().pubkey(),
            default_key.pubkey()
        );
    }

    #[tokio::test]
    async fn test_bad_keypair_file() {
        let dir = TempDir::new().unwrap();
        let keypair_path = dir.path().join("id.json");
        std::fs::write(&keypair_path, "[1,2,3]").unwrap();

        assert_matches!(
            load_keypair_file(&keypair_path).await,
            Err(CliError::Config(ConfigError::InvalidKeypairFile { .. }))
        );
    }
}
