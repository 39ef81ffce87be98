use crate::txn_lib::{HashBytes, PubkeyBytes, SignatureBytes};
use anyhow::Result;
use ed25519_dalek::{Signer, SigningKey};
use hex;
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Length of the secret+public array stored in Solana keypair files
pub const SOLANA_KEYPAIR_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub name: String,
    pub private_key: [u8; 32],
    pub public_key: PubkeyBytes,
    pub address_string: Pubkey,
}

impl KeyPair {
    pub fn generate(name: &str) -> Result<Self> {
        let mut private_key = [0u8; 32];
        let mut rng = OsRng;
        rng.try_fill_bytes(&mut private_key)?;
        Ok(Self::from_private_key(name, private_key))
    }

    pub fn from_hex_private_key<P: AsRef<[u8]>>(name: &str, hex_private_key: P) -> Result<Self> {
        let private_key_bytes = hex::decode(hex_private_key)
            .map_err(|e| anyhow::anyhow!("Failed to decode hex private key: {}", e))?;

        if private_key_bytes.len() != 32 {
            return Err(anyhow::anyhow!(
                "Private key must be 32 bytes, got {}",
                private_key_bytes.len()
            ));
        }

        let mut private_key = [0u8; 32];
        private_key.copy_from_slice(&private_key_bytes);
        Ok(Self::from_private_key(name, private_key))
    }

    /// Load the 64-byte `secret || public` array used by Solana keypair files.
    ///
    /// The public half must match the key derived from the secret half.
    pub fn from_solana_keypair_bytes(name: &str, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SOLANA_KEYPAIR_LEN {
            return Err(anyhow::anyhow!(
                "Keypair must be {} bytes, got {}",
                SOLANA_KEYPAIR_LEN,
                bytes.len()
            ));
        }

        let mut private_key = [0u8; 32];
        private_key.copy_from_slice(&bytes[..32]);
        let keypair = Self::from_private_key(name, private_key);

        if keypair.public_key[..] != bytes[32..] {
            return Err(anyhow::anyhow!(
                "Keypair public key does not match its secret key"
            ));
        }
        Ok(keypair)
    }

    /// Parse a Solana keypair JSON file body (a JSON array of 64 bytes)
    pub fn from_solana_keypair_json(name: &str, json: &str) -> Result<Self> {
        let bytes: Vec<u8> = serde_json::from_str(json)
            .map_err(|e| anyhow::anyhow!("Keypair file must contain a JSON byte array: {}", e))?;
        Self::from_solana_keypair_bytes(name, &bytes)
    }

    fn from_private_key(name: &str, private_key: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&private_key);
        let public_key = signing_key.verifying_key().to_bytes();

        Self {
            name: name.to_string(),
            private_key,
            public_key,
            address_string: Pubkey::from_bytes(&public_key),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.address_string
    }

    /// Sign an arbitrary message with this keypair's ed25519 key
    pub fn sign(&self, message: &[u8]) -> Signature {
        let signing_key = SigningKey::from_bytes(&self.private_key);
        Signature::from_bytes(&signing_key.sign(message).to_bytes())
    }
}

fn decode_base58<const N: usize>(input: &str) -> std::result::Result<[u8; N], String> {
    let bytes = bs58::decode(input)
        .into_vec()
        .map_err(|e| format!("invalid base58: {}", e))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| format!("expected {} bytes, got {}", N, bytes.len()))
}

/// A 32-byte ledger address
///
/// Addresses are displayed and parsed as base58 strings.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pubkey(PubkeyBytes);

impl Pubkey {
    /// Create a new public key from a base58 string
    pub fn new(key: String) -> Result<Self> {
        if key.is_empty() {
            return Err(ValidationError::InvalidPubkey("empty pubkey".to_string()).into());
        }

        // A 32-byte value never encodes to more than 44 base58 characters
        if key.len() > 44 {
            return Err(ValidationError::InvalidPubkey(format!(
                "invalid pubkey length: expected at most 44, got {}",
                key.len()
            ))
            .into());
        }

        decode_base58::<32>(&key)
            .map(Self)
            .map_err(|e| ValidationError::InvalidPubkey(format!("invalid pubkey format: {}", e)).into())
    }

    /// Create a Pubkey from raw bytes
    pub const fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(*bytes)
    }

    /// Get the raw 32 bytes
    pub const fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether the bytes decompress to a point on the ed25519 curve
    pub fn is_on_curve(&self) -> bool {
        crate::address::bytes_are_curve_point(&self.0)
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<PubkeyBytes> for Pubkey {
    fn from(bytes: PubkeyBytes) -> Self {
        Self(bytes)
    }
}

impl FromStr for Pubkey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.to_string())
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::new(s).map_err(serde::de::Error::custom)
    }
}

/// A transaction signature
///
/// Signatures are 64 bytes, encoded as base58 strings.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(SignatureBytes);

impl Signature {
    /// Create a new signature from a base58 string
    pub fn new(sig: String) -> Result<Self> {
        if sig.is_empty() {
            return Err(ValidationError::InvalidSignature("empty signature".to_string()).into());
        }

        decode_base58::<64>(&sig).map(Self).map_err(|e| {
            ValidationError::InvalidSignature(format!("invalid signature format: {}", e)).into()
        })
    }

    /// Create a Signature from raw bytes
    pub const fn from_bytes(bytes: &[u8; 64]) -> Self {
        Self(*bytes)
    }

    pub const fn to_bytes(&self) -> [u8; 64] {
        self.0
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; 64])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::new(s).map_err(serde::de::Error::custom)
    }
}

/// A recent block reference attached to every transaction for freshness
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hash(HashBytes);

impl Hash {
    /// Create a hash from a base58 string
    pub fn new(hash: String) -> Result<Self> {
        decode_base58::<32>(&hash)
            .map(Self)
            .map_err(|e| ValidationError::InvalidHash(e).into())
    }

    pub const fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(*bytes)
    }

    pub const fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self)
    }
}

/// Validation errors for input data
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid public key format
    #[error("Invalid public key: {0}")]
    InvalidPubkey(String),

    /// Invalid signature format
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Invalid block hash format
    #[error("Invalid hash: {0}")]
    InvalidHash(String),
}
