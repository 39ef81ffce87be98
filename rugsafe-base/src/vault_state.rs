//! On-ledger vault records and the registry account that lists them

use crate::error::{Result, VaultError};
use crate::keys::Pubkey;
use bytemuck::{Pod, Zeroable};
use serde::Serialize;
use tracing::debug;

/// Width of one serialized vault record
pub const VAULT_LEN: usize = 128;

/// Width of the little-endian record count at the start of the registry
pub const REGISTRY_COUNT_LEN: usize = 4;

/// Bytes reserved before the first record. The program stores an 8-byte
/// length and an 8-byte capacity here; only the low four bytes of the
/// length are read as the count.
pub const REGISTRY_HEADER_LEN: usize = 16;

/// Largest account data size the ledger allows
pub const MAX_ACCOUNT_DATA_LEN: usize = 10 * 1024 * 1024;

/// Upper bound on the decoded record count; anything above cannot fit in an account
pub const MAX_REGISTRY_VAULTS: usize = MAX_ACCOUNT_DATA_LEN / VAULT_LEN;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct WireVault {
    vault_account: [u8; 32],
    mint_token_a: [u8; 32],
    mint_a_token_a: [u8; 32],
    owner: [u8; 32],
}

const _: () = assert!(core::mem::size_of::<WireVault>() == VAULT_LEN);

/// Decoded snapshot of one vault
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Vault {
    /// Token account holding deposited Token-A
    pub vault_account: Pubkey,
    /// Mint of the deposit token
    pub mint_token_a: Pubkey,
    /// Mint of the receipt token issued on deposit
    pub mint_a_token_a: Pubkey,
    /// Account that created the vault
    pub owner: Pubkey,
}

impl Vault {
    /// Serialize back to the 128-byte record layout
    pub fn to_wire(&self) -> [u8; VAULT_LEN] {
        let wire = WireVault {
            vault_account: self.vault_account.to_bytes(),
            mint_token_a: self.mint_token_a.to_bytes(),
            mint_a_token_a: self.mint_a_token_a.to_bytes(),
            owner: self.owner.to_bytes(),
        };
        bytemuck::cast(wire)
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        decode_vault(bytes)
    }
}

/// Decode exactly one 128-byte vault record
pub fn decode_vault(bytes: &[u8]) -> Result<Vault> {
    let wire: &WireVault = bytemuck::try_from_bytes(bytes).map_err(|_| {
        VaultError::MalformedRecord {
            expected: VAULT_LEN,
            found: bytes.len(),
        }
    })?;

    Ok(Vault {
        vault_account: Pubkey::from_bytes(&wire.vault_account),
        mint_token_a: Pubkey::from_bytes(&wire.mint_token_a),
        mint_a_token_a: Pubkey::from_bytes(&wire.mint_a_token_a),
        owner: Pubkey::from_bytes(&wire.owner),
    })
}

/// Byte layout of the registry account
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryLayout {
    header_len: usize,
}

impl RegistryLayout {
    /// Layout with a custom header width; the header must at least hold the count
    pub fn new(header_len: usize) -> Result<Self> {
        if header_len < REGISTRY_COUNT_LEN {
            return Err(VaultError::precondition(format!(
                "registry header must be at least {} bytes, got {}",
                REGISTRY_COUNT_LEN, header_len
            )));
        }
        Ok(Self { header_len })
    }

    /// Bytes before the first record
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Total bytes needed for `count` records
    pub fn required_len(&self, count: usize) -> usize {
        self.header_len + count * VAULT_LEN
    }
}

impl Default for RegistryLayout {
    fn default() -> Self {
        Self {
            header_len: REGISTRY_HEADER_LEN,
        }
    }
}

/// All vaults known to the program, in stored order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VaultRegistry {
    pub vaults: Vec<Vault>,
}

impl VaultRegistry {
    pub fn new(vaults: Vec<Vault>) -> Self {
        Self { vaults }
    }

    pub fn count(&self) -> usize {
        self.vaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Vault> {
        self.vaults.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vault> {
        self.vaults.iter()
    }

    /// Look up a vault by its token account address
    pub fn find_by_account(&self, vault_account: &Pubkey) -> Option<&Vault> {
        self.vaults
            .iter()
            .find(|v| v.vault_account == *vault_account)
    }

    /// Serialize with the count, a zeroed header pad, then each record
    pub fn to_wire(&self, layout: &RegistryLayout) -> Vec<u8> {
        let mut result = vec![0u8; layout.required_len(self.vaults.len())];
        result[..REGISTRY_COUNT_LEN].copy_from_slice(&(self.vaults.len() as u32).to_le_bytes());
        for (i, vault) in self.vaults.iter().enumerate() {
            let start = layout.header_len + i * VAULT_LEN;
            result[start..start + VAULT_LEN].copy_from_slice(&vault.to_wire());
        }
        result
    }
}

impl<'a> IntoIterator for &'a VaultRegistry {
    type Item = &'a Vault;
    type IntoIter = std::slice::Iter<'a, Vault>;

    fn into_iter(self) -> Self::IntoIter {
        self.vaults.iter()
    }
}

/// Decode the registry account using the default header width
pub fn decode_registry(bytes: &[u8]) -> Result<VaultRegistry> {
    decode_registry_with_layout(bytes, &RegistryLayout::default())
}

/// Decode the registry account.
///
/// Checks run in order: header present, count within bounds, records
/// present. Bytes past the last declared record are ignored.
///
/// # Errors
/// * `TruncatedRegistry` if the buffer is shorter than the header or the declared records
/// * `CountOverflow` if the count exceeds [`MAX_REGISTRY_VAULTS`]
pub fn decode_registry_with_layout(bytes: &[u8], layout: &RegistryLayout) -> Result<VaultRegistry> {
    let header_len = layout.header_len.max(REGISTRY_COUNT_LEN);
    if bytes.len() < header_len {
        return Err(VaultError::TruncatedRegistry {
            required: header_len,
            found: bytes.len(),
        });
    }

    let count = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if count > MAX_REGISTRY_VAULTS {
        return Err(VaultError::CountOverflow {
            count: count as u64,
            max: MAX_REGISTRY_VAULTS as u64,
        });
    }

    let required = header_len + count * VAULT_LEN;
    if bytes.len() < required {
        return Err(VaultError::TruncatedRegistry {
            required,
            found: bytes.len(),
        });
    }

    let vaults = bytes[header_len..required]
        .chunks_exact(VAULT_LEN)
        .map(decode_vault)
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Decoded vault registry: {} vaults from {} bytes",
        vaults.len(),
        bytes.len()
    );
    Ok(VaultRegistry { vaults })
}
