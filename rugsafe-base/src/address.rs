//! Program-derived and associated token account addresses

use crate::error::{Result, VaultError};
use crate::keys::Pubkey;
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Maximum number of seeds, including the bump
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed
pub const MAX_SEED_LEN: usize = 32;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Seed of the registry account listing every vault
pub const VAULT_REGISTRY_SEED: &[u8] = b"vault_registry";

/// Seed of the faucet mint
pub const FAUCET_MINT_SEED: &[u8] = b"mint";

/// TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::from_bytes(&[
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133, 237,
    95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::from_bytes(&[
    140, 151, 37, 143, 78, 36, 137, 241, 187, 61, 16, 41, 20, 142, 13, 131, 11, 90, 19, 153, 218,
    255, 16, 132, 4, 142, 123, 216, 219, 233, 248, 89,
]);

/// 11111111111111111111111111111111
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::from_bytes(&[0u8; 32]);

/// SysvarRent111111111111111111111111111111111
pub const RENT_SYSVAR_ID: Pubkey = Pubkey::from_bytes(&[
    6, 167, 213, 23, 25, 44, 92, 81, 33, 140, 201, 76, 61, 74, 241, 127, 88, 218, 238, 8, 155, 161,
    253, 68, 227, 219, 217, 138, 0, 0, 0, 0,
]);

/// Whether 32 bytes decompress to a point on the ed25519 curve
pub(crate) fn bytes_are_curve_point(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Hash seeds into a program address without searching for a bump
///
/// # Arguments
/// * `seeds` - Seed components, at most 16, each at most 32 bytes
/// * `program_id` - The owning program
///
/// # Errors
/// * `InvalidSeeds` if the seed limits are exceeded
/// * `NoValidAddress` if the hash is a valid curve point
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey> {
    if seeds.len() > MAX_SEEDS {
        return Err(VaultError::InvalidSeeds(format!(
            "{} seeds exceeds maximum {}",
            seeds.len(),
            MAX_SEEDS
        )));
    }
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(VaultError::InvalidSeeds(format!(
            "seed of {} bytes exceeds maximum {}",
            seed.len(),
            MAX_SEED_LEN
        )));
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    let hash: [u8; 32] = hasher.finalize().into();

    if bytes_are_curve_point(&hash) {
        return Err(VaultError::NoValidAddress);
    }
    Ok(Pubkey::from_bytes(&hash))
}

/// Find the first off-curve program address, probing bump seeds from 255 down to 0
///
/// # Returns
/// The derived address and the bump that produced it
///
/// # Errors
/// * `InvalidSeeds` if the seeds plus bump exceed the seed limits
/// * `NoValidAddress` if every bump lands on the curve
pub fn derive_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    if seeds.len() >= MAX_SEEDS {
        return Err(VaultError::InvalidSeeds(format!(
            "{} seeds leaves no room for the bump",
            seeds.len()
        )));
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = seeds.to_vec();
        with_bump.push(&bump_seed);

        match create_program_address(&with_bump, program_id) {
            Ok(address) => {
                debug!("Derived program address {} with bump {}", address, bump);
                return Ok((address, bump));
            }
            Err(VaultError::NoValidAddress) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(VaultError::NoValidAddress)
}

/// Associated token account for `owner` holding `token_type`
pub fn derive_associated_token_address(
    owner: &Pubkey,
    token_type: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey> {
    derive_program_address(
        &[owner.as_ref(), token_program.as_ref(), token_type.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _)| address)
}

/// Registry account of the given vault program
pub fn vault_registry_address(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive_program_address(&[VAULT_REGISTRY_SEED], program_id)
}

/// Faucet mint of the given vault program
pub fn faucet_mint_address(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive_program_address(&[FAUCET_MINT_SEED], program_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn vault_program() -> Pubkey {
        Pubkey::new("FobNvbQsK5BAniZC2oJhXakjcPiArpsthTGDnX9eHDVY".to_string()).unwrap()
    }

    #[test]
    fn test_well_known_ids() {
        assert_eq!(
            TOKEN_PROGRAM_ID.to_string(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID.to_string(),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
        assert_eq!(
            SYSTEM_PROGRAM_ID.to_string(),
            "11111111111111111111111111111111"
        );
        assert_eq!(
            RENT_SYSVAR_ID.to_string(),
            "SysvarRent111111111111111111111111111111111"
        );
    }

    #[test]
    fn test_registry_and_mint_addresses() {
        let program = vault_program();

        let (registry, bump) = vault_registry_address(&program).unwrap();
        assert_eq!(
            registry.to_string(),
            "8U6y8idMfQVGWMgvdmwwYEZcHimcFxmLhEcA4Ty3wkd6"
        );
        assert_eq!(bump, 254);
        assert!(!registry.is_on_curve());

        let (mint, bump) = faucet_mint_address(&program).unwrap();
        assert_eq!(
            mint.to_string(),
            "DG3jdET19heUQjp8fdL54FBvFd5oFWZZjCG8XgmFAHQJ"
        );
        assert_eq!(bump, 254);
    }

    #[test]
    fn test_derivation_is_deterministic_and_program_sensitive() {
        let program = vault_program();
        let other = Pubkey::from_bytes(&[1u8; 32]);

        let first = derive_program_address(&[b"vault_registry"], &program).unwrap();
        let second = derive_program_address(&[b"vault_registry"], &program).unwrap();
        assert_eq!(first, second);

        let elsewhere = derive_program_address(&[b"vault_registry"], &other).unwrap();
        assert_ne!(first.0, elsewhere.0);
    }

    #[test]
    fn test_create_program_address_matches_bump() {
        let program = vault_program();
        let (address, bump) = faucet_mint_address(&program).unwrap();
        let recreated = create_program_address(&[FAUCET_MINT_SEED, &[bump]], &program).unwrap();
        assert_eq!(recreated, address);
    }

    #[test]
    fn test_associated_token_address() {
        let owner = Pubkey::from_bytes(&[7u8; 32]);
        let mint = Pubkey::from_bytes(&[9u8; 32]);
        assert_eq!(owner.to_string(), "US517G5965aydkZ46HS38QLi7UQiSojurfbQfKCELFx");

        let ata = derive_associated_token_address(&owner, &mint, &TOKEN_PROGRAM_ID).unwrap();
        assert_eq!(ata.to_string(), "BjmJ1yi1Sc4s9xQaiv4DbRuUhgfjUSc8cYSuwsFqoS9");

        let program_ata =
            derive_associated_token_address(&vault_program(), &mint, &TOKEN_PROGRAM_ID).unwrap();
        assert_eq!(
            program_ata.to_string(),
            "2q6nN4f1N8nE5REXeDdQe1GhB89xxHRGZb4tbCnEeEWV"
        );
        assert_ne!(ata, program_ata);
    }

    #[test]
    fn test_seed_limits() {
        let program = vault_program();
        let long_seed = [0u8; MAX_SEED_LEN + 1];
        assert_matches!(
            create_program_address(&[&long_seed], &program),
            Err(VaultError::InvalidSeeds(_))
        );

        let seed = [1u8; 4];
        let too_many: Vec<&[u8]> = vec![&seed[..]; MAX_SEEDS + 1];
        assert_matches!(
            create_program_address(&too_many, &program),
            Err(VaultError::InvalidSeeds(_))
        );

        let no_room: Vec<&[u8]> = vec![&seed[..]; MAX_SEEDS];
        assert_matches!(
            derive_program_address(&no_room, &program),
            Err(VaultError::InvalidSeeds(_))
        );
    }

    #[test]
    fn test_curve_point_rejected() {
        // A valid ed25519 public key is on the curve
        assert!(TOKEN_PROGRAM_ID.is_on_curve());
    }
}
