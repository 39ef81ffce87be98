//! Vault registry fetcher

use rugsafe_base::{Pubkey, RegistryLayout, VaultRegistry, decode_registry_with_layout};

use crate::error::{ClientError, Result};
use crate::submit::LedgerQuery;

/// Fetch and decode the registry account using the default layout
pub async fn fetch_registry<L: LedgerQuery>(
    registry_address: &Pubkey,
    ledger: &L,
) -> Result<VaultRegistry> {
    fetch_registry_with_layout(registry_address, ledger, &RegistryLayout::default()).await
}

/// Fetch and decode the registry account.
///
/// A missing account is `AccountNotFound`; decode failures are returned as
/// [`ClientError::Vault`] without reinterpretation.
pub async fn fetch_registry_with_layout<L: LedgerQuery>(
    registry_address: &Pubkey,
    ledger: &L,
    layout: &RegistryLayout,
) -> Result<VaultRegistry> {
    let bytes = ledger
        .get_account_bytes(registry_address)
        .await?
        .ok_or(ClientError::AccountNotFound(*registry_address))?;

    tracing::debug!(
        "Fetched registry {} ({} bytes)",
        registry_address,
        bytes.len()
    );
    Ok(decode_registry_with_layout(&bytes, layout)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::tests::MockLedger;
    use assert_matches::assert_matches;
    use rugsafe_base::{Vault, VaultError};

    fn registry_address() -> Pubkey {
        Pubkey::from_bytes(&[77u8; 32])
    }

    fn two_vaults() -> VaultRegistry {
        let vault = |seed: u8| Vault {
            vault_account: Pubkey::from_bytes(&[seed; 32]),
            mint_token_a: Pubkey::from_bytes(&[seed + 1; 32]),
            mint_a_token_a: Pubkey::from_bytes(&[seed + 2; 32]),
            owner: Pubkey::from_bytes(&[seed + 3; 32]),
        };
        VaultRegistry::new(vec![vault(10), vault(20)])
    }

    #[tokio::test]
    async fn test_fetch_registry_decodes_records() {
        let mut ledger = MockLedger::default();
        ledger.accounts.insert(
            registry_address(),
            two_vaults().to_wire(&RegistryLayout::default()),
        );

        let registry = fetch_registry(&registry_address(), &ledger).await.unwrap();
        assert_eq!(registry, two_vaults());
    }

    #[tokio::test]
    async fn test_fetch_registry_missing_account() {
        let ledger = MockLedger::default();
        assert_matches!(
            fetch_registry(&registry_address(), &ledger).await,
            Err(ClientError::AccountNotFound(addr)) if addr == registry_address()
        );
    }

    #[test]
    fn test_fetch_registry_codec_error_unchanged() {
        let mut ledger = MockLedger::default();
        let mut bytes = two_vaults().to_wire(&RegistryLayout::default());
        bytes.pop();
        ledger.accounts.insert(registry_address(), bytes);

        let result = tokio_test::block_on(fetch_registry(&registry_address(), &ledger));
        assert_matches!(
            result,
            Err(ClientError::Vault(VaultError::TruncatedRegistry { .. }))
        );
    }

    #[tokio::test]
    async fn test_fetch_registry_with_custom_layout() {
        let layout = RegistryLayout::new(8).unwrap();
        let mut ledger = MockLedger::default();
        ledger
            .accounts
            .insert(registry_address(), two_vaults().to_wire(&layout));

        let registry = fetch_registry_with_layout(&registry_address(), &ledger, &layout)
            .await
            .unwrap();
        assert_eq!(registry.count(), 2);
    }
}
