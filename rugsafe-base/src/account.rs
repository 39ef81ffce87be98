use crate::keys::Pubkey;

/// One account referenced by an instruction, with its access flags
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// Writable account
    pub const fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// Read-only account
    pub const fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }

    /// Short access tag used in logs and CLI output: `S`/`-` then `W`/`R`
    pub fn access_tag(&self) -> &'static str {
        match (self.is_signer, self.is_writable) {
            (true, true) => "SW",
            (true, false) => "SR",
            (false, true) => "-W",
            (false, false) => "-R",
        }
    }
}

impl Default for AccountMeta {
    fn default() -> Self {
        Self::new_readonly(Pubkey::default(), false)
    }
}

impl core::fmt::Debug for AccountMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccountMeta")
            .field("pubkey", &self.pubkey.to_string())
            .field("is_signer", &self.is_signer)
            .field("is_writable", &self.is_writable)
            .finish()
    }
}

/// A single call into an on-ledger program
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new(program_id: Pubkey, accounts: Vec<AccountMeta>, data: Vec<u8>) -> Self {
        Self {
            program_id,
            accounts,
            data,
        }
    }

    /// Keys that must sign, in account order
    pub fn signers(&self) -> impl Iterator<Item = &Pubkey> {
        self.accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| &meta.pubkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_meta_constructors() {
        let key = Pubkey::from_bytes(&[3u8; 32]);

        let meta = AccountMeta::new(key, true);
        assert!(meta.is_signer && meta.is_writable);
        assert_eq!(meta.access_tag(), "SW");

        let meta = AccountMeta::new_readonly(key, false);
        assert!(!meta.is_signer && !meta.is_writable);
        assert_eq!(meta.access_tag(), "-R");

        let meta = AccountMeta::default();
        assert_eq!(meta.pubkey, Pubkey::default());
        assert!(!meta.is_writable);
    }

    #[test]
    fn test_instruction_signers() {
        let a = Pubkey::from_bytes(&[1u8; 32]);
        let b = Pubkey::from_bytes(&[2u8; 32]);
        let c = Pubkey::from_bytes(&[3u8; 32]);
        let ix = Instruction::new(
            Pubkey::from_bytes(&[9u8; 32]),
            vec![
                AccountMeta::new(a, true),
                AccountMeta::new(b, false),
                AccountMeta::new_readonly(c, true),
            ],
            vec![0],
        );

        let signers: Vec<_> = ix.signers().copied().collect();
        assert_eq!(signers, vec![a, c]);
    }

    #[test]
    fn test_account_meta_debug_uses_address() {
        let meta = AccountMeta::new(Pubkey::from_bytes(&[1u8; 32]), false);
        let debug = format!("{:?}", meta);
        assert!(debug.contains("4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi"));
    }
}
