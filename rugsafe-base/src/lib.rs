pub mod account;
pub mod address;
pub mod error;
pub mod instruction_data;
pub mod keys;
pub mod rpc_types;
pub mod txn_lib;
pub mod txn_tools;
pub mod vault_state;
mod version;


// re-export types
pub use account::{AccountMeta, Instruction};
pub use error::VaultError;
pub use keys::{Hash, KeyPair, Pubkey, Signature, ValidationError};
pub use txn_lib::{Message, Transaction, TransactionSigner};
pub use txn_tools::{DEFAULT_VAULT_PROGRAM_ID, InstructionBuilder};

// re-export codec
pub use instruction_data::{FAUCET_AMOUNT, VaultInstruction, encode_instruction};
pub use vault_state::{
    MAX_REGISTRY_VAULTS, REGISTRY_HEADER_LEN, RegistryLayout, VAULT_LEN, Vault, VaultRegistry,
    decode_registry, decode_registry_with_layout, decode_vault,
};

// re-export address derivation
pub use address::{
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
    create_program_address, derive_associated_token_address, derive_program_address,
    faucet_mint_address, vault_registry_address,
};
