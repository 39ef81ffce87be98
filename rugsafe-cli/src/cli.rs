//! CLI argument parsing and command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rugsafe CLI - Command-line interface for the rugsafe vault program
#[derive(Parser)]
#[command(name = "rugsafe-cli")]
#[command(about = "Command-line interface for the rugsafe vault program")]
#[command(version = rugsafe_base::get_version!())]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Override RPC URL for this invocation
    #[arg(long = "url", global = true, env = "RUGSAFE_RPC_URL")]
    pub url: Option<String>,

    /// Sign with this Solana JSON keypair file instead of the configured key
    #[arg(long = "keypair", global = true)]
    pub keypair: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Get version information from the node
    #[command(name = "get-version")]
    GetVersion,

    /// Get health status of the node
    #[command(name = "get-health")]
    GetHealth,

    /// Get account information for a specific account
    #[command(name = "get-account-info")]
    GetAccountInfo {
        /// Account identifier (key name from config or public key)
        /// If omitted, uses the signing key
        account: Option<String>,
    },

    /// Get lamport balance for a specific account
    #[command(name = "get-balance")]
    GetBalance {
        /// Account identifier (key name from config or public key)
        /// If omitted, uses the signing key
        account: Option<String>,
    },

    /// List every vault in the program registry
    #[command(name = "list-vaults")]
    ListVaults,

    /// Create a vault for a Token-A mint
    #[command(name = "create-vault")]
    CreateVault {
        /// Mint of the token the vault will hold
        #[arg(long)]
        token_a_mint: String,

        #[command(flatten)]
        signing: SigningArgs,
    },

    /// Deposit Token-A into a vault
    #[command(name = "deposit")]
    Deposit {
        /// Registry index or vault account address
        #[arg(long)]
        vault: String,

        /// Amount of Token-A in base units
        #[arg(long)]
        amount: u64,

        #[command(flatten)]
        signing: SigningArgs,
    },

    /// Mint test tokens from the program faucet
    #[command(name = "faucet")]
    Faucet {
        #[command(flatten)]
        signing: SigningArgs,
    },

    /// Derive program addresses offline
    #[command(name = "derive")]
    Derive {
        #[command(subcommand)]
        subcommand: DeriveCommands,
    },

    /// Key management commands
    #[command(name = "keys")]
    Keys {
        #[command(subcommand)]
        subcommand: KeysCommands,
    },
}

/// Signer selection and confirmation options shared by mutating commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SigningArgs {
    /// Key name from config to sign with
    #[arg(long)]
    pub signer: Option<String>,

    /// Wait until the transaction reaches the configured commitment
    #[arg(long)]
    pub confirm: bool,
}

/// Address derivation subcommands
#[derive(Subcommand)]
pub enum DeriveCommands {
    /// Vault registry address
    Registry,

    /// Faucet mint address
    #[command(name = "faucet-mint")]
    FaucetMint,

    /// Associated token account of an owner for a mint
    Ata {
        /// Owner public key or key name
        owner: String,

        /// Mint public key
        mint: String,
    },
}

/// Key management subcommands
#[derive(Subcommand)]
pub enum KeysCommands {
    /// List all key names
    List,

    /// Add a new key
    Add {
        /// Overwrite existing key
        #[arg(long)]
        overwrite: bool,

        /// Key name (case-insensitive)
        name: String,

        /// Private key (64 hex characters)
        key: String,
    },

    /// Get a key value
    Get {
        /// Key name to retrieve
        name: String,
    },

    /// Generate a new random key
    Generate {
        /// Key name for the new key
        name: String,
    },

    /// Remove a key
    #[command(name = "rm", alias = "remove")]
    Remove {
        /// Key name to remove
        name: String,
    },
}
