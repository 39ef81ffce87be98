//! Error types for decoding, derivation and instruction building

use thiserror::Error;

/// Errors raised by the codec, the address deriver and the instruction builder.
///
/// None of these are retryable: the same inputs always produce the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// A vault record did not have the exact fixed width
    #[error("Malformed vault record: expected {expected} bytes, found {found}")]
    MalformedRecord {
        /// The required record width
        expected: usize,
        /// The width that was supplied
        found: usize,
    },

    /// The registry buffer is shorter than its header or its declared records
    #[error("Truncated vault registry: need {required} bytes, found {found}")]
    TruncatedRegistry {
        /// Bytes required by the header and declared record count
        required: usize,
        /// Bytes actually present
        found: usize,
    },

    /// The registry count field is larger than any real registry can hold
    #[error("Vault registry count {count} exceeds maximum {max}")]
    CountOverflow {
        /// The decoded count
        count: u64,
        /// The largest count accepted
        max: u64,
    },

    /// No bump seed produced an off-curve address
    #[error("Unable to find a valid program address")]
    NoValidAddress,

    /// Seed material violates the derivation limits
    #[error("Invalid seeds: {0}")]
    InvalidSeeds(String),

    /// A required input was not supplied by the caller
    #[error("Precondition not met: {0}")]
    PreconditionNotMet(String),

    /// An instruction payload could not be parsed
    #[error("Invalid instruction data: {0}")]
    InvalidInstruction(String),

    /// Transaction compilation or serialization failed
    #[error("Transaction error: {0}")]
    Transaction(String),
}

impl VaultError {
    /// Shorthand for a missing-input error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionNotMet(msg.into())
    }
}

/// Result alias used across the base crate
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::TruncatedRegistry {
            required: 400,
            found: 399,
        };
        assert_eq!(
            err.to_string(),
            "Truncated vault registry: need 400 bytes, found 399"
        );

        let err = VaultError::precondition("no connected signer");
        assert_eq!(err.to_string(), "Precondition not met: no connected signer");
    }
}
