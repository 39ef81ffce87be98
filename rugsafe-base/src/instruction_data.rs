//! Opcode-tagged instruction payloads understood by the vault program

use crate::error::{Result, VaultError};

pub const OPCODE_CREATE_VAULT: u8 = 0;
pub const OPCODE_DEPOSIT: u8 = 1;
pub const OPCODE_WITHDRAW: u8 = 2;
pub const OPCODE_BURN_RTOKEN: u8 = 3;
pub const OPCODE_FAUCET: u8 = 4;

/// Amount minted by every faucet request
pub const FAUCET_AMOUNT: u64 = 1000;

/// Encode `[opcode]` or `[opcode] ++ amount.to_le_bytes()`
pub fn encode_instruction(opcode: u8, amount: Option<u64>) -> Vec<u8> {
    let mut data = Vec::with_capacity(1 + amount.map_or(0, |_| 8));
    data.push(opcode);
    if let Some(amount) = amount {
        data.extend_from_slice(&amount.to_le_bytes());
    }
    data
}

/// Typed form of a vault program payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultInstruction {
    CreateVault,
    Deposit { amount: u64 },
    Withdraw { amount: u64 },
    BurnRToken { amount: u64 },
    Faucet { amount: u64 },
}

impl VaultInstruction {
    pub fn opcode(&self) -> u8 {
        match self {
            Self::CreateVault => OPCODE_CREATE_VAULT,
            Self::Deposit { .. } => OPCODE_DEPOSIT,
            Self::Withdraw { .. } => OPCODE_WITHDRAW,
            Self::BurnRToken { .. } => OPCODE_BURN_RTOKEN,
            Self::Faucet { .. } => OPCODE_FAUCET,
        }
    }

    fn amount(&self) -> Option<u64> {
        match *self {
            Self::CreateVault => None,
            Self::Deposit { amount }
            | Self::Withdraw { amount }
            | Self::BurnRToken { amount }
            | Self::Faucet { amount } => Some(amount),
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        encode_instruction(self.opcode(), self.amount())
    }

    /// Parse a payload; unknown opcodes, short amounts and trailing bytes are rejected
    pub fn unpack(data: &[u8]) -> Result<Self> {
        let (&opcode, rest) = data
            .split_first()
            .ok_or_else(|| VaultError::InvalidInstruction("empty payload".to_string()))?;

        if opcode == OPCODE_CREATE_VAULT {
            if !rest.is_empty() {
                return Err(VaultError::InvalidInstruction(format!(
                    "create-vault takes no arguments, found {} trailing bytes",
                    rest.len()
                )));
            }
            return Ok(Self::CreateVault);
        }

        let amount = unpack_amount(rest)?;
        match opcode {
            OPCODE_DEPOSIT => Ok(Self::Deposit { amount }),
            OPCODE_WITHDRAW => Ok(Self::Withdraw { amount }),
            OPCODE_BURN_RTOKEN => Ok(Self::BurnRToken { amount }),
            OPCODE_FAUCET => Ok(Self::Faucet { amount }),
            other => Err(VaultError::InvalidInstruction(format!(
                "unknown opcode {}",
                other
            ))),
        }
    }
}

fn unpack_amount(rest: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = rest.try_into().map_err(|_| {
        VaultError::InvalidInstruction(format!(
            "expected 8 amount bytes, found {}",
            rest.len()
        ))
    })?;
    Ok(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_encode_instruction() {
        assert_eq!(encode_instruction(0, None), vec![0]);
        assert_eq!(
            encode_instruction(1, Some(500)),
            vec![1, 0xF4, 0x01, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            VaultInstruction::Faucet {
                amount: FAUCET_AMOUNT
            }
            .pack(),
            vec![4, 0xE8, 0x03, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            VaultInstruction::Deposit { amount: u64::MAX }.pack(),
            vec![1, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_unpack_known_opcodes() {
        assert_eq!(
            VaultInstruction::unpack(&[0]).unwrap(),
            VaultInstruction::CreateVault
        );
        assert_eq!(
            VaultInstruction::unpack(&[2, 7, 0, 0, 0, 0, 0, 0, 0]).unwrap(),
            VaultInstruction::Withdraw { amount: 7 }
        );
        assert_eq!(
            VaultInstruction::unpack(&[3, 0, 1, 0, 0, 0, 0, 0, 0]).unwrap(),
            VaultInstruction::BurnRToken { amount: 256 }
        );
    }

    #[test]
    fn test_unpack_rejects_bad_payloads() {
        assert_matches!(VaultInstruction::unpack(&[]), Err(VaultError::InvalidInstruction(_)));
        assert_matches!(VaultInstruction::unpack(&[0, 1]), Err(VaultError::InvalidInstruction(_)));
        assert_matches!(
            VaultInstruction::unpack(&[1, 1, 2, 3]),
            Err(VaultError::InvalidInstruction(_))
        );
        assert_matches!(
            VaultInstruction::unpack(&[4, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(VaultError::InvalidInstruction(_))
        );
        assert_matches!(
            VaultInstruction::unpack(&[9, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(VaultError::InvalidInstruction(msg)) if msg.contains("unknown opcode 9")
        );
    }
}
