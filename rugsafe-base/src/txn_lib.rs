//! Transaction library: legacy message compilation, signing, wire serialization
//!

pub type PubkeyBytes = [u8; 32];
pub type HashBytes = [u8; 32];
pub type SignatureBytes = [u8; 64];

use crate::error::{Result, VaultError};
use crate::keys::{Hash, KeyPair, Pubkey, Signature};
use crate::account::Instruction;
use bytemuck::{Pod, Zeroable, bytes_of};
use ed25519_dalek::{Verifier, VerifyingKey};

/// Largest serialized transaction the ledger accepts
pub const PACKET_DATA_SIZE: usize = 1232;

/// Account indices are encoded as a single byte
pub const MAX_MESSAGE_ACCOUNTS: usize = u8::MAX as usize;

/// Anything that can produce an ed25519 signature for a known public key.
///
/// Implemented by [`KeyPair`]; wallet adapters and hardware signers
/// implement it outside this crate.
pub trait TransactionSigner {
    fn pubkey(&self) -> Pubkey;
    fn sign_message(&self, message: &[u8]) -> Signature;
}

impl TransactionSigner for KeyPair {
    fn pubkey(&self) -> Pubkey {
        self.address_string
    }

    fn sign_message(&self, message: &[u8]) -> Signature {
        self.sign(message)
    }
}

/// Append a compact-u16 ("shortvec") length prefix
pub fn encode_shortvec_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
    if len > u16::MAX as usize {
        return Err(VaultError::Transaction(format!(
            "length {} does not fit a compact-u16",
            len
        )));
    }
    let mut rem = len as u16;
    loop {
        let mut elem = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(elem);
            return Ok(());
        }
        elem |= 0x80;
        out.push(elem);
    }
}

/// Read a compact-u16 length prefix, returning (value, bytes consumed)
pub fn decode_shortvec_len(bytes: &[u8]) -> Option<(usize, usize)> {
    let mut value: usize = 0;
    for (i, byte) in bytes.iter().take(3).enumerate() {
        value |= ((byte & 0x7f) as usize) << (i * 7);
        if byte & 0x80 == 0 {
            if value > u16::MAX as usize {
                return None;
            }
            return Some((value, i + 1));
        }
    }
    None
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

unsafe impl Pod for MessageHeader {}
unsafe impl Zeroable for MessageHeader {}

pub const MESSAGE_HEADER_SIZE: usize = core::mem::size_of::<MessageHeader>();

/// Instruction with its accounts replaced by indices into the message key table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// Flags collected per unique key during compilation
#[derive(Clone, Copy)]
struct KeyFlags {
    is_signer: bool,
    is_writable: bool,
}

/// Legacy-format ledger message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile instructions into a message with `fee_payer` as the first key.
    ///
    /// Keys are grouped as writable signers, readonly signers, writable
    /// non-signers, readonly non-signers. Within a group they keep the order
    /// in which they were first seen. A key listed more than once gets the
    /// union of its flags.
    pub fn compile(
        instructions: &[Instruction],
        fee_payer: &Pubkey,
        recent_blockhash: Hash,
    ) -> Result<Self> {
        let mut keys: Vec<(Pubkey, KeyFlags)> = vec![(
            *fee_payer,
            KeyFlags {
                is_signer: true,
                is_writable: true,
            },
        )];

        let mut merge = |key: &Pubkey, is_signer: bool, is_writable: bool| {
            if let Some((_, flags)) = keys.iter_mut().find(|(k, _)| k == key) {
                flags.is_signer |= is_signer;
                flags.is_writable |= is_writable;
            } else {
                keys.push((
                    *key,
                    KeyFlags {
                        is_signer,
                        is_writable,
                    },
                ));
            }
        };

        for ix in instructions {
            for meta in &ix.accounts {
                merge(&meta.pubkey, meta.is_signer, meta.is_writable);
            }
            merge(&ix.program_id, false, false);
        }

        let class = |flags: &KeyFlags| match (flags.is_signer, flags.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        };
        // Stable sort keeps first-seen order within each class
        keys.sort_by_key(|(_, flags)| class(flags));

        if keys.len() > MAX_MESSAGE_ACCOUNTS {
            return Err(VaultError::Transaction(format!(
                "Too many accounts: {} exceeds maximum {}",
                keys.len(),
                MAX_MESSAGE_ACCOUNTS
            )));
        }

        let count_class = |c: u8| keys.iter().filter(|(_, f)| class(f) == c).count() as u8;
        let header = MessageHeader {
            num_required_signatures: count_class(0) + count_class(1),
            num_readonly_signed_accounts: count_class(1),
            num_readonly_unsigned_accounts: count_class(3),
        };

        let account_keys: Vec<Pubkey> = keys.into_iter().map(|(k, _)| k).collect();
        let index_of = |key: &Pubkey| -> Result<u8> {
            account_keys
                .iter()
                .position(|k| k == key)
                .map(|i| i as u8)
                .ok_or_else(|| VaultError::Transaction(format!("Account {} missing from message", key)))
        };

        let compiled = instructions
            .iter()
            .map(|ix| -> Result<CompiledInstruction> {
                Ok(CompiledInstruction {
                    program_id_index: index_of(&ix.program_id)?,
                    accounts: ix
                        .accounts
                        .iter()
                        .map(|meta| index_of(&meta.pubkey))
                        .collect::<Result<Vec<u8>>>()?,
                    data: ix.data.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// Public keys that must sign, in signature order
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.header.num_required_signatures as usize]
    }

    pub fn is_writable(&self, index: usize) -> bool {
        let h = &self.header;
        let signers = h.num_required_signatures as usize;
        if index < signers {
            index < signers.saturating_sub(h.num_readonly_signed_accounts as usize)
        } else {
            index
                < self
                    .account_keys
                    .len()
                    .saturating_sub(h.num_readonly_unsigned_accounts as usize)
        }
    }

    /// Serialize to the bytes that get signed
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut result = bytes_of(&self.header).to_vec();

        encode_shortvec_len(&mut result, self.account_keys.len())?;
        for key in &self.account_keys {
            result.extend_from_slice(key.as_bytes());
        }

        result.extend_from_slice(&self.recent_blockhash.to_bytes());

        encode_shortvec_len(&mut result, self.instructions.len())?;
        for ix in &self.instructions {
            result.push(ix.program_id_index);
            encode_shortvec_len(&mut result, ix.accounts.len())?;
            result.extend_from_slice(&ix.accounts);
            encode_shortvec_len(&mut result, ix.data.len())?;
            result.extend_from_slice(&ix.data);
        }

        Ok(result)
    }

    /// Parse a serialized message, returning it with the number of bytes consumed
    pub fn from_wire(bytes: &[u8]) -> Option<(Self, usize)> {
        let mut reader = WireReader::new(bytes);

        let header = MessageHeader {
            num_required_signatures: reader.read_u8()?,
            num_readonly_signed_accounts: reader.read_u8()?,
            num_readonly_unsigned_accounts: reader.read_u8()?,
        };

        let key_count = reader.read_shortvec_len()?;
        let mut account_keys = Vec::with_capacity(key_count.min(MAX_MESSAGE_ACCOUNTS));
        for _ in 0..key_count {
            account_keys.push(Pubkey::from_bytes(&reader.read_array::<32>()?));
        }

        let signers = header.num_required_signatures as usize;
        if signers > account_keys.len()
            || header.num_readonly_signed_accounts > header.num_required_signatures
            || signers + header.num_readonly_unsigned_accounts as usize > account_keys.len()
        {
            return None;
        }

        let recent_blockhash = Hash::from_bytes(&reader.read_array::<32>()?);

        let ix_count = reader.read_shortvec_len()?;
        let mut instructions = Vec::new();
        for _ in 0..ix_count {
            let program_id_index = reader.read_u8()?;
            let acc_len = reader.read_shortvec_len()?;
            let accounts = reader.read_slice(acc_len)?.to_vec();
            let data_len = reader.read_shortvec_len()?;
            let data = reader.read_slice(data_len)?.to_vec();
            instructions.push(CompiledInstruction {
                program_id_index,
                accounts,
                data,
            });
        }

        Some((
            Self {
                header,
                account_keys,
                recent_blockhash,
                instructions,
            },
            reader.offset,
        ))
    }
}

struct WireReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> WireReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn read_slice(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        let slice = self.bytes.get(self.offset..end)?;
        self.offset = end;
        Some(slice)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.read_slice(1).map(|s| s[0])
    }

    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.read_slice(N).and_then(|s| s.try_into().ok())
    }

    fn read_shortvec_len(&mut self) -> Option<usize> {
        let (len, used) = decode_shortvec_len(self.bytes.get(self.offset..)?)?;
        self.offset += used;
        Some(len)
    }
}

/// Signed (or partially signed) ledger transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
}

impl Transaction {
    /// Create an unsigned transaction with one zeroed slot per required signer
    pub fn new_unsigned(message: Message) -> Self {
        let signatures =
            vec![Signature::default(); message.header.num_required_signatures as usize];
        Self {
            signatures,
            message,
        }
    }

    /// Sign with every required signer.
    ///
    /// Fails without modifying the transaction if any required key has no
    /// matching signer. Extra signers are ignored.
    pub fn sign(&mut self, signers: &[&dyn TransactionSigner]) -> Result<()> {
        let message_bytes = self.message.to_wire()?;

        let mut ordered = Vec::with_capacity(self.signatures.len());
        for key in self.message.signer_keys() {
            let signer = signers
                .iter()
                .find(|s| s.pubkey() == *key)
                .ok_or_else(|| VaultError::precondition(format!("missing signer for {}", key)))?;
            ordered.push(*signer);
        }

        self.signatures = ordered
            .into_iter()
            .map(|s| s.sign_message(&message_bytes))
            .collect();
        Ok(())
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
            && self.signatures.iter().all(|s| *s != Signature::default())
    }

    /// Check every signature against its key
    pub fn verify(&self) -> bool {
        let Ok(message_bytes) = self.message.to_wire() else {
            return false;
        };
        let keys = self.message.signer_keys();
        if keys.len() != self.signatures.len() {
            return false;
        }
        keys.iter().zip(&self.signatures).all(|(key, sig)| {
            VerifyingKey::from_bytes(key.as_bytes())
                .map(|vk| {
                    vk.verify(
                        &message_bytes,
                        &ed25519_dalek::Signature::from_bytes(&sig.to_bytes()),
                    )
                    .is_ok()
                })
                .unwrap_or(false)
        })
    }

    /// First signature, which identifies the transaction on the ledger
    pub fn get_signature(&self) -> Option<Signature> {
        self.signatures.first().copied()
    }

    /// Serialize to on-wire format, enforcing the packet size limit
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut result = Vec::new();
        encode_shortvec_len(&mut result, self.signatures.len())?;
        for sig in &self.signatures {
            result.extend_from_slice(&sig.to_bytes());
        }
        result.extend_from_slice(&self.message.to_wire()?);

        if result.len() > PACKET_DATA_SIZE {
            return Err(VaultError::Transaction(format!(
                "Transaction size {} exceeds maximum allowed size {}",
                result.len(),
                PACKET_DATA_SIZE
            )));
        }
        Ok(result)
    }

    /// Deserialize from on-wire format; trailing bytes are rejected
    pub fn from_wire(bytes: &[u8]) -> Option<Self> {
        let (sig_count, mut offset) = decode_shortvec_len(bytes)?;
        let mut signatures = Vec::with_capacity(sig_count.min(MAX_MESSAGE_ACCOUNTS));
        for _ in 0..sig_count {
            let raw: [u8; 64] = bytes.get(offset..offset + 64)?.try_into().ok()?;
            signatures.push(Signature::from_bytes(&raw));
            offset += 64;
        }

        let (message, used) = Message::from_wire(bytes.get(offset..)?)?;
        if offset + used != bytes.len() {
            return None;
        }
        Some(Self {
            signatures,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountMeta;

    fn keypair(seed: u8) -> KeyPair {
        KeyPair::from_hex_private_key("test", hex::encode([seed; 32])).unwrap()
    }

    #[test]
    fn test_shortvec_encoding() {
        let cases: &[(usize, &[u8])] = &[
            (0, &[0x00]),
            (5, &[0x05]),
            (0x7f, &[0x7f]),
            (0x80, &[0x80, 0x01]),
            (0x3fff, &[0xff, 0x7f]),
            (0x4000, &[0x80, 0x80, 0x01]),
            (0xffff, &[0xff, 0xff, 0x03]),
        ];
        for (len, expected) in cases {
            let mut out = Vec::new();
            encode_shortvec_len(&mut out, *len).unwrap();
            assert_eq!(out.as_slice(), *expected, "len {}", len);
            assert_eq!(decode_shortvec_len(expected), Some((*len, expected.len())));
        }

        let mut out = Vec::new();
        assert!(encode_shortvec_len(&mut out, 0x10000).is_err());
        assert_eq!(decode_shortvec_len(&[0x80, 0x80]), None);
    }

    #[test]
    fn test_compile_orders_accounts_by_class() {
        let payer = Pubkey::from_bytes(&[1u8; 32]);
        let ro_signer = Pubkey::from_bytes(&[2u8; 32]);
        let writable = Pubkey::from_bytes(&[3u8; 32]);
        let readonly = Pubkey::from_bytes(&[4u8; 32]);
        let program = Pubkey::from_bytes(&[5u8; 32]);

        let ix = Instruction {
            program_id: program,
            accounts: vec![
                AccountMeta::new_readonly(readonly, false),
                AccountMeta::new_readonly(ro_signer, true),
                AccountMeta::new(writable, false),
                AccountMeta::new(payer, true),
            ],
            data: vec![9],
        };

        let message = Message::compile(&[ix], &payer, Hash::default()).unwrap();
        assert_eq!(
            message.account_keys,
            vec![payer, ro_signer, writable, readonly, program]
        );
        assert_eq!(
            message.header,
            MessageHeader {
                num_required_signatures: 2,
                num_readonly_signed_accounts: 1,
                num_readonly_unsigned_accounts: 2,
            }
        );
        assert_eq!(message.instructions[0].program_id_index, 4);
        assert_eq!(message.instructions[0].accounts, vec![3, 1, 2, 0]);

        assert!(message.is_writable(0));
        assert!(!message.is_writable(1));
        assert!(message.is_writable(2));
        assert!(!message.is_writable(3));
        assert!(!message.is_writable(4));
    }

    #[test]
    fn test_compile_merges_duplicate_flags() {
        let payer = Pubkey::from_bytes(&[1u8; 32]);
        let shared = Pubkey::from_bytes(&[6u8; 32]);
        let program = Pubkey::from_bytes(&[7u8; 32]);

        let ix = Instruction {
            program_id: program,
            accounts: vec![
                AccountMeta::new_readonly(shared, false),
                AccountMeta::new_readonly(shared, true),
                AccountMeta::new(shared, false),
            ],
            data: vec![],
        };

        let message = Message::compile(&[ix], &payer, Hash::default()).unwrap();
        assert_eq!(message.account_keys, vec![payer, shared, program]);
        assert_eq!(message.header.num_required_signatures, 2);
        assert_eq!(message.header.num_readonly_signed_accounts, 0);
        assert_eq!(message.instructions[0].accounts, vec![1, 1, 1]);
    }

    #[test]
    fn test_sign_and_wire_round_trip() {
        let payer = keypair(1);
        let other = keypair(2);
        let program = Pubkey::from_bytes(&[5u8; 32]);

        let ix = Instruction {
            program_id: program,
            accounts: vec![
                AccountMeta::new(payer.pubkey(), true),
                AccountMeta::new(other.pubkey(), true),
            ],
            data: vec![1, 2, 3],
        };
        let message =
            Message::compile(&[ix], &payer.pubkey(), Hash::from_bytes(&[8u8; 32])).unwrap();

        let mut tx = Transaction::new_unsigned(message);
        assert!(!tx.is_signed());

        tx.sign(&[&other, &payer]).unwrap();
        assert!(tx.is_signed());
        assert!(tx.verify());
        assert_eq!(tx.get_signature(), Some(tx.signatures[0]));

        let wire = tx.to_wire().unwrap();
        assert_eq!(wire[0], 2);
        let decoded = Transaction::from_wire(&wire).unwrap();
        assert_eq!(decoded, tx);

        let mut trailing = wire.clone();
        trailing.push(0);
        assert!(Transaction::from_wire(&trailing).is_none());
    }

    #[test]
    fn test_sign_missing_signer_leaves_transaction_unsigned() {
        let payer = keypair(1);
        let other = keypair(2);
        let program = Pubkey::from_bytes(&[5u8; 32]);

        let ix = Instruction {
            program_id: program,
            accounts: vec![AccountMeta::new(other.pubkey(), true)],
            data: vec![],
        };
        let message = Message::compile(&[ix], &payer.pubkey(), Hash::default()).unwrap();
        let mut tx = Transaction::new_unsigned(message);

        let err = tx.sign(&[&payer]).unwrap_err();
        assert!(matches!(err, VaultError::PreconditionNotMet(_)));
        assert!(!tx.is_signed());
    }

    #[test]
    fn test_oversized_transaction_rejected() {
        let payer = keypair(1);
        let ix = Instruction {
            program_id: Pubkey::from_bytes(&[5u8; 32]),
            accounts: vec![],
            data: vec![0u8; PACKET_DATA_SIZE],
        };
        let message = Message::compile(&[ix], &payer.pubkey(), Hash::default()).unwrap();
        let mut tx = Transaction::new_unsigned(message);
        tx.sign(&[&payer]).unwrap();

        assert!(matches!(tx.to_wire(), Err(VaultError::Transaction(_))));
    }

    fn raw_message(header: [u8; 3], keys: usize) -> Vec<u8> {
        let mut bytes = header.to_vec();
        bytes.push(keys as u8);
        for i in 0..keys {
            bytes.extend_from_slice(&[7u8 + i as u8; 32]);
        }
        bytes.extend_from_slice(&[0u8; 32]);
        bytes.push(0);
        bytes
    }

    #[test]
    fn test_message_from_wire_rejects_inconsistent_header() {
        // more readonly signers than signers
        assert!(Message::from_wire(&raw_message([1, 2, 0], 1)).is_none());
        // readonly unsigned accounts overlap the signers
        assert!(Message::from_wire(&raw_message([1, 0, 1], 1)).is_none());

        let (message, used) = Message::from_wire(&raw_message([1, 1, 1], 2)).unwrap();
        assert_eq!(used, 3 + 1 + 64 + 32 + 1);
        assert!(!message.is_writable(0));
        assert!(!message.is_writable(1));
    }
}
