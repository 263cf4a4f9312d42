//! # Outbound Ports
//!
//! Header and transaction codecs the records are generic over.
//!
//! The light mirror never interprets a header beyond its Merkle root, nor a
//! coinbase beyond its hash and output scripts. Bitcoin wire codecs live in
//! `adapters::bitcoin`; the mocks below are synthetic stand-ins for tests.

use std::fmt::Debug;

use crate::algorithms::hash_tree::double_sha256;
use crate::algorithms::wire::{write_varint, WireReader};
use crate::domain::{Hash, MirrorError};

/// Block header codec - outbound port.
pub trait BlockHeaderCodec: Clone + Debug + PartialEq + Sized {
    /// Append the wire encoding.
    fn encode_to(&self, out: &mut Vec<u8>);

    /// Decode from the reader, consuming exactly the header's bytes.
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, MirrorError>;

    /// Merkle root claimed by the header.
    fn merkle_root(&self) -> Hash;
}

/// Coinbase transaction codec - outbound port.
pub trait CoinbaseCodec: Clone + Debug + PartialEq + Sized {
    /// Append the wire encoding.
    fn encode_to(&self, out: &mut Vec<u8>);

    /// Decode from the reader, consuming exactly the transaction's bytes.
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, MirrorError>;

    /// Identifying hash (the Merkle leaf).
    fn tx_hash(&self) -> Hash;

    /// Raw output scripts in output order.
    fn output_scripts(&self) -> Vec<&[u8]>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock header: Bitcoin's 80-byte field layout, no proof-of-work semantics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockHeader {
    /// Block version.
    pub version: u32,
    /// Previous block hash.
    pub prev_block: Hash,
    /// Claimed Merkle root.
    pub merkle_root: Hash,
    /// Block timestamp.
    pub timestamp: u32,
    /// Difficulty bits.
    pub bits: u32,
    /// Nonce.
    pub nonce: u32,
}

impl MockHeader {
    /// Encoded size in bytes.
    pub const SIZE: usize = 80;

    /// Header claiming `merkle_root`, other fields fixed.
    pub fn with_root(merkle_root: Hash) -> Self {
        Self {
            version: 1,
            prev_block: [0x11; 32],
            merkle_root,
            timestamp: 1_231_006_505,
            bits: 0x1d00_ffff,
            nonce: 2_083_236_893,
        }
    }
}

impl BlockHeaderCodec for MockHeader {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.prev_block);
        out.extend_from_slice(&self.merkle_root);
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.bits.to_le_bytes());
        out.extend_from_slice(&self.nonce.to_le_bytes());
    }

    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, MirrorError> {
        if reader.remaining() < Self::SIZE {
            return Err(MirrorError::Truncated {
                field: "block header",
                needed: Self::SIZE,
                available: reader.remaining(),
            });
        }
        Ok(Self {
            version: reader.read_u32_le("block header")?,
            prev_block: reader.read_hash("block header")?,
            merkle_root: reader.read_hash("block header")?,
            timestamp: reader.read_u32_le("block header")?,
            bits: reader.read_u32_le("block header")?,
            nonce: reader.read_u32_le("block header")?,
        })
    }

    fn merkle_root(&self) -> Hash {
        self.merkle_root
    }
}

/// Mock transaction output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockOutput {
    /// Value in satoshis.
    pub value: u64,
    /// Output script.
    pub script: Vec<u8>,
}

/// Mock coinbase: version, outputs and lock time; hash is double SHA-256
/// of the encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockCoinbase {
    /// Transaction version.
    pub version: u32,
    /// Outputs, payout first.
    pub outputs: Vec<MockOutput>,
    /// Lock time.
    pub lock_time: u32,
}

impl MockCoinbase {
    /// Coinbase with the given output scripts.
    pub fn with_scripts(scripts: Vec<Vec<u8>>) -> Self {
        Self {
            version: 1,
            outputs: scripts
                .into_iter()
                .map(|script| MockOutput {
                    value: 5_000_000_000,
                    script,
                })
                .collect(),
            lock_time: 0,
        }
    }
}

impl CoinbaseCodec for MockCoinbase {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_le_bytes());
        write_varint(out, self.outputs.len() as u64);
        for output in &self.outputs {
            out.extend_from_slice(&output.value.to_le_bytes());
            write_varint(out, output.script.len() as u64);
            out.extend_from_slice(&output.script);
        }
        out.extend_from_slice(&self.lock_time.to_le_bytes());
    }

    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, MirrorError> {
        let version = reader.read_u32_le("coinbase version")?;
        let count = reader.read_varint("coinbase output count")?;
        // Each output needs at least 9 bytes; bound the allocation by what is left.
        let mut outputs = Vec::with_capacity((count as usize).min(reader.remaining() / 9));
        for _ in 0..count {
            let value = reader.read_u64_le("coinbase output value")?;
            let len = reader.read_varint("coinbase script length")?;
            let len = usize::try_from(len).map_err(|_| MirrorError::Truncated {
                field: "coinbase script",
                needed: usize::MAX,
                available: reader.remaining(),
            })?;
            let script = reader.read_bytes(len, "coinbase script")?.to_vec();
            outputs.push(MockOutput { value, script });
        }
        let lock_time = reader.read_u32_le("coinbase lock time")?;
        Ok(Self {
            version,
            outputs,
            lock_time,
        })
    }

    fn tx_hash(&self) -> Hash {
        let mut buf = Vec::new();
        self.encode_to(&mut buf);
        double_sha256(&buf)
    }

    fn output_scripts(&self) -> Vec<&[u8]> {
        self.outputs.iter().map(|o| o.script.as_slice()).collect()
    }
}
