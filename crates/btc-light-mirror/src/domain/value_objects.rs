//! # Domain Value Objects
//!
//! Immutable value types for the Bitcoin light mirror.

use serde::{Deserialize, Serialize};

use super::errors::{Hash, MirrorError};
use super::invariants::{invariant_path_len, MAX_MERKLE_NODES};

/// 20-byte destination-chain address (candidate, reward or payout).
pub type Address = [u8; 20];

/// Transaction identifier within a block (order-sensitive).
pub type TransactionId = Hash;

/// Which wire record a byte stream carries.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Header + coinbase + authentication path.
    #[default]
    Compact,
    /// Header + coinbase + full transaction-id list.
    Legacy,
}

/// Standard payout script shapes recognised on coinbase output 0.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// Any other script shape.
    #[default]
    Unsupported,
    /// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`
    PubKeyHash,
    /// `OP_0 <20>`
    WitnessV0KeyHash,
}

impl ScriptKind {
    /// Numeric tag used by the destination chain.
    pub fn tag(self) -> u8 {
        match self {
            Self::Unsupported => 0,
            Self::PubKeyHash => 2,
            Self::WitnessV0KeyHash => 7,
        }
    }

    /// Whether a payout address was recognised.
    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

/// Payout address decoded from the coinbase's primary output.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoinbaseAddress {
    /// 20-byte key hash, all zeros when unsupported.
    pub address: Address,
    /// Script shape the address was taken from.
    pub kind: ScriptKind,
}

impl CoinbaseAddress {
    /// The "no recognised payout address" sentinel.
    pub fn unsupported() -> Self {
        Self::default()
    }
}

/// Cross-chain attestation embedded in a coinbase output.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttestationPayload {
    /// Candidate (validator) address on the destination chain.
    pub candidate_address: Address,
    /// Address receiving rewards on the destination chain.
    pub reward_address: Address,
    /// Destination-chain block hash, when the script carries one.
    pub attested_block_hash: Option<Hash>,
}

/// Sibling hashes from the coinbase leaf up to the root.
///
/// Bounded to [`MAX_MERKLE_NODES`] entries; the coinbase is the left
/// operand at every level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationPath(Vec<Hash>);

impl AuthenticationPath {
    /// Wrap sibling hashes, enforcing the path bound.
    pub fn new(nodes: Vec<Hash>) -> Result<Self, MirrorError> {
        invariant_path_len(nodes.len() as u64, MAX_MERKLE_NODES)?;
        Ok(Self(nodes))
    }

    /// Empty path (coinbase-only block).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of sibling hashes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a coinbase-only block.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate siblings, leaf level first.
    pub fn iter(&self) -> std::slice::Iter<'_, Hash> {
        self.0.iter()
    }

    /// Borrow the sibling hashes.
    pub fn as_slice(&self) -> &[Hash] {
        &self.0
    }

    /// Take the sibling hashes.
    pub fn into_inner(self) -> Vec<Hash> {
        self.0
    }
}

impl<'a> IntoIterator for &'a AuthenticationPath {
    type Item = &'a Hash;
    type IntoIter = std::slice::Iter<'a, Hash>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
