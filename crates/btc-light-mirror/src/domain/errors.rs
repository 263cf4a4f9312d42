//! # Domain Errors
//!
//! Error types for the Bitcoin light mirror.
//!
//! Every decode failure is terminal for that call: no partial record is
//! ever returned, and nothing is retried internally.

use thiserror::Error;

/// Hash type alias (32-byte double SHA-256, internal byte order).
pub type Hash = [u8; 32];

/// Light mirror error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    /// Not enough bytes left to decode a fixed or length-prefixed field.
    #[error("Truncated {field}: need {needed} bytes, {available} available")]
    Truncated {
        /// Field being decoded
        field: &'static str,
        /// Bytes required
        needed: usize,
        /// Bytes remaining in the input
        available: usize,
    },

    /// Declared authentication path is longer than the hard bound.
    #[error("Too many merkle path nodes: {count} > {max}")]
    TooManyPathNodes {
        /// Declared node count
        count: u64,
        /// Maximum accepted
        max: u64,
    },

    /// Declared transaction count exceeds what could fit in a block.
    #[error("Too many transactions to fit into a block: {count} > {max}")]
    TooManyTransactions {
        /// Declared transaction count
        count: u64,
        /// Maximum accepted
        max: u64,
    },

    /// Recomputed Merkle root disagrees with the header.
    #[error(
        "Merkle root mismatch: header indicates {}, calculated {}",
        hex::encode(.claimed),
        hex::encode(.computed)
    )]
    MerkleMismatch {
        /// Root claimed by the block header
        claimed: Hash,
        /// Root recomputed from the record
        computed: Hash,
    },

    /// CompactSize integer not encoded in its minimal form.
    #[error("Non-canonical varint {value} behind prefix {prefix:#04x}")]
    NonCanonicalVarInt {
        /// Decoded value
        value: u64,
        /// Discriminant byte that introduced it
        prefix: u8,
    },

    /// Input continues past the end of the record.
    #[error("Trailing bytes after record: {remaining}")]
    TrailingBytes {
        /// Unconsumed byte count
        remaining: usize,
    },

    /// Failure reported by an injected header or transaction codec.
    #[error("Codec error in {what}: {reason}")]
    Codec {
        /// What was being decoded
        what: &'static str,
        /// Codec-provided reason
        reason: String,
    },

    /// Hash tree slot expected on the coinbase path is empty.
    #[error("Hash tree slot {index} is empty")]
    MissingTreeNode {
        /// Flat array index of the slot
        index: usize,
    },

    /// Verified record carries no attestation payload.
    #[error("Coinbase carries no attestation payload")]
    MissingAttestation,

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MirrorError {
    /// Whether the error came from a hard decode bound.
    pub fn is_bound_violation(&self) -> bool {
        matches!(
            self,
            Self::TooManyPathNodes { .. } | Self::TooManyTransactions { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_error() {
        let err = MirrorError::Truncated {
            field: "merkle node",
            needed: 32,
            available: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("merkle node"));
        assert!(msg.contains("32"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_merkle_mismatch_shows_both_roots() {
        let err = MirrorError::MerkleMismatch {
            claimed: [0xaa; 32],
            computed: [0xbb; 32],
        };
        let msg = err.to_string();
        assert!(msg.contains(&"aa".repeat(32)));
        assert!(msg.contains(&"bb".repeat(32)));
    }

    #[test]
    fn test_bound_violation() {
        assert!(MirrorError::TooManyPathNodes { count: 21, max: 20 }.is_bound_violation());
        assert!(MirrorError::TooManyTransactions { count: 1, max: 0 }.is_bound_violation());
        assert!(!MirrorError::MissingAttestation.is_bound_violation());
    }
}
