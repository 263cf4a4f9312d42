//! # Domain Invariants
//!
//! Hard bounds that every decoded record must respect.

use super::errors::{Hash, MirrorError};

/// Maximum authentication-path length accepted from the wire.
///
/// 2^20 leaves is far above any block that fits the payload limit.
pub const MAX_MERKLE_NODES: u64 = 20;

/// Maximum serialized block payload in bytes.
pub const MAX_BLOCK_PAYLOAD: u64 = 4_000_000;

/// Minimum payload of a transaction: version (4), input count (1),
/// output count (1), lock time (4).
pub const MIN_TX_PAYLOAD: u64 = 10;

/// Maximum number of transactions that could fit into one block.
pub const MAX_TX_PER_BLOCK: u64 = MAX_BLOCK_PAYLOAD / MIN_TX_PAYLOAD + 1;

/// Count bounds applied while decoding untrusted bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum authentication-path length (compact records).
    pub max_path_nodes: u64,
    /// Maximum transaction-id count (legacy records).
    pub max_transactions: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_path_nodes: MAX_MERKLE_NODES,
            max_transactions: MAX_TX_PER_BLOCK,
        }
    }
}

/// Invariant: declared path length stays within the bound.
pub fn invariant_path_len(count: u64, max: u64) -> Result<(), MirrorError> {
    if count > max {
        return Err(MirrorError::TooManyPathNodes { count, max });
    }
    Ok(())
}

/// Invariant: declared transaction count stays within the bound.
pub fn invariant_tx_count(count: u64, max: u64) -> Result<(), MirrorError> {
    if count > max {
        return Err(MirrorError::TooManyTransactions { count, max });
    }
    Ok(())
}

/// Invariant: recomputed root equals the header's claimed root.
pub fn invariant_root_matches(claimed: &Hash, computed: &Hash) -> Result<(), MirrorError> {
    if claimed != computed {
        return Err(MirrorError::MerkleMismatch {
            claimed: *claimed,
            computed: *computed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_tx_per_block() {
        assert_eq!(MAX_TX_PER_BLOCK, 400_001);
    }

    #[test]
    fn test_invariant_path_len() {
        assert!(invariant_path_len(20, MAX_MERKLE_NODES).is_ok());
        assert!(matches!(
            invariant_path_len(21, MAX_MERKLE_NODES),
            Err(MirrorError::TooManyPathNodes { count: 21, max: 20 })
        ));
    }

    #[test]
    fn test_invariant_tx_count() {
        assert!(invariant_tx_count(MAX_TX_PER_BLOCK, MAX_TX_PER_BLOCK).is_ok());
        assert!(invariant_tx_count(MAX_TX_PER_BLOCK + 1, MAX_TX_PER_BLOCK).is_err());
    }

    #[test]
    fn test_invariant_root_matches() {
        assert!(invariant_root_matches(&[1u8; 32], &[1u8; 32]).is_ok());
        let err = invariant_root_matches(&[1u8; 32], &[2u8; 32]).unwrap_err();
        assert_eq!(
            err,
            MirrorError::MerkleMismatch {
                claimed: [1u8; 32],
                computed: [2u8; 32],
            }
        );
    }
}
