//! # Hash Tree
//!
//! Bitcoin Merkle tree stored as a flat array.
//!
//! ```text
//!          root = h1234 = h(h12 + h34)
//!         /                           \
//!   h12 = h(h1 + h2)            h34 = h(h3 + h4)
//!    /            \              /            \
//!   h1            h2            h3            h4
//!
//!   [h1 h2 h3 h4 h12 h34 root]
//! ```
//!
//! The leaf level is padded to the next power of two with absent slots.
//! A parent with no left child is absent; a parent with only a left child
//! is `h(left + left)`. The root is always the last slot.

use sha2::{Digest, Sha256};

use crate::domain::{Hash, TransactionId};

/// Double SHA-256.
pub fn double_sha256(data: &[u8]) -> Hash {
    Sha256::digest(Sha256::digest(data)).into()
}

/// Parent of two Merkle nodes: `double_sha256(left || right)`.
pub fn hash_merkle_branches(left: &Hash, right: &Hash) -> Hash {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left);
    buf[32..].copy_from_slice(right);
    double_sha256(&buf)
}

/// Smallest power of two `>= n` (1 for `n == 0`).
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// `ceil(log2(leaf_count))`, i.e. the tree height above the leaves.
pub fn path_exponent(leaf_count: usize) -> usize {
    next_power_of_two(leaf_count).trailing_zeros() as usize
}

/// Full Merkle tree over a coinbase hash and the block's other txids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashTree {
    /// `2P - 1` slots, leaves first, root last.
    nodes: Vec<Option<Hash>>,
    /// Coinbase plus the other transactions.
    leaf_count: usize,
    /// Leaf-level width `P`.
    width: usize,
    root: Hash,
}

impl HashTree {
    /// Build the tree. Leaf 0 is always the coinbase; leaf order is block order.
    pub fn build(coinbase_hash: &Hash, tx_ids: &[TransactionId]) -> Self {
        let leaf_count = tx_ids.len() + 1;
        let width = next_power_of_two(leaf_count);
        let array_size = width * 2 - 1;

        let mut nodes: Vec<Option<Hash>> = vec![None; array_size];
        nodes[0] = Some(*coinbase_hash);
        for (slot, tx_id) in nodes[1..leaf_count].iter_mut().zip(tx_ids) {
            *slot = Some(*tx_id);
        }

        // Levels are contiguous, so one pass over child pairs fills every
        // parent slot in order. The first pair of each level holds the
        // coinbase's ancestor, carried as `leftmost`; the last one is the root.
        let mut leftmost = *coinbase_hash;
        let mut level_start = 0;
        let mut level_width = width;
        let mut offset = width;
        for i in (0..array_size - 1).step_by(2) {
            if i == level_start + level_width {
                level_start = i;
                level_width /= 2;
            }
            nodes[offset] = if i == level_start {
                let right = nodes[i + 1].unwrap_or(leftmost);
                leftmost = hash_merkle_branches(&leftmost, &right);
                Some(leftmost)
            } else {
                match (nodes[i], nodes[i + 1]) {
                    (None, _) => None,
                    (Some(left), None) => Some(hash_merkle_branches(&left, &left)),
                    (Some(left), Some(right)) => Some(hash_merkle_branches(&left, &right)),
                }
            };
            offset += 1;
        }
        let root = leftmost;

        Self {
            nodes,
            leaf_count,
            width,
            root,
        }
    }

    /// Merkle root (last slot).
    pub fn root(&self) -> Hash {
        self.root
    }

    /// Number of real leaves (coinbase included).
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Padded leaf-level width `P`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Slot at `index`, `None` for padding or out of range.
    pub fn node(&self, index: usize) -> Option<Hash> {
        self.nodes.get(index).copied().flatten()
    }

    /// All slots.
    pub fn nodes(&self) -> &[Option<Hash>] {
        &self.nodes
    }

    #[cfg(test)]
    pub(crate) fn with_empty_slot(mut self, index: usize) -> Self {
        self.nodes[index] = None;
        self
    }
}
