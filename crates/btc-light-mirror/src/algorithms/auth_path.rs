//! # Coinbase Authentication Path
//!
//! The coinbase is leaf 0, so its ancestor is slot 0 of every level and
//! its sibling is slot 1 of that level. Walking `1, 1 + P, 1 + P + P/2, ...`
//! collects exactly those siblings.
//!
//! Recomputation always treats the running hash as the left operand,
//! which only holds for leaf 0. Never use it for any other leaf.

use crate::domain::{AuthenticationPath, Hash, MirrorError};

use super::hash_tree::{hash_merkle_branches, path_exponent, HashTree};

/// Collect the coinbase's sibling at every level of `tree`.
///
/// Fails with [`MirrorError::TooManyPathNodes`] for trees taller than
/// the wire bound, and with [`MirrorError::MissingTreeNode`] if a sibling
/// slot is empty.
pub fn derive_path(tree: &HashTree) -> Result<AuthenticationPath, MirrorError> {
    let exponent = path_exponent(tree.leaf_count());
    let mut nodes = Vec::with_capacity(exponent);
    let mut index = 1;
    let mut cursor = 1usize << exponent;

    for _ in 0..exponent {
        // Below the root 2^level < leaf_count, so slot 1 of the level is occupied.
        let sibling = tree
            .node(index)
            .ok_or(MirrorError::MissingTreeNode { index })?;
        nodes.push(sibling);
        index += cursor;
        cursor >>= 1;
    }

    AuthenticationPath::new(nodes)
}

/// Fold the path onto the coinbase hash: `running = h(running || sibling)`.
pub fn recompute_root(leaf_hash: &Hash, path: &AuthenticationPath) -> Hash {
    path.iter()
        .fold(*leaf_hash, |running, sibling| hash_merkle_branches(&running, sibling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_hash(n: u32) -> Hash {
        let mut h = [0u8; 32];
        h[..4].copy_from_slice(&n.to_le_bytes());
        h
    }

    fn tree_of(leaf_count: u32) -> HashTree {
        let leaves: Vec<Hash> = (0..leaf_count).map(make_hash).collect();
        HashTree::build(&leaves[0], &leaves[1..])
    }

    #[test]
    fn test_single_leaf_empty_path() {
        let tree = tree_of(1);
        let path = derive_path(&tree).unwrap();
        assert!(path.is_empty());
        assert_eq!(recompute_root(&make_hash(0), &path), tree.root());
    }

    #[test]
    fn test_two_leaves() {
        let tree = tree_of(2);
        let path = derive_path(&tree).unwrap();
        assert_eq!(path.as_slice(), &[make_hash(1)]);
        assert_eq!(recompute_root(&make_hash(0), &path), tree.root());
    }

    #[test]
    fn test_three_leaves_uses_duplicated_parent() {
        let tree = tree_of(3);
        let path = derive_path(&tree).unwrap();
        let cc = hash_merkle_branches(&make_hash(2), &make_hash(2));
        assert_eq!(path.as_slice(), &[make_hash(1), cc]);
        assert_eq!(recompute_root(&make_hash(0), &path), tree.root());
    }

    #[test]
    fn test_127_leaves_path_len_7() {
        let tree = tree_of(127);
        assert_eq!(tree.width(), 128);
        let path = derive_path(&tree).unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(recompute_root(&make_hash(0), &path), tree.root());
    }

    #[test]
    fn test_altered_sibling_changes_root() {
        let tree = tree_of(9);
        let path = derive_path(&tree).unwrap();
        for i in 0..path.len() {
            let mut nodes = path.clone().into_inner();
            nodes[i][31] ^= 0x01;
            let tampered = AuthenticationPath::new(nodes).unwrap();
            assert_ne!(recompute_root(&make_hash(0), &tampered), tree.root());
        }
    }

    #[test]
    fn test_empty_sibling_slot_is_error() {
        // 5 leaves, P = 8: siblings sit at 1, 9, 13.
        let tree = tree_of(5).with_empty_slot(13);
        assert_eq!(
            derive_path(&tree),
            Err(MirrorError::MissingTreeNode { index: 13 })
        );
    }

    #[test]
    fn test_wrong_leaf_changes_root() {
        let tree = tree_of(6);
        let path = derive_path(&tree).unwrap();
        assert_ne!(recompute_root(&make_hash(99), &path), tree.root());
    }

    proptest! {
        #[test]
        fn prop_derived_path_recomputes_root(leaf_count in 1u32..600) {
            let tree = tree_of(leaf_count);
            let path = derive_path(&tree).unwrap();
            prop_assert_eq!(path.len(), path_exponent(leaf_count as usize));
            prop_assert_eq!(recompute_root(&make_hash(0), &path), tree.root());
        }
    }
}
