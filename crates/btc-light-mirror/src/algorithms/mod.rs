//! # Algorithms Module
//!
//! Merkle tree construction, coinbase authentication paths, the wire codec
//! and the coinbase script parsers.

pub mod attestation;
pub mod auth_path;
pub mod coinbase_address;
pub mod hash_tree;
pub mod wire;

pub use attestation::{attestation_script, extract_attestation, parse_attestation_script};
pub use auth_path::{derive_path, recompute_root};
pub use coinbase_address::{extract_coinbase_address, parse_payout_script};
pub use hash_tree::{
    double_sha256, hash_merkle_branches, next_power_of_two, path_exponent, HashTree,
};
pub use wire::{varint_len, write_varint, WireReader};
