//! # BTC Light Mirror
//!
//! Compact proofs that a coinbase transaction belongs to a Bitcoin block,
//! plus extraction of the cross-chain attestation embedded in its outputs.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Let a non-Bitcoin chain accept Bitcoin mining activity as proof-of-work
//! evidence without ingesting full blocks:
//! - Block header (80 bytes) + coinbase + authentication path (<= 20 hashes)
//! - Root recomputation against the header's claimed Merkle root
//! - Attestation payload (candidate / reward address, optional block hash)
//!
//! No proof-of-work, signature or chain-state validation happens here.
//!
//! ## Record Variants
//!
//! | Variant | Proof | Verification |
//! |---------|-------|--------------|
//! | Compact | Coinbase authentication path | Fold path onto coinbase hash |
//! | Legacy | Every other txid in block order | Rebuild the whole tree |
//!
//! ## Module Structure
//!
//! ```text
//! btc-light-mirror/
//! ├── domain/          # Records, payloads, errors, hard bounds
//! ├── algorithms/      # Hash tree, auth path, wire codec, script parsers
//! ├── ports/           # Codec traits (outbound) + record/service API (inbound)
//! ├── adapters/        # rust-bitcoin header / transaction codecs
//! ├── application/     # LightMirrorService
//! └── config.rs        # LightMirrorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::{
    derive_path, extract_attestation, extract_coinbase_address, hash_merkle_branches,
    recompute_root, HashTree, WireReader,
};
pub use application::LightMirrorService;
pub use config::LightMirrorConfig;
pub use domain::{
    Address, AttestationPayload, AuthenticationPath, CoinbaseAddress, CompactMirrorRecord,
    DecodeLimits, Hash, LegacyMirrorRecord, MirrorError, MirrorRecord, RecordKind, ScriptKind,
    TransactionId, VerifiedMirror, MAX_MERKLE_NODES, MAX_TX_PER_BLOCK,
};
pub use ports::{
    BlockHeaderCodec, CoinbaseCodec, LightMirrorApi, MirrorRecordApi, MockCoinbase, MockHeader,
    MockOutput,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
