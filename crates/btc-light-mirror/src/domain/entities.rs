//! # Domain Entities
//!
//! The two mirror records and the sum type that hides which one is held.
//!
//! ```text
//! Compact: [header][coinbase][varint n][n x 32-byte path node]
//! Legacy:  [header][coinbase][varint n][n x 32-byte txid]
//! ```
//!
//! Records are immutable once built or decoded.

use tracing::{debug, warn};

use crate::algorithms::attestation::extract_attestation;
use crate::algorithms::auth_path::{derive_path, recompute_root};
use crate::algorithms::coinbase_address::extract_coinbase_address;
use crate::algorithms::hash_tree::HashTree;
use crate::algorithms::wire::{write_varint, WireReader};
use crate::ports::{BlockHeaderCodec, CoinbaseCodec, MirrorRecordApi};

use super::errors::{Hash, MirrorError};
use super::invariants::{
    invariant_path_len, invariant_root_matches, invariant_tx_count, DecodeLimits,
    MAX_TX_PER_BLOCK,
};
use super::value_objects::{
    AttestationPayload, AuthenticationPath, CoinbaseAddress, RecordKind, TransactionId,
};

/// Fail with `Truncated` unless `count` hashes fit in what is left.
fn ensure_hashes_available(
    reader: &WireReader<'_>,
    count: u64,
    field: &'static str,
) -> Result<usize, MirrorError> {
    let needed = usize::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(32))
        .unwrap_or(usize::MAX);
    if needed > reader.remaining() {
        return Err(MirrorError::Truncated {
            field,
            needed,
            available: reader.remaining(),
        });
    }
    Ok(count as usize)
}

fn log_bound_rejection(err: MirrorError) -> MirrorError {
    warn!(error = %err, "Rejected mirror record at decode bound");
    err
}

/// Compact mirror record: header, coinbase and the coinbase's
/// authentication path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactMirrorRecord<H, T> {
    header: H,
    coinbase: T,
    path: AuthenticationPath,
}

impl<H: BlockHeaderCodec, T: CoinbaseCodec> CompactMirrorRecord<H, T> {
    /// Build from raw block data. `tx_ids` excludes the coinbase.
    ///
    /// The root is not checked here; call [`Self::verify`].
    pub fn from_block(
        header: H,
        coinbase: T,
        tx_ids: &[TransactionId],
    ) -> Result<Self, MirrorError> {
        let tree = HashTree::build(&coinbase.tx_hash(), tx_ids);
        let path = derive_path(&tree)?;
        debug!(
            leaf_count = tree.leaf_count(),
            path_len = path.len(),
            "Built compact mirror record"
        );
        Ok(Self {
            header,
            coinbase,
            path,
        })
    }

    /// Assemble from already-known parts.
    pub fn from_parts(header: H, coinbase: T, path: AuthenticationPath) -> Self {
        Self {
            header,
            coinbase,
            path,
        }
    }

    /// Block header.
    pub fn header(&self) -> &H {
        &self.header
    }

    /// Coinbase transaction.
    pub fn coinbase(&self) -> &T {
        &self.coinbase
    }

    /// Authentication path, leaf level first.
    pub fn path(&self) -> &AuthenticationPath {
        &self.path
    }

    /// Hash of the coinbase.
    pub fn coinbase_hash(&self) -> Hash {
        self.coinbase.tx_hash()
    }

    /// Root recomputed from the coinbase hash and the path.
    pub fn computed_root(&self) -> Hash {
        recompute_root(&self.coinbase_hash(), &self.path)
    }

    /// Check the recomputed root against the header.
    pub fn verify(&self) -> Result<(), MirrorError> {
        let claimed = self.header.merkle_root();
        let computed = self.computed_root();
        invariant_root_matches(&claimed, &computed).inspect_err(|_| {
            warn!(
                claimed = %hex::encode(claimed),
                computed = %hex::encode(computed),
                "Compact mirror record failed merkle check"
            );
        })?;
        debug!(path_len = self.path.len(), "Compact mirror record verified");
        Ok(())
    }

    /// Attestation embedded in the coinbase, if any.
    pub fn attestation(&self) -> Option<AttestationPayload> {
        extract_attestation(self.coinbase.output_scripts())
    }

    /// Append the wire encoding.
    pub fn encode_to(&self, out: &mut Vec<u8>) {
        self.header.encode_to(out);
        self.coinbase.encode_to(out);
        write_varint(out, self.path.len() as u64);
        for node in &self.path {
            out.extend_from_slice(node);
        }
    }

    /// Wire encoding.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_to(&mut out);
        out
    }

    /// Decode a whole buffer with the default bounds.
    pub fn decode(bytes: &[u8]) -> Result<Self, MirrorError> {
        Self::decode_with_limits(bytes, &DecodeLimits::default())
    }

    /// Decode a whole buffer; trailing bytes are an error.
    pub fn decode_with_limits(bytes: &[u8], limits: &DecodeLimits) -> Result<Self, MirrorError> {
        let mut reader = WireReader::new(bytes);
        let record = Self::decode_from(&mut reader, limits)?;
        reader.finish()?;
        Ok(record)
    }

    /// Decode one record from the reader, leaving any following bytes.
    pub fn decode_from(
        reader: &mut WireReader<'_>,
        limits: &DecodeLimits,
    ) -> Result<Self, MirrorError> {
        let header = H::decode_from(reader)?;
        let coinbase = T::decode_from(reader)?;

        let count = reader.read_varint("merkle node count")?;
        invariant_path_len(count, limits.max_path_nodes).map_err(log_bound_rejection)?;
        let count = ensure_hashes_available(reader, count, "merkle node")?;

        let mut nodes = Vec::with_capacity(count);
        for _ in 0..count {
            nodes.push(reader.read_hash("merkle node")?);
        }

        Ok(Self {
            header,
            coinbase,
            path: AuthenticationPath::new(nodes)?,
        })
    }
}

/// Legacy mirror record: header, coinbase and every other txid in block order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyMirrorRecord<H, T> {
    header: H,
    coinbase: T,
    tx_ids: Vec<TransactionId>,
}

impl<H: BlockHeaderCodec, T: CoinbaseCodec> LegacyMirrorRecord<H, T> {
    /// Build from raw block data. `tx_ids` excludes the coinbase.
    ///
    /// Fails with [`MirrorError::TooManyTransactions`] when the record could
    /// not be decoded again under the default bounds.
    pub fn new(
        header: H,
        coinbase: T,
        tx_ids: Vec<TransactionId>,
    ) -> Result<Self, MirrorError> {
        invariant_tx_count(tx_ids.len() as u64, MAX_TX_PER_BLOCK)?;
        debug!(tx_count = tx_ids.len(), "Built legacy mirror record");
        Ok(Self {
            header,
            coinbase,
            tx_ids,
        })
    }

    /// Block header.
    pub fn header(&self) -> &H {
        &self.header
    }

    /// Coinbase transaction.
    pub fn coinbase(&self) -> &T {
        &self.coinbase
    }

    /// Non-coinbase txids in block order.
    pub fn tx_ids(&self) -> &[TransactionId] {
        &self.tx_ids
    }

    /// Hash of the coinbase.
    pub fn coinbase_hash(&self) -> Hash {
        self.coinbase.tx_hash()
    }

    /// Full tree over the coinbase and the stored txids.
    pub fn tree(&self) -> HashTree {
        HashTree::build(&self.coinbase_hash(), &self.tx_ids)
    }

    /// Rebuild the whole tree and check its root against the header.
    pub fn verify(&self) -> Result<(), MirrorError> {
        let claimed = self.header.merkle_root();
        let computed = self.tree().root();
        invariant_root_matches(&claimed, &computed).inspect_err(|_| {
            warn!(
                claimed = %hex::encode(claimed),
                computed = %hex::encode(computed),
                "Legacy mirror record failed merkle check"
            );
        })?;
        debug!(tx_count = self.tx_ids.len(), "Legacy mirror record verified");
        Ok(())
    }

    /// Payout address from coinbase output 0.
    pub fn coinbase_address(&self) -> CoinbaseAddress {
        extract_coinbase_address(self.coinbase.output_scripts())
    }

    /// Attestation embedded in the coinbase, if any.
    pub fn attestation(&self) -> Option<AttestationPayload> {
        extract_attestation(self.coinbase.output_scripts())
    }

    /// Derive the equivalent compact record.
    pub fn to_compact(&self) -> Result<CompactMirrorRecord<H, T>, MirrorError> {
        CompactMirrorRecord::from_block(self.header.clone(), self.coinbase.clone(), &self.tx_ids)
    }

    /// Append the wire encoding.
    pub fn encode_to(&self, out: &mut Vec<u8>) {
        self.header.encode_to(out);
        self.coinbase.encode_to(out);
        write_varint(out, self.tx_ids.len() as u64);
        for tx_id in &self.tx_ids {
            out.extend_from_slice(tx_id);
        }
    }

    /// Wire encoding.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_to(&mut out);
        out
    }

    /// Decode a whole buffer with the default bounds.
    pub fn decode(bytes: &[u8]) -> Result<Self, MirrorError> {
        Self::decode_with_limits(bytes, &DecodeLimits::default())
    }

    /// Decode a whole buffer; trailing bytes are an error.
    pub fn decode_with_limits(bytes: &[u8], limits: &DecodeLimits) -> Result<Self, MirrorError> {
        let mut reader = WireReader::new(bytes);
        let record = Self::decode_from(&mut reader, limits)?;
        reader.finish()?;
        Ok(record)
    }

    /// Decode one record from the reader, leaving any following bytes.
    pub fn decode_from(
        reader: &mut WireReader<'_>,
        limits: &DecodeLimits,
    ) -> Result<Self, MirrorError> {
        let header = H::decode_from(reader)?;
        let coinbase = T::decode_from(reader)?;

        let count = reader.read_varint("transaction count")?;
        invariant_tx_count(count, limits.max_transactions).map_err(log_bound_rejection)?;
        let count = ensure_hashes_available(reader, count, "transaction id")?;

        let mut tx_ids = Vec::with_capacity(count);
        for _ in 0..count {
            tx_ids.push(reader.read_hash("transaction id")?);
        }

        Ok(Self {
            header,
            coinbase,
            tx_ids,
        })
    }
}

impl<H: BlockHeaderCodec, T: CoinbaseCodec> MirrorRecordApi for CompactMirrorRecord<H, T> {
    type Header = H;
    type Coinbase = T;

    fn kind(&self) -> RecordKind {
        RecordKind::Compact
    }

    fn header(&self) -> &H {
        &self.header
    }

    fn coinbase(&self) -> &T {
        &self.coinbase
    }

    fn coinbase_hash(&self) -> Hash {
        CompactMirrorRecord::coinbase_hash(self)
    }

    fn encode(&self) -> Vec<u8> {
        CompactMirrorRecord::encode(self)
    }

    fn verify(&self) -> Result<(), MirrorError> {
        CompactMirrorRecord::verify(self)
    }
}

impl<H: BlockHeaderCodec, T: CoinbaseCodec> MirrorRecordApi for LegacyMirrorRecord<H, T> {
    type Header = H;
    type Coinbase = T;

    fn kind(&self) -> RecordKind {
        RecordKind::Legacy
    }

    fn header(&self) -> &H {
        &self.header
    }

    fn coinbase(&self) -> &T {
        &self.coinbase
    }

    fn coinbase_hash(&self) -> Hash {
        LegacyMirrorRecord::coinbase_hash(self)
    }

    fn encode(&self) -> Vec<u8> {
        LegacyMirrorRecord::encode(self)
    }

    fn verify(&self) -> Result<(), MirrorError> {
        LegacyMirrorRecord::verify(self)
    }
}

/// Either mirror record variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MirrorRecord<H, T> {
    /// Authentication-path record.
    Compact(CompactMirrorRecord<H, T>),
    /// Full txid-list record.
    Legacy(LegacyMirrorRecord<H, T>),
}

impl<H: BlockHeaderCodec, T: CoinbaseCodec> MirrorRecord<H, T> {
    /// Decode a whole buffer as the given variant.
    pub fn decode(
        kind: RecordKind,
        bytes: &[u8],
        limits: &DecodeLimits,
    ) -> Result<Self, MirrorError> {
        match kind {
            RecordKind::Compact => {
                CompactMirrorRecord::decode_with_limits(bytes, limits).map(Self::Compact)
            }
            RecordKind::Legacy => {
                LegacyMirrorRecord::decode_with_limits(bytes, limits).map(Self::Legacy)
            }
        }
    }

    /// Attestation embedded in the coinbase, if any.
    pub fn attestation(&self) -> Option<AttestationPayload> {
        match self {
            Self::Compact(record) => record.attestation(),
            Self::Legacy(record) => record.attestation(),
        }
    }

    /// Payout address; only legacy records carry one.
    pub fn coinbase_address(&self) -> Option<CoinbaseAddress> {
        match self {
            Self::Compact(_) => None,
            Self::Legacy(record) => Some(record.coinbase_address()),
        }
    }
}

impl<H: BlockHeaderCodec, T: CoinbaseCodec> MirrorRecordApi for MirrorRecord<H, T> {
    type Header = H;
    type Coinbase = T;

    fn kind(&self) -> RecordKind {
        match self {
            Self::Compact(_) => RecordKind::Compact,
            Self::Legacy(_) => RecordKind::Legacy,
        }
    }

    fn header(&self) -> &H {
        match self {
            Self::Compact(record) => record.header(),
            Self::Legacy(record) => record.header(),
        }
    }

    fn coinbase(&self) -> &T {
        match self {
            Self::Compact(record) => record.coinbase(),
            Self::Legacy(record) => record.coinbase(),
        }
    }

    fn coinbase_hash(&self) -> Hash {
        match self {
            Self::Compact(record) => record.coinbase_hash(),
            Self::Legacy(record) => record.coinbase_hash(),
        }
    }

    fn encode(&self) -> Vec<u8> {
        match self {
            Self::Compact(record) => record.encode(),
            Self::Legacy(record) => record.encode(),
        }
    }

    fn verify(&self) -> Result<(), MirrorError> {
        match self {
            Self::Compact(record) => record.verify(),
            Self::Legacy(record) => record.verify(),
        }
    }
}

impl<H, T> From<CompactMirrorRecord<H, T>> for MirrorRecord<H, T> {
    fn from(record: CompactMirrorRecord<H, T>) -> Self {
        Self::Compact(record)
    }
}

impl<H, T> From<LegacyMirrorRecord<H, T>> for MirrorRecord<H, T> {
    fn from(record: LegacyMirrorRecord<H, T>) -> Self {
        Self::Legacy(record)
    }
}

/// A record that decoded and verified, with what was extracted from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedMirror<H, T> {
    /// The verified record.
    pub record: MirrorRecord<H, T>,
    /// Coinbase hash (Merkle leaf 0).
    pub coinbase_hash: Hash,
    /// Merkle root the coinbase was proven under.
    pub merkle_root: Hash,
    /// Attestation payload, if the coinbase carries one.
    pub attestation: Option<AttestationPayload>,
    /// Payout address (legacy records only).
    pub coinbase_address: Option<CoinbaseAddress>,
}
