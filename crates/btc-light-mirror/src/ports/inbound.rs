//! # Inbound Ports
//!
//! API traits exposed by the light mirror.

use crate::domain::{Hash, MirrorError, RecordKind, TransactionId, VerifiedMirror};

/// Capability shared by every mirror record variant.
///
/// Callers that only verify do not need to know which variant they hold.
///
/// Decoding is not part of this trait: the wire bytes carry no variant tag,
/// so the caller picks the variant through
/// [`MirrorRecord::decode`](crate::domain::MirrorRecord::decode) with a
/// [`RecordKind`], or calls `decode` on a concrete record type.
pub trait MirrorRecordApi {
    /// Header codec type.
    type Header;
    /// Coinbase codec type.
    type Coinbase;

    /// Wire variant of this record.
    fn kind(&self) -> RecordKind;

    /// Block header.
    fn header(&self) -> &Self::Header;

    /// Coinbase transaction.
    fn coinbase(&self) -> &Self::Coinbase;

    /// Hash of the coinbase (Merkle leaf 0).
    fn coinbase_hash(&self) -> Hash;

    /// Wire encoding.
    fn encode(&self) -> Vec<u8>;

    /// Check the coinbase is included under the header's Merkle root.
    fn verify(&self) -> Result<(), MirrorError>;
}

/// Light mirror service API - inbound port.
pub trait LightMirrorApi {
    /// Header codec type.
    type Header;
    /// Coinbase codec type.
    type Coinbase;

    /// Build and encode a compact record from raw block data.
    fn build_compact(
        &self,
        header: Self::Header,
        coinbase: Self::Coinbase,
        tx_ids: &[TransactionId],
    ) -> Result<Vec<u8>, MirrorError>;

    /// Build and encode a legacy record from raw block data.
    fn build_legacy(
        &self,
        header: Self::Header,
        coinbase: Self::Coinbase,
        tx_ids: &[TransactionId],
    ) -> Result<Vec<u8>, MirrorError>;

    /// Decode, verify and extract the attestation from received bytes.
    fn ingest(
        &self,
        bytes: &[u8],
    ) -> Result<VerifiedMirror<Self::Header, Self::Coinbase>, MirrorError>;
}
