//! # Light Mirror Service
//!
//! Application service: builds records on the producing side, and on the
//! receiving side decodes, verifies and extracts before anything is handed
//! to the destination chain.

use std::marker::PhantomData;

use tracing::{debug, info, warn};

use crate::config::LightMirrorConfig;
use crate::domain::{
    CompactMirrorRecord, LegacyMirrorRecord, MirrorError, MirrorRecord, TransactionId,
    VerifiedMirror,
};
use crate::ports::{BlockHeaderCodec, CoinbaseCodec, LightMirrorApi, MirrorRecordApi};

/// Light Mirror Service - builds and checks mirror records.
#[derive(Debug, Clone)]
pub struct LightMirrorService<H, T> {
    /// Configuration.
    config: LightMirrorConfig,
    _codecs: PhantomData<fn() -> (H, T)>,
}

impl<H: BlockHeaderCodec, T: CoinbaseCodec> LightMirrorService<H, T> {
    /// Create a service; the config is validated first.
    pub fn new(config: LightMirrorConfig) -> Result<Self, MirrorError> {
        config.validate()?;
        Ok(Self {
            config,
            _codecs: PhantomData,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &LightMirrorConfig {
        &self.config
    }

    /// Decode and verify without extracting anything.
    pub fn decode_verified(&self, bytes: &[u8]) -> Result<MirrorRecord<H, T>, MirrorError> {
        let record = MirrorRecord::decode(self.config.record_kind, bytes, &self.config.limits())?;
        record.verify()?;
        Ok(record)
    }
}

impl<H: BlockHeaderCodec, T: CoinbaseCodec> LightMirrorApi for LightMirrorService<H, T> {
    type Header = H;
    type Coinbase = T;

    fn build_compact(
        &self,
        header: H,
        coinbase: T,
        tx_ids: &[TransactionId],
    ) -> Result<Vec<u8>, MirrorError> {
        let record = CompactMirrorRecord::from_block(header, coinbase, tx_ids)?;
        Ok(record.encode())
    }

    fn build_legacy(
        &self,
        header: H,
        coinbase: T,
        tx_ids: &[TransactionId],
    ) -> Result<Vec<u8>, MirrorError> {
        let record = LegacyMirrorRecord::new(header, coinbase, tx_ids.to_vec())?;
        Ok(record.encode())
    }

    fn ingest(&self, bytes: &[u8]) -> Result<VerifiedMirror<H, T>, MirrorError> {
        debug!(
            len = bytes.len(),
            kind = ?self.config.record_kind,
            "Ingesting mirror record"
        );
        let record = self.decode_verified(bytes)?;

        let attestation = record.attestation();
        if attestation.is_none() && self.config.require_attestation {
            warn!("Verified mirror record carries no attestation");
            return Err(MirrorError::MissingAttestation);
        }

        let coinbase_hash = record.coinbase_hash();
        let merkle_root = record.header().merkle_root();
        if let Some(payload) = &attestation {
            info!(
                coinbase = %hex::encode(coinbase_hash),
                candidate = %hex::encode(payload.candidate_address),
                reward = %hex::encode(payload.reward_address),
                "Accepted attested coinbase"
            );
        }

        Ok(VerifiedMirror {
            coinbase_address: record.coinbase_address(),
            record,
            coinbase_hash,
            merkle_root,
            attestation,
        })
    }
}
