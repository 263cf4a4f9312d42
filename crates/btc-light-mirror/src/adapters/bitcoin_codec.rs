//! # Bitcoin Codec Adapter
//!
//! Implements the codec ports with rust-bitcoin consensus encoding.
//!
//! Hashes stay in internal byte order (the order they are hashed in), which
//! is the reverse of what block explorers display.

use bitcoin::block::Header;
use bitcoin::consensus::encode::{self, deserialize_partial, serialize};
use bitcoin::hashes::Hash as _;
use bitcoin::Transaction;

use crate::algorithms::wire::WireReader;
use crate::domain::{Hash, MirrorError};
use crate::ports::{BlockHeaderCodec, CoinbaseCodec};

/// Serialized Bitcoin block header size.
pub const BLOCK_HEADER_SIZE: usize = 80;

fn codec_error(what: &'static str, err: encode::Error) -> MirrorError {
    MirrorError::Codec {
        what,
        reason: err.to_string(),
    }
}

impl BlockHeaderCodec for Header {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&serialize(self));
    }

    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, MirrorError> {
        if reader.remaining() < BLOCK_HEADER_SIZE {
            return Err(MirrorError::Truncated {
                field: "block header",
                needed: BLOCK_HEADER_SIZE,
                available: reader.remaining(),
            });
        }
        let (header, consumed) = deserialize_partial::<Header>(reader.remaining_bytes())
            .map_err(|e| codec_error("block header", e))?;
        reader.advance(consumed, "block header")?;
        Ok(header)
    }

    fn merkle_root(&self) -> Hash {
        self.merkle_root.to_byte_array()
    }
}

impl CoinbaseCodec for Transaction {
    fn encode_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&serialize(self));
    }

    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, MirrorError> {
        let (tx, consumed) = deserialize_partial::<Transaction>(reader.remaining_bytes())
            .map_err(|e| codec_error("coinbase transaction", e))?;
        reader.advance(consumed, "coinbase transaction")?;
        Ok(tx)
    }

    fn tx_hash(&self) -> Hash {
        self.compute_txid().to_byte_array()
    }

    fn output_scripts(&self) -> Vec<&[u8]> {
        self.output
            .iter()
            .map(|out| out.script_pubkey.as_bytes())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::blockdata::constants::genesis_block;
    use bitcoin::Network;

    #[test]
    fn test_genesis_header_fields() {
        let block = genesis_block(Network::Bitcoin);
        let mut out = Vec::new();
        block.header.encode_to(&mut out);
        assert_eq!(out.len(), BLOCK_HEADER_SIZE);
        assert_eq!(&out[36..68], &block.header.merkle_root());
    }

    #[test]
    fn test_genesis_coinbase_hash_is_root() {
        let block = genesis_block(Network::Bitcoin);
        let coinbase = &block.txdata[0];
        assert_eq!(coinbase.tx_hash(), block.header.merkle_root());
        // Displayed (reversed) genesis merkle root.
        let mut displayed = coinbase.tx_hash();
        displayed.reverse();
        assert_eq!(
            hex::encode(displayed),
            "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
        );
    }

    #[test]
    fn test_transaction_decode_consumes_exactly() {
        let block = genesis_block(Network::Bitcoin);
        let mut out = Vec::new();
        block.txdata[0].encode_to(&mut out);
        let tx_len = out.len();
        out.extend_from_slice(&[1, 2, 3]);

        let mut reader = WireReader::new(&out);
        let tx = Transaction::decode_from(&mut reader).unwrap();
        assert_eq!(tx, block.txdata[0]);
        assert_eq!(reader.position(), tx_len);
    }

    #[test]
    fn test_header_truncated() {
        let mut reader = WireReader::new(&[0u8; 40]);
        assert!(matches!(
            Header::decode_from(&mut reader),
            Err(MirrorError::Truncated { needed: 80, available: 40, .. })
        ));
    }

    #[test]
    fn test_garbage_transaction_is_codec_error() {
        let mut reader = WireReader::new(&[0x01, 0x00, 0x00, 0x00, 0xff]);
        assert!(matches!(
            Transaction::decode_from(&mut reader),
            Err(MirrorError::Codec { what: "coinbase transaction", .. })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_output_scripts() {
        let block = genesis_block(Network::Bitcoin);
        let scripts = block.txdata[0].output_scripts();
        assert_eq!(scripts.len(), 1);
        // 65-byte pubkey push + OP_CHECKSIG
        assert_eq!(scripts[0].len(), 67);
        assert_eq!(scripts[0][66], 0xac);
    }
}
