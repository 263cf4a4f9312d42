//! # Adapters Module
//!
//! Outbound port implementations for real Bitcoin data.

pub mod bitcoin_codec;

pub use bitcoin_codec::BLOCK_HEADER_SIZE;
