//! # Ports Module
//!
//! Inbound (API) and outbound (codec) ports.

pub mod inbound;
pub mod outbound;

pub use inbound::{LightMirrorApi, MirrorRecordApi};
pub use outbound::{BlockHeaderCodec, CoinbaseCodec, MockCoinbase, MockHeader, MockOutput};
