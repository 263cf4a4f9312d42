//! # Application Module
//!
//! Service layer orchestrating decode, verification and extraction.

pub mod service;

pub use service::LightMirrorService;
