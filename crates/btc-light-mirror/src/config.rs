//! # Light Mirror Configuration
//!
//! Configuration for the light mirror service.

use serde::{Deserialize, Serialize};

use crate::domain::{
    DecodeLimits, MirrorError, RecordKind, MAX_MERKLE_NODES, MAX_TX_PER_BLOCK,
};

/// Light mirror configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LightMirrorConfig {
    /// Wire record variant produced and accepted.
    pub record_kind: RecordKind,

    /// Maximum authentication-path length accepted on decode.
    /// May tighten the built-in bound, never loosen it.
    pub max_path_nodes: u64,

    /// Maximum transaction count accepted on decode (legacy records).
    /// May tighten the built-in bound, never loosen it.
    pub max_transactions: u64,

    /// Reject verified records whose coinbase carries no attestation.
    pub require_attestation: bool,
}

impl Default for LightMirrorConfig {
    fn default() -> Self {
        Self {
            record_kind: RecordKind::Compact,
            max_path_nodes: MAX_MERKLE_NODES,
            max_transactions: MAX_TX_PER_BLOCK,
            require_attestation: false,
        }
    }
}

impl LightMirrorConfig {
    /// Create a config for testing (legacy records, small bounds).
    pub fn for_testing() -> Self {
        Self {
            record_kind: RecordKind::Legacy,
            max_path_nodes: 8,
            max_transactions: 255,
            require_attestation: false,
        }
    }

    /// Reject bounds above the built-in hard limits.
    pub fn validate(&self) -> Result<(), MirrorError> {
        if self.max_path_nodes > MAX_MERKLE_NODES {
            return Err(MirrorError::InvalidConfig(format!(
                "max_path_nodes {} exceeds {}",
                self.max_path_nodes, MAX_MERKLE_NODES
            )));
        }
        if self.max_transactions > MAX_TX_PER_BLOCK {
            return Err(MirrorError::InvalidConfig(format!(
                "max_transactions {} exceeds {}",
                self.max_transactions, MAX_TX_PER_BLOCK
            )));
        }
        Ok(())
    }

    /// Decode bounds derived from this config.
    pub fn limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_path_nodes: self.max_path_nodes,
            max_transactions: self.max_transactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LightMirrorConfig::default();
        assert_eq!(config.record_kind, RecordKind::Compact);
        assert_eq!(config.max_path_nodes, 20);
        assert_eq!(config.max_transactions, 400_001);
        assert!(config.validate().is_ok());
        assert_eq!(config.limits(), DecodeLimits::default());
    }

    #[test]
    fn test_testing_config() {
        let config = LightMirrorConfig::for_testing();
        assert_eq!(config.record_kind, RecordKind::Legacy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_loosened_bounds() {
        let config = LightMirrorConfig {
            max_path_nodes: 21,
            ..LightMirrorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MirrorError::InvalidConfig(_))
        ));

        let config = LightMirrorConfig {
            max_transactions: MAX_TX_PER_BLOCK + 1,
            ..LightMirrorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LightMirrorConfig =
            serde_json::from_str(r#"{ "record_kind": "legacy", "require_attestation": true }"#)
                .unwrap();
        assert_eq!(config.record_kind, RecordKind::Legacy);
        assert!(config.require_attestation);
        assert_eq!(config.max_path_nodes, MAX_MERKLE_NODES);
    }
}
