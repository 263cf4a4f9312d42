//! # Attestation Extraction
//!
//! Locates the cross-chain attestation in the coinbase outputs.
//!
//! ```text
//! [0]      OP_RETURN
//! [1]      push opcode (not checked)
//! [2..6)   "CORE"
//! [6]      OP_DATA_1
//! [7..27)  candidate address
//! [27..47) reward address
//! [47..79) attested block hash (optional)
//! ```

use crate::domain::{Address, AttestationPayload, Hash};

/// `OP_RETURN`: provably unspendable, data-only output.
pub const OP_RETURN: u8 = 0x6a;

/// `OP_DATA_1`: push the next byte.
pub const OP_DATA_1: u8 = 0x01;

/// Tag identifying an attestation output.
pub const ATTESTATION_MAGIC: &[u8; 4] = b"CORE";

/// Shortest script that carries both addresses.
pub const MIN_ATTESTATION_SCRIPT_LEN: usize = 1 + 1 + 4 + 1 + 20 + 20;

/// Script length from which the block hash is present.
pub const ATTESTATION_WITH_HASH_LEN: usize = MIN_ATTESTATION_SCRIPT_LEN + 32;

/// Decode one output script, `None` if it is not an attestation.
pub fn parse_attestation_script(script: &[u8]) -> Option<AttestationPayload> {
    if script.len() < MIN_ATTESTATION_SCRIPT_LEN
        || script[0] != OP_RETURN
        || &script[2..6] != ATTESTATION_MAGIC
        || script[6] != OP_DATA_1
    {
        return None;
    }

    let mut candidate_address: Address = [0u8; 20];
    candidate_address.copy_from_slice(&script[7..27]);
    let mut reward_address: Address = [0u8; 20];
    reward_address.copy_from_slice(&script[27..47]);

    let attested_block_hash = (script.len() >= ATTESTATION_WITH_HASH_LEN).then(|| {
        let mut hash: Hash = [0u8; 32];
        hash.copy_from_slice(&script[47..ATTESTATION_WITH_HASH_LEN]);
        hash
    });

    Some(AttestationPayload {
        candidate_address,
        reward_address,
        attested_block_hash,
    })
}

/// Scan every output after the payout output.
///
/// All outputs are visited; the last matching one wins.
pub fn extract_attestation<'a, I>(output_scripts: I) -> Option<AttestationPayload>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut found = None;
    for script in output_scripts.into_iter().skip(1) {
        if let Some(payload) = parse_attestation_script(script) {
            found = Some(payload);
        }
    }
    found
}

/// Build an attestation script (producer side and tests).
pub fn attestation_script(
    candidate_address: &Address,
    reward_address: &Address,
    attested_block_hash: Option<&Hash>,
) -> Vec<u8> {
    let mut script = Vec::with_capacity(ATTESTATION_WITH_HASH_LEN);
    script.push(OP_RETURN);
    script.push(ATTESTATION_MAGIC.len() as u8);
    script.extend_from_slice(ATTESTATION_MAGIC);
    script.push(OP_DATA_1);
    script.extend_from_slice(candidate_address);
    script.extend_from_slice(reward_address);
    if let Some(hash) = attested_block_hash {
        script.extend_from_slice(hash);
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYOUT: &[u8] = &[0x51];

    #[test]
    fn test_single_match() {
        let script = attestation_script(&[1u8; 20], &[2u8; 20], None);
        let payload = extract_attestation([PAYOUT, script.as_slice()]).unwrap();
        assert_eq!(payload.candidate_address, [1u8; 20]);
        assert_eq!(payload.reward_address, [2u8; 20]);
        assert_eq!(payload.attested_block_hash, None);
    }

    #[test]
    fn test_block_hash_present() {
        let script = attestation_script(&[1u8; 20], &[2u8; 20], Some(&[3u8; 32]));
        assert_eq!(script.len(), 79);
        let payload = extract_attestation([PAYOUT, script.as_slice()]).unwrap();
        assert_eq!(payload.attested_block_hash, Some([3u8; 32]));
    }

    #[test]
    fn test_all_zero_block_hash_is_present() {
        let script = attestation_script(&[1u8; 20], &[2u8; 20], Some(&[0u8; 32]));
        let payload = parse_attestation_script(&script).unwrap();
        assert_eq!(payload.attested_block_hash, Some([0u8; 32]));
    }

    #[test]
    fn test_partial_block_hash_ignored() {
        let mut script = attestation_script(&[1u8; 20], &[2u8; 20], None);
        script.extend_from_slice(&[9u8; 31]);
        let payload = parse_attestation_script(&script).unwrap();
        assert_eq!(payload.attested_block_hash, None);
    }

    #[test]
    fn test_last_match_wins() {
        let first = attestation_script(&[1u8; 20], &[2u8; 20], Some(&[3u8; 32]));
        let second = attestation_script(&[4u8; 20], &[5u8; 20], None);
        let payload =
            extract_attestation([PAYOUT, first.as_slice(), second.as_slice()]).unwrap();
        assert_eq!(payload.candidate_address, [4u8; 20]);
        assert_eq!(payload.reward_address, [5u8; 20]);
        assert_eq!(payload.attested_block_hash, None);
    }

    #[test]
    fn test_non_matching_after_match_keeps_match() {
        let first = attestation_script(&[1u8; 20], &[2u8; 20], None);
        let junk = vec![OP_RETURN, 0x04, b'C', b'O', b'R', b'X'];
        let payload = extract_attestation([PAYOUT, first.as_slice(), junk.as_slice()]).unwrap();
        assert_eq!(payload.candidate_address, [1u8; 20]);
    }

    #[test]
    fn test_payout_output_never_scanned() {
        let script = attestation_script(&[1u8; 20], &[2u8; 20], None);
        assert_eq!(extract_attestation([script.as_slice()]), None);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract_attestation([PAYOUT, PAYOUT]), None);
        assert_eq!(extract_attestation(Vec::<&[u8]>::new()), None);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let good = attestation_script(&[1u8; 20], &[2u8; 20], None);

        let mut wrong_opcode = good.clone();
        wrong_opcode[0] = 0x00;
        assert!(parse_attestation_script(&wrong_opcode).is_none());

        let mut wrong_magic = good.clone();
        wrong_magic[5] = b'X';
        assert!(parse_attestation_script(&wrong_magic).is_none());

        let mut wrong_push = good.clone();
        wrong_push[6] = 0x02;
        assert!(parse_attestation_script(&wrong_push).is_none());

        assert!(parse_attestation_script(&good[..46]).is_none());
    }

    #[test]
    fn test_push_length_byte_unchecked() {
        let mut script = attestation_script(&[1u8; 20], &[2u8; 20], None);
        script[1] = 0xff;
        assert!(parse_attestation_script(&script).is_some());
    }
}
