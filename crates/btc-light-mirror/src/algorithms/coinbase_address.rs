//! # Coinbase Payout Address
//!
//! Only two script shapes are recognised:
//!
//! - P2PKH:  `OP_DUP OP_HASH160 OP_DATA_20 <hash> OP_EQUALVERIFY OP_CHECKSIG`
//! - P2WPKH: `OP_0 OP_DATA_20 <hash>`

use crate::domain::{Address, CoinbaseAddress, ScriptKind};

/// `OP_0`
pub const OP_0: u8 = 0x00;
/// `OP_DATA_20`
pub const OP_DATA_20: u8 = 0x14;
/// `OP_DUP`
pub const OP_DUP: u8 = 0x76;
/// `OP_HASH160`
pub const OP_HASH160: u8 = 0xa9;
/// `OP_EQUALVERIFY`
pub const OP_EQUALVERIFY: u8 = 0x88;
/// `OP_CHECKSIG`
pub const OP_CHECKSIG: u8 = 0xac;

/// Length of a pay-to-pubkey-hash script.
pub const PUBKEY_HASH_SCRIPT_LEN: usize = 25;

/// Length of a witness v0 pay-to-pubkey-hash script.
pub const WITNESS_V0_KEY_HASH_SCRIPT_LEN: usize = 22;

/// Decode the payout address of a single script.
///
/// Unrecognised shapes yield [`CoinbaseAddress::unsupported`].
pub fn parse_payout_script(script: &[u8]) -> CoinbaseAddress {
    match script {
        [OP_DUP, OP_HASH160, OP_DATA_20, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG]
            if script.len() == PUBKEY_HASH_SCRIPT_LEN =>
        {
            CoinbaseAddress {
                address: to_address(hash),
                kind: ScriptKind::PubKeyHash,
            }
        }
        [OP_0, OP_DATA_20, hash @ ..] if script.len() == WITNESS_V0_KEY_HASH_SCRIPT_LEN => {
            CoinbaseAddress {
                address: to_address(hash),
                kind: ScriptKind::WitnessV0KeyHash,
            }
        }
        _ => CoinbaseAddress::unsupported(),
    }
}

/// Decode the payout address from output 0 of a coinbase.
pub fn extract_coinbase_address<'a, I>(output_scripts: I) -> CoinbaseAddress
where
    I: IntoIterator<Item = &'a [u8]>,
{
    output_scripts
        .into_iter()
        .next()
        .map(parse_payout_script)
        .unwrap_or_default()
}

fn to_address(hash: &[u8]) -> Address {
    let mut address = [0u8; 20];
    address.copy_from_slice(hash);
    address
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p2pkh(hash: [u8; 20]) -> Vec<u8> {
        let mut script = vec![OP_DUP, OP_HASH160, OP_DATA_20];
        script.extend_from_slice(&hash);
        script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
        script
    }

    fn p2wpkh(hash: [u8; 20]) -> Vec<u8> {
        let mut script = vec![OP_0, OP_DATA_20];
        script.extend_from_slice(&hash);
        script
    }

    #[test]
    fn test_pubkey_hash() {
        let addr = parse_payout_script(&p2pkh([7u8; 20]));
        assert_eq!(addr.kind, ScriptKind::PubKeyHash);
        assert_eq!(addr.address, [7u8; 20]);
    }

    #[test]
    fn test_witness_v0_key_hash() {
        let addr = parse_payout_script(&p2wpkh([8u8; 20]));
        assert_eq!(addr.kind, ScriptKind::WitnessV0KeyHash);
        assert_eq!(addr.address, [8u8; 20]);
    }

    #[test]
    fn test_only_output_zero_used() {
        let other = p2pkh([9u8; 20]);
        let payout: &[u8] = &[0x51];
        let addr = extract_coinbase_address([payout, other.as_slice()]);
        assert_eq!(addr, CoinbaseAddress::unsupported());
    }

    #[test]
    fn test_no_outputs() {
        assert_eq!(
            extract_coinbase_address(Vec::<&[u8]>::new()),
            CoinbaseAddress::unsupported()
        );
    }

    #[test]
    fn test_wrong_length_unsupported() {
        let mut long = p2pkh([1u8; 20]);
        long.push(0x00);
        assert_eq!(parse_payout_script(&long).kind, ScriptKind::Unsupported);

        let mut short = p2wpkh([1u8; 20]);
        short.pop();
        assert_eq!(parse_payout_script(&short).kind, ScriptKind::Unsupported);
    }

    #[test]
    fn test_wrong_opcode_unsupported() {
        let mut script = p2pkh([1u8; 20]);
        script[24] = 0xad; // OP_CHECKSIGVERIFY
        let addr = parse_payout_script(&script);
        assert_eq!(addr.kind, ScriptKind::Unsupported);
        assert_eq!(addr.address, [0u8; 20]);

        // P2WSH: OP_0 OP_DATA_32 <32 bytes>
        let mut p2wsh = vec![OP_0, 0x20];
        p2wsh.extend_from_slice(&[3u8; 32]);
        assert_eq!(parse_payout_script(&p2wsh).kind, ScriptKind::Unsupported);
    }
}
