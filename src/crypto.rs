//! Private key -> Ethereum address derivation.
//!
//! Address = last 20 bytes of Keccak-256 over the uncompressed secp256k1
//! public point (64-byte X||Y, SEC1 prefix stripped), rendered as 0x-prefixed
//! lowercase hex. Deterministic, no I/O.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use sha3::{Digest, Keccak256};

use crate::keygen::PrivateKey;

/// Secp256k1 curve order n - private keys must be non-zero and less than this
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
    0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Check key is a valid secp256k1 scalar: 0 < key < N
///
/// Big-endian byte slices compare lexicographically, which matches numeric
/// order for equal lengths.
#[inline]
pub fn is_valid_private_key(key: &[u8; 32]) -> bool {
    key.iter().any(|&b| b != 0) && key[..] < SECP256K1_ORDER[..]
}

/// Derive the Ethereum address for a private key.
///
/// The caller must pass a valid scalar (the generator rejects out-of-range
/// draws before keys reach this point).
pub fn derive_address(key: &PrivateKey) -> String {
    let secret = SecretKey::from_slice(key).expect("generator guarantees a valid scalar");
    let pubkey = secret.public_key();

    // Uncompressed SEC1 point: 0x04 || X (32) || Y (32)
    let point = pubkey.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);

    let mut addr = String::with_capacity(42);
    addr.push_str("0x");
    addr.push_str(&hex::encode(&digest[12..]));
    addr
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_from_u64(v: u64) -> [u8; 32] {
        let mut key = [0u8; 32];
        key[24..].copy_from_slice(&v.to_be_bytes());
        key
    }

    #[test]
    fn test_known_address_vector() {
        // The canonical weak-key vector: private key 1 maps to the
        // generator point's address.
        let addr = derive_address(&key_from_u64(1));
        assert_eq!(addr, "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn test_derive_is_deterministic() {
        let key = key_from_u64(0xDEAD_BEEF);
        assert_eq!(derive_address(&key), derive_address(&key));
    }

    #[test]
    fn test_address_shape() {
        let addr = derive_address(&key_from_u64(42));
        assert_eq!(addr.len(), 42);
        assert!(addr.starts_with("0x"));
        assert!(addr[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(addr, addr.to_ascii_lowercase());
    }

    #[test]
    fn test_distinct_keys_distinct_addresses() {
        assert_ne!(
            derive_address(&key_from_u64(1)),
            derive_address(&key_from_u64(2))
        );
    }

    #[test]
    fn test_key_validity_bounds() {
        assert!(!is_valid_private_key(&[0u8; 32]));
        assert!(is_valid_private_key(&key_from_u64(1)));
        assert!(!is_valid_private_key(&SECP256K1_ORDER));
        assert!(!is_valid_private_key(&[0xFF; 32]));

        // N - 1 is the largest valid scalar
        let mut n_minus_1 = SECP256K1_ORDER;
        n_minus_1[31] -= 1;
        assert!(is_valid_private_key(&n_minus_1));
    }
}
